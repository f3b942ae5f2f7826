mod portfolio;
mod present;
mod types;
mod validation;

pub use portfolio::{PortfolioState, parse_weight};
pub use present::{
    format_currency, format_percent, median_balance_line, result_lines, success_rate_line,
};
pub use types::{AssetDefaults, SimulationRequest, SimulationResult};
pub use validation::{FULL_ALLOCATION, WEIGHT_SUM_TOLERANCE, WEIGHTS_MUST_SUM_MESSAGE, is_valid};
