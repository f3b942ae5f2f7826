use super::portfolio::PortfolioState;

pub const FULL_ALLOCATION: f64 = 100.0;
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;
pub const WEIGHTS_MUST_SUM_MESSAGE: &str = "Portfolio weights must sum to 100%.";

/// Whether the weights form a complete allocation.
///
/// Both the submit button state and the submit-time gate call this, so they
/// cannot disagree.
pub fn is_valid(portfolio: &PortfolioState) -> bool {
    !portfolio.is_empty() && (portfolio.total() - FULL_ALLOCATION).abs() <= WEIGHT_SUM_TOLERANCE
}
