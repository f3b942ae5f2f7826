use super::types::SimulationResult;

pub fn format_percent(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}

pub fn format_currency(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}${grouped}.{cents}")
}

pub fn success_rate_line(result: &SimulationResult) -> String {
    format!("Success Rate: {}", format_percent(result.success_rate))
}

pub fn median_balance_line(result: &SimulationResult) -> String {
    format!(
        "Median Final Balance: {}",
        format_currency(result.median_final_balance)
    )
}

/// Result section text; empty until a simulation has succeeded.
pub fn result_lines(result: Option<&SimulationResult>) -> Vec<String> {
    match result {
        Some(result) => vec![success_rate_line(result), median_balance_line(result)],
        None => Vec::new(),
    }
}
