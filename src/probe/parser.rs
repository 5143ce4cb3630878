use once_cell::sync::Lazy;
use regex::Regex;

static TIME_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"time[=<]\s*([0-9]+\.?[0-9]*)").expect("valid regex"));

/// Extracts the round-trip time in milliseconds from one `ping` run.
///
/// Understands the Linux/BSD (`time=12.3 ms`) and Windows (`time=12ms`,
/// `time<1ms`) reply formats. Returns `None` when no reply line is present.
pub fn parse_round_trip(output: &str) -> Option<f64> {
    TIME_FIELD
        .captures(output)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}
