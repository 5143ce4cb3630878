pub mod chart;
pub mod hosts;

/// `12.3 ms`, or `N/A` before the first reply.
pub fn format_latency(latency: Option<f64>) -> String {
    match latency {
        Some(ms) => format!("{:.1} ms", ms),
        None => "N/A".to_string(),
    }
}
