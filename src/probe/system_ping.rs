use super::detector::{detect_ping, ToolStatus};
use super::executor::{execute_command, PROCESS_GRACE};
use super::parser::parse_round_trip;
use super::prober::Prober;
use super::ProbeError;
use crate::metrics::sample::Sample;
use async_trait::async_trait;
use std::time::Duration;

/// Probes hosts by running the operating system's `ping` once per call.
pub struct SystemPingProber {
    ping: ToolStatus,
}

impl SystemPingProber {
    pub fn new() -> Self {
        Self::with_tool(detect_ping())
    }

    pub fn with_tool(ping: ToolStatus) -> Self {
        if !ping.is_available() {
            tracing::warn!("ping executable not found; every probe will report a gap");
        }
        Self { ping }
    }

    pub fn tool(&self) -> &ToolStatus {
        &self.ping
    }

    async fn round_trip(&self, host: &str, timeout: Duration) -> Result<f64, ProbeError> {
        let program = self.ping.validate()?;
        let args = ping_args(host, timeout);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();

        let output = execute_command(program, &args, timeout + PROCESS_GRACE).await?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        parse_round_trip(&text).ok_or_else(|| ProbeError::NoReply {
            host: host.to_string(),
        })
    }
}

impl Default for SystemPingProber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Prober for SystemPingProber {
    async fn probe(&self, host: &str, timeout: Duration) -> Sample {
        match self.round_trip(host, timeout).await {
            Ok(ms) => Sample::Latency(ms),
            Err(e) => {
                tracing::debug!(host, error = %e, "probe failed");
                Sample::Gap
            }
        }
    }
}

/// Single-echo arguments for the platform `ping`.
///
/// Windows takes its reply timeout in milliseconds; everything else takes
/// whole seconds, rounded up and never below one.
pub fn ping_args(host: &str, timeout: Duration) -> Vec<String> {
    let millis = timeout.as_millis();
    if cfg!(target_os = "windows") {
        vec![
            "-n".into(),
            "1".into(),
            "-w".into(),
            millis.to_string(),
            host.into(),
        ]
    } else {
        let secs = millis.div_ceil(1000).max(1);
        vec![
            "-c".into(),
            "1".into(),
            "-W".into(),
            secs.to_string(),
            host.into(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(target_os = "windows"))]
    #[test]
    fn test_ping_args_round_timeout_up_to_seconds() {
        assert_eq!(
            ping_args("example.com", Duration::from_millis(2000)),
            vec!["-c", "1", "-W", "2", "example.com"]
        );
        assert_eq!(
            ping_args("example.com", Duration::from_millis(2500)),
            vec!["-c", "1", "-W", "3", "example.com"]
        );
        assert_eq!(
            ping_args("10.0.0.1", Duration::from_millis(200)),
            vec!["-c", "1", "-W", "1", "10.0.0.1"]
        );
    }

    #[cfg(target_os = "windows")]
    #[test]
    fn test_ping_args_windows_milliseconds() {
        assert_eq!(
            ping_args("example.com", Duration::from_millis(2000)),
            vec!["-n", "1", "-w", "2000", "example.com"]
        );
    }

    #[tokio::test]
    async fn test_missing_ping_reports_gap() {
        let prober = SystemPingProber::with_tool(ToolStatus::NotFound);
        let sample = prober.probe("localhost", Duration::from_millis(100)).await;
        assert_eq!(sample, Sample::Gap);
    }
}
