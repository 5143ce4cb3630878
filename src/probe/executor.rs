use super::ProbeError;
use std::path::Path;
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

/// Extra time granted to the child process on top of the probe timeout.
pub const PROCESS_GRACE: Duration = Duration::from_secs(2);

pub async fn execute_command(
    program: &Path,
    args: &[&str],
    timeout_duration: Duration,
) -> Result<Output, ProbeError> {
    let command = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output();

    timeout(timeout_duration, command)
        .await
        .map_err(|_| ProbeError::Timeout {
            command: describe(program, args),
        })?
        .map_err(|e| ProbeError::ExecutionFailed {
            command: describe(program, args),
            source: e,
        })
}

fn describe(program: &Path, args: &[&str]) -> String {
    format!("{} {}", program.display(), args.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_program_is_execution_failure() {
        let result = execute_command(
            Path::new("definitely-not-a-real-ping-binary"),
            &["-c", "1"],
            Duration::from_secs(1),
        )
        .await;

        match result {
            Err(ProbeError::ExecutionFailed { command, .. }) => {
                assert_eq!(command, "definitely-not-a-real-ping-binary -c 1");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
