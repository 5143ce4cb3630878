pub mod detector;
pub mod executor;
pub mod parser;
pub mod prober;
pub mod system_ping;

#[cfg(test)]
pub mod testing;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("ping not found in PATH")]
    PingNotFound,

    #[error("Failed to execute {command}: {source}")]
    ExecutionFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command timed out: {command}")]
    Timeout { command: String },

    #[error("No round-trip time in ping output for {host}")]
    NoReply { host: String },
}
