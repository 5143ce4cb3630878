use crate::error::{AppError, Result};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A monitored host name or address.
///
/// Keeps the spelling it was added with for display, but compares and
/// hashes case-insensitively.
#[derive(Debug, Clone, Eq)]
pub struct HostId {
    display: String,
    key: String,
}

impl HostId {
    /// Trims surrounding whitespace; rejects an empty result.
    pub fn parse(raw: &str) -> Result<Self> {
        let display = raw.trim();
        if display.is_empty() {
            return Err(AppError::InvalidHost(raw.to_string()));
        }
        Ok(Self {
            display: display.to_string(),
            key: display.to_lowercase(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.display
    }

    pub fn matches(&self, raw: &str) -> bool {
        self.key == raw.trim().to_lowercase()
    }
}

impl PartialEq for HostId {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Hash for HostId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for HostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}
