use super::ProbeError;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolStatus {
    Available { path: PathBuf },
    NotFound,
}

impl ToolStatus {
    pub fn is_available(&self) -> bool {
        matches!(self, ToolStatus::Available { .. })
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            ToolStatus::Available { path } => Some(path),
            ToolStatus::NotFound => None,
        }
    }

    pub fn validate(&self) -> Result<&Path, ProbeError> {
        self.path().ok_or(ProbeError::PingNotFound)
    }
}

/// Looks for the platform `ping` executable on `PATH`.
pub fn detect_ping() -> ToolStatus {
    let path_var = std::env::var_os("PATH").unwrap_or_default();
    detect_tool("ping", std::env::split_paths(&path_var))
}

fn detect_tool(name: &str, dirs: impl IntoIterator<Item = PathBuf>) -> ToolStatus {
    let file_name = if cfg!(target_os = "windows") {
        format!("{}.exe", name)
    } else {
        name.to_string()
    };

    dirs.into_iter()
        .map(|dir| dir.join(&file_name))
        .find(|candidate| candidate.is_file())
        .map(|path| ToolStatus::Available { path })
        .unwrap_or(ToolStatus::NotFound)
}
