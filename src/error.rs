//! Startup failures.  Anything here aborts the process before the first
//! frame; gameplay itself never errors.

use crate::assets::AssetError;
use crate::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Assets(#[from] AssetError),
    #[error("cannot open log file {}: {source}", .path.display())]
    LogFile {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}
