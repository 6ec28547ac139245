use thiserror::Error;

/// Failures that escape resolution. Probe failures and bad selection input
/// are absorbed locally and never show up here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("unknown package manager '{0}' in configuration (expected dnf, apt or pacman)")]
    UnknownManager(String),

    #[error("package '{0}' not found in any enabled source")]
    NotFound(String),
}
