pub mod config;
pub mod distro;
pub mod paths;
pub mod progress;
pub mod shell;
