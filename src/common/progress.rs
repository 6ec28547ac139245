use indicatif::{ProgressBar, ProgressStyle};

use crate::ui::is_interactive_text;

fn create_spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ");
    pb.set_style(style);
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Run `work` behind a spinner. In JSON mode no spinner is drawn.
pub fn with_spinner<T>(message: impl Into<String>, work: impl FnOnce() -> T) -> T {
    if !is_interactive_text() {
        return work();
    }
    let pb = create_spinner(message.into());
    let result = work();
    pb.finish_and_clear();
    result
}
