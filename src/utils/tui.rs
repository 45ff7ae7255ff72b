use std::future::Future;

use indicatif::{ProgressBar, ProgressStyle};

pub fn create_spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_strings(&["-", "\\", "|", "/"])
        .template("{msg} {spinner}")
    {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner
}

/// Show a spinner while a store call is in flight, clearing it before any output.
pub async fn with_spinner<T>(message: impl Into<String>, fut: impl Future<Output = T>) -> T {
    let spinner = create_spinner(message.into());
    let result = fut.await;
    spinner.finish_and_clear();
    result
}
