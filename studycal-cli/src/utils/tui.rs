use std::future::Future;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const TICK_INTERVAL: Duration = Duration::from_millis(80);

fn create_spinner(message: impl Into<String>) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .tick_strings(&["-", "\\", "|", "/"])
        .template("{msg} {spinner}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.set_message(message.into());
    spinner.enable_steady_tick(TICK_INTERVAL);
    spinner
}

/// Await `fut` with a spinner showing `message`, clearing it afterwards.
pub async fn with_spinner<F: Future>(message: impl Into<String>, fut: F) -> F::Output {
    let spinner = create_spinner(message);
    let output = fut.await;
    spinner.finish_and_clear();
    output
}
