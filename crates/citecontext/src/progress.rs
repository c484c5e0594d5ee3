//! Terminal progress bars for the long sequential loops.

use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar over `len` items, labelled `msg`. Hidden when stderr is not a terminal.
#[must_use]
pub fn bar(len: usize, msg: &'static str) -> ProgressBar {
    let bar = ProgressBar::new(len as u64);
    let style = ProgressStyle::with_template("{msg} [{bar:30.cyan/blue}] {pos}/{len} ({elapsed})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
    bar.set_style(style);
    bar.set_message(msg);
    bar
}
