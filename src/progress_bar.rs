use std::cell::Cell;

use log::LevelFilter;

pub use crate::traits::Progress;

impl Progress for indicatif::ProgressBar {
    fn inc(&self, i: u64) {
        indicatif::ProgressBar::inc(self, i)
    }

    fn finish(&self) {
        indicatif::ProgressBar::finish_and_clear(self)
    }
}

impl Progress for logbar::ProgressBar {
    fn inc(&self, i: u64) {
        logbar::ProgressBar::inc(self, i as usize)
    }

    fn finish(&self) {
        logbar::ProgressBar::finish(self)
    }
}

/// Dummy progress indicator
pub struct NoProgress {}
impl Progress for NoProgress {
    fn inc(&self, _i: u64) {}

    fn finish(&self) {}
}

/// Don't show any progress indicator
pub const NO_PROGRESS: NoProgress = NoProgress {};

/// Progress over the compared objects
///
/// On an interactive terminal this is an `indicatif` bar, otherwise a
/// `logbar` that works in log files. No bar is shown unless the log
/// level is exactly `info`: at lower levels the user asked for silence
/// and at higher levels the bar would be drowned in messages.
///
/// While the bar is shown, logging is disabled. It is restored to the
/// previous level by [Progress::finish] or when the bar is dropped.
pub struct ProgressBar {
    bar: Box<dyn Progress>,
    restore_level: Cell<Option<LevelFilter>>,
}

impl Default for ProgressBar {
    fn default() -> Self {
        Self::hidden()
    }
}

impl Progress for ProgressBar {
    fn inc(&self, i: u64) {
        self.bar.inc(i);
    }

    fn finish(&self) {
        self.bar.finish();
        self.restore_logs();
    }
}

impl Drop for ProgressBar {
    fn drop(&mut self) {
        self.restore_logs();
    }
}

impl ProgressBar {
    /// A new progress bar over `len` objects with the given message
    pub fn new(len: u64, message: &str) -> Self {
        if log::max_level() != LevelFilter::Info || len == 0 {
            Self::hidden()
        } else if console::Term::stderr().features().is_attended() {
            Self::indicatif(len, message)
        } else {
            Self::logbar(len, message)
        }
    }

    /// A progress bar that is never shown
    pub fn hidden() -> Self {
        Self {
            bar: Box::new(NO_PROGRESS),
            restore_level: Cell::new(None),
        }
    }

    fn indicatif(len: u64, message: &str) -> Self {
        let bar = indicatif::ProgressBar::new(len);
        match indicatif::ProgressStyle::default_bar()
            .template("{bar:60.cyan/cyan} {msg} {pos}/{len} [{elapsed}]")
        {
            Ok(style) => bar.set_style(style),
            Err(err) => log::debug!("Using default progress bar style: {err}"),
        }
        bar.set_message(message.to_owned());
        Self::silencing_logs(Box::new(bar))
    }

    fn logbar(len: u64, message: &str) -> Self {
        let style = logbar::Style::new().indicator('█');
        eprintln!("{message}");
        let bar = logbar::ProgressBar::with_style(len as usize, style);
        Self::silencing_logs(Box::new(bar))
    }

    fn silencing_logs(bar: Box<dyn Progress>) -> Self {
        let restore_level = Cell::new(Some(log::max_level()));
        log::set_max_level(LevelFilter::Off);
        Self { bar, restore_level }
    }

    fn restore_logs(&self) {
        if let Some(level) = self.restore_level.take() {
            log::set_max_level(level);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logs_restored_on_drop() {
        let _ = env_logger::builder().is_test(true).try_init();
        let level = log::max_level();
        let bar = ProgressBar::silencing_logs(Box::new(NO_PROGRESS));
        assert_eq!(log::max_level(), LevelFilter::Off);
        drop(bar);
        assert_eq!(log::max_level(), level);

        let bar = ProgressBar::silencing_logs(Box::new(NO_PROGRESS));
        bar.finish();
        assert_eq!(log::max_level(), level);
    }
}
