use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

const SPINNER_TICK_MS: u64 = 80;

/// Spinner shown on stderr while the solver subprocess is alive.
///
/// It only ticks when stderr is a terminal, so redirected runs draw nothing.
pub struct SolverSpinner {
    pb: ProgressBar,
}

impl SolverSpinner {
    pub fn start(executable: &Path, quiet: bool) -> Self {
        if quiet {
            return Self {
                pb: ProgressBar::hidden(),
            };
        }

        let pb = ProgressBar::new_spinner()
            .with_style(Self::spinner_style())
            .with_message(format!("Running solver {} ...", executable.display()));
        if !pb.is_hidden() {
            pb.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
        }
        Self { pb }
    }

    /// Clears the spinner so the diagnostics that follow start on a clean line.
    pub fn finish(self) {
        self.pb.finish_and_clear();
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }
}
