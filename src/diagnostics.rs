//! Warning aggregation and skipped-definition bookkeeping.

use std::path::{Path, PathBuf};

use tracing::trace;

/// Details about a definition file that was not turned into a tool.
#[derive(Debug, Clone)]
pub struct SkippedDefinition {
    /// Path to the skipped definition file.
    pub(crate) path: PathBuf,
    /// Reason the definition was skipped.
    pub(crate) reason: String,
}

/// Aggregates warnings and skipped definitions for a command run.
#[derive(Debug, Default)]
pub struct Diagnostics {
    /// Print skipped definitions as they are recorded.
    verbose: bool,
    /// Collected warning messages.
    warnings: Vec<String>,
    /// Collected skipped definition records.
    skipped: Vec<SkippedDefinition>,
}

impl Diagnostics {
    /// Create a new diagnostics collector.
    pub(crate) fn new(verbose: bool) -> Self {
        Self {
            verbose,
            warnings: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Record a warning and print it immediately.
    pub(crate) fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        eprintln!("Warning: {message}");
        self.warnings.push(message);
    }

    /// Record a definition that could not be loaded.
    ///
    /// Skips are quiet by default; malformed definitions must not interrupt a scan.
    /// With `verbose` the skip is printed once; the tracing event sits at
    /// trace level so the `--verbose` debug filter does not repeat it.
    pub(crate) fn skip(&mut self, path: &Path, reason: impl Into<String>) {
        let reason = reason.into();
        trace!(path = %path.display(), %reason, "skipping tool definition");
        if self.verbose {
            eprintln!("Skipped {} - {reason}", path.display());
        }
        self.skipped.push(SkippedDefinition {
            path: path.to_path_buf(),
            reason,
        });
    }

    /// Return the warnings recorded so far.
    pub(crate) fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Return the skipped definitions recorded so far.
    pub(crate) fn skipped(&self) -> &[SkippedDefinition] {
        &self.skipped
    }

    /// Print a summary for skipped definitions if any were recorded.
    pub(crate) fn print_skipped_summary(&self) {
        if self.skipped.is_empty() {
            return;
        }

        eprintln!("Skipped {} tool definition(s) due to errors:", self.skipped.len());
        for skipped in &self.skipped {
            eprintln!("  - {}: {}", skipped.path.display(), skipped.reason);
        }
    }

    /// Print a warning summary when warnings were emitted.
    pub(crate) fn print_warning_summary(&self) {
        let count = self.warnings().len();
        if count == 0 {
            return;
        }

        eprintln!("Completed with {count} warning(s).");
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        path::Path,
        sync::{Arc, Mutex},
    };

    use tracing_subscriber::EnvFilter;

    use super::Diagnostics;

    /// Writer collecting formatted tracing output.
    #[derive(Clone, Default)]
    struct Captured {
        /// Bytes written so far.
        bytes: Arc<Mutex<Vec<u8>>>,
    }

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.bytes.lock().expect("lock").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Record one skip under the given filter and return the tracing output.
    fn traced_skip(directive: &str) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(directive))
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let mut diagnostics = Diagnostics::new(true);
        tracing::subscriber::with_default(subscriber, || {
            diagnostics.skip(Path::new("/kit/prompts/bad/prompt.yaml"), "missing id");
        });
        assert_eq!(diagnostics.skipped().len(), 1);
        let bytes = captured.bytes.lock().expect("lock").clone();
        String::from_utf8(bytes).expect("utf8")
    }

    #[test]
    fn records_warnings_and_skips_separately() {
        let mut diagnostics = Diagnostics::new(false);
        diagnostics.warn("first");
        diagnostics.skip(Path::new("/kit/prompts/bad/prompt.yaml"), "missing id");

        assert_eq!(diagnostics.warnings(), ["first".to_string()]);
        let skipped = diagnostics.skipped();
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].path, Path::new("/kit/prompts/bad/prompt.yaml"));
        assert_eq!(skipped[0].reason, "missing id");
    }

    #[test]
    fn verbose_skip_is_not_repeated_by_debug_logging() {
        assert!(traced_skip("hit=debug").is_empty());
        assert!(traced_skip("hit=trace").contains("skipping tool definition"));
    }
}
