//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use std::process::ExitCode;

use quoteboard_core::{Conflict, Quote, QuoteError, StorageError, SyncError};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    /// Print the quote being displayed
    pub fn print_quote(&self, quote: &Quote) {
        match self.format {
            OutputFormat::Human => {
                println!("\"{}\"", quote.text);
                println!("  ({})", quote.category);
            }
            OutputFormat::Json => print_json(quote),
            OutputFormat::Quiet => println!("{}", quote.text),
        }
    }

    /// Print a list of quotes
    pub fn print_quotes(&self, quotes: &[&Quote]) {
        match self.format {
            OutputFormat::Human => {
                if quotes.is_empty() {
                    println!("No quotes found.");
                    return;
                }
                for quote in quotes {
                    println!(
                        "{:<14} | {}",
                        truncate(&quote.category, 14),
                        truncate(&quote.text, 60)
                    );
                }
                println!("\n{} quote(s)", quotes.len());
            }
            OutputFormat::Json => print_json(&quotes),
            OutputFormat::Quiet => {
                for quote in quotes {
                    println!("{}", quote.text);
                }
            }
        }
    }

    /// Print categories
    pub fn print_categories(&self, categories: &[String]) {
        match self.format {
            OutputFormat::Human => {
                if categories.is_empty() {
                    println!("No categories found.");
                    return;
                }
                for category in categories {
                    println!("{}", category);
                }
                println!("\n{} categor{}", categories.len(), plural_y(categories.len()));
            }
            OutputFormat::Json => print_json(&categories),
            OutputFormat::Quiet => {
                for category in categories {
                    println!("{}", category);
                }
            }
        }
    }

    /// Print pending conflicts, numbered from 1
    pub fn print_conflicts(&self, conflicts: &[Conflict]) {
        match self.format {
            OutputFormat::Human => {
                if conflicts.is_empty() {
                    println!("No pending conflicts.");
                    return;
                }
                for (i, conflict) in conflicts.iter().enumerate() {
                    println!("#{} {}", i + 1, truncate(&conflict.local.text, 60));
                    println!("   local:  {}", conflict.local.category);
                    println!("   server: {}", conflict.server.category);
                }
                println!();
                println!("{} conflict(s). Resolve with:", conflicts.len());
                println!("  quoteboard conflicts keep-local <N>");
                println!("  quoteboard conflicts accept-server <N>");
                println!("  quoteboard conflicts accept-all");
            }
            OutputFormat::Json => print_json(&conflicts),
            OutputFormat::Quiet => {
                for conflict in conflicts {
                    println!("{}", conflict.local.text);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print an arbitrary JSON value (JSON mode only)
    pub fn json(&self, value: &serde_json::Value) {
        if self.is_json() {
            print_json(value);
        }
    }

    /// Report a failed command and pick the exit code
    ///
    /// Bad input exits with 2, anything else with 1. Storage failures get a
    /// hint about how to fix them.
    pub fn error(&self, error: &anyhow::Error) -> ExitCode {
        let user_error = is_user_error(error);
        let hint = storage_cause(error).and_then(StorageError::recovery_suggestion);

        match self.format {
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({
                        "status": "error",
                        "message": format!("{:#}", error),
                        "hint": hint
                    })
                );
            }
            OutputFormat::Human | OutputFormat::Quiet => {
                if user_error {
                    eprintln!("{:#}", error);
                } else {
                    eprintln!("Error: {:#}", error);
                }
                if let Some(hint) = hint {
                    eprintln!("  hint: {}", hint);
                }
            }
        }

        ExitCode::from(exit_status(error))
    }
}

fn exit_status(error: &anyhow::Error) -> u8 {
    if is_user_error(error) {
        2
    } else {
        1
    }
}

/// Whether the failure came from bad input rather than the environment
fn is_user_error(error: &anyhow::Error) -> bool {
    error.chain().any(|cause| {
        if let Some(e) = cause.downcast_ref::<QuoteError>() {
            return e.is_user_error();
        }
        matches!(
            cause.downcast_ref::<SyncError>(),
            Some(SyncError::Store(e)) if e.is_user_error()
        )
    })
}

/// Storage failure behind a command error, if any
fn storage_cause(error: &anyhow::Error) -> Option<&StorageError> {
    error.chain().find_map(|cause| {
        if let Some(e) = cause.downcast_ref::<StorageError>() {
            return Some(e);
        }
        if let Some(QuoteError::Storage(e)) = cause.downcast_ref::<QuoteError>() {
            return Some(e);
        }
        match cause.downcast_ref::<SyncError>() {
            Some(SyncError::Storage(e)) | Some(SyncError::Store(QuoteError::Storage(e))) => {
                Some(e)
            }
            _ => None,
        }
    })
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to encode output: {}", e),
    }
}

fn plural_y(count: usize) -> &'static str {
    if count == 1 {
        "y"
    } else {
        "ies"
    }
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flags(false, true), OutputFormat::Quiet);
        // Quiet takes precedence
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a long string", 10), "this is...");
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate("ééééééééééé", 6), "ééé...");
    }

    #[test]
    fn test_user_error_detection() {
        let err = anyhow::Error::from(QuoteError::EmptyField).context("Failed to add quote");
        assert!(is_user_error(&err));
        assert!(storage_cause(&err).is_none());

        let err = anyhow::anyhow!("Remote did not accept the quote");
        assert!(!is_user_error(&err));
    }

    #[test]
    fn test_storage_cause_through_wrappers() {
        let disk_full = || StorageError::DiskFull {
            path: "/data/quoteboard.db".into(),
        };

        let err = anyhow::Error::from(QuoteError::Storage(disk_full()));
        assert!(matches!(
            storage_cause(&err),
            Some(StorageError::DiskFull { .. })
        ));
        assert!(!is_user_error(&err));

        let err = anyhow::Error::from(SyncError::Store(QuoteError::Storage(disk_full())));
        assert!(storage_cause(&err).is_some());

        let err = anyhow::Error::from(disk_full()).context("Failed to open quote database");
        assert_eq!(
            storage_cause(&err).and_then(StorageError::recovery_suggestion),
            Some("Free up disk space and try again.")
        );
    }

    #[test]
    fn test_exit_status() {
        let user = anyhow::Error::from(QuoteError::ImportFormat);
        assert_eq!(exit_status(&user), 2);

        let other = anyhow::anyhow!("connection reset");
        assert_eq!(exit_status(&other), 1);
    }

    #[test]
    fn test_plural() {
        assert_eq!(plural_y(1), "y");
        assert_eq!(plural_y(3), "ies");
    }
}
