//! Export orchestration.
//!
//! resolve → snapshot → enrich → walk (→ nested projects) → write. The
//! [`Exporter`] runs the in-memory part and returns the finished document;
//! [`write_document`] puts it on disk.

mod export;
mod output;

pub use export::{ExportOutcome, Exporter};
pub use output::{backup_file, default_output_path, write_document};

/// Exit codes of the command-line tool
pub mod exit_codes {
    /// Document written
    pub const SUCCESS: i32 = 0;
    /// Any other failure
    pub const ERROR: i32 = 1;
    /// Project or version not found, or server settings missing
    pub const NOT_FOUND: i32 = 2;
    /// The output document could not be written
    pub const OUTPUT_FAILED: i32 = 3;
}

/// Map an export error to its exit code.
#[must_use]
pub const fn exit_code_for(err: &crate::ExportError) -> i32 {
    if err.is_not_found() {
        exit_codes::NOT_FOUND
    } else if err.is_output_failure() {
        exit_codes::OUTPUT_FAILED
    } else {
        exit_codes::ERROR
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ExportError, OutputErrorKind};

    #[test]
    fn test_exit_codes_values() {
        assert_eq!(exit_codes::SUCCESS, 0);
        assert_eq!(exit_codes::ERROR, 1);
        assert_eq!(exit_codes::NOT_FOUND, 2);
        assert_eq!(exit_codes::OUTPUT_FAILED, 3);
    }

    #[test]
    fn test_exit_code_for_errors() {
        assert_eq!(
            exit_code_for(&ExportError::project_not_found("x", Vec::new())),
            exit_codes::NOT_FOUND
        );
        assert_eq!(
            exit_code_for(&ExportError::output(
                "write",
                OutputErrorKind::Serialization("x".to_string())
            )),
            exit_codes::OUTPUT_FAILED
        );
        assert_eq!(
            exit_code_for(&ExportError::config("bad")),
            exit_codes::ERROR
        );
    }
}
