//! CLI Exit Code Registry
//!
//! Single source of truth for `ventas` exit codes. Scheduled jobs branch on
//! these, so they are part of the shell contract.
//!
//! | Code | Meaning                                                   |
//! |------|-----------------------------------------------------------|
//! | 0    | Success                                                   |
//! | 1    | General error (unspecified)                               |
//! | 2    | Usage error (bad args, bad or incomplete settings)        |
//! | 3    | Reference mapping file unreadable or malformed            |
//! | 4    | No data loaded from the input files (early stop)          |
//! | 5    | No rows left after the family filter (early stop)         |
//! | 6    | Output file could not be written                          |
//!
//! Early stops (4, 5) are not crashes: the run finished cleanly but
//! produced no output file.

use ventas_pipeline::StopReason;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, unreadable settings, nothing configured.
pub const EXIT_USAGE: u8 = 2;

/// Reference mapping workbook missing, unreadable, or lacking a column.
pub const EXIT_REFERENCE: u8 = 3;

/// Every input file was skipped or held only excluded rows.
pub const EXIT_NO_DATA: u8 = 4;

/// The family filter removed every row.
pub const EXIT_NO_ROWS: u8 = 5;

/// Writing the output file failed.
pub const EXIT_WRITE: u8 = 6;

/// Map an early stop to its exit code.
pub fn stop_exit_code(reason: StopReason) -> u8 {
    match reason {
        StopReason::NoDataLoaded => EXIT_NO_DATA,
        StopReason::NoRowsAfterFamilyFilter => EXIT_NO_ROWS,
    }
}
