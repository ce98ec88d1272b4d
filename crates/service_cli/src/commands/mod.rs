//! CLI command implementations
//!
//! Each submodule implements a specific CLI command.

pub mod calibrate;
pub mod compare;
pub mod run;

/// Formats an optional float for table output.
pub(crate) fn cell(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.6e}", v),
        None => "-".to_string(),
    }
}
