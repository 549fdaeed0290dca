//! Utilities module.

use crate::heuristics::Finding;
use colored::Colorize;
use log::{error, log_enabled, warn, Level};
use std::{path::Path, str};

/// Prints the given error and suggests the verbose flag when it's not in use.
pub fn print_error<S: AsRef<str>>(error: S) {
    error!("{}", error.as_ref());

    if !log_enabled!(Level::Debug) {
        eprintln!(
            "If you need more information, try to run the program again with the {} flag.",
            "-v".bold()
        );
    }
}

/// Prints a warning.
pub fn print_warning<S: AsRef<str>>(warning: S) {
    warn!("{}", warning.as_ref())
}

/// Prints a finding, colored by its origin.
pub fn print_finding(finding: &Finding) {
    let text = format!("{}", finding);
    let message = match finding {
        Finding::DangerousPermission { .. } => text.red(),
        Finding::Category { .. } => text.yellow(),
        Finding::SuspiciousUrl { .. } => text.magenta(),
    };
    println!("{} {}", "Finding:".bold(), message);
}

/// Gets the name of the package, the file name of the archive without its extension.
pub fn get_package_name<P: AsRef<Path>>(package: P) -> String {
    package
        .as_ref()
        .file_stem()
        .map_or_else(|| String::from("package"), |stem| stem.to_string_lossy().into_owned())
}

/// Decodes the given bytes as UTF-8, dropping every invalid byte sequence.
pub fn decode_lossy(mut bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    loop {
        match str::from_utf8(bytes) {
            Ok(valid) => {
                text.push_str(valid);
                break;
            }
            Err(e) => {
                let (valid, rest) = bytes.split_at(e.valid_up_to());
                text.push_str(str::from_utf8(valid).unwrap_or_default());
                match e.error_len() {
                    Some(len) => bytes = &rest[len..],
                    None => break,
                }
            }
        }
    }
    text
}
