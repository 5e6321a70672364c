//! Upload filename handling

use std::collections::HashSet;

/// Names that are reserved devices on Windows and must not be used verbatim
const WINDOWS_DEVICE_FILES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "LPT1", "LPT2", "LPT3",
];

/// Lower-cased substring after the last `.`, if any
pub fn extension(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
}

/// Check if the file has an allowed extension
pub fn allowed_file(filename: &str, allowed: &HashSet<String>) -> bool {
    extension(filename).is_some_and(|ext| allowed.contains(&ext))
}

/// Reduce a client-supplied filename to something safe to join onto a directory.
///
/// Path separators become spaces, non-ASCII and characters outside
/// `[A-Za-z0-9._-]` are dropped, whitespace runs collapse to `_`, and
/// leading/trailing dots and underscores are stripped. May return an empty
/// string.
pub fn secure_filename(filename: &str) -> String {
    let separated: String = filename
        .chars()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = separated.split_whitespace().collect::<Vec<_>>().join("_");

    let cleaned: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();

    let trimmed = cleaned.trim_matches(|c| c == '.' || c == '_');

    let stem = trimmed.split('.').next().unwrap_or_default();
    if WINDOWS_DEVICE_FILES
        .iter()
        .any(|device| device.eq_ignore_ascii_case(stem))
    {
        return format!("_{trimmed}");
    }

    trimmed.to_string()
}
