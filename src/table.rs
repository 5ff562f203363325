//! Helpers shared by the delimited and spreadsheet readers.

use std::path::Path;

/// Cell tokens that spreadsheet tools emit for "no value".
const MISSING_TOKENS: &[&str] = &["", "na", "n/a", "#n/a", "nan", "null", "none"];

/// Whether a raw cell means "no value".
pub(crate) fn is_missing(value: &str) -> bool {
    let trimmed = value.trim();
    MISSING_TOKENS
        .iter()
        .any(|token| trimmed.eq_ignore_ascii_case(token))
}

/// Locate a header by exact (trimmed) name.
pub(crate) fn column_index(headers: &[String], name: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim() == name)
}

/// Delimiter to use for a delimited file: comma for `.csv`, tab otherwise.
pub(crate) fn delimiter_for(path: &Path) -> u8 {
    match extension(path).as_str() {
        "csv" => b',',
        _ => b'\t',
    }
}

/// Lower-cased file extension, empty when absent.
pub(crate) fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

/// Human-readable table label for error messages.
pub(crate) fn table_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tokens() {
        assert!(is_missing(""));
        assert!(is_missing("  #N/A "));
        assert!(is_missing("NaN"));
        assert!(!is_missing("0"));
        assert!(!is_missing("1.5e3"));
    }

    #[test]
    fn test_delimiter_for() {
        assert_eq!(delimiter_for(Path::new("pos.csv")), b',');
        assert_eq!(delimiter_for(Path::new("pos.tsv")), b'\t');
        assert_eq!(delimiter_for(Path::new("pos.txt")), b'\t');
        assert_eq!(delimiter_for(Path::new("pos")), b'\t');
    }
}
