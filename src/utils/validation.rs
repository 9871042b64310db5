//! Centralized validation and helper functions.

use std::path::Path;

/// Maximum number of records allowed in a single load (DOS protection)
pub const MAX_RECORDS: usize = 1_000_000;

/// Check if adding another record would exceed the maximum allowed.
///
/// Call this with the current count BEFORE adding a new record.
/// Returns an error message if adding would exceed the limit, None if safe to add.
///
/// # Example
/// ```ignore
/// if check_record_limit(records.len()).is_some() {
///     return Err(...);
/// }
/// records.push(new_record); // Safe to add
/// ```
#[must_use]
pub fn check_record_limit(count: usize) -> Option<String> {
    if count >= MAX_RECORDS {
        Some(format!(
            "Too many records: adding another would exceed maximum of {MAX_RECORDS}"
        ))
    } else {
        None
    }
}

/// Check if the path is a gzipped file
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
#[must_use]
pub fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}

/// Lowercased extension of `path`, looking through a trailing `.gz`/`.bgz`
///
/// # Examples
///
/// ```
/// use biospeak::utils::validation::inner_extension;
/// use std::path::Path;
///
/// assert_eq!(inner_extension(Path::new("calls.vcf.gz")).as_deref(), Some("vcf"));
/// assert_eq!(inner_extension(Path::new("Table.TSV")).as_deref(), Some("tsv"));
/// assert_eq!(inner_extension(Path::new("README")), None);
/// ```
#[must_use]
pub fn inner_extension(path: &Path) -> Option<String> {
    let stem_path = if is_gzipped(path) {
        Path::new(path.file_stem()?)
    } else {
        path
    };
    stem_path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
}

/// Validate an entity name: non-empty, no whitespace, no control characters.
///
/// Names come from single grammar tokens, so this only trips on names that
/// arrive through workspace import or generated suffixes.
#[must_use]
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && !name.chars().any(|c| c.is_whitespace() || c.is_control())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_record_limit() {
        assert!(check_record_limit(0).is_none());
        assert!(check_record_limit(MAX_RECORDS - 1).is_none());
        assert!(check_record_limit(MAX_RECORDS).is_some());
    }

    #[test]
    fn test_is_gzipped() {
        assert!(is_gzipped(Path::new("reads.fastq.gz")));
        assert!(is_gzipped(Path::new("ref.FA.BGZ")));
        assert!(!is_gzipped(Path::new("ref.fa")));
    }

    #[test]
    fn test_inner_extension() {
        assert_eq!(
            inner_extension(Path::new("/data/reads.FASTQ.gz")).as_deref(),
            Some("fastq")
        );
        assert_eq!(inner_extension(Path::new("a.csv")).as_deref(), Some("csv"));
    }

    #[test]
    fn test_is_valid_name() {
        assert!(is_valid_name("yeast_protein"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("two words"));
        assert!(!is_valid_name("tab\tname"));
    }
}
