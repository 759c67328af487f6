//! Input validation for dashboard controls
//!
//! Filter values arrive from the command line or environment. They are
//! bound as query parameters and never spliced into SQL, so these checks
//! only bound their size and shape.

use crate::{Error, FilterOptions, PageSize, Result};

/// Longest genre needle accepted, in bytes
pub const MAX_GENRE_LENGTH: usize = 128;

/// Validates a genre needle
///
/// # Errors
///
/// Returns Error::InvalidInput if the needle is oversized or contains
/// control characters
#[inline]
pub fn validate_genre(genre: &str) -> Result<()> {
    if genre.len() > MAX_GENRE_LENGTH {
        return Err(Error::InvalidInput(format!(
            "Genre length {} exceeds maximum {}",
            genre.len(),
            MAX_GENRE_LENGTH
        )));
    }

    if genre.chars().any(char::is_control) {
        return Err(Error::InvalidInput(
            "Genre cannot contain control characters".to_string(),
        ));
    }

    Ok(())
}

/// Validates a row limit and converts it into a [`PageSize`]
///
/// # Errors
///
/// Returns Error::InvalidInput outside `1..=PageSize::MAX`
#[inline]
pub fn validate_page_size(rows: u32) -> Result<PageSize> {
    PageSize::new(rows)
}

/// Validates a full set of filter options
///
/// # Errors
///
/// Returns Error::InvalidInput for a bad genre. Any minimum year is
/// accepted; one no title can reach simply matches nothing.
pub fn validate_filter(options: &FilterOptions) -> Result<()> {
    if let Some(needle) = options.genre.needle() {
        validate_genre(needle)?;
    }

    Ok(())
}

/// Validates an export file path
///
/// # Errors
///
/// Returns Error::InvalidInput for empty paths, paths with null bytes or
/// paths naming a directory
pub fn validate_export_path(path: &std::path::Path) -> Result<()> {
    const MAX_PATH_LENGTH: usize = 4096;

    let text = path.to_string_lossy();
    if text.is_empty() {
        return Err(Error::InvalidInput("Export path cannot be empty".to_string()));
    }

    if text.len() > MAX_PATH_LENGTH {
        return Err(Error::InvalidInput(format!(
            "Export path length {} exceeds maximum {}",
            text.len(),
            MAX_PATH_LENGTH
        )));
    }

    if text.contains('\0') {
        return Err(Error::InvalidInput(
            "Export path cannot contain null bytes".to_string(),
        ));
    }

    if path.is_dir() {
        return Err(Error::InvalidInput(format!(
            "Export path '{}' is a directory",
            text
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SortKey;
    use std::path::Path;

    #[test]
    fn test_validate_genre() {
        assert!(validate_genre("Comedy").is_ok());
        assert!(validate_genre("").is_ok());
        assert!(validate_genre("Sci-Fi").is_ok());
        assert!(validate_genre("50% Drama'; --").is_ok());
        assert!(validate_genre(&"x".repeat(MAX_GENRE_LENGTH)).is_ok());
        assert!(validate_genre(&"x".repeat(MAX_GENRE_LENGTH + 1)).is_err());
        assert!(validate_genre("Com\0edy").is_err());
        assert!(validate_genre("Comedy\n").is_err());
    }

    #[test]
    fn test_validate_page_size() {
        assert_eq!(validate_page_size(10).unwrap().get(), 10);
        assert_eq!(validate_page_size(50).unwrap().get(), 50);
        assert!(validate_page_size(0).is_err());
        assert!(validate_page_size(51).is_err());
    }

    #[test]
    fn test_validate_filter() {
        assert!(validate_filter(&FilterOptions::default()).is_ok());
        assert!(validate_filter(&FilterOptions::new(0, SortKey::RatingCount, 0)).is_ok());

        assert!(validate_filter(&FilterOptions::default().with_min_year(10_000)).is_ok());
        assert!(validate_filter(&FilterOptions::default().with_min_year(-1)).is_ok());
        assert!(validate_filter(&FilterOptions::default().with_min_year(i32::MIN)).is_ok());

        let noisy = FilterOptions::default().with_genre("Dra\tma");
        assert!(matches!(validate_filter(&noisy), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_validate_export_path() {
        assert!(validate_export_path(Path::new("top_movies_filtered.csv")).is_ok());
        assert!(validate_export_path(Path::new("")).is_err());
        assert!(validate_export_path(&std::env::temp_dir()).is_err());
    }
}
