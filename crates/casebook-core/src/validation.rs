//! Input validation helpers shared across services and handlers.

use crate::error::AppError;

/// Sanitize filename to prevent path traversal and invalid characters.
/// Any directory components are stripped; each remaining character outside
/// `[A-Za-z0-9.-_]` is replaced with `_`. Returns an error if the filename
/// contains path traversal attempts.
pub fn sanitize_filename(filename: &str) -> Result<String, AppError> {
    const MAX_FILENAME_LENGTH: usize = 255;

    let path = std::path::Path::new(filename);
    let filename_only = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename);

    if filename_only.contains("..") {
        return Err(AppError::validation(
            "file",
            "Filename contains invalid path traversal",
        ));
    }

    let sanitized: String = filename_only
        .chars()
        .take(MAX_FILENAME_LENGTH)
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.trim_matches('_').is_empty() {
        return Ok("file".to_string());
    }

    Ok(sanitized)
}

/// Require a non-empty value (after trimming) for a named field.
pub fn require_non_empty(field: &str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(field, "must not be empty"));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_filename_rejects_path_traversal() {
        assert!(sanitize_filename("..").is_err());
        assert!(sanitize_filename("....").is_err());
        assert!(sanitize_filename("..hidden").is_err());
    }

    #[test]
    fn sanitize_filename_accepts_valid_names() {
        assert_eq!(sanitize_filename("brief.pdf").unwrap(), "brief.pdf");
        assert_eq!(
            sanitize_filename("my-file_1.docx").unwrap(),
            "my-file_1.docx"
        );
    }

    #[test]
    fn sanitize_filename_replaces_disallowed_characters() {
        assert_eq!(
            sanitize_filename("report (final)!.pdf").unwrap(),
            "report__final__.pdf"
        );
        assert_eq!(sanitize_filename("exposé.pdf").unwrap(), "expos_.pdf");
        assert_eq!(sanitize_filename("a b\tc.txt").unwrap(), "a_b_c.txt");
    }

    #[test]
    fn sanitize_filename_strips_directory_components() {
        assert_eq!(sanitize_filename("dir/brief.pdf").unwrap(), "brief.pdf");
        assert_eq!(sanitize_filename("foo/../bar").unwrap(), "bar");
        assert_eq!(
            sanitize_filename("/etc/passwd").unwrap(),
            "passwd".to_string()
        );
    }

    #[test]
    fn sanitize_filename_falls_back_on_empty_result() {
        assert_eq!(sanitize_filename("   ").unwrap(), "file");
        assert_eq!(sanitize_filename("???").unwrap(), "file");
    }

    #[test]
    fn require_non_empty_trims() {
        assert_eq!(require_non_empty("title", "  Smith v. Jones ").unwrap(), "Smith v. Jones");
        assert!(require_non_empty("title", "   ").is_err());
    }
}
