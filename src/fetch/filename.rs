//! Filesystem-safe names for saved PDFs.

/// Maximum sanitized stem length in characters (extension not included).
const MAX_STEM_CHARS: usize = 128;

/// Characters allowed through unchanged; everything else becomes `_`.
fn is_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | ',' | '.' | '_' | ';')
}

/// Sanitizes a title (or DOI) into a filename stem.
///
/// Every character outside the safe set maps to a single underscore, and the
/// result is truncated to 128 characters. The output contains no path
/// separators and is stable under repeated application.
#[must_use]
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .map(|c| if is_safe(c) { c } else { '_' })
        .take(MAX_STEM_CHARS)
        .collect()
}
