//! File name validation for stored uploads.
//!
//! Stored names are always `<id><ext>`, generated server-side, but the
//! `/uploads/{file}` route takes a name from the URL, so every lookup goes
//! through [`validate_file_name`].

use std::path::Path;

use crate::error::StorageError;
use crate::store::ImageId;

/// Longest extension kept from a client-supplied name.
const MAX_EXTENSION_LEN: usize = 10;

/// Rejects names that could escape the upload directory.
///
/// # Security
/// Rejects names that:
/// - Are empty
/// - Contain `/` or `\`
/// - Are `.` or `..`, or start with `.`
/// - Contain NUL bytes
pub fn validate_file_name(name: &str) -> Result<&str, StorageError> {
    if name.is_empty()
        || name.starts_with('.')
        || name.contains(['/', '\\', '\0'])
    {
        return Err(StorageError::invalid_name(name));
    }
    Ok(name)
}

/// Builds the stored file name for an upload: the id plus the original
/// extension, if it is short and alphanumeric.
///
/// # Examples
/// ```
/// use tempshot::store::ImageId;
/// use tempshot::storage::stored_file_name;
///
/// let id = ImageId::from("abc");
/// assert_eq!(stored_file_name(&id, "cat.JPG"), "abc.JPG");
/// assert_eq!(stored_file_name(&id, "../../etc/passwd"), "abc");
/// assert_eq!(stored_file_name(&id, "noext"), "abc");
/// ```
pub fn stored_file_name(id: &ImageId, original_name: &str) -> String {
    let ext = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| {
            !e.is_empty()
                && e.len() <= MAX_EXTENSION_LEN
                && e.chars().all(|c| c.is_ascii_alphanumeric())
        });

    match ext {
        Some(ext) => format!("{id}.{ext}"),
        None => id.to_string(),
    }
}
