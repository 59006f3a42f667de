//! Attachment filtering by file extension.

/// Extensions that are never fetched for summarization.
pub const IMAGE_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg", ".gif", ".bmp", ".tiff"];

/// Check if a file name ends with a known image extension (case-insensitive).
///
/// # Examples
/// ```
/// use incidentlens::attachments::is_image_attachment;
/// assert!(is_image_attachment("screenshot.PNG"));
/// assert!(!is_image_attachment("server.log"));
/// ```
pub fn is_image_attachment(file_name: &str) -> bool {
    let lower = file_name.to_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_image_attachment() {
        assert!(is_image_attachment("a.png"));
        assert!(is_image_attachment("c.JPG"));
        assert!(is_image_attachment("photo.Jpeg"));
        assert!(is_image_attachment("scan.tiff"));
        assert!(!is_image_attachment("b.txt"));
        assert!(!is_image_attachment("d.log"));
        assert!(!is_image_attachment("png"));
        assert!(!is_image_attachment("notes.png.txt"));
    }
}
