//! Media URL and file metadata helpers.

use serde::{Deserialize, Serialize};

/// Host serving full images and thumbnails.
pub const IMAGE_HOST: &str = "https://i.4cdn.org";

/// Host serving static assets such as country flags.
pub const STATIC_HOST: &str = "https://s.4cdn.org";

const IMAGE_EXTS: &[&str] = &[
    ".jpg", ".jpeg", ".png", ".gif", ".webp", ".avif", ".svg", ".bmp", ".tif", ".tiff",
];
const VIDEO_EXTS: &[&str] = &[".webm", ".mp4", ".m4v", ".ogv"];

/// How an attachment should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    File,
}

/// Thumbnail for an upload. `tim` is the upload's server-side timestamp id.
pub fn thumbnail_url(board: &str, tim: Option<u64>) -> Option<String> {
    match tim {
        Some(tim) if tim != 0 => Some(format!("{IMAGE_HOST}/{board}/{tim}s.jpg")),
        _ => None,
    }
}

/// Full-size upload.
pub fn image_url(board: &str, tim: Option<u64>, ext: Option<&str>) -> Option<String> {
    match (tim, ext) {
        (Some(tim), Some(ext)) if tim != 0 && !ext.is_empty() => {
            Some(format!("{IMAGE_HOST}/{board}/{tim}{ext}"))
        }
        _ => None,
    }
}

/// Flag image for a two-letter country code, case-insensitive.
pub fn country_flag_url(country_code: Option<&str>) -> Option<String> {
    country_code
        .filter(|code| !code.is_empty())
        .map(|code| format!("{STATIC_HOST}/image/country/{}.gif", code.to_lowercase()))
}

/// Classify an attachment by its extension (including the dot).
pub fn media_kind(ext: Option<&str>) -> MediaKind {
    let Some(ext) = ext.filter(|e| !e.is_empty()) else {
        return MediaKind::File;
    };
    let ext = ext.to_lowercase();
    if IMAGE_EXTS.contains(&ext.as_str()) {
        MediaKind::Image
    } else if VIDEO_EXTS.contains(&ext.as_str()) {
        MediaKind::Video
    } else {
        MediaKind::File
    }
}

/// Human-readable size: whole bytes below 1 KiB, one decimal above.
pub fn format_bytes(value: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    let mut size = value as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{value} B")
    } else {
        format!("{size:.1} {}", UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thumbnail_urls() {
        assert_eq!(
            thumbnail_url("a", Some(1234)).as_deref(),
            Some("https://i.4cdn.org/a/1234s.jpg")
        );
        assert_eq!(thumbnail_url("a", None), None);
        assert_eq!(thumbnail_url("a", Some(0)), None);
    }

    #[test]
    fn image_urls() {
        assert_eq!(
            image_url("b", Some(5678), Some(".jpg")).as_deref(),
            Some("https://i.4cdn.org/b/5678.jpg")
        );
        assert_eq!(image_url("b", None, Some(".jpg")), None);
        assert_eq!(image_url("b", Some(5678), None), None);
        assert_eq!(image_url("b", Some(5678), Some("")), None);
    }

    #[test]
    fn country_flags() {
        let us = Some("https://s.4cdn.org/image/country/us.gif".to_string());
        assert_eq!(country_flag_url(Some("US")), us);
        assert_eq!(country_flag_url(Some("us")), us);
        assert_eq!(
            country_flag_url(Some("UK")).as_deref(),
            Some("https://s.4cdn.org/image/country/uk.gif")
        );
        assert_eq!(country_flag_url(None), None);
        assert_eq!(country_flag_url(Some("")), None);
    }

    #[test]
    fn media_kinds() {
        assert_eq!(media_kind(Some(".jpg")), MediaKind::Image);
        assert_eq!(media_kind(Some(".JPeG")), MediaKind::Image);
        assert_eq!(media_kind(Some(".png")), MediaKind::Image);
        assert_eq!(media_kind(Some(".gif")), MediaKind::Image);
        assert_eq!(media_kind(Some(".webp")), MediaKind::Image);
        assert_eq!(media_kind(Some(".webm")), MediaKind::Video);
        assert_eq!(media_kind(Some(".mp4")), MediaKind::Video);
        assert_eq!(media_kind(Some(".zip")), MediaKind::File);
        assert_eq!(media_kind(None), MediaKind::File);
    }

    #[test]
    fn byte_formatting() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1024), "1.0 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(1024 * 1024), "1.0 MB");
        assert_eq!(format_bytes(5 * 1024 * 1024 * 1024 * 1024 * 1024), "5120.0 TB");
    }
}
