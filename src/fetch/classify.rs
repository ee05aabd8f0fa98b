//! Content category detection for fetched responses.
//!
//! The `Content-Type` header is consulted first; when it says nothing useful
//! the leading bytes of the body are sniffed for a few well-known signatures.

use std::fmt;

use reqwest::header::{CONTENT_TYPE, HeaderMap};

const PNG_MAGIC: &[u8] = b"\x89PNG";
const JPEG_MAGIC: &[u8] = b"\xFF\xD8";
const FTYP_BOX: &[u8] = b"ftyp";

/// Broad kind of payload a response carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentCategory {
    /// Text, JSON, XML and similar.
    Text,
    /// Still images.
    Image,
    /// Video containers.
    Video,
    /// Audio streams.
    Audio,
    /// Anything unclassified.
    Binary,
}

impl ContentCategory {
    /// Stable lowercase label.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Binary => "binary",
        }
    }

    /// Whether the payload should be written as decoded text.
    #[must_use]
    pub fn is_text(self) -> bool {
        self == Self::Text
    }
}

impl fmt::Display for ContentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies a response from its headers and body.
#[must_use]
pub fn classify(headers: &HeaderMap, body: &[u8]) -> ContentCategory {
    let content_type = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());
    classify_content(content_type, body)
}

/// Classifies from an optional raw `Content-Type` value and the body bytes.
#[must_use]
pub fn classify_content(content_type: Option<&str>, body: &[u8]) -> ContentCategory {
    content_type
        .and_then(declared_category)
        .unwrap_or_else(|| sniff(body))
}

/// Category named by a `Content-Type` value alone, if it names one.
#[must_use]
pub fn declared_category(content_type: &str) -> Option<ContentCategory> {
    let content_type = content_type.to_ascii_lowercase();

    if ["text", "json", "xml"]
        .iter()
        .any(|needle| content_type.contains(needle))
    {
        Some(ContentCategory::Text)
    } else if content_type.contains("image") {
        Some(ContentCategory::Image)
    } else if content_type.contains("video") {
        Some(ContentCategory::Video)
    } else if content_type.contains("audio") {
        Some(ContentCategory::Audio)
    } else {
        None
    }
}

fn sniff(body: &[u8]) -> ContentCategory {
    if body.starts_with(b"{") || body.starts_with(b"[") {
        ContentCategory::Text
    } else if body.starts_with(PNG_MAGIC) || body.starts_with(JPEG_MAGIC) {
        ContentCategory::Image
    } else if body.get(4..8) == Some(FTYP_BOX) {
        // ISO base media file: 4-byte box size, then the `ftyp` box type.
        ContentCategory::Video
    } else {
        ContentCategory::Binary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn headers_with_type(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_classify_json_header_is_text_regardless_of_body() {
        let headers = headers_with_type("application/json");
        assert_eq!(classify(&headers, b"\x89PNG\r\n"), ContentCategory::Text);
        assert_eq!(classify(&headers, b""), ContentCategory::Text);
    }

    #[test]
    fn test_classify_xml_and_text_headers() {
        assert_eq!(
            classify_content(Some("application/xml"), b""),
            ContentCategory::Text
        );
        assert_eq!(
            classify_content(Some("text/html; charset=utf-8"), b""),
            ContentCategory::Text
        );
    }

    #[test]
    fn test_classify_header_is_case_insensitive() {
        assert_eq!(
            classify_content(Some("Image/PNG"), b""),
            ContentCategory::Image
        );
    }

    #[test]
    fn test_classify_media_headers() {
        assert_eq!(classify_content(Some("image/webp"), b""), ContentCategory::Image);
        assert_eq!(classify_content(Some("video/mp4"), b""), ContentCategory::Video);
        assert_eq!(classify_content(Some("audio/mpeg"), b""), ContentCategory::Audio);
    }

    #[test]
    fn test_classify_svg_header_counts_as_text() {
        // "image/svg+xml" contains "xml", which is checked first.
        assert_eq!(
            classify_content(Some("image/svg+xml"), b"<svg/>"),
            ContentCategory::Text
        );
    }

    #[test]
    fn test_classify_png_magic_without_header() {
        let headers = HeaderMap::new();
        assert_eq!(
            classify(&headers, b"\x89PNG\r\n\x1a\n0000"),
            ContentCategory::Image
        );
    }

    #[test]
    fn test_classify_jpeg_magic_under_octet_stream() {
        assert_eq!(
            classify_content(Some("application/octet-stream"), b"\xFF\xD8\xFF\xE0"),
            ContentCategory::Image
        );
    }

    #[test]
    fn test_classify_json_body_sniffed_as_text() {
        assert_eq!(classify_content(None, b"{\"a\":1}"), ContentCategory::Text);
        assert_eq!(classify_content(None, b"[1,2]"), ContentCategory::Text);
    }

    #[test]
    fn test_classify_ftyp_box_sniffed_as_video() {
        assert_eq!(
            classify_content(None, b"\x00\x00\x00\x20ftypisom"),
            ContentCategory::Video
        );
        assert_eq!(
            classify_content(None, b"\x00\x00\x00\x18ftypmp42"),
            ContentCategory::Video
        );
    }

    #[test]
    fn test_classify_unknown_is_binary() {
        assert_eq!(classify_content(None, b"PK\x03\x04"), ContentCategory::Binary);
        assert_eq!(classify_content(None, b""), ContentCategory::Binary);
        assert_eq!(classify_content(None, b"ftyp"), ContentCategory::Binary);
    }

    #[test]
    fn test_declared_category_ignores_unknown_types() {
        assert_eq!(
            declared_category("text/plain; charset=iso-8859-1"),
            Some(ContentCategory::Text)
        );
        assert_eq!(declared_category("application/octet-stream"), None);
        assert_eq!(declared_category(""), None);
    }

    #[test]
    fn test_content_category_display() {
        assert_eq!(ContentCategory::Binary.to_string(), "binary");
        assert!(ContentCategory::Text.is_text());
        assert!(!ContentCategory::Image.is_text());
    }
}
