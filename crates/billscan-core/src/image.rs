//! Bill image handling: data URIs, MIME detection, raw bytes
//!
//! Image sources (camera, file upload, CLI path) supply a base64 data URI or
//! raw bytes; provider adapters need the bytes and the MIME type separately,
//! so the data-URI prefix is stripped here exactly once.

use base64::Engine;

use crate::error::{Error, Result};

/// Supported image formats for provider upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageMime {
    Jpeg,
    Png,
    Webp,
}

impl ImageMime {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageMime::Jpeg => "image/jpeg",
            ImageMime::Png => "image/png",
            ImageMime::Webp => "image/webp",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageMime::Jpeg => "jpeg",
            ImageMime::Png => "png",
            ImageMime::Webp => "webp",
        }
    }

    /// Detect from a data-URI MIME signature. Unrecognized types fall back
    /// to PNG.
    fn from_signature(mime: &str) -> Self {
        match mime {
            "image/jpeg" | "image/jpg" => ImageMime::Jpeg,
            "image/webp" => ImageMime::Webp,
            _ => ImageMime::Png,
        }
    }

    /// Sniff from file magic bytes, for images loaded from disk rather than
    /// a data URI. Falls back to PNG like signature detection does.
    fn sniff(bytes: &[u8]) -> Self {
        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            ImageMime::Jpeg
        } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
            ImageMime::Webp
        } else {
            ImageMime::Png
        }
    }
}

/// A decoded bill image ready for provider upload
#[derive(Debug, Clone)]
pub struct BillImage {
    pub mime: ImageMime,
    pub bytes: Vec<u8>,
}

impl BillImage {
    /// Parse a `data:<mime>;base64,<payload>` URI.
    pub fn from_data_uri(uri: &str) -> Result<Self> {
        let rest = uri
            .strip_prefix("data:")
            .ok_or_else(|| Error::InvalidData("Not a data URI".into()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| Error::InvalidData("Data URI has no payload".into()))?;
        let mime_part = header.split(';').next().unwrap_or("");
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| Error::InvalidData(format!("Data URI payload is not base64: {e}")))?;
        Ok(Self {
            mime: ImageMime::from_signature(mime_part),
            bytes,
        })
    }

    /// Wrap raw bytes, sniffing the format from magic bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            mime: ImageMime::sniff(&bytes),
            bytes,
        }
    }

    /// Base64 payload without any data-URI prefix, as the Gemini and Ollama
    /// APIs expect.
    pub fn base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.bytes)
    }

    /// Self-describing data URI, as the OpenAI vision API expects.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime.as_str(), self.base64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_uri_round_trip() {
        let image = BillImage {
            mime: ImageMime::Jpeg,
            bytes: vec![0xFF, 0xD8, 0xFF, 0x00],
        };
        let uri = image.to_data_uri();
        assert!(uri.starts_with("data:image/jpeg;base64,"));
        let parsed = BillImage::from_data_uri(&uri).unwrap();
        assert_eq!(parsed.mime, ImageMime::Jpeg);
        assert_eq!(parsed.bytes, image.bytes);
    }

    #[test]
    fn test_unknown_mime_defaults_to_png() {
        let uri = format!(
            "data:image/tiff;base64,{}",
            base64::engine::general_purpose::STANDARD.encode([1u8, 2, 3])
        );
        let parsed = BillImage::from_data_uri(&uri).unwrap();
        assert_eq!(parsed.mime, ImageMime::Png);
    }

    #[test]
    fn test_not_a_data_uri() {
        assert!(BillImage::from_data_uri("http://example.com/x.png").is_err());
        assert!(BillImage::from_data_uri("data:image/png;base64").is_err());
    }

    #[test]
    fn test_sniff_magic_bytes() {
        assert_eq!(
            BillImage::from_bytes(vec![0xFF, 0xD8, 0xFF, 0xE0]).mime,
            ImageMime::Jpeg
        );
        let mut webp = b"RIFF".to_vec();
        webp.extend_from_slice(&[0, 0, 0, 0]);
        webp.extend_from_slice(b"WEBPVP8 ");
        assert_eq!(BillImage::from_bytes(webp).mime, ImageMime::Webp);
        assert_eq!(BillImage::from_bytes(vec![0u8; 4]).mime, ImageMime::Png);
    }
}
