//! Content-type sniffing and rendering disposition.
//!
//! The declared type from the client is ignored on upload; the stored type is
//! always derived from the bytes themselves, so a renamed executable cannot
//! masquerade as an image.

/// Whether a browser should render the content or download it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Inline,
    Attachment,
}

impl Disposition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Disposition::Inline => "inline",
            Disposition::Attachment => "attachment",
        }
    }
}

/// Content-type families that are safe to render inline
const INLINE_PREFIXES: &[&str] = &["text/", "image/", "audio/", "video/"];
const INLINE_EXACT: &[&str] = &[
    "application/pdf",
    "application/json",
    "application/xml",
    "application/javascript",
];

/// Sniff a content type from raw bytes.
///
/// Magic-number detection first; content that carries no signature but
/// decodes as UTF-8 is treated as plain text, everything else as an opaque
/// octet stream.
pub fn sniff_content_type(data: &[u8]) -> String {
    if let Some(kind) = infer::get(data) {
        return kind.mime_type().to_string();
    }

    if !data.is_empty() && std::str::from_utf8(data).is_ok() {
        return "text/plain".to_string();
    }

    "application/octet-stream".to_string()
}

/// Decide the Content-Disposition for a sniffed content type.
pub fn disposition_for(content_type: &str) -> Disposition {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim();

    if INLINE_PREFIXES.iter().any(|p| essence.starts_with(p)) || INLINE_EXACT.contains(&essence) {
        Disposition::Inline
    } else {
        Disposition::Attachment
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniffs_png_magic() {
        let png = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0x00];
        assert_eq!(sniff_content_type(&png), "image/png");
    }

    #[test]
    fn sniffs_pdf_magic() {
        assert_eq!(sniff_content_type(b"%PDF-1.7 rest"), "application/pdf");
    }

    #[test]
    fn utf8_without_signature_is_plain_text() {
        assert_eq!(sniff_content_type(b"hi\n"), "text/plain");
    }

    #[test]
    fn binary_junk_is_octet_stream() {
        assert_eq!(
            sniff_content_type(&[0x00, 0xff, 0xfe, 0x01]),
            "application/octet-stream"
        );
    }

    #[test]
    fn empty_input_is_octet_stream() {
        assert_eq!(sniff_content_type(b""), "application/octet-stream");
    }

    #[test]
    fn inline_families_render_inline() {
        for content_type in [
            "text/plain",
            "text/html",
            "text/css",
            "image/png",
            "audio/mpeg",
            "video/mp4",
            "application/pdf",
            "application/json",
            "application/xml",
            "application/javascript",
        ] {
            assert_eq!(
                disposition_for(content_type),
                Disposition::Inline,
                "{}",
                content_type
            );
        }
    }

    #[test]
    fn other_types_download_as_attachment() {
        for content_type in [
            "application/zip",
            "application/octet-stream",
            "application/x-msdownload",
        ] {
            assert_eq!(
                disposition_for(content_type),
                Disposition::Attachment,
                "{}",
                content_type
            );
        }
    }

    #[test]
    fn parameters_are_ignored() {
        assert_eq!(
            disposition_for("text/html; charset=utf-8"),
            Disposition::Inline
        );
    }
}
