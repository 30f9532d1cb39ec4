//! Content-type sniffing and the MIME ↔ extension table.
//!
//! The engine never trusts the nominal file extension: format decisions are
//! made from the bytes themselves. Binary formats are detected by magic
//! bytes via `infer`; SVG and PostScript are text formats `infer` has no
//! matchers for, so they get hand-rolled probes.

/// Canonical MIME type for normalized output.
pub const SVG_MIME: &str = "image/svg+xml";

/// MIME type for EPS/AI-style PostScript input.
pub const POSTSCRIPT_MIME: &str = "application/postscript";

/// How many leading bytes the SVG probe inspects.
///
/// Enough for a BOM, an XML declaration, a doctype and a few comments;
/// real-world SVG roots show up well within this window.
const SVG_PROBE_WINDOW: usize = 1024;

/// Determines a buffer's MIME type from its bytes.
///
/// Returns `None` when the content matches no known format.
pub fn sniff(buffer: &[u8]) -> Option<&'static str> {
    if looks_like_svg(buffer) {
        return Some(SVG_MIME);
    }
    if buffer.starts_with(b"%!PS") {
        return Some(POSTSCRIPT_MIME);
    }
    infer::get(buffer).map(|kind| kind.mime_type())
}

/// Resolves a MIME type to the file extension the external converter
/// selects its input parser by.
pub fn extension_for_mime(mime: &str) -> Option<&'static str> {
    match mime {
        "image/svg+xml" => Some(".svg"),
        "application/pdf" => Some(".pdf"),
        "application/postscript" => Some(".eps"),
        "image/png" => Some(".png"),
        "image/jpeg" => Some(".jpg"),
        "image/gif" => Some(".gif"),
        "image/webp" => Some(".webp"),
        "image/tiff" => Some(".tif"),
        "image/bmp" => Some(".bmp"),
        _ => None,
    }
}

/// Probes for an `<svg` root element, skipping any XML prolog, doctype
/// and comments ahead of it.
fn looks_like_svg(buffer: &[u8]) -> bool {
    let window = &buffer[..buffer.len().min(SVG_PROBE_WINDOW)];
    let text = String::from_utf8_lossy(window);
    let mut rest = text.trim_start_matches('\u{feff}').trim_start();

    loop {
        if let Some(tail) = rest.strip_prefix("<?") {
            // XML declaration / processing instruction
            match tail.find("?>") {
                Some(end) => rest = tail[end + 2..].trim_start(),
                None => return false,
            }
        } else if let Some(tail) = rest.strip_prefix("<!--") {
            match tail.find("-->") {
                Some(end) => rest = tail[end + 3..].trim_start(),
                None => return false,
            }
        } else if let Some(tail) = rest.strip_prefix("<!") {
            // DOCTYPE
            match tail.find('>') {
                Some(end) => rest = tail[end + 1..].trim_start(),
                None => return false,
            }
        } else {
            break;
        }
    }

    rest.starts_with("<svg")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniffs_plain_svg() {
        let svg = br#"<svg xmlns="http://www.w3.org/2000/svg"></svg>"#;
        assert_eq!(sniff(svg), Some(SVG_MIME));
    }

    #[test]
    fn sniffs_svg_with_prolog_doctype_and_comment() {
        let svg = br#"<?xml version="1.0" encoding="UTF-8"?>
<!-- Generator: some vector editor -->
<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd">
<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"/>"#;
        assert_eq!(sniff(svg), Some(SVG_MIME));
    }

    #[test]
    fn sniffs_svg_behind_bom() {
        let mut buffer = vec![0xEF, 0xBB, 0xBF];
        buffer.extend_from_slice(b"<svg/>");
        assert_eq!(sniff(&buffer), Some(SVG_MIME));
    }

    #[test]
    fn plain_xml_is_not_svg() {
        let xml = br#"<?xml version="1.0"?><note><to>x</to></note>"#;
        assert_ne!(sniff(xml), Some(SVG_MIME));
    }

    #[test]
    fn sniffs_pdf_by_magic() {
        let pdf = b"%PDF-1.4\n1 0 obj\n<< >>\nendobj\n";
        assert_eq!(sniff(pdf), Some("application/pdf"));
    }

    #[test]
    fn sniffs_postscript() {
        let eps = b"%!PS-Adobe-3.0 EPSF-3.0\n%%BoundingBox: 0 0 100 100\n";
        assert_eq!(sniff(eps), Some(POSTSCRIPT_MIME));
    }

    #[test]
    fn sniffs_png_by_magic() {
        let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];
        assert_eq!(sniff(&png), Some("image/png"));
    }

    #[test]
    fn unknown_bytes_sniff_as_none() {
        assert_eq!(sniff(b"definitely not an image"), None);
        assert_eq!(sniff(b""), None);
    }

    #[test]
    fn extension_table_covers_converter_inputs() {
        assert_eq!(extension_for_mime(SVG_MIME), Some(".svg"));
        assert_eq!(extension_for_mime("application/pdf"), Some(".pdf"));
        assert_eq!(extension_for_mime(POSTSCRIPT_MIME), Some(".eps"));
        assert_eq!(extension_for_mime("image/x-unknown"), None);
    }
}
