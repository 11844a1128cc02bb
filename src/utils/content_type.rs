use crate::constants::{OCTET_STREAM, SNIFF_LEN, TEXT_PLAIN_UTF8};

/// Resolve the content type for an object.
///
/// The file name's extension is looked up first. When it is missing or
/// unknown the leading bytes of `content` are inspected instead, so the
/// result is never empty.
pub fn resolve_content_type(name: &str, content: &[u8]) -> String {
    match content_type_by_extension(name) {
        Some(content_type) => content_type,
        None => sniff_content_type(content).to_string(),
    }
}

/// Look up a content type from the file name's extension.
///
/// The extension is whatever follows the last `.` of the final `/`-separated
/// component, so a dotfile such as `.json` counts as a JSON file.
pub fn content_type_by_extension(name: &str) -> Option<String> {
    let file_name = name.rsplit('/').next().unwrap_or(name);
    let (_, extension) = file_name.rsplit_once('.')?;
    if extension.is_empty() {
        return None;
    }

    mime_guess::from_ext(extension)
        .first()
        .map(|mime| mime.essence_str().to_string())
}

/// Derive a content type from at most the first [`SNIFF_LEN`] bytes
pub fn sniff_content_type(content: &[u8]) -> &'static str {
    let head = &content[..content.len().min(SNIFF_LEN)];

    if let Some(kind) = infer::get(head) {
        return kind.mime_type();
    }

    if looks_like_text(head) {
        TEXT_PLAIN_UTF8
    } else {
        OCTET_STREAM
    }
}

/// Text is anything without control bytes outside of tab, newline, form feed,
/// carriage return and escape.
fn looks_like_text(head: &[u8]) -> bool {
    let printable = !head.iter().any(|&b| {
        matches!(b, 0x00..=0x08 | 0x0B | 0x0E..=0x1A | 0x1C..=0x1F)
    });

    // A multi-byte sequence cut off by the sniff window is still text
    printable
        && match std::str::from_utf8(head) {
            Ok(_) => true,
            Err(e) => e.error_len().is_none(),
        }
}
