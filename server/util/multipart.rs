//! Minimal multipart/form-data parsing for the upload endpoints.

use std::io::Read;

use tiny_http::Request;

/// A file part: the client-supplied filename and the raw bytes.
#[derive(Debug, PartialEq)]
pub struct FilePart {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Returns the index of the first occurrence of `needle` in `haystack`.
pub fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Splits `haystack` on every occurrence of `needle`, returning the pieces
/// between occurrences (excluding the needle itself).
pub fn split_on<'a>(haystack: &'a [u8], needle: &[u8]) -> Vec<&'a [u8]> {
    let mut result = Vec::new();
    let mut start = 0;
    while start <= haystack.len() {
        if let Some(pos) = find_subsequence(&haystack[start..], needle) {
            result.push(&haystack[start..start + pos]);
            start += pos + needle.len();
        } else {
            result.push(&haystack[start..]);
            break;
        }
    }
    result
}

/// Extracts the boundary token from a Content-Type header value like
/// `multipart/form-data; boundary=----WebKitFormBoundaryXXX`.
pub fn extract_boundary(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .map(|s| s.trim())
        .find(|s| s.starts_with("boundary="))
        .map(|s| s["boundary=".len()..].trim_matches('"').to_owned())
}

/// Reads a `key="value"` parameter from a Content-Disposition header block.
/// `name` does not match inside `filename`.
fn disposition_param(headers: &str, key: &str) -> Option<String> {
    headers
        .lines()
        .find(|l| l.to_ascii_lowercase().starts_with("content-disposition:"))?
        .split(';')
        .map(str::trim)
        .find_map(|p| {
            let (k, v) = p.split_once('=')?;
            (k.trim() == key).then(|| v.trim().trim_matches('"').to_owned())
        })
}

/// Finds the file part whose form field is `field_name`.
///
/// Returns `None` when no such part exists or when the part carries no
/// `filename` attribute (a plain text field with the same name).
pub fn extract_file_part(body: &[u8], boundary: &str, field_name: &str) -> Option<FilePart> {
    let delimiter = format!("--{}", boundary);
    let parts = split_on(body, delimiter.as_bytes());

    for part in parts {
        let sep = b"\r\n\r\n";
        let Some(sep_pos) = find_subsequence(part, sep) else { continue };
        let headers_str = String::from_utf8_lossy(&part[..sep_pos]);
        if disposition_param(&headers_str, "name").as_deref() != Some(field_name) {
            continue;
        }
        let filename = disposition_param(&headers_str, "filename")?;
        let raw = &part[sep_pos + sep.len()..];
        let trimmed = raw.strip_suffix(b"\r\n").unwrap_or(raw);
        return Some(FilePart { filename, bytes: trimmed.to_vec() });
    }
    None
}

/// Reads the request body and pulls out the `field_name` file part, if the
/// request is multipart at all.
pub fn read_file_part(request: &mut Request, field_name: &str) -> Option<FilePart> {
    let content_type = request.headers().iter()
        .find(|h| h.field.equiv("Content-Type"))
        .map(|h| h.value.as_str().to_owned())
        .unwrap_or_default();
    if !content_type.starts_with("multipart/form-data") {
        return None;
    }
    let boundary = extract_boundary(&content_type)?;

    let mut body = Vec::new();
    if request.as_reader().read_to_end(&mut body).is_err() {
        return None;
    }
    extract_file_part(&body, &boundary, field_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(parts: &[(&str, &[u8])]) -> Vec<u8> {
        let mut out = Vec::new();
        for (headers, data) in parts {
            out.extend_from_slice(b"--XYZ\r\n");
            out.extend_from_slice(headers.as_bytes());
            out.extend_from_slice(b"\r\n\r\n");
            out.extend_from_slice(data);
            out.extend_from_slice(b"\r\n");
        }
        out.extend_from_slice(b"--XYZ--\r\n");
        out
    }

    #[test]
    fn boundary_is_parsed() {
        assert_eq!(
            extract_boundary("multipart/form-data; boundary=\"abc\"").as_deref(),
            Some("abc")
        );
        assert_eq!(extract_boundary("multipart/form-data"), None);
    }

    #[test]
    fn finds_named_file_part() {
        let b = body(&[
            ("Content-Disposition: form-data; name=\"note\"", b"hello"),
            (
                "Content-Disposition: form-data; name=\"image\"; filename=\"leaf.png\"\r\nContent-Type: image/png",
                b"\x89PNG\r\n\x00data",
            ),
        ]);
        let part = extract_file_part(&b, "XYZ", "image").unwrap();
        assert_eq!(part.filename, "leaf.png");
        assert_eq!(part.bytes, b"\x89PNG\r\n\x00data".to_vec());
    }

    #[test]
    fn filename_does_not_satisfy_name() {
        let b = body(&[(
            "Content-Disposition: form-data; name=\"other\"; filename=\"image\"",
            b"x",
        )]);
        assert_eq!(extract_file_part(&b, "XYZ", "image"), None);
    }

    #[test]
    fn text_field_is_not_a_file() {
        let b = body(&[("Content-Disposition: form-data; name=\"image\"", b"x")]);
        assert_eq!(extract_file_part(&b, "XYZ", "image"), None);
    }

    #[test]
    fn empty_filename_is_kept_for_validation() {
        let b = body(&[("Content-Disposition: form-data; name=\"image\"; filename=\"\"", b"")]);
        let part = extract_file_part(&b, "XYZ", "image").unwrap();
        assert_eq!(part.filename, "");
        assert!(part.bytes.is_empty());
    }
}
