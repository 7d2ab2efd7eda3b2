//! Locating the `<script>` block of a single-file component.
//!
//! Only the script is rewritten. The rest of the file is opaque and is
//! copied through byte for byte, so a small scanner is enough: it skips
//! HTML comments and honours quoted attribute values.

use source_patch::Span;

/// The text between the first `<script ...>` and its `</script>`.
///
/// Self-closing `<script ... />` tags have no content and are skipped.
pub fn locate_script(source: &str) -> Option<Span> {
    // ASCII lowercasing keeps byte offsets intact.
    let lower = source.to_ascii_lowercase();
    let bytes = lower.as_bytes();
    let mut pos = 0;
    while let Some(found) = lower[pos..].find('<') {
        let start = pos + found;
        let rest = &lower[start..];
        if rest.starts_with("<!--") {
            pos = match rest.find("-->") {
                Some(end) => start + end + 3,
                None => return None,
            };
            continue;
        }
        let is_script = rest.starts_with("<script")
            && bytes
                .get(start + 7)
                .is_some_and(|&b| b.is_ascii_whitespace() || b == b'>' || b == b'/');
        if !is_script {
            pos = start + 1;
            continue;
        }
        let open_end = tag_end(bytes, start + 7)?;
        if lower[start..open_end - 1].trim_end().ends_with('/') {
            pos = open_end;
            continue;
        }
        let close = closing_tag(&lower, open_end)?;
        return Some(Span::from_usize(open_end, close));
    }
    None
}

/// Offset just past the `>` that ends a tag, skipping quoted values.
fn tag_end(bytes: &[u8], from: usize) -> Option<usize> {
    let mut quote = None;
    for (idx, &b) in bytes.iter().enumerate().skip(from) {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'\'' => quote = Some(b),
            None if b == b'>' => return Some(idx + 1),
            None => {}
        }
    }
    None
}

/// Start of the first `</script>` (whitespace allowed before `>`) at or
/// after `from`.
fn closing_tag(lower: &str, from: usize) -> Option<usize> {
    let mut pos = from;
    while let Some(found) = lower[pos..].find("</script") {
        let start = pos + found;
        let after = lower[start + 8..].trim_start();
        if after.starts_with('>') {
            return Some(start);
        }
        pos = start + 8;
    }
    None
}
