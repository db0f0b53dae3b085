use crate::resolve::ResolvedDocument;

/// Weak validator over (size, mtime): `"<size>-<mtimeMillis>"`, quotes
/// included in the header value. No `W/` prefix.
pub fn etag_for(size: u64, modified_millis: u64) -> String {
    format!("\"{size}-{modified_millis}\"")
}

pub fn document_etag(doc: &ResolvedDocument) -> String {
    etag_for(doc.size, doc.modified_millis)
}

/// Exact byte-for-byte comparison against `If-None-Match`. Comma-separated
/// tag lists are deliberately not handled.
pub fn not_modified(etag: &str, if_none_match: Option<&str>) -> bool {
    if_none_match == Some(etag)
}
