use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::Path;

static CONTENT_TYPES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("html", "text/html; charset=UTF-8"),
        ("htm", "text/html; charset=UTF-8"),
        ("js", "application/javascript; charset=UTF-8"),
        ("css", "text/css; charset=UTF-8"),
        ("svg", "image/svg+xml"),
        ("json", "application/json; charset=UTF-8"),
        ("png", "image/png"),
        ("jpg", "image/jpeg"),
        ("jpeg", "image/jpeg"),
        ("webp", "image/webp"),
        ("ico", "image/x-icon"),
        ("pdf", "application/pdf"),
    ]
    .iter()
    .cloned()
    .collect()
});

pub fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => CONTENT_TYPES
            .get(ext.to_ascii_lowercase().as_str())
            .copied()
            .unwrap_or("application/octet-stream"),
        None => "application/octet-stream",
    }
}
