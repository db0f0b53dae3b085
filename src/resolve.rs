use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Why a document id could not be resolved to a file under the storage root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reject {
    MissingId,
    InvalidId,
    Forbidden,
    NotFound,
}

/// A stored PDF located for one request. Never cached across requests.
#[derive(Debug, Clone)]
pub struct ResolvedDocument {
    pub path: PathBuf,
    pub size: u64,
    pub modified: SystemTime,
    pub modified_millis: u64,
}

/// Strips every character outside `[A-Za-z0-9._-]`. Idempotent.
pub fn sanitize_id(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect()
}

/// Resolves `.` and `..` segments without touching the filesystem.
pub fn lexical_normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => normalized.push(prefix.as_os_str()),
            Component::RootDir => normalized.push(Component::RootDir.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            Component::Normal(segment) => normalized.push(segment),
        }
    }
    normalized
}

/// Maps a caller-supplied id to `<root>/<safeId>.pdf`, with two layers of
/// traversal defense: the character whitelist and a prefix check after
/// normalization. Returns the sanitized id alongside the file metadata.
pub fn resolve_document(root: &Path, raw_id: &str) -> Result<(String, ResolvedDocument), Reject> {
    if raw_id.trim().is_empty() {
        return Err(Reject::MissingId);
    }

    let safe_id = sanitize_id(raw_id);
    if safe_id.is_empty() {
        return Err(Reject::InvalidId);
    }

    let candidate = lexical_normalize(&root.join(format!("{safe_id}.pdf")));
    if !candidate.starts_with(root) {
        return Err(Reject::Forbidden);
    }

    let metadata = fs::metadata(&candidate).map_err(|_| Reject::NotFound)?;
    if !metadata.is_file() {
        return Err(Reject::NotFound);
    }

    let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
    let modified_millis = modified
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_millis() as u64;

    Ok((
        safe_id,
        ResolvedDocument {
            path: candidate,
            size: metadata.len(),
            modified,
            modified_millis,
        },
    ))
}
