use std::fs;
use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::net::TcpStream;

use crate::config::Config;
use crate::http::{percent_decode, respond_plain, stream_file};
use crate::mime::content_type_for;
use crate::resolve::lexical_normalize;

/// Maps a request path to a file under the static root, or `None` for
/// anything missing, escaping or not a regular file. `/` and the empty path
/// serve `/index.html`.
pub fn resolve_static(root: &Path, request_path: &str) -> Option<(PathBuf, u64)> {
    let request_path = if request_path.is_empty() || request_path == "/" {
        "/index.html"
    } else {
        request_path
    };

    // `..` is stripped from the decoded path outright, not resolved, so
    // `/a/../x` stays under `/a`. The prefix check below is the backstop.
    let decoded = percent_decode(request_path)
        .replace('\\', "/")
        .replace("..", "");
    let relative = decoded.trim_start_matches('/');
    let candidate = lexical_normalize(&root.join(relative));
    if !candidate.starts_with(root) {
        return None;
    }

    let metadata = fs::metadata(&candidate).ok()?;
    if !metadata.is_file() {
        return None;
    }
    Some((candidate, metadata.len()))
}

pub async fn handle(
    stream: &mut TcpStream,
    config: &Config,
    method: &str,
    path: &str,
) -> std::io::Result<u16> {
    if !method.eq_ignore_ascii_case("GET") {
        return respond_plain(stream, 405, "Method Not Allowed").await;
    }

    let (file_path, size) = match resolve_static(&config.static_root, path) {
        Some(target) => target,
        None => return respond_plain(stream, 404, "Not Found").await,
    };

    let mut file = match File::open(&file_path).await {
        Ok(file) => file,
        Err(_) => return respond_plain(stream, 500, "Internal Server Error").await,
    };

    stream_file(stream, &mut file, size, content_type_for(&file_path), &[]).await
}
