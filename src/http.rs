use percent_encoding::percent_decode_str;
use rustc_hash::FxHashMap;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

pub const CACHE_CONTROL_NO_CACHE: &str = "no-cache, must-revalidate";

/// Splits a request line into (method, target, version). Rejects lines with
/// missing or extra parts.
pub fn parse_request_line(line: &str) -> Option<(&str, &str, &str)> {
    let mut parts = line.split(' ').filter(|part| !part.is_empty());
    let method = parts.next()?;
    let target = parts.next()?;
    let version = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    Some((method, target, version))
}

/// Splits a request target into the path and the raw query string.
pub fn split_target(target: &str) -> (&str, Option<&str>) {
    match target.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (target, None),
    }
}

/// Query parsing: split on `&`, then on the first `=`, decode key and value
/// as UTF-8 form data (`+` means space, then percent sequences). Duplicate
/// keys overwrite, so the last one wins.
pub fn parse_query(raw: &str) -> FxHashMap<String, String> {
    let mut params = FxHashMap::default();
    for pair in raw.split('&').filter(|pair| !pair.is_empty()) {
        let (key, value) = match pair.split_once('=') {
            Some((key, value)) => (key, value),
            None => (pair, ""),
        };
        params.insert(form_decode(key), form_decode(value));
    }
    params
}

pub fn percent_decode(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

/// Form-data decoding for query pairs only: `+` becomes a space before
/// percent-decoding, so `%2B` still yields a literal `+`.
fn form_decode(raw: &str) -> String {
    percent_decode(&raw.replace('+', " "))
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        304 => "Not Modified",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

/// Short plain-text response, used for every error path.
pub async fn respond_plain(stream: &mut TcpStream, status: u16, body: &str) -> std::io::Result<u16> {
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: text/plain; charset=UTF-8\r\nContent-Length: {}\r\n\r\n",
        status,
        reason_phrase(status),
        body.len()
    );
    stream.write_all(head.as_bytes()).await?;
    stream.write_all(body.as_bytes()).await?;
    stream.flush().await?;
    Ok(status)
}

/// 304 with the caller-supplied validator headers and no body. The content
/// length is suppressed entirely, not declared as zero.
pub async fn respond_not_modified(
    stream: &mut TcpStream,
    headers: &[(&str, String)],
) -> std::io::Result<u16> {
    let mut head = String::from("HTTP/1.1 304 Not Modified\r\n");
    for (name, value) in headers {
        head.push_str(name);
        head.push_str(": ");
        head.push_str(value);
        head.push_str("\r\n");
    }
    head.push_str("\r\n");
    stream.write_all(head.as_bytes()).await?;
    stream.flush().await?;
    Ok(304)
}

/// 200 with the file body copied to the socket. The caller opens the file
/// first so an open failure can still be turned into a 500; from the first
/// header byte onward any error terminates the connection instead.
/// Extra headers are merged over the defaults, caller keys winning.
pub async fn stream_file<'a>(
    stream: &mut TcpStream,
    file: &mut File,
    size: u64,
    content_type: &'a str,
    extra_headers: &'a [(&'a str, String)],
) -> std::io::Result<u16> {
    let mut headers: Vec<(&str, String)> = vec![
        ("Content-Type", content_type.to_string()),
        ("Cache-Control", CACHE_CONTROL_NO_CACHE.to_string()),
    ];
    for (name, value) in extra_headers {
        match headers.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(name)) {
            Some(slot) => slot.1 = value.clone(),
            None => headers.push((*name, value.clone())),
        }
    }

    let mut head = String::from("HTTP/1.1 200 OK\r\n");
    for (name, value) in &headers {
        head.push_str(name);
        head.push_str(": ");
        head.push_str(value);
        head.push_str("\r\n");
    }
    head.push_str(&format!("Content-Length: {size}\r\n\r\n"));

    stream.write_all(head.as_bytes()).await?;
    tokio::io::copy(file, stream).await?;
    stream.flush().await?;
    Ok(200)
}
