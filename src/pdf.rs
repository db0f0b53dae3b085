use tokio::fs::File;
use tokio::net::TcpStream;

use crate::config::Config;
use crate::etag::{document_etag, not_modified};
use crate::http::{
    parse_query, respond_not_modified, respond_plain, stream_file, CACHE_CONTROL_NO_CACHE,
};
use crate::resolve::{resolve_document, Reject};
use crate::token::is_valid_token;

/// `GET /api/pdf?id=<docId>[&token=<opaque>]`: streams a stored PDF back
/// with validators, or answers 304 on an exact `If-None-Match` hit.
pub async fn handle(
    stream: &mut TcpStream,
    config: &Config,
    method: &str,
    raw_query: Option<&str>,
    if_none_match: Option<&str>,
) -> std::io::Result<u16> {
    if !method.eq_ignore_ascii_case("GET") {
        return respond_plain(stream, 405, "Method Not Allowed").await;
    }

    let params = parse_query(raw_query.unwrap_or(""));

    let raw_id = match params.get("id") {
        Some(id) if !id.trim().is_empty() => id.as_str(),
        _ => return respond_plain(stream, 400, "Missing required parameter: id").await,
    };

    // Optional pre-check; requests without a token bypass it entirely.
    if let Some(token) = params.get("token") {
        if !is_valid_token(token, raw_id) {
            return respond_plain(stream, 401, "Invalid token").await;
        }
    }

    let (safe_id, doc) = match resolve_document(&config.storage_root, raw_id) {
        Ok(resolved) => resolved,
        Err(Reject::MissingId) => {
            return respond_plain(stream, 400, "Missing required parameter: id").await
        }
        Err(Reject::InvalidId) => return respond_plain(stream, 400, "Invalid id").await,
        Err(Reject::Forbidden) => {
            // Kept at 400 so probing is indistinguishable from user error.
            eprintln!("[pdfserve] path traversal blocked for id={raw_id}");
            return respond_plain(stream, 400, "Invalid path").await;
        }
        Err(Reject::NotFound) => return respond_plain(stream, 404, "PDF not found").await,
    };

    let etag = document_etag(&doc);
    let last_modified = httpdate::fmt_http_date(doc.modified);

    if not_modified(&etag, if_none_match) {
        return respond_not_modified(
            stream,
            &[
                ("ETag", etag),
                ("Last-Modified", last_modified),
                ("Cache-Control", CACHE_CONTROL_NO_CACHE.to_string()),
            ],
        )
        .await;
    }

    let mut file = match File::open(&doc.path).await {
        Ok(file) => file,
        Err(_) => return respond_plain(stream, 500, "Internal Server Error").await,
    };

    let extra_headers = [
        (
            "Content-Disposition",
            format!("inline; filename=\"{safe_id}.pdf\""),
        ),
        ("ETag", etag),
        ("Last-Modified", last_modified),
    ];
    stream_file(stream, &mut file, doc.size, "application/pdf", &extra_headers).await
}
