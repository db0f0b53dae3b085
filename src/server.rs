use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::{timeout, Duration, Instant};

use crate::config::Config;
use crate::http::{parse_request_line, respond_plain, split_target};
use crate::{pdf, static_files};

const MAX_REQUEST_LINE: usize = 8192;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const KEEPALIVE_TIMEOUT_SECS: u64 = 5;
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Longest path prefix wins; `/` is the catch-all static route.
fn is_pdf_route(path: &str) -> bool {
    path.starts_with("/api/pdf")
}

/// Accepts connections until the shutdown future resolves, then stops
/// accepting and drains in-flight connections for a short bounded grace.
pub async fn serve(
    listener: TcpListener,
    config: Arc<Config>,
    shutdown: impl Future<Output = ()>,
) {
    tokio::pin!(shutdown);
    let in_flight = Arc::new(AtomicUsize::new(0));

    loop {
        tokio::select! {
            result = listener.accept() => {
                match result {
                    Ok((stream, _)) => {
                        let _ = stream.set_nodelay(true);
                        let config = Arc::clone(&config);
                        let in_flight = Arc::clone(&in_flight);
                        in_flight.fetch_add(1, Ordering::SeqCst);
                        tokio::spawn(async move {
                            handle_connection(stream, config).await;
                            in_flight.fetch_sub(1, Ordering::SeqCst);
                        });
                    }
                    Err(_) => continue,
                }
            }
            _ = &mut shutdown => break,
        }
    }

    drop(listener);
    let deadline = Instant::now() + SHUTDOWN_GRACE;
    while in_flight.load(Ordering::SeqCst) > 0 && Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

async fn handle_connection(mut stream: TcpStream, config: Arc<Config>) {
    let _ = timeout(
        Duration::from_secs(CONNECTION_TIMEOUT_SECS),
        handle_connection_inner(&mut stream, &config),
    )
    .await;
}

async fn handle_connection_inner(
    stream: &mut TcpStream,
    config: &Config,
) -> std::io::Result<()> {
    loop {
        let mut reader = BufReader::new(&mut *stream);
        let mut request_line = String::new();

        match timeout(
            Duration::from_secs(KEEPALIVE_TIMEOUT_SECS),
            reader.read_line(&mut request_line),
        )
        .await
        {
            Ok(Ok(0)) | Err(_) => break,
            Ok(Err(_)) => break,
            Ok(Ok(size)) if size > MAX_REQUEST_LINE => {
                respond_plain(stream, 400, "Malformed request").await?;
                break;
            }
            Ok(Ok(_)) => {}
        }

        if request_line.trim().is_empty() {
            continue;
        }

        let (method, target, version) = match parse_request_line(request_line.trim()) {
            Some(parts) => parts,
            None => {
                respond_plain(stream, 400, "Malformed request").await?;
                break;
            }
        };

        let mut keep_alive = version == "HTTP/1.1";
        let mut if_none_match: Option<String> = None;

        let mut header_line = String::new();
        loop {
            header_line.clear();
            match reader.read_line(&mut header_line).await {
                Ok(0) => break,
                Ok(_) => {
                    let line = header_line.trim();
                    if line.is_empty() {
                        break;
                    }
                    let (name, value) = match line.split_once(':') {
                        Some((name, value)) => (name.trim(), value.trim()),
                        None => continue,
                    };
                    if name.eq_ignore_ascii_case("connection") {
                        let value = value.to_ascii_lowercase();
                        keep_alive = !value.contains("close")
                            && (version == "HTTP/1.1" || value.contains("keep-alive"));
                    } else if name.eq_ignore_ascii_case("if-none-match") {
                        if_none_match = Some(value.to_string());
                    }
                }
                Err(_) => break,
            }
        }

        let (path, query) = split_target(target);
        let result = if is_pdf_route(path) {
            pdf::handle(stream, config, method, query, if_none_match.as_deref()).await
        } else {
            static_files::handle(stream, config, method, path).await
        };

        match result {
            Ok(status) => {
                println!("[pdfserve] {method} {path} {status}");
                if !keep_alive {
                    break;
                }
            }
            Err(_) => break,
        }
    }

    Ok(())
}
