use std::process;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;

use pdfserve::{serve, Config};

fn main() {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("[pdfserve] startup failed: {err}");
            process::exit(1);
        }
    };

    let workers = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .max(4);

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(workers)
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("[pdfserve] failed to start runtime: {err}");
            process::exit(1);
        }
    };

    runtime.block_on(async {
        let listener = match TcpListener::bind(("0.0.0.0", config.port)).await {
            Ok(listener) => listener,
            Err(err) => {
                eprintln!("[pdfserve] failed to bind port {}: {err}", config.port);
                process::exit(1);
            }
        };

        println!("[pdfserve] starting on port {}", config.port);
        println!("[pdfserve] storage root: {}", config.storage_root.display());
        println!("[pdfserve] static root: {}", config.static_root.display());
        println!("[pdfserve] endpoint: GET /api/pdf?id={{docId}}");
        println!("[pdfserve] static:   GET / -> index.html");

        serve(listener, Arc::new(config), shutdown_signal()).await;
    });

    println!("[pdfserve] shutdown complete");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
