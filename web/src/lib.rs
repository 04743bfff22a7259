use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use domain::meeting_summary::MeetingSummaryService;
use hyper::server::conn::http1;
use hyper_util::rt::{TokioIo, TokioTimer};
use hyper_util::server::graceful::GracefulShutdown;
use hyper_util::service::TowerToHyperService;
use log::*;
use service::config::Config;
use tokio::net::TcpListener;

pub use self::error::{Error, Result};

mod controller;
pub mod error;
pub mod middleware;
mod params;
pub mod router;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub meeting_summaries: Arc<MeetingSummaryService>,
}

impl AppState {
    pub fn new(config: Config, meeting_summaries: MeetingSummaryService) -> Self {
        Self {
            config,
            meeting_summaries: Arc::new(meeting_summaries),
        }
    }
}

/// Binds the configured address and serves until SIGINT or SIGTERM.
///
/// After the signal no new connections are accepted and in-flight requests get up to
/// the configured grace period to finish.
pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let bind_address = app_state.config.bind_address();
    let header_read_timeout = app_state.config.header_read_timeout();
    let grace_period = app_state.config.shutdown_grace_period();

    let listener = TcpListener::bind(&bind_address).await?;
    info!("Server starting... listening for connections on http://{bind_address}");

    serve(
        listener,
        router::define_routes(app_state),
        header_read_timeout,
        grace_period,
        shutdown_signal(),
    )
    .await;
    Ok(())
}

/// Accepts HTTP/1.1 connections on `listener` until `shutdown` resolves, then drains
/// open connections for at most `grace_period`.
///
/// Clients that do not finish sending request headers within `header_read_timeout`
/// are disconnected.
pub async fn serve(
    listener: TcpListener,
    router: Router,
    header_read_timeout: Duration,
    grace_period: Duration,
    shutdown: impl Future<Output = ()>,
) {
    let mut http = http1::Builder::new();
    http.timer(TokioTimer::new())
        .header_read_timeout(header_read_timeout);

    let graceful = GracefulShutdown::new();
    tokio::pin!(shutdown);

    loop {
        let (stream, peer) = tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok(accepted) => accepted,
                Err(e) => {
                    warn!("Failed to accept connection: {e}");
                    tokio::time::sleep(Duration::from_secs(1)).await;
                    continue;
                }
            },
            _ = &mut shutdown => break,
        };

        let service = TowerToHyperService::new(router.clone());
        let connection = graceful.watch(http.serve_connection(TokioIo::new(stream), service));
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                debug!("Connection from {peer} closed with an error: {e}");
            }
        });
    }

    drop(listener);
    info!("Shutdown signal received, draining in-flight requests for up to {grace_period:?}");

    tokio::select! {
        _ = graceful.shutdown() => {}
        _ = tokio::time::sleep(grace_period) => {
            warn!("Grace period elapsed with requests still in flight, exiting");
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio::sync::oneshot;

    async fn start(header_read_timeout: Duration) -> (String, oneshot::Sender<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap().to_string();
        let router = Router::new().route("/health", get(|| async { "ok" }));
        let (stop_tx, stop_rx) = oneshot::channel::<()>();

        tokio::spawn(serve(
            listener,
            router,
            header_read_timeout,
            Duration::from_secs(1),
            async move {
                let _ = stop_rx.await;
            },
        ));
        (address, stop_tx)
    }

    #[tokio::test]
    async fn test_serves_complete_requests() {
        let (address, _stop) = start(Duration::from_secs(5)).await;

        let mut stream = TcpStream::connect(&address).await.unwrap();
        stream
            .write_all(b"GET /health HTTP/1.1\r\nhost: localhost\r\nconnection: close\r\n\r\n")
            .await
            .unwrap();

        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        assert!(response.starts_with("HTTP/1.1 200 OK"));
        assert!(response.ends_with("ok"));
    }

    #[tokio::test]
    async fn test_slow_header_reads_are_disconnected() {
        let (address, _stop) = start(Duration::from_millis(300)).await;

        let mut stream = TcpStream::connect(&address).await.unwrap();
        stream
            .write_all(b"GET /health HTTP/1.1\r\nhost: loc")
            .await
            .unwrap();

        // The server hangs up (possibly after a 408) instead of waiting for the rest
        let mut received = Vec::new();
        let read = tokio::time::timeout(Duration::from_secs(5), stream.read_to_end(&mut received))
            .await
            .expect("connection was not closed after the header read timeout");
        assert!(read.is_err() || !String::from_utf8_lossy(&received).contains("200 OK"));
    }

    #[tokio::test]
    async fn test_stops_accepting_after_shutdown() {
        let (address, stop) = start(Duration::from_secs(5)).await;
        stop.send(()).unwrap();

        let mut refused = false;
        for _ in 0..50 {
            if TcpStream::connect(&address).await.is_err() {
                refused = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert!(refused);
    }
}
