// Server loop module
// Accepts connections until a shutdown signal arrives

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// Accept loop for the sign-up server
///
/// Runs on a `LocalSet`; each accepted connection is served in its own
/// `spawn_local` task. Returns once `shutdown` is notified.
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    active_connections: Arc<AtomicUsize>,
    shutdown: Arc<Notify>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = shutdown.notified() => {
                drop(listener);
                logger::log_shutdown(active_connections.load(Ordering::SeqCst));
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{default_catalog, CatalogStore};
    use crate::config::Config;
    use crate::server::create_listener;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    async fn raw_request(addr: std::net::SocketAddr, request: &str) -> String {
        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    #[tokio::test]
    async fn test_serves_until_shutdown() {
        let mut config = Config::from_defaults().unwrap();
        config.logging.access_log = false;
        let state = AppState::new(config, CatalogStore::shared(default_catalog())).shared();

        let listener = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = Arc::new(Notify::new());
        let connections = Arc::new(AtomicUsize::new(0));

        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let server = tokio::task::spawn_local(start_server_loop(
                    listener,
                    Arc::clone(&state),
                    Arc::clone(&connections),
                    Arc::clone(&shutdown),
                ));

                let response = raw_request(
                    addr,
                    "POST /activities/Chess%20Club/signup?email=wire%40example.com HTTP/1.1\r\n\
                     Host: localhost\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                )
                .await;
                assert!(response.starts_with("HTTP/1.1 200"), "{response}");
                assert!(response.contains("Signed up wire@example.com for Chess Club"));

                let response = raw_request(
                    addr,
                    "GET / HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
                )
                .await;
                assert!(response.starts_with("HTTP/1.1 302"), "{response}");
                assert!(response.contains("location: /static/index.html"));

                shutdown.notify_one();
                server.await.unwrap().unwrap();
            })
            .await;

        let snapshot = state.catalog.list_activities().await;
        assert!(snapshot
            .get("Chess Club")
            .unwrap()
            .has_participant("wire@example.com"));
    }
}
