//! Hyper server setup and request handling.

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use http_body_util::Full;
use hyper::body::{Bytes, Incoming as IncomingBody};
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnectionBuilder;
use hyper_util::server::graceful::GracefulShutdown;
use tokio::net::{TcpListener, ToSocketAddrs};

use crate::router::Router;

/// HTTP server for the students API.
pub struct Server {
    listener: TcpListener,
    router: Arc<Router>,
}

impl Server {
    /// Binds the listening socket.
    ///
    /// # Arguments
    /// * `addr` - Address to bind to, e.g. `localhost:8082`
    /// * `router` - Request router
    pub async fn bind(addr: impl ToSocketAddrs, router: Router) -> Result<Self, std::io::Error> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            router: Arc::new(router),
        })
    }

    /// Address the listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.listener.local_addr()
    }

    /// Serves connections until `shutdown` resolves, then stops accepting and
    /// waits up to `grace` for in-flight connections to finish.
    pub async fn serve_with_shutdown<F>(
        self,
        shutdown: F,
        grace: Duration,
    ) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()>,
    {
        let Self { listener, router } = self;
        tracing::info!(address = %listener.local_addr()?, "Server started");

        let builder = ConnectionBuilder::new(TokioExecutor::new());
        let graceful = GracefulShutdown::new();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(conn) => conn,
                        Err(err) => {
                            tracing::warn!(error = %err, "Failed to accept connection");
                            continue;
                        }
                    };

                    let io = TokioIo::new(stream);
                    let router = Arc::clone(&router);
                    let service = service_fn(move |req| handle_request(req, Arc::clone(&router)));

                    let conn = graceful.watch(builder.serve_connection(io, service).into_owned());
                    tokio::spawn(async move {
                        if let Err(err) = conn.await {
                            tracing::debug!(%peer, error = %err, "Error serving connection");
                        }
                    });
                }
                () = &mut shutdown => {
                    tracing::info!("Shutting down the server");
                    break;
                }
            }
        }

        drop(listener);

        tokio::select! {
            () = graceful.shutdown() => {
                tracing::info!("Server shutdown successfully");
            }
            () = tokio::time::sleep(grace) => {
                tracing::warn!(
                    grace_ms = grace.as_millis() as u64,
                    "Grace period elapsed with open connections"
                );
            }
        }

        Ok(())
    }
}

/// Handles an incoming HTTP request.
async fn handle_request(
    req: Request<IncomingBody>,
    router: Arc<Router>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    Ok(router.handle(req).await.map(Full::new))
}
