//! Shared serve loop for all service endpoints.
//!
//! Every endpoint runs the same strictly sequential state machine:
//! Idle -> ReceiveRequest -> Dispatch -> SendResponse -> Idle. One request is
//! in flight at a time; a second inbound connection waits in the accept
//! backlog until the current reply is sent. A malformed or unrecognized
//! request is answered with an error envelope and the loop continues — only
//! an interrupt terminates the process.

use std::future::Future;

use tokio::io::BufReader;
use tokio::net::{TcpListener, TcpStream};
use tracing::{info, warn};

use crate::envelope::{decode_request, DecodedRequest, Response};
use crate::wire;
use crate::Result;

/// One service's dispatch logic: a decoded request in, a response out.
///
/// Dispatch is infallible at this boundary. Anything that can go wrong inside
/// it is reported as [`Response::Error`], never propagated; the default arm
/// for an unrecognized request is [`Response::invalid_request_type`].
pub trait Dispatcher {
    /// Short service name used in log output.
    fn name(&self) -> &'static str;

    fn dispatch(&self, request: DecodedRequest) -> impl Future<Output = Response> + Send;
}

/// Bind the endpoint listener.
pub async fn bind(addr: &str) -> Result<TcpListener> {
    Ok(TcpListener::bind(addr).await?)
}

/// Run the accept loop until interrupted.
///
/// Connections are served one at a time, each connection's requests strictly
/// in sequence. Transport faults on one connection are logged and do not
/// affect the next.
pub async fn serve<D: Dispatcher>(listener: TcpListener, service: D) -> Result<()> {
    let local = listener.local_addr()?;
    info!(service = service.name(), addr = %local, "endpoint listening");

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                // Accept faults (ECONNABORTED, fd exhaustion) are transient;
                // after binding, nothing short of an interrupt stops serving.
                let (stream, peer) = match accepted {
                    Ok(pair) => pair,
                    Err(e) => {
                        warn!(service = service.name(), error = %e, "accept failed");
                        continue;
                    }
                };
                if let Err(e) = handle_connection(&service, stream).await {
                    warn!(
                        service = service.name(),
                        peer = %peer,
                        error = %e,
                        "connection ended with transport error"
                    );
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!(service = service.name(), "interrupt received, shutting down");
                return Ok(());
            }
        }
    }
}

async fn handle_connection<D: Dispatcher>(service: &D, stream: TcpStream) -> Result<()> {
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    while let Some(line) = wire::read_line(&mut reader).await? {
        let response = match decode_request(&line) {
            Ok(DecodedRequest::Unknown { request_type }) => {
                warn!(
                    service = service.name(),
                    request_type = request_type.as_deref().unwrap_or("<absent>"),
                    "unknown request type"
                );
                service.dispatch(DecodedRequest::Unknown { request_type }).await
            }
            Ok(request) => {
                info!(service = service.name(), "received request");
                service.dispatch(request).await
            }
            Err(e) => {
                warn!(service = service.name(), error = %e, "undecodable request");
                Response::error(format!("Malformed request: {e}"))
            }
        };
        wire::write_envelope(&mut write_half, &response).await?;
    }
    Ok(())
}
