//! Request/reply client for one service endpoint.

use std::time::Duration;

use tokio::io::BufReader;
use tokio::net::TcpStream;
use tracing::debug;

use crate::envelope::{Request, Response};
use crate::wire;
use crate::{Error, Result};

/// Default deadline for one request/reply exchange.
pub const DEFAULT_DEADLINE: Duration = Duration::from_millis(5000);

/// Client bound to one service address.
///
/// Each call opens a fresh connection, sends one request envelope, and waits
/// for the reply under the deadline — one outstanding request per connection,
/// no pipelining. Deadline elapse surfaces as [`Error::Timeout`], which is
/// distinct from a service-side `{error}` envelope (that arrives as a normal
/// [`Response::Error`]). Calls are independent; there is no automatic retry.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    addr: String,
    deadline: Duration,
}

impl ServiceClient {
    /// Client with the default 5000 ms deadline.
    pub fn new(addr: impl Into<String>) -> Self {
        Self::with_deadline(addr, DEFAULT_DEADLINE)
    }

    pub fn with_deadline(addr: impl Into<String>, deadline: Duration) -> Self {
        Self {
            addr: addr.into(),
            deadline,
        }
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Send one request and wait for the reply or the deadline.
    pub async fn call(&self, request: &Request) -> Result<Response> {
        let deadline_ms = self.deadline.as_millis() as u64;
        match tokio::time::timeout(self.deadline, self.exchange(request)).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout(deadline_ms)),
        }
    }

    async fn exchange(&self, request: &Request) -> Result<Response> {
        debug!(addr = %self.addr, "sending request");
        let stream = TcpStream::connect(&self.addr).await?;
        let (read_half, mut write_half) = stream.into_split();
        let mut reader = BufReader::new(read_half);
        wire::write_envelope(&mut write_half, request).await?;
        wire::read_envelope(&mut reader).await
    }
}
