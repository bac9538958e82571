//! Held TCP session standing in for the tunnel connection.

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, info};

use crate::domain::{Candidate, CandidateId};
use crate::ports::{ConnectError, ConnectionGateway};

struct Session {
    candidate: CandidateId,
    stream: TcpStream,
}

/// Connection gateway that opens a TCP session and keeps it open.
///
/// A successful `connect` replaces any previous session. The lock is never
/// held across a socket operation.
pub struct TcpConnectionGateway {
    connect_timeout_secs: u64,
    session: Mutex<Option<Session>>,
}

impl TcpConnectionGateway {
    /// Create a gateway bounding each connect by `connect_timeout_secs`.
    #[must_use]
    pub fn new(connect_timeout_secs: u64) -> Self {
        Self {
            connect_timeout_secs,
            session: Mutex::new(None),
        }
    }

    /// Candidate of the open session.
    pub fn active(&self) -> Option<CandidateId> {
        self.session
            .lock()
            .as_ref()
            .map(|session| session.candidate.clone())
    }
}

#[async_trait]
impl ConnectionGateway for TcpConnectionGateway {
    async fn connect(&self, candidate: &Candidate) -> Result<(), ConnectError> {
        let attempt = timeout(
            Duration::from_secs(self.connect_timeout_secs),
            TcpStream::connect((candidate.host.as_str(), candidate.port)),
        )
        .await;

        let stream = match attempt {
            Ok(Ok(stream)) => stream,
            Ok(Err(err)) => {
                return Err(ConnectError::Failed {
                    candidate: candidate.id.to_string(),
                    reason: err.to_string(),
                })
            }
            Err(_) => {
                return Err(ConnectError::Timeout {
                    candidate: candidate.id.to_string(),
                    secs: self.connect_timeout_secs,
                })
            }
        };

        let previous = self.session.lock().replace(Session {
            candidate: candidate.id.clone(),
            stream,
        });
        if let Some(previous) = previous {
            debug!(candidate = %previous.candidate, "[vt-01] replaced previous session");
        }

        info!(
            candidate = %candidate.id,
            address = %candidate.address(),
            "[vt-01] session established"
        );
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), ConnectError> {
        let session = self.session.lock().take();
        let Some(mut session) = session else {
            return Err(ConnectError::NotConnected);
        };

        // Best effort; the socket is closed on drop either way
        if let Err(err) = session.stream.shutdown().await {
            debug!(candidate = %session.candidate, error = %err, "[vt-01] shutdown failed");
        }
        info!(candidate = %session.candidate, "[vt-01] session closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_connect_and_disconnect() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let accept = tokio::spawn(async move { listener.accept().await.map(|(stream, _)| stream) });

        let gateway = TcpConnectionGateway::new(1);
        let candidate = Candidate::new("local", "Local", "127.0.0.1", port);
        gateway.connect(&candidate).await.unwrap();

        assert_eq!(gateway.active(), Some(CandidateId::new("local")));
        let _server_side = accept.await.unwrap().unwrap();

        gateway.disconnect().await.unwrap();
        assert!(gateway.active().is_none());
        assert_eq!(gateway.disconnect().await, Err(ConnectError::NotConnected));
    }

    #[tokio::test]
    async fn test_connect_to_closed_port_fails() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let gateway = TcpConnectionGateway::new(1);
        let candidate = Candidate::new("gone", "Gone", "127.0.0.1", port);
        let err = gateway.connect(&candidate).await.unwrap_err();

        assert!(matches!(err, ConnectError::Failed { .. }));
        assert!(gateway.active().is_none());
    }
}
