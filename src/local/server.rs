use crate::*;
use tokio::net::TcpListener;

/// Listens on this task's cluster port for the life of the process.
///
/// Peers are accepted and dropped; the socket only has to exist so the
/// rest of the cluster can reach the task.
#[derive(Debug)]
pub struct LocalServer {
    listener: TcpListener,
    target: String,
}

impl LocalServer {
    /// Binds every interface on the endpoint's port. Port zero picks a free one.
    pub async fn bind(endpoint: &Endpoint) -> TrainResult<Self> {
        let listener = TcpListener::bind(("0.0.0.0", endpoint.port()))
            .await
            .map_err(|e| TrainError::Unavailable(format!("bind {}: {}", endpoint, e)))?;
        let port = listener.local_addr()?.port();
        let target = format!("{}{}:{}", GRPC_SCHEME, endpoint.host(), port);
        log::info!("server listening at {}", target);
        Ok(Self { listener, target })
    }
}

#[async_trait::async_trait]
impl Server for LocalServer {
    fn target(&self) -> String {
        self.target.clone()
    }
    /// Accepts until the process exits. Ctrl+C is left to [`crate::kys`].
    async fn join(&self) -> TrainResult<()> {
        loop {
            let (_, peer) = self
                .listener
                .accept()
                .await
                .map_err(|e| TrainError::Unavailable(format!("accept: {}", e)))?;
            log::debug!("peer {} connected to {}", peer, self.target);
        }
    }
}
