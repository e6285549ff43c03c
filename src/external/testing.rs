//! Recording transport used by unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::transport::{HttpTransport, OutboundRequest, TransportResponse};

#[derive(Debug, Clone, Copy)]
enum Reply {
    Status(u16),
    ConnectionError,
}

/// Records every submitted request and answers 200 unless told otherwise.
#[derive(Default)]
pub struct RecordingTransport {
    requests: Mutex<Vec<OutboundRequest>>,
    replies: Mutex<HashMap<String, Reply>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers requests to `url` with `status`.
    pub fn with_status(self, url: &str, status: u16) -> Self {
        self.replies
            .lock()
            .unwrap()
            .insert(url.to_string(), Reply::Status(status));
        self
    }

    /// Fails requests to `url` before any response.
    pub fn failing_for(self, url: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .insert(url.to_string(), Reply::ConnectionError);
        self
    }

    pub fn requests(&self) -> Vec<OutboundRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.url).collect()
    }
}

#[async_trait]
impl HttpTransport for RecordingTransport {
    async fn submit(&self, request: &OutboundRequest) -> anyhow::Result<TransportResponse> {
        self.requests.lock().unwrap().push(request.clone());

        let reply = self.replies.lock().unwrap().get(&request.url).copied();
        match reply {
            Some(Reply::ConnectionError) => anyhow::bail!("connection refused: {}", request.url),
            Some(Reply::Status(status)) => Ok(TransportResponse { status }),
            None => Ok(TransportResponse { status: 200 }),
        }
    }
}
