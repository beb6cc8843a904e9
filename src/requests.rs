//! Background queue for outbound HTTP requests.
//!
//! A single worker thread drains the queue in order, so requests never run
//! concurrently with each other. Each request carries its own completion
//! callback, invoked on the worker thread.

use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use serde_json::Value;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RequestError {
    #[error("http status {0}")]
    Status(u16),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("response was not valid json: {0}")]
    Decode(String),
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMethod {
    Get,
    Post,
}

pub type Callback = Box<dyn FnOnce(Result<Value, RequestError>) + Send>;

pub struct Request {
    pub endpoint: String,
    pub method: RequestMethod,
    pub payload: Option<Value>,
    pub callback: Callback,
}

impl Request {
    pub fn post(
        endpoint: impl Into<String>,
        payload: Value,
        callback: impl FnOnce(Result<Value, RequestError>) + Send + 'static,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            method: RequestMethod::Post,
            payload: Some(payload),
            callback: Box::new(callback),
        }
    }

    pub fn get(
        endpoint: impl Into<String>,
        callback: impl FnOnce(Result<Value, RequestError>) + Send + 'static,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            method: RequestMethod::Get,
            payload: None,
            callback: Box::new(callback),
        }
    }
}

impl std::fmt::Debug for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Request")
            .field("endpoint", &self.endpoint)
            .field("method", &self.method)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// Performs one request and decodes the JSON body.
pub trait Transport: Send + 'static {
    fn execute(
        &self,
        method: RequestMethod,
        endpoint: &str,
        payload: Option<&Value>,
    ) -> Result<Value, RequestError>;
}

/// Blocking HTTP transport with connect, read and write timeouts.
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration, user_agent: &str) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(timeout)
            .timeout_read(timeout)
            .timeout_write(timeout)
            .user_agent(user_agent)
            .build();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn execute(
        &self,
        method: RequestMethod,
        endpoint: &str,
        payload: Option<&Value>,
    ) -> Result<Value, RequestError> {
        let result = match (method, payload) {
            (RequestMethod::Get, _) => self.agent.get(endpoint).call(),
            (RequestMethod::Post, Some(payload)) => self
                .agent
                .post(endpoint)
                .set("Accept", "application/json")
                .send_json(payload.clone()),
            (RequestMethod::Post, None) => self.agent.post(endpoint).call(),
        };
        let response = result.map_err(|e| match e {
            ureq::Error::Status(status, _) => RequestError::Status(status),
            ureq::Error::Transport(transport) => RequestError::Transport(transport.to_string()),
        })?;
        serde_json::from_reader(response.into_reader())
            .map_err(|e| RequestError::Decode(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Manager
// ---------------------------------------------------------------------------

/// Owns the worker thread. Dropping the manager lets queued requests finish
/// and then joins the worker.
pub struct RequestManager {
    sender: Option<mpsc::Sender<Request>>,
    worker: Option<JoinHandle<()>>,
}

impl RequestManager {
    pub fn start<T: Transport>(transport: T) -> Self {
        let (sender, receiver) = mpsc::channel::<Request>();
        let worker = thread::Builder::new()
            .name("request-worker".into())
            .spawn(move || {
                tracing::debug!("request worker started");
                for request in receiver {
                    tracing::info!(endpoint = %request.endpoint, "processing request");
                    let result =
                        transport.execute(request.method, &request.endpoint, request.payload.as_ref());
                    if let Err(e) = &result {
                        tracing::warn!(endpoint = %request.endpoint, error = %e, "request failed");
                    }
                    (request.callback)(result);
                }
                tracing::debug!("request worker stopped");
            });

        let worker = match worker {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::warn!(error = %e, "unable to start request worker");
                None
            }
        };
        Self {
            sender: worker.as_ref().map(|_| sender),
            worker,
        }
    }

    /// Queue a request. If the worker is not running the callback is never
    /// invoked and the request is logged and dropped.
    pub fn queue_request(&self, request: Request) {
        let Some(sender) = &self.sender else {
            tracing::warn!(endpoint = %request.endpoint, "request worker not running");
            return;
        };
        if let Err(mpsc::SendError(request)) = sender.send(request) {
            tracing::warn!(endpoint = %request.endpoint, "request worker has stopped");
        }
    }
}

impl Drop for RequestManager {
    fn drop(&mut self) {
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::warn!("request worker panicked");
            }
        }
    }
}
