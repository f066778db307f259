//! HTTP adapter for the remote compilation service.

use std::io;
use std::sync::mpsc::Sender;
use std::time::Duration;

use crate::models::{CompileRequest, CompileResult, PanelId};
use crate::services::message::CompileMessage;
use crate::services::ports::CompileTransport;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Posts each compile request as JSON and reports the outcome back over the
/// hub's message channel. Transport failures become `TransportError`
/// messages; they are never surfaced as panics or raw errors.
pub struct HttpCompileService {
    runtime: tokio::runtime::Runtime,
    client: reqwest::Client,
    endpoint: String,
    tx: Sender<CompileMessage>,
}

impl HttpCompileService {
    pub fn new(endpoint: impl Into<String>, tx: Sender<CompileMessage>) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .or_else(|e| {
                tracing::error!(
                    error = %e,
                    "Failed to create multi-thread tokio runtime, falling back to current-thread"
                );
                tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
            })?;
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        Ok(Self {
            runtime,
            client,
            endpoint: endpoint.into(),
            tx,
        })
    }
}

impl CompileTransport for HttpCompileService {
    fn submit(&self, panel: PanelId, request: CompileRequest) {
        let tx = self.tx.clone();
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        self.runtime.spawn(async move {
            let outcome = client.post(&endpoint).json(&request).send().await;
            let message = match outcome {
                Ok(response) => match response.json::<CompileResult>().await {
                    Ok(result) => CompileMessage::Response {
                        panel,
                        request,
                        result,
                    },
                    Err(e) => {
                        tracing::warn!(panel = panel.0, error = %e, "compile response decode failed");
                        CompileMessage::TransportError {
                            panel,
                            request,
                            error: e.to_string(),
                        }
                    }
                },
                Err(e) => {
                    tracing::warn!(panel = panel.0, error = %e, "compile request failed");
                    CompileMessage::TransportError {
                        panel,
                        request,
                        error: e.to_string(),
                    }
                }
            };
            let _ = tx.send(message);
        });
    }
}
