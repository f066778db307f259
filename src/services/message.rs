use crate::models::{CompileRequest, CompileResult, PanelId};

/// Envelope carried back from the transport adapter to the hub's event
/// loop. The originating request travels with the outcome so the panel can
/// correlate and report timing.
#[derive(Debug)]
pub enum CompileMessage {
    Response {
        panel: PanelId,
        request: CompileRequest,
        result: CompileResult,
    },
    TransportError {
        panel: PanelId,
        request: CompileRequest,
        error: String,
    },
}
