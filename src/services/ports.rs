//! Ports offered to / required from the panel's external collaborators.

use crate::models::{Colour, CompileRequest, PanelId};
use crate::panel::saved::SavedPanelState;

/// Submission boundary to the remote compilation service. Fire-and-forget:
/// the adapter reports back asynchronously through a `CompileMessage`
/// channel drained by the hub. Implementations must not block the caller.
pub trait CompileTransport {
    fn submit(&self, panel: PanelId, request: CompileRequest);
}

/// The read-only assembly view owned by the hosting panel widget.
pub trait OutputView {
    fn set_text(&mut self, text: &str);
    fn clear_highlights(&mut self);
    fn highlight_line(&mut self, index: usize, colour: Colour);
}

/// Persistence surface of the docking/layout manager.
pub trait LayoutStore {
    fn save_panel(&mut self, panel: PanelId, state: &SavedPanelState);
}
