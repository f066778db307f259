//! File-backed implementation of the layout manager's persistence surface.

use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;

use crate::models::PanelId;
use crate::panel::saved::SavedPanelState;
use crate::services::ports::LayoutStore;

/// Stores panel layout state as a pretty-printed JSON map keyed by panel id.
/// Loading is restore-or-default: a missing or unparsable file starts empty.
pub struct JsonLayoutStore {
    path: PathBuf,
    panels: BTreeMap<String, SavedPanelState>,
}

impl JsonLayoutStore {
    pub fn load(path: PathBuf) -> Self {
        let panels = std::fs::read_to_string(&path)
            .ok()
            .and_then(|data| serde_json::from_str(&data).ok())
            .unwrap_or_default();
        Self { path, panels }
    }

    /// Restored state for a panel id, with the id filled back in so the hub
    /// reuses it.
    pub fn panel(&self, id: PanelId) -> Option<SavedPanelState> {
        self.panels.get(&id.0.to_string()).map(|state| {
            let mut state = state.clone();
            state.id = Some(id);
            state
        })
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    fn persist(&self) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(&self.panels)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        std::fs::write(&self.path, content)
    }
}

impl LayoutStore for JsonLayoutStore {
    fn save_panel(&mut self, panel: PanelId, state: &SavedPanelState) {
        self.panels.insert(panel.0.to_string(), state.clone());
        if let Err(e) = self.persist() {
            tracing::warn!(path = %self.path.display(), error = %e, "layout save failed");
        }
    }
}
