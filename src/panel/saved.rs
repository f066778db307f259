use serde::{Deserialize, Serialize};

use crate::models::{BufferId, FilterSet, PanelId};

/// Persistable slice of panel state, written by the layout manager on every
/// user-driven configuration change and read once at panel construction.
/// Every field is optional so each one gets an independent restore-or-default
/// path. `id` is only ever consumed on restore; `saved_state()` leaves it
/// unset because identity belongs to the layout manager.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SavedPanelState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PanelId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compiler: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<String>,
    #[serde(default, rename = "source", skip_serializing_if = "Option::is_none")]
    pub source_buffer: Option<BufferId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<FilterSet>,
}
