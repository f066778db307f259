//! Data model: panel/buffer identities, assembly lines, compile wire types,
//! output filters.

pub mod asm;
pub mod compile;
pub mod filters;

pub use asm::{fake_asm, AsmLine};
pub use compile::{now_millis, CompileRequest, CompileResult};
pub use filters::{FilterSet, FilterToggle};

use serde::{Deserialize, Serialize};

/// Identity of one panel inside a workspace. Assigned by the hub at panel
/// open, or restored from saved layout state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PanelId(pub u32);

/// Identity of an externally managed source buffer. Multiple panels may
/// bind to the same buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BufferId(pub u32);

/// Opaque colour value handed through from the editor's per-line colour
/// events to the output view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Colour(pub u32);
