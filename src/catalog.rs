//! Static compiler catalog: id -> descriptor lookup with a configured
//! default fallback.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// One selectable compiler. Owned by the catalog; panels hold the resolved
/// id and borrow the descriptor back through the shared catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerDescriptor {
    pub id: String,
    pub name: String,
}

impl CompilerDescriptor {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Immutable identifier table, built once at workspace startup and shared
/// by reference into every panel.
#[derive(Debug, Default)]
pub struct CompilerCatalog {
    compilers: Vec<CompilerDescriptor>,
    by_id: FxHashMap<String, usize>,
    default_index: Option<usize>,
}

impl CompilerCatalog {
    /// Builds the lookup table. If `default_id` names no catalog member the
    /// first entry becomes the default; an empty list yields a catalog that
    /// resolves nothing.
    pub fn new(compilers: Vec<CompilerDescriptor>, default_id: &str) -> Self {
        let mut by_id = FxHashMap::default();
        for (index, compiler) in compilers.iter().enumerate() {
            by_id.insert(compiler.id.clone(), index);
        }
        let default_index = by_id
            .get(default_id)
            .copied()
            .or(if compilers.is_empty() { None } else { Some(0) });
        Self {
            compilers,
            by_id,
            default_index,
        }
    }

    pub fn get(&self, id: &str) -> Option<&CompilerDescriptor> {
        self.by_id.get(id).map(|index| &self.compilers[*index])
    }

    pub fn default_compiler(&self) -> Option<&CompilerDescriptor> {
        self.default_index.map(|index| &self.compilers[index])
    }

    /// Resolves an id, falling back to the default for unknown ids. Only an
    /// empty catalog resolves to nothing.
    pub fn resolve(&self, id: &str) -> Option<&CompilerDescriptor> {
        self.get(id).or_else(|| self.default_compiler())
    }

    /// Restore path: absent saved id means "use the default".
    pub fn resolve_saved(&self, id: Option<&str>) -> Option<&CompilerDescriptor> {
        match id {
            Some(id) => self.resolve(id),
            None => self.default_compiler(),
        }
    }

    pub fn compilers(&self) -> &[CompilerDescriptor] {
        &self.compilers
    }

    pub fn is_empty(&self) -> bool {
        self.compilers.is_empty()
    }
}
