//! Result Store
//!
//! Single-slot cache of the last successful payload per tool. Written only by
//! the request gateway, read by export and share. Last write wins; entries
//! never expire.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use trustscope_core::{Payload, ToolKind};

/// Cloneable handle; clones share the same slots.
#[derive(Clone, Default)]
pub struct ResultStore {
    slots: Arc<RwLock<HashMap<ToolKind, Payload>>>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the slot for `tool`.
    pub fn set(&self, tool: ToolKind, payload: Payload) {
        let mut slots = self.slots.write().unwrap_or_else(|e| e.into_inner());
        slots.insert(tool, payload);
    }

    pub fn get(&self, tool: ToolKind) -> Option<Payload> {
        let slots = self.slots.read().unwrap_or_else(|e| e.into_inner());
        slots.get(&tool).cloned()
    }

    /// Empty the slot; returns whether anything was stored.
    pub fn clear(&self, tool: ToolKind) -> bool {
        let mut slots = self.slots.write().unwrap_or_else(|e| e.into_inner());
        slots.remove(&tool).is_some()
    }
}
