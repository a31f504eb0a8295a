//! Re-entrancy guard for programmatic viewport writes.
//!
//! Writing a camera value or mutating a layer list makes the host emit
//! the same event the engine reacts to, which would loop forever without
//! a guard. Instead of disconnecting and reconnecting listeners around
//! each write, the gate records the expected echo of every programmatic
//! write, payload included: when the matching echo arrives it is
//! absorbed, while a user event of the same kind carrying a different
//! payload passes through even with echoes outstanding. User events are
//! never pre-registered, so each one produces exactly one
//! synchronization cascade.
//!
//! Value-less echoes (reorders, selection changes) match by kind alone.
//! Their handlers read current viewport state rather than event payloads,
//! so absorbing a user event in place of such an echo still converges
//! when the echo itself is dispatched.

use serde::{Deserialize, Serialize};

use crate::host::ViewportId;

/// Fingerprint of an expected echo, one variant per mutating host
/// operation. Camera and per-layer echoes carry the written payload so
/// user events with different values are never mistaken for them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Echo {
    Zoom(f64),
    Center([f64; 3]),
    LayerInserted(usize),
    LayerRemoved(usize),
    LayersReordered,
    SelectionChanged,
    LayerRenamed(String),
    LayerUpdated(usize),
}

/// Records expected echoes of the session's own writes.
#[derive(Debug, Default)]
pub struct EventGate {
    expected: Vec<(ViewportId, Echo)>,
}

impl EventGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the expected echo before a programmatic write.
    pub fn expect(&mut self, viewport: ViewportId, echo: Echo) {
        self.expected.push((viewport, echo));
    }

    /// Absorb an incoming event if it matches an expected echo. Returns
    /// `true` when the event was absorbed and must not be handled.
    pub fn absorb(&mut self, viewport: ViewportId, echo: &Echo) -> bool {
        let position = self
            .expected
            .iter()
            .position(|(expected_viewport, expected)| {
                *expected_viewport == viewport && expected == echo
            });
        match position {
            Some(index) => {
                self.expected.remove(index);
                true
            }
            None => false,
        }
    }

    /// Number of outstanding expected echoes.
    pub fn pending(&self) -> usize {
        self.expected.len()
    }

    /// Whether no echoes are outstanding. Holds between cascades.
    pub fn is_idle(&self) -> bool {
        self.expected.is_empty()
    }

    /// Drop all outstanding expectations (session teardown).
    pub fn clear(&mut self) {
        self.expected.clear();
    }
}
