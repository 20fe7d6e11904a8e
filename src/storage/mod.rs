//! Storage abstractions for section state persistence.
//!
//! The state snapshot is the only durable artifact: a single JSON object
//! mapping `{term}_{code}` to the last observed section.
//!
//! ```text
//! state.json
//! {
//!   "2263_PHYS22804042": { "code": "PHYS22804042", "type": "LAB", ... }
//! }
//! ```

pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::StateMap;

// Re-export for convenience
pub use local::JsonStateStore;

/// Trait for state storage backends.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load the last saved state.
    ///
    /// Missing or unreadable state yields an empty map; this never fails.
    async fn load(&self) -> StateMap;

    /// Replace the saved state with `state`.
    async fn save(&self, state: &StateMap) -> Result<()>;
}
