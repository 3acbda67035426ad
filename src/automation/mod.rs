//! UI tree snapshot and automation engine
//!
//! Turns the platform accessibility tree into immutable, id-stable snapshots,
//! renders them as compact text for LLM agents, and executes UI actions one
//! at a time.
//!
//! ## Architecture
//!
//! - `AutomationManager` - Entry point used by the API layer
//! - `snapshot` - Native tree to `Node` tree with deterministic ids
//! - `NodeCache` - Id lookup for the latest snapshot, swapped wholesale
//! - `serializer` - Tab-separated text rendering
//! - `locator` - Attribute search over a snapshot
//! - `fingerprint` - Histogram similarity used by wait-for-idle
//! - `ActionDispatcher` - Serialized action execution with bounded waits
//! - `AccessibilityProvider` - Platform abstraction; `platform::fixture` is
//!   the in-memory implementation
//!
//! ## Example
//!
//! ```rust,ignore
//! use uitree_sidecar::automation::{Action, AutomationManager, Target};
//!
//! let manager = AutomationManager::new(provider, EngineConfig::default());
//!
//! let screen = manager.snapshot(false).await?;
//! println!("{}", screen.text);
//!
//! manager
//!     .perform(&Action::Click { target: Target::Element { id: "node_41742879".into() } })
//!     .await?;
//! manager.wait_for_idle(5_000, 200, 95).await?;
//! ```

pub mod cache;
pub mod dispatcher;
pub mod fingerprint;
pub mod gesture;
pub mod locator;
pub mod manager;
pub mod platform;
pub mod serializer;
pub mod snapshot;
pub mod types;

// Re-export main types
pub use cache::{NodeCache, ResolvedNode};
pub use dispatcher::{Action, ActionDispatcher, ActionOutcome, ActionState, ScrollDirection, Target};
pub use fingerprint::Fingerprint;
pub use locator::Criterion;
pub use manager::{AutomationManager, IdleOutcome, ResolvedElement, SnapshotText};
pub use platform::{AccessibilityProvider, GlobalAction, PlatformError};
pub use types::{Bounds, ElementInfo, Node, NodeId, Snapshot, Window, WindowInfo};
