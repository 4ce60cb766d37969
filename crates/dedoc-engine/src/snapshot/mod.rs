//! # Snapshot Testing Support
//!
//! Utilities for testing structuring via snapshot assertions and invariant checks.
//!
//! ## Modules
//!
//! - **`outline`**: Renders a [`DocumentTree`](crate::models::DocumentTree) as
//!   a stable indented outline for `insta` snapshots
//! - **`invariants`**: Runtime checks for tree correctness (ids follow paths,
//!   annotations in bounds, no contradicting annotations)

pub mod invariants;
pub mod outline;

pub use invariants::check as invariants;
pub use outline::render;
