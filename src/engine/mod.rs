//! Node engine - Tree ownership, style, invalidation and measurement.
//!
//! - LayoutTree: arena that owns every node, tree edits, style setters
//! - LayoutNode: per-node style, geometry, memo and freshness
//! - Invalidation: staleness propagation and acknowledgment
//! - Measure: host callbacks for leaf sizing
//!
//! # Freshness
//!
//! ```text
//!            compute            acknowledge
//!   Stale ───────────▶ Fresh ───────────────▶ Acknowledged
//!     ▲                  │                         │
//!     │      mutation    │ (error: discarded)      │ mutation
//!     └──────────────────┴─────────────────────────┘
//! ```

mod invalidation;
mod measure;
mod node;
mod spacing;
mod style;
mod tree;

pub use measure::{measure_func, MeasureFunc, MeasureOutput};
pub(crate) use measure::measure_node;
pub use node::{Freshness, LayoutNode, NodeId};
pub use spacing::{Edge, Spacing};
pub use style::{Offsets, Style};
pub use tree::LayoutTree;
