//! # flexcore
//!
//! Node tree, invalidation and freshness core of a flexbox layout engine.
//!
//! ## Architecture
//!
//! Nodes live in a generational arena ([`LayoutTree`]) and are addressed by
//! [`NodeId`]. Every style mutation compares against the stored value and,
//! on a real change, marks the node and its ancestors stale. A layout pass
//! publishes new geometry, which the consumer must acknowledge before the
//! affected nodes may be mutated again:
//! ```text
//! Stale ──calculate_layout──▶ FreshlyComputed ──acknowledge_layout──▶ Acknowledged
//!   ▲                                                                     │
//!   └─────────────────────────────── mark_stale ◀─────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Style enums and the `UNDEFINED` sentinel
//! - [`engine`] - Node arena, spacing, measure functions, invalidation
//! - [`layout`] - Taffy-backed layout pass and text measurement
//! - [`config`] - Tree-wide layout options
//! - [`error`] - Contract violations

pub mod config;
pub mod engine;
pub mod error;
pub mod layout;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use config::LayoutConfig;
pub use error::NodeError;

pub use engine::{
    measure_func, Edge, Freshness, LayoutNode, LayoutTree, MeasureFunc, MeasureOutput, NodeId,
    Offsets, Spacing, Style,
};

pub use layout::{
    measure_text, string_width, text_measure_func, wrap_text, CachedLayout, ComputedLayout,
    LayoutConstraints, LayoutPass, MeasureMode,
};
