//! LayoutNode - Persistent per-node layout state.
//!
//! A node owns its style, the geometry of the last pass, an optional
//! memoized size, and its freshness state. Children are held as [`NodeId`]s
//! into the owning [`LayoutTree`](super::LayoutTree); the parent link is a
//! lookup key only.

use crate::layout::{CachedLayout, ComputedLayout};

use super::measure::MeasureFunc;
use super::style::Style;

/// Handle to a node inside a [`LayoutTree`](super::LayoutTree).
///
/// The generation detects handles to nodes that were freed and whose slot
/// has since been reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

/// Freshness of a node's computed geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Freshness {
    /// Some property of this node or a descendant changed; the stored
    /// geometry cannot be trusted.
    #[default]
    Stale,
    /// A layout pass produced geometry the consumer has not acknowledged yet.
    FreshlyComputed,
    /// The geometry is valid and the consumer has seen it.
    Acknowledged,
}

/// A node of the layout tree.
pub struct LayoutNode {
    pub(crate) style: Style,
    pub(crate) layout: ComputedLayout,
    pub(crate) memoized: Option<CachedLayout>,
    pub(crate) freshness: Freshness,
    pub(crate) children: Vec<NodeId>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) measure: Option<MeasureFunc>,
    pub(crate) line_index: usize,
}

impl LayoutNode {
    pub(crate) fn new() -> Self {
        Self {
            style: Style::default(),
            layout: ComputedLayout::default(),
            memoized: None,
            freshness: Freshness::Stale,
            children: Vec::new(),
            parent: None,
            measure: None,
            line_index: 0,
        }
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn layout(&self) -> &ComputedLayout {
        &self.layout
    }

    pub fn freshness(&self) -> Freshness {
        self.freshness
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Flex line the last pass placed this node on.
    pub fn line_index(&self) -> usize {
        self.line_index
    }

    pub fn memoized(&self) -> Option<&CachedLayout> {
        self.memoized.as_ref()
    }

    pub fn is_measure_defined(&self) -> bool {
        self.measure.is_some()
    }

    /// Only leaves with a measure function are sized by their callback.
    pub(crate) fn is_measured_leaf(&self) -> bool {
        self.children.is_empty() && self.measure.is_some()
    }
}
