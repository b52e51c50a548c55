//! Measurement Bridge - Host callbacks that size leaf content.
//!
//! A leaf whose size the tree cannot derive (text, images, native views)
//! carries a [`MeasureFunc`]. The solver calls it with a candidate width and
//! reads back the intrinsic size.
//!
//! Measure functions are NOT thread-safe and NOT re-entrant: a callback must
//! not start another measurement or layout pass on the same tree. `Rc` keeps
//! the tree `!Send`, so the first half is enforced by the compiler.

use std::rc::Rc;

use log::trace;

use crate::error::NodeError;
use crate::types::UNDEFINED;

use super::node::{LayoutNode, NodeId};
use super::tree::LayoutTree;

/// Size reported by a measure function. Unset dimensions stay `UNDEFINED`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasureOutput {
    pub width: f32,
    pub height: f32,
}

impl Default for MeasureOutput {
    fn default() -> Self {
        Self {
            width: UNDEFINED,
            height: UNDEFINED,
        }
    }
}

/// Host measurement callback: `(node, available_width, output)`.
///
/// `available_width` is `UNDEFINED` when the width is unconstrained.
/// Identity is by `Rc` pointer; installing a clone of the same `Rc` is a
/// no-op for invalidation.
pub type MeasureFunc = Rc<dyn Fn(&LayoutNode, f32, &mut MeasureOutput)>;

/// Wrap a closure as a [`MeasureFunc`].
pub fn measure_func(f: impl Fn(&LayoutNode, f32, &mut MeasureOutput) + 'static) -> MeasureFunc {
    Rc::new(f)
}

pub(crate) fn same_measure_func(a: Option<&MeasureFunc>, b: Option<&MeasureFunc>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => Rc::ptr_eq(a, b),
        _ => false,
    }
}

/// Invoke a node's measure function with freshly reset output.
pub(crate) fn measure_node(node: &LayoutNode, width: f32) -> Result<MeasureOutput, NodeError> {
    let Some(measure) = node.measure.as_ref() else {
        return Err(NodeError::NoMeasurementFunction);
    };

    let mut output = MeasureOutput::default();
    measure(node, width, &mut output);
    trace!("measured node at width {width}: {}x{}", output.width, output.height);
    Ok(output)
}

impl LayoutTree {
    /// Install or clear a node's measure function.
    ///
    /// A different callback invalidates the node; the same `Rc` again does
    /// nothing.
    pub fn set_measure_func(&mut self, id: NodeId, measure: Option<MeasureFunc>) -> Result<(), NodeError> {
        if same_measure_func(self.node(id)?.measure.as_ref(), measure.as_ref()) {
            return Ok(());
        }

        self.ensure_can_invalidate(id)?;
        self.node_mut(id)?.measure = measure;
        self.mark_stale(id)?;
        Ok(())
    }

    pub fn is_measure_defined(&self, id: NodeId) -> Result<bool, NodeError> {
        Ok(self.node(id)?.is_measure_defined())
    }

    /// Ask a node's measure function for its size at `available_width`.
    pub fn measure(&self, id: NodeId, available_width: f32) -> Result<MeasureOutput, NodeError> {
        measure_node(self.node(id)?, available_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    use crate::engine::Freshness;
    use crate::types::is_undefined;

    #[test]
    fn test_measure_without_function() {
        let mut tree = LayoutTree::new();
        let node = tree.new_node();
        assert!(matches!(tree.measure(node, 100.0), Err(NodeError::NoMeasurementFunction)));
    }

    #[test]
    fn test_measure_output_reset_before_call() {
        let mut tree = LayoutTree::new();
        let node = tree.new_node();
        tree.set_measure_func(node, Some(measure_func(|_, width, out| {
            out.width = width / 2.0;
        })))
        .unwrap();

        let out = tree.measure(node, 80.0).unwrap();
        assert_eq!(out.width, 40.0);
        assert!(is_undefined(out.height));
    }

    #[test]
    fn test_same_measure_func_is_noop() {
        let mut tree = LayoutTree::new();
        let node = tree.new_node();
        let calls = Rc::new(Cell::new(0));
        let calls_in_fn = calls.clone();
        let f = measure_func(move |_, _, out| {
            calls_in_fn.set(calls_in_fn.get() + 1);
            out.width = 1.0;
            out.height = 1.0;
        });

        tree.set_measure_func(node, Some(f.clone())).unwrap();
        tree.force_freshness(node, Freshness::Acknowledged);

        tree.set_measure_func(node, Some(f.clone())).unwrap();
        assert_eq!(tree.freshness(node).unwrap(), Freshness::Acknowledged);

        tree.set_measure_func(node, Some(measure_func(|_, _, _| {}))).unwrap();
        assert_eq!(tree.freshness(node).unwrap(), Freshness::Stale);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_clearing_measure_func_invalidates() {
        let mut tree = LayoutTree::new();
        let node = tree.new_node();
        tree.set_measure_func(node, Some(measure_func(|_, _, _| {}))).unwrap();
        tree.force_freshness(node, Freshness::Acknowledged);

        tree.set_measure_func(node, None).unwrap();
        assert!(!tree.is_measure_defined(node).unwrap());
        assert_eq!(tree.freshness(node).unwrap(), Freshness::Stale);
    }
}
