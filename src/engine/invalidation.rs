//! Invalidation Protocol - Staleness propagation and the freshness contract.
//!
//! Every mutation ends in [`LayoutTree::mark_stale`], which walks from the
//! mutated node toward the root flipping `Acknowledged` nodes to `Stale`.
//! The walk stops at the first node that is already stale, so repeated
//! mutations under the same ancestors cost one step each.
//!
//! A `FreshlyComputed` node on the path means the consumer never acknowledged
//! the last pass. That is reported as
//! [`NodeError::UnacknowledgedLayoutDiscarded`] before anything is changed.

use log::trace;

use crate::error::NodeError;

use super::node::{Freshness, NodeId};
use super::tree::LayoutTree;

impl LayoutTree {
    /// Check that invalidating `id` would not discard an unacknowledged result.
    pub(crate) fn ensure_can_invalidate(&self, id: NodeId) -> Result<(), NodeError> {
        for current in self.ancestors(id) {
            match self.node(current)?.freshness {
                Freshness::Stale => return Ok(()),
                Freshness::FreshlyComputed => return Err(NodeError::UnacknowledgedLayoutDiscarded),
                Freshness::Acknowledged => {}
            }
        }
        Ok(())
    }

    /// Mark `id` and its ancestors stale.
    ///
    /// Returns how many nodes changed state; `0` if `id` was already stale.
    /// Clears the memoized result of every node it flips.
    pub fn mark_stale(&mut self, id: NodeId) -> Result<usize, NodeError> {
        self.ensure_can_invalidate(id)?;

        let mut flipped = 0;
        let mut next = Some(id);
        while let Some(current) = next {
            let node = self.node_mut(current)?;
            if node.freshness == Freshness::Stale {
                break;
            }

            node.freshness = Freshness::Stale;
            node.memoized = None;
            next = node.parent;
            flipped += 1;
        }

        if flipped > 0 {
            trace!("marked {flipped} node(s) stale starting at {id:?}");
        }
        Ok(flipped)
    }

    /// Tell the node its new layout has been consumed.
    ///
    /// Must be called once for every layout the node receives before the
    /// node or its descendants may change again.
    pub fn acknowledge_layout(&mut self, id: NodeId) -> Result<(), NodeError> {
        let node = self.node_mut(id)?;
        if node.freshness != Freshness::FreshlyComputed {
            return Err(NodeError::NoNewLayoutToAcknowledge);
        }

        node.freshness = Freshness::Acknowledged;
        Ok(())
    }

    /// Whether the node holds a layout the consumer has not acknowledged.
    pub fn has_fresh_layout(&self, id: NodeId) -> Result<bool, NodeError> {
        Ok(self.node(id)?.freshness == Freshness::FreshlyComputed)
    }

    pub fn is_stale(&self, id: NodeId) -> Result<bool, NodeError> {
        Ok(self.node(id)?.freshness == Freshness::Stale)
    }

    /// Publish a newly written layout. Only the solver bridge calls this.
    pub(crate) fn publish_layout(&mut self, id: NodeId) -> Result<(), NodeError> {
        self.node_mut(id)?.freshness = Freshness::FreshlyComputed;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn force_freshness(&mut self, id: NodeId, freshness: Freshness) {
        if let Ok(node) = self.node_mut(id) {
            node.freshness = freshness;
        }
    }
}
