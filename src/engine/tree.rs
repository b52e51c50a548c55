//! LayoutTree - Arena that owns every node.
//!
//! Nodes live in slots addressed by [`NodeId`]. Freed slots go on a free list
//! for reuse and bump their generation, so a handle to a freed node is
//! rejected with [`NodeError::InvalidNode`] instead of aliasing a new node.
//!
//! Ownership flows parent → child through the `children` lists. The `parent`
//! field is a lookup key used for upward walks only.

use log::trace;

use crate::config::LayoutConfig;
use crate::error::NodeError;
use crate::layout::ComputedLayout;
use crate::types::{floats_equal, Align, Direction, FlexDirection, FlexWrap, JustifyContent, PositionType};

use super::node::{Freshness, LayoutNode, NodeId};
use super::spacing::{Edge, Spacing};
use super::style::Style;

struct Slot {
    generation: u32,
    node: Option<LayoutNode>,
}

/// Owner of a forest of layout nodes.
pub struct LayoutTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    pub(crate) config: LayoutConfig,
}

impl Default for LayoutTree {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutTree {
    pub fn new() -> Self {
        Self::with_config(LayoutConfig::default())
    }

    pub fn with_config(config: LayoutConfig) -> Self {
        Self {
            slots: Vec::with_capacity(config.node_capacity),
            free: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    // =========================================================================
    // Node allocation
    // =========================================================================

    /// Create a detached, stale node with default style.
    pub fn new_node(&mut self) -> NodeId {
        let node = LayoutNode::new();

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            return NodeId {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        NodeId { index, generation: 0 }
    }

    /// Destroy a node and its whole subtree.
    ///
    /// An attached node is detached from its parent first, which invalidates
    /// the parent like [`remove_child_at`](Self::remove_child_at).
    pub fn remove(&mut self, id: NodeId) -> Result<(), NodeError> {
        if let Some(parent) = self.node(id)?.parent {
            let index = self
                .index_of(parent, id)?
                .ok_or(NodeError::InvalidNode)?;
            self.remove_child_at(parent, index)?;
        }

        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            let slot = &mut self.slots[current.index as usize];
            if let Some(node) = slot.node.take() {
                pending.extend(node.children);
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(current.index);
            }
        }
        Ok(())
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up a live node.
    pub fn get(&self, id: NodeId) -> Result<&LayoutNode, NodeError> {
        self.node(id)
    }

    pub(crate) fn node(&self, id: NodeId) -> Result<&LayoutNode, NodeError> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
            .ok_or(NodeError::InvalidNode)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut LayoutNode, NodeError> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
            .ok_or(NodeError::InvalidNode)
    }

    // =========================================================================
    // Tree structure
    // =========================================================================

    pub fn child_count(&self, id: NodeId) -> Result<usize, NodeError> {
        Ok(self.node(id)?.children.len())
    }

    pub fn child_at(&self, id: NodeId, index: usize) -> Result<NodeId, NodeError> {
        let children = &self.node(id)?.children;
        children.get(index).copied().ok_or(NodeError::IndexOutOfRange {
            index,
            len: children.len(),
        })
    }

    pub fn children(&self, id: NodeId) -> Result<&[NodeId], NodeError> {
        Ok(&self.node(id)?.children)
    }

    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>, NodeError> {
        Ok(self.node(id)?.parent)
    }

    /// Position of `child` among `id`'s children, if it is one.
    pub fn index_of(&self, id: NodeId, child: NodeId) -> Result<Option<usize>, NodeError> {
        Ok(self.node(id)?.children.iter().position(|&c| c == child))
    }

    /// Attach a detached node as the `index`-th child of `parent`.
    ///
    /// Later children shift right. The parent and its ancestors become stale.
    pub fn insert_child(&mut self, parent: NodeId, child: NodeId, index: usize) -> Result<(), NodeError> {
        if self.node(child)?.parent.is_some() {
            return Err(NodeError::AlreadyParented);
        }

        let len = self.node(parent)?.children.len();
        if index > len {
            return Err(NodeError::IndexOutOfRange { index, len });
        }

        if self.ancestors(parent).any(|ancestor| ancestor == child) {
            return Err(NodeError::WouldCreateCycle);
        }

        self.ensure_can_invalidate(parent)?;

        self.node_mut(parent)?.children.insert(index, child);
        self.node_mut(child)?.parent = Some(parent);
        trace!("attached {child:?} to {parent:?} at {index}");

        self.mark_stale(parent)?;
        Ok(())
    }

    /// Detach and return the `index`-th child of `parent`.
    ///
    /// The parent and its ancestors become stale. The detached child keeps
    /// its own state and subtree.
    pub fn remove_child_at(&mut self, parent: NodeId, index: usize) -> Result<NodeId, NodeError> {
        let len = self.node(parent)?.children.len();
        if index >= len {
            return Err(NodeError::IndexOutOfRange { index, len });
        }

        self.ensure_can_invalidate(parent)?;

        let child = self.node_mut(parent)?.children.remove(index);
        self.node_mut(child)?.parent = None;
        trace!("detached {child:?} from {parent:?} at {index}");

        self.mark_stale(parent)?;
        Ok(child)
    }

    /// `id` followed by each of its ancestors up to the root.
    pub(crate) fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(id), move |&current| {
            self.node(current).ok().and_then(|node| node.parent)
        })
    }

    // =========================================================================
    // Style setters
    // =========================================================================

    pub fn style(&self, id: NodeId) -> Result<&Style, NodeError> {
        Ok(&self.node(id)?.style)
    }

    /// Store `value` through `field` unless it equals the current value,
    /// invalidating on a real change.
    fn update_style<T: Copy>(
        &mut self,
        id: NodeId,
        value: T,
        field: fn(&mut Style) -> &mut T,
        equal: fn(&T, &T) -> bool,
    ) -> Result<(), NodeError> {
        if equal(field(&mut self.node_mut(id)?.style), &value) {
            return Ok(());
        }

        self.ensure_can_invalidate(id)?;
        *field(&mut self.node_mut(id)?.style) = value;
        self.mark_stale(id)?;
        Ok(())
    }

    fn update_enum<T: Copy + PartialEq>(
        &mut self,
        id: NodeId,
        value: T,
        field: fn(&mut Style) -> &mut T,
    ) -> Result<(), NodeError> {
        self.update_style(id, value, field, |a, b| a == b)
    }

    fn update_length(&mut self, id: NodeId, value: f32, field: fn(&mut Style) -> &mut f32) -> Result<(), NodeError> {
        self.update_style(id, value, field, |a, b| floats_equal(*a, *b))
    }

    fn update_spacing(
        &mut self,
        id: NodeId,
        edge: Edge,
        value: f32,
        field: fn(&mut Style) -> &mut Spacing,
    ) -> Result<(), NodeError> {
        if floats_equal(field(&mut self.node_mut(id)?.style).get_raw(edge), value) {
            return Ok(());
        }

        self.ensure_can_invalidate(id)?;
        field(&mut self.node_mut(id)?.style).set(edge, value);
        self.mark_stale(id)?;
        Ok(())
    }

    pub fn set_direction(&mut self, id: NodeId, direction: Direction) -> Result<(), NodeError> {
        self.update_enum(id, direction, |s| &mut s.direction)
    }

    pub fn set_flex_direction(&mut self, id: NodeId, flex_direction: FlexDirection) -> Result<(), NodeError> {
        self.update_enum(id, flex_direction, |s| &mut s.flex_direction)
    }

    pub fn set_justify_content(&mut self, id: NodeId, justify_content: JustifyContent) -> Result<(), NodeError> {
        self.update_enum(id, justify_content, |s| &mut s.justify_content)
    }

    pub fn set_align_items(&mut self, id: NodeId, align_items: Align) -> Result<(), NodeError> {
        self.update_enum(id, align_items, |s| &mut s.align_items)
    }

    pub fn set_align_self(&mut self, id: NodeId, align_self: Align) -> Result<(), NodeError> {
        self.update_enum(id, align_self, |s| &mut s.align_self)
    }

    pub fn set_position_type(&mut self, id: NodeId, position_type: PositionType) -> Result<(), NodeError> {
        self.update_enum(id, position_type, |s| &mut s.position_type)
    }

    pub fn set_wrap(&mut self, id: NodeId, flex_wrap: FlexWrap) -> Result<(), NodeError> {
        self.update_enum(id, flex_wrap, |s| &mut s.flex_wrap)
    }

    pub fn set_flex(&mut self, id: NodeId, flex: f32) -> Result<(), NodeError> {
        self.update_length(id, flex, |s| &mut s.flex)
    }

    pub fn set_margin(&mut self, id: NodeId, edge: Edge, margin: f32) -> Result<(), NodeError> {
        self.update_spacing(id, edge, margin, |s| &mut s.margin)
    }

    pub fn set_padding(&mut self, id: NodeId, edge: Edge, padding: f32) -> Result<(), NodeError> {
        self.update_spacing(id, edge, padding, |s| &mut s.padding)
    }

    pub fn set_border(&mut self, id: NodeId, edge: Edge, border: f32) -> Result<(), NodeError> {
        self.update_spacing(id, edge, border, |s| &mut s.border)
    }

    /// Set the padding used for `edge` when no explicit padding covers it.
    pub fn set_default_padding(&mut self, id: NodeId, edge: Edge, padding: f32) -> Result<(), NodeError> {
        if floats_equal(self.node(id)?.style.padding.get_default(edge), padding) {
            return Ok(());
        }

        self.ensure_can_invalidate(id)?;
        self.node_mut(id)?.style.padding.set_default(edge, padding);
        self.mark_stale(id)?;
        Ok(())
    }

    pub fn set_position_top(&mut self, id: NodeId, top: f32) -> Result<(), NodeError> {
        self.update_length(id, top, |s| &mut s.position.top)
    }

    pub fn set_position_bottom(&mut self, id: NodeId, bottom: f32) -> Result<(), NodeError> {
        self.update_length(id, bottom, |s| &mut s.position.bottom)
    }

    pub fn set_position_left(&mut self, id: NodeId, left: f32) -> Result<(), NodeError> {
        self.update_length(id, left, |s| &mut s.position.left)
    }

    pub fn set_position_right(&mut self, id: NodeId, right: f32) -> Result<(), NodeError> {
        self.update_length(id, right, |s| &mut s.position.right)
    }

    pub fn set_style_width(&mut self, id: NodeId, width: f32) -> Result<(), NodeError> {
        self.update_length(id, width, |s| &mut s.width)
    }

    pub fn set_style_height(&mut self, id: NodeId, height: f32) -> Result<(), NodeError> {
        self.update_length(id, height, |s| &mut s.height)
    }

    // =========================================================================
    // Style getters
    // =========================================================================

    pub fn style_width(&self, id: NodeId) -> Result<f32, NodeError> {
        Ok(self.node(id)?.style.width)
    }

    pub fn style_height(&self, id: NodeId) -> Result<f32, NodeError> {
        Ok(self.node(id)?.style.height)
    }

    pub fn style_direction(&self, id: NodeId) -> Result<Direction, NodeError> {
        Ok(self.node(id)?.style.direction)
    }

    /// Padding as defined by style plus default padding.
    pub fn style_padding(&self, id: NodeId) -> Result<&Spacing, NodeError> {
        Ok(&self.node(id)?.style.padding)
    }

    // =========================================================================
    // Layout results
    // =========================================================================

    pub fn layout(&self, id: NodeId) -> Result<&ComputedLayout, NodeError> {
        Ok(&self.node(id)?.layout)
    }

    pub fn layout_x(&self, id: NodeId) -> Result<f32, NodeError> {
        Ok(self.node(id)?.layout.left)
    }

    pub fn layout_y(&self, id: NodeId) -> Result<f32, NodeError> {
        Ok(self.node(id)?.layout.top)
    }

    pub fn layout_width(&self, id: NodeId) -> Result<f32, NodeError> {
        Ok(self.node(id)?.layout.width)
    }

    pub fn layout_height(&self, id: NodeId) -> Result<f32, NodeError> {
        Ok(self.node(id)?.layout.height)
    }

    pub fn layout_direction(&self, id: NodeId) -> Result<Direction, NodeError> {
        Ok(self.node(id)?.layout.direction)
    }

    pub fn line_index(&self, id: NodeId) -> Result<usize, NodeError> {
        Ok(self.node(id)?.line_index)
    }

    pub fn freshness(&self, id: NodeId) -> Result<Freshness, NodeError> {
        Ok(self.node(id)?.freshness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UNDEFINED;

    fn acknowledged(tree: &mut LayoutTree, ids: &[NodeId]) {
        for &id in ids {
            tree.force_freshness(id, Freshness::Acknowledged);
        }
    }

    #[test]
    fn test_new_node_is_detached_and_stale() {
        let mut tree = LayoutTree::new();
        let node = tree.new_node();
        assert_eq!(tree.freshness(node).unwrap(), Freshness::Stale);
        assert_eq!(tree.parent(node).unwrap(), None);
        assert_eq!(tree.child_count(node).unwrap(), 0);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_insert_keeps_order() {
        let mut tree = LayoutTree::new();
        let root = tree.new_node();
        let a = tree.new_node();
        let b = tree.new_node();
        let c = tree.new_node();

        tree.insert_child(root, a, 0).unwrap();
        tree.insert_child(root, c, 1).unwrap();
        tree.insert_child(root, b, 1).unwrap();

        assert_eq!(tree.children(root).unwrap(), &[a, b, c]);
        assert_eq!(tree.child_at(root, 2).unwrap(), c);
        assert_eq!(tree.parent(b).unwrap(), Some(root));
        assert_eq!(tree.index_of(root, c).unwrap(), Some(2));
    }

    #[test]
    fn test_child_at_out_of_range() {
        let mut tree = LayoutTree::new();
        let root = tree.new_node();
        assert!(matches!(
            tree.child_at(root, 0),
            Err(NodeError::IndexOutOfRange { index: 0, len: 0 })
        ));
    }

    #[test]
    fn test_insert_past_end_fails() {
        let mut tree = LayoutTree::new();
        let root = tree.new_node();
        let child = tree.new_node();
        assert!(matches!(
            tree.insert_child(root, child, 1),
            Err(NodeError::IndexOutOfRange { index: 1, len: 0 })
        ));
        assert_eq!(tree.parent(child).unwrap(), None);
    }

    #[test]
    fn test_already_parented_leaves_linkage_intact() {
        let mut tree = LayoutTree::new();
        let first = tree.new_node();
        let second = tree.new_node();
        let child = tree.new_node();

        tree.insert_child(first, child, 0).unwrap();
        acknowledged(&mut tree, &[first, second, child]);

        assert!(matches!(tree.insert_child(second, child, 0), Err(NodeError::AlreadyParented)));
        assert_eq!(tree.parent(child).unwrap(), Some(first));
        assert_eq!(tree.children(first).unwrap(), &[child]);
        assert_eq!(tree.child_count(second).unwrap(), 0);
        assert_eq!(tree.freshness(second).unwrap(), Freshness::Acknowledged);
    }

    #[test]
    fn test_insert_rejects_cycle() {
        let mut tree = LayoutTree::new();
        let root = tree.new_node();
        let child = tree.new_node();
        tree.insert_child(root, child, 0).unwrap();

        assert!(matches!(tree.insert_child(child, root, 0), Err(NodeError::WouldCreateCycle)));
        assert!(matches!(tree.insert_child(root, root, 0), Err(NodeError::WouldCreateCycle)));
    }

    #[test]
    fn test_insert_marks_ancestors_stale() {
        let mut tree = LayoutTree::new();
        let root = tree.new_node();
        let mid = tree.new_node();
        tree.insert_child(root, mid, 0).unwrap();
        acknowledged(&mut tree, &[root, mid]);

        let leaf = tree.new_node();
        acknowledged(&mut tree, &[leaf]);
        tree.insert_child(mid, leaf, 0).unwrap();

        assert_eq!(tree.freshness(mid).unwrap(), Freshness::Stale);
        assert_eq!(tree.freshness(root).unwrap(), Freshness::Stale);
        assert_eq!(tree.freshness(leaf).unwrap(), Freshness::Acknowledged);
    }

    #[test]
    fn test_remove_child_detaches() {
        let mut tree = LayoutTree::new();
        let parent = tree.new_node();
        let child = tree.new_node();
        tree.insert_child(parent, child, 0).unwrap();
        acknowledged(&mut tree, &[parent, child]);

        let removed = tree.remove_child_at(parent, 0).unwrap();
        assert_eq!(removed, child);
        assert_eq!(tree.parent(child).unwrap(), None);
        assert_eq!(tree.child_count(parent).unwrap(), 0);
        assert_eq!(tree.freshness(parent).unwrap(), Freshness::Stale);
        assert_eq!(tree.freshness(child).unwrap(), Freshness::Acknowledged);

        assert!(matches!(
            tree.remove_child_at(parent, 0),
            Err(NodeError::IndexOutOfRange { index: 0, len: 0 })
        ));
    }

    #[test]
    fn test_remove_frees_subtree_and_invalidates_handles() {
        let mut tree = LayoutTree::new();
        let root = tree.new_node();
        let child = tree.new_node();
        let grandchild = tree.new_node();
        tree.insert_child(root, child, 0).unwrap();
        tree.insert_child(child, grandchild, 0).unwrap();

        tree.remove(child).unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.child_count(root).unwrap(), 0);
        assert!(matches!(tree.get(child), Err(NodeError::InvalidNode)));
        assert!(matches!(tree.get(grandchild), Err(NodeError::InvalidNode)));

        let reused = tree.new_node();
        assert_ne!(reused, child);
        assert_ne!(reused, grandchild);
        assert!(matches!(tree.get(child), Err(NodeError::InvalidNode)));
    }

    #[test]
    fn test_equal_style_value_is_noop() {
        let mut tree = LayoutTree::new();
        let node = tree.new_node();
        tree.set_style_width(node, 100.0).unwrap();
        tree.set_margin(node, Edge::Left, 4.0).unwrap();
        tree.set_justify_content(node, JustifyContent::Center).unwrap();
        acknowledged(&mut tree, &[node]);

        tree.set_style_width(node, 100.000_001).unwrap();
        tree.set_margin(node, Edge::Left, 4.0).unwrap();
        tree.set_justify_content(node, JustifyContent::Center).unwrap();
        tree.set_style_height(node, UNDEFINED).unwrap();
        assert_eq!(tree.freshness(node).unwrap(), Freshness::Acknowledged);
    }

    #[test]
    fn test_every_setter_invalidates_on_change() {
        let mut tree = LayoutTree::new();
        let node = tree.new_node();

        let setters: Vec<fn(&mut LayoutTree, NodeId) -> Result<(), NodeError>> = vec![
            |t: &mut LayoutTree, n: NodeId| t.set_direction(n, Direction::Rtl),
            |t: &mut LayoutTree, n: NodeId| t.set_flex_direction(n, FlexDirection::Row),
            |t: &mut LayoutTree, n: NodeId| t.set_justify_content(n, JustifyContent::SpaceAround),
            |t: &mut LayoutTree, n: NodeId| t.set_align_items(n, Align::Center),
            |t: &mut LayoutTree, n: NodeId| t.set_align_self(n, Align::FlexEnd),
            |t: &mut LayoutTree, n: NodeId| t.set_position_type(n, PositionType::Absolute),
            |t: &mut LayoutTree, n: NodeId| t.set_wrap(n, FlexWrap::Wrap),
            |t: &mut LayoutTree, n: NodeId| t.set_flex(n, 1.0),
            |t: &mut LayoutTree, n: NodeId| t.set_margin(n, Edge::Top, 2.0),
            |t: &mut LayoutTree, n: NodeId| t.set_padding(n, Edge::All, 3.0),
            |t: &mut LayoutTree, n: NodeId| t.set_border(n, Edge::Bottom, 1.0),
            |t: &mut LayoutTree, n: NodeId| t.set_default_padding(n, Edge::Left, 5.0),
            |t: &mut LayoutTree, n: NodeId| t.set_position_top(n, 1.0),
            |t: &mut LayoutTree, n: NodeId| t.set_position_bottom(n, 1.0),
            |t: &mut LayoutTree, n: NodeId| t.set_position_left(n, 1.0),
            |t: &mut LayoutTree, n: NodeId| t.set_position_right(n, 1.0),
            |t: &mut LayoutTree, n: NodeId| t.set_style_width(n, 10.0),
            |t: &mut LayoutTree, n: NodeId| t.set_style_height(n, 10.0),
        ];

        for setter in setters {
            tree.force_freshness(node, Freshness::Acknowledged);
            setter(&mut tree, node).unwrap();
            assert_eq!(tree.freshness(node).unwrap(), Freshness::Stale);
        }

        let style = tree.style(node).unwrap();
        assert_eq!(style.flex_wrap, FlexWrap::Wrap);
        assert_eq!(style.padding.get(Edge::Right), 3.0);
        assert_eq!(tree.style_width(node).unwrap(), 10.0);
        assert_eq!(tree.style_direction(node).unwrap(), Direction::Rtl);
        assert_eq!(tree.style_padding(node).unwrap().get(Edge::Left), 3.0);
    }

    #[test]
    fn test_failed_setter_does_not_store_value() {
        let mut tree = LayoutTree::new();
        let node = tree.new_node();
        tree.force_freshness(node, Freshness::FreshlyComputed);

        assert!(matches!(
            tree.set_style_width(node, 50.0),
            Err(NodeError::UnacknowledgedLayoutDiscarded)
        ));
        assert!(crate::types::is_undefined(tree.style_height(node).unwrap()));
        assert!(crate::types::is_undefined(tree.style_width(node).unwrap()));
        assert_eq!(tree.freshness(node).unwrap(), Freshness::FreshlyComputed);
    }
}
