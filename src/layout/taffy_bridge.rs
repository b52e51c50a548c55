//! Taffy Bridge - The layout pass behind [`LayoutTree::calculate_layout`].
//!
//! Mirrors the pass root's subtree into a throwaway Taffy tree, runs Taffy's
//! flexbox solver with our measure functions, and writes the geometry back
//! onto the nodes. All per-pass working state lives in [`PassState`], keyed
//! by node id, and is dropped when the pass ends.
//!
//! Freshness after a pass:
//! - stale nodes become `FreshlyComputed`;
//! - other nodes whose geometry moved become `FreshlyComputed` again;
//! - other nodes with identical geometry keep their state.

use std::collections::HashMap;

use log::{debug, trace, warn};
use taffy::style_helpers::{auto, length};
use taffy::{
    AlignContent as TaffyAlignContent, AlignItems as TaffyAlignItems, AvailableSpace, Dimension as TaffyDimension, Display,
    FlexDirection as TaffyFlexDirection, FlexWrap as TaffyFlexWrap, JustifyContent as TaffyJustifyContent,
    LengthPercentage, LengthPercentageAuto, NodeId as TaffyNodeId, Position as TaffyPosition, Rect, Size,
    Style as TaffyStyle, TaffyTree,
};

use crate::engine::{measure_node, Edge, Freshness, LayoutTree, NodeId, Spacing, Style};
use crate::error::NodeError;
use crate::types::{
    is_undefined, Align, Direction, FlexDirection, FlexWrap, JustifyContent, PositionType, EPSILON, UNDEFINED,
};

use super::types::{CachedLayout, ComputedLayout, LayoutConstraints, MeasureMode};

/// What a call to [`LayoutTree::calculate_layout`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutPass {
    /// The root was up to date for the same constraints; nothing ran.
    Skipped,
    /// The solver ran. `updated` nodes now hold a fresh layout.
    Computed { updated: usize },
}

// =============================================================================
// VALUE CONVERSION
// =============================================================================

fn to_taffy_dimension(value: f32) -> TaffyDimension {
    if is_undefined(value) { auto() } else { length(value) }
}

fn to_taffy_lpa(value: f32) -> LengthPercentageAuto {
    if is_undefined(value) { auto() } else { length(value) }
}

fn to_taffy_lp(value: f32) -> LengthPercentage {
    if is_undefined(value) { length(0.0) } else { length(value) }
}

fn to_taffy_flex_direction(dir: FlexDirection) -> TaffyFlexDirection {
    match dir {
        FlexDirection::Column => TaffyFlexDirection::Column,
        FlexDirection::ColumnReverse => TaffyFlexDirection::ColumnReverse,
        FlexDirection::Row => TaffyFlexDirection::Row,
        FlexDirection::RowReverse => TaffyFlexDirection::RowReverse,
    }
}

fn to_taffy_flex_wrap(wrap: FlexWrap) -> TaffyFlexWrap {
    match wrap {
        FlexWrap::NoWrap => TaffyFlexWrap::NoWrap,
        FlexWrap::Wrap => TaffyFlexWrap::Wrap,
    }
}

fn to_taffy_justify_content(justify: JustifyContent) -> Option<TaffyJustifyContent> {
    Some(match justify {
        JustifyContent::FlexStart => TaffyJustifyContent::FlexStart,
        JustifyContent::Center => TaffyJustifyContent::Center,
        JustifyContent::FlexEnd => TaffyJustifyContent::FlexEnd,
        JustifyContent::SpaceBetween => TaffyJustifyContent::SpaceBetween,
        JustifyContent::SpaceAround => TaffyJustifyContent::SpaceAround,
    })
}

/// `Auto` maps to `None`: for align-self it defers to the parent.
fn to_taffy_align(align: Align) -> Option<TaffyAlignItems> {
    match align {
        Align::Auto => None,
        Align::FlexStart => Some(TaffyAlignItems::FlexStart),
        Align::Center => Some(TaffyAlignItems::Center),
        Align::FlexEnd => Some(TaffyAlignItems::FlexEnd),
        Align::Stretch => Some(TaffyAlignItems::Stretch),
    }
}

fn to_taffy_position(position_type: PositionType) -> TaffyPosition {
    match position_type {
        PositionType::Relative => TaffyPosition::Relative,
        PositionType::Absolute => TaffyPosition::Absolute,
    }
}

/// Split the single `flex` factor into grow, shrink and basis.
fn flex_factors(flex: f32) -> (f32, f32, TaffyDimension) {
    if is_undefined(flex) || flex == 0.0 {
        (0.0, 0.0, auto())
    } else if flex > 0.0 {
        (flex, 1.0, length(0.0))
    } else {
        (0.0, -flex, auto())
    }
}

/// Physical edges of a spacing value. `Start`/`End`, when written, win over
/// the left/right edge they land on for the given direction.
fn physical_edges(spacing: &Spacing, direction: Direction) -> Rect<f32> {
    let (left_alias, right_alias) = match direction {
        Direction::Rtl => (Edge::End, Edge::Start),
        _ => (Edge::Start, Edge::End),
    };
    let resolve = |edge: Edge, alias: Edge| {
        let raw = spacing.get_raw(alias);
        let value = if is_undefined(raw) { spacing.get(edge) } else { raw };
        if is_undefined(value) { 0.0 } else { value }
    };
    let vertical = |edge: Edge| {
        let value = spacing.get(edge);
        if is_undefined(value) { 0.0 } else { value }
    };

    Rect {
        left: resolve(Edge::Left, left_alias),
        right: resolve(Edge::Right, right_alias),
        top: vertical(Edge::Top),
        bottom: vertical(Edge::Bottom),
    }
}

// =============================================================================
// STYLE BUILDING
// =============================================================================

/// Build a Taffy style for a node whose direction is already resolved.
fn build_style(style: &Style, direction: Direction) -> TaffyStyle {
    let (flex_grow, flex_shrink, flex_basis) = flex_factors(style.flex);
    let margin = physical_edges(&style.margin, direction);
    let padding = physical_edges(&style.padding, direction);
    let border = physical_edges(&style.border, direction);

    TaffyStyle {
        display: Display::Flex,
        position: to_taffy_position(style.position_type),

        // Flex container properties
        flex_direction: to_taffy_flex_direction(style.flex_direction.resolve(direction)),
        flex_wrap: to_taffy_flex_wrap(style.flex_wrap),
        justify_content: to_taffy_justify_content(style.justify_content),
        // Wrapped lines pack at the cross start
        align_content: Some(TaffyAlignContent::FlexStart),
        align_items: to_taffy_align(style.align_items),

        // Flex item properties
        flex_grow,
        flex_shrink,
        flex_basis,
        align_self: to_taffy_align(style.align_self),

        size: Size {
            width: to_taffy_dimension(style.width),
            height: to_taffy_dimension(style.height),
        },

        inset: Rect {
            top: to_taffy_lpa(style.position.top),
            right: to_taffy_lpa(style.position.right),
            bottom: to_taffy_lpa(style.position.bottom),
            left: to_taffy_lpa(style.position.left),
        },
        margin: Rect {
            top: to_taffy_lpa(margin.top),
            right: to_taffy_lpa(margin.right),
            bottom: to_taffy_lpa(margin.bottom),
            left: to_taffy_lpa(margin.left),
        },
        padding: Rect {
            top: to_taffy_lp(padding.top),
            right: to_taffy_lp(padding.right),
            bottom: to_taffy_lp(padding.bottom),
            left: to_taffy_lp(padding.left),
        },
        border: Rect {
            top: to_taffy_lp(border.top),
            right: to_taffy_lp(border.right),
            bottom: to_taffy_lp(border.bottom),
            left: to_taffy_lp(border.left),
        },

        ..Default::default()
    }
}

// =============================================================================
// MEASUREMENT
// =============================================================================

/// Map Taffy's sizing request onto a measure width and memo key.
fn measure_constraints(known: Size<Option<f32>>, available: Size<AvailableSpace>) -> LayoutConstraints {
    let axis = |known: Option<f32>, available: AvailableSpace| match (known, available) {
        (Some(value), _) => (value, MeasureMode::Exactly),
        (None, AvailableSpace::Definite(value)) => (value, MeasureMode::AtMost),
        (None, AvailableSpace::MinContent) => (0.0, MeasureMode::AtMost),
        (None, AvailableSpace::MaxContent) => (UNDEFINED, MeasureMode::Undefined),
    };
    let (available_width, width_mode) = axis(known.width, available.width);
    let (available_height, height_mode) = axis(known.height, available.height);

    LayoutConstraints {
        available_width,
        width_mode,
        available_height,
        height_mode,
    }
}

fn defined_or_zero(value: f32) -> f32 {
    if is_undefined(value) { 0.0 } else { value }
}

// =============================================================================
// PASS STATE
// =============================================================================

/// Working set of one layout pass, keyed by node identity.
#[derive(Default)]
struct PassState {
    /// Subtree in pre-order, root first.
    order: Vec<NodeId>,
    directions: HashMap<NodeId, Direction>,
    taffy_ids: HashMap<NodeId, TaffyNodeId>,
    measurements: HashMap<NodeId, CachedLayout>,
}

impl PassState {
    /// Walk the subtree, resolving each node's direction from its parent's.
    fn collect(tree: &LayoutTree, root: NodeId) -> Result<Self, NodeError> {
        let mut state = Self::default();
        let mut pending = vec![(root, Direction::Ltr)];

        while let Some((id, parent_direction)) = pending.pop() {
            let node = tree.get(id)?;
            let direction = node.style().direction.resolve(parent_direction);
            state.order.push(id);
            state.directions.insert(id, direction);
            pending.extend(node.children().iter().rev().map(|&child| (child, direction)));
        }
        Ok(state)
    }
}

/// Assign flex line numbers to the in-flow children of a wrapping container.
///
/// Within one line, main-axis positions advance monotonically; a child that
/// starts behind the previous child's end opens a new line.
fn assign_line_indices(
    tree: &LayoutTree,
    container: NodeId,
    direction: Direction,
    layouts: &HashMap<NodeId, ComputedLayout>,
    lines: &mut HashMap<NodeId, usize>,
) -> Result<(), NodeError> {
    let node = tree.get(container)?;
    let style = node.style();
    let flex_direction = style.flex_direction.resolve(direction);

    let mut line = 0;
    let mut previous: Option<(f32, f32)> = None;
    for &child in node.children() {
        if tree.get(child)?.style().position_type == PositionType::Absolute {
            continue;
        }
        let Some(layout) = layouts.get(&child) else { continue };

        let (start, size) = if flex_direction.is_row() {
            (layout.left, layout.width)
        } else {
            (layout.top, layout.height)
        };
        let end = start + defined_or_zero(size);

        if style.flex_wrap == FlexWrap::Wrap {
            if let Some((prev_start, prev_end)) = previous {
                let wrapped = if flex_direction.is_reverse() {
                    end > prev_start + EPSILON
                } else {
                    start < prev_end - EPSILON
                };
                if wrapped {
                    line += 1;
                }
            }
        }

        lines.insert(child, line);
        previous = Some((start, end));
    }
    Ok(())
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

impl LayoutTree {
    /// Lay out the subtree rooted at `root`.
    ///
    /// `UNDEFINED` for either dimension leaves that axis unconstrained.
    /// If `root` is not stale and its last layout came from a pass rooted
    /// at it under the same constraints, the pass is skipped and the
    /// existing geometry stands. On error no node is changed.
    pub fn calculate_layout(
        &mut self,
        root: NodeId,
        available_width: f32,
        available_height: f32,
    ) -> Result<LayoutPass, NodeError> {
        let constraints = LayoutConstraints::for_root(available_width, available_height);

        let node = self.node(root)?;
        if node.freshness() != Freshness::Stale
            && node
                .memoized()
                .is_some_and(|cached| cached.pass_root && cached.constraints.matches(&constraints))
        {
            debug!("layout cache hit for {root:?} at {available_width}x{available_height}");
            return Ok(LayoutPass::Skipped);
        }

        let previous_root = *node.layout();

        let mut state = PassState::collect(self, root)?;
        let (layouts, lines) = self.solve(root, &constraints, &mut state)?;
        self.node_mut(root)?.layout.reset_result();

        let mut updated = 0;
        for &id in &state.order {
            let Some(&layout) = layouts.get(&id) else { continue };
            let measured = state.measurements.get(&id).copied();
            let node = self.node_mut(id)?;

            let previous = if id == root { previous_root } else { node.layout };
            node.layout = layout;
            node.line_index = lines.get(&id).copied().unwrap_or(0);
            // Only this pass's measurement survives; a memo from an earlier
            // pass rooted here no longer describes this geometry.
            node.memoized = measured;

            let publish = match node.freshness {
                Freshness::Stale => true,
                _ if layout.same_as(&previous) => false,
                Freshness::FreshlyComputed => {
                    warn!("overwriting unacknowledged layout of {id:?}");
                    true
                }
                Freshness::Acknowledged => true,
            };
            if publish {
                trace!("new layout for {id:?}: {layout:?}");
                self.publish_layout(id)?;
                updated += 1;
            }
        }

        let root_node = self.node_mut(root)?;
        root_node.memoized = Some(CachedLayout {
            constraints,
            width: root_node.layout.width,
            height: root_node.layout.height,
            pass_root: true,
        });

        debug!(
            "laid out {} node(s) under {root:?}, {updated} updated",
            state.order.len()
        );
        Ok(LayoutPass::Computed { updated })
    }

    /// Run Taffy over the collected subtree and read back geometry.
    fn solve(
        &self,
        root: NodeId,
        constraints: &LayoutConstraints,
        state: &mut PassState,
    ) -> Result<(HashMap<NodeId, ComputedLayout>, HashMap<NodeId, usize>), NodeError> {
        let mut taffy: TaffyTree<NodeId> = TaffyTree::with_capacity(state.order.len());
        if !self.config.use_rounding {
            taffy.disable_rounding();
        }

        // First pass: one Taffy node per node, carrying our id as context
        for &id in &state.order {
            let direction = state.directions[&id];
            let style = build_style(self.get(id)?.style(), direction);
            let taffy_id = taffy.new_leaf_with_context(style, id)?;
            state.taffy_ids.insert(id, taffy_id);
        }

        // Second pass: parent-child relationships
        for &id in &state.order {
            let children: Vec<TaffyNodeId> = self
                .get(id)?
                .children()
                .iter()
                .filter_map(|child| state.taffy_ids.get(child).copied())
                .collect();
            if !children.is_empty() {
                taffy.set_children(state.taffy_ids[&id], &children)?;
            }
        }

        let available = Size {
            width: match constraints.width_mode {
                MeasureMode::Undefined => AvailableSpace::MaxContent,
                _ => AvailableSpace::Definite(constraints.available_width),
            },
            height: match constraints.height_mode {
                MeasureMode::Undefined => AvailableSpace::MaxContent,
                _ => AvailableSpace::Definite(constraints.available_height),
            },
        };

        let measurements = &mut state.measurements;
        let mut measure_error: Option<NodeError> = None;
        let mut measure_fn = |known: Size<Option<f32>>,
                              available_space: Size<AvailableSpace>,
                              _taffy_id: TaffyNodeId,
                              context: Option<&mut NodeId>,
                              _style: &TaffyStyle| {
            let Some(&mut id) = context else {
                return Size::ZERO;
            };
            let Ok(node) = self.get(id) else {
                return Size::ZERO;
            };
            if !node.is_measured_leaf() {
                return Size::ZERO;
            }

            let request = measure_constraints(known, available_space);
            let reusable = measurements.get(&id).copied().or_else(|| {
                (node.freshness() != Freshness::Stale)
                    .then(|| node.memoized().copied())
                    .flatten()
                    .filter(|cached| !cached.pass_root)
            });
            if let Some(cached) = reusable.filter(|cached| cached.constraints.matches(&request)) {
                trace!("reusing measurement of {id:?}");
                measurements.insert(id, cached);
                return Size {
                    width: known.width.unwrap_or(cached.width),
                    height: known.height.unwrap_or(cached.height),
                };
            }

            let output = match measure_node(node, request.available_width) {
                Ok(output) => output,
                Err(err) => {
                    measure_error.get_or_insert(err);
                    return Size::ZERO;
                }
            };
            let size = Size {
                width: known.width.unwrap_or(defined_or_zero(output.width)),
                height: known.height.unwrap_or(defined_or_zero(output.height)),
            };
            measurements.insert(
                id,
                CachedLayout {
                    constraints: request,
                    width: size.width,
                    height: size.height,
                    pass_root: false,
                },
            );
            size
        };

        taffy.compute_layout_with_measure(state.taffy_ids[&root], available, &mut measure_fn)?;
        if let Some(err) = measure_error {
            return Err(err);
        }

        // Extract results
        let mut layouts = HashMap::with_capacity(state.order.len());
        for &id in &state.order {
            let layout = taffy.layout(state.taffy_ids[&id])?;
            // The pass root's right and bottom are measured against its own box
            let (parent_width, parent_height) = match self.get(id)?.parent().filter(|_| id != root) {
                Some(parent) => {
                    let parent_layout = taffy.layout(state.taffy_ids[&parent])?;
                    (parent_layout.size.width, parent_layout.size.height)
                }
                None => (
                    layout.location.x + layout.size.width,
                    layout.location.y + layout.size.height,
                ),
            };

            layouts.insert(
                id,
                ComputedLayout {
                    top: layout.location.y,
                    left: layout.location.x,
                    bottom: parent_height - layout.location.y - layout.size.height,
                    right: parent_width - layout.location.x - layout.size.width,
                    width: layout.size.width,
                    height: layout.size.height,
                    direction: state.directions[&id],
                },
            );
        }

        let mut lines = HashMap::new();
        for &id in &state.order {
            if !self.get(id)?.children().is_empty() {
                assign_line_indices(self, id, state.directions[&id], &layouts, &mut lines)?;
            }
        }

        Ok((layouts, lines))
    }
}
