//! Style - Layout-affecting properties of a node.
//!
//! A node's style is only writable through the setters on
//! [`LayoutTree`](super::LayoutTree), which compare against the stored value
//! and invalidate on a real change. Hosts read it through
//! [`LayoutTree::style`](super::LayoutTree::style).

use crate::types::{Align, Direction, FlexDirection, FlexWrap, JustifyContent, PositionType, UNDEFINED};

use super::spacing::Spacing;

/// Explicit position offsets. `UNDEFINED` means "not set".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Offsets {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl Default for Offsets {
    fn default() -> Self {
        Self {
            top: UNDEFINED,
            bottom: UNDEFINED,
            left: UNDEFINED,
            right: UNDEFINED,
        }
    }
}

/// Layout style of a single node.
///
/// # Property Categories
///
/// - **Container**: direction, flex_direction, flex_wrap, justify_content, align_items
/// - **Item**: align_self, flex, position_type, position
/// - **Dimensions**: width, height
/// - **Spacing**: margin, padding, border
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    // =========================================================================
    // CONTAINER PROPERTIES
    // =========================================================================
    pub direction: Direction,
    pub flex_direction: FlexDirection,
    pub flex_wrap: FlexWrap,
    pub justify_content: JustifyContent,
    pub align_items: Align,

    // =========================================================================
    // ITEM PROPERTIES
    // =========================================================================
    pub align_self: Align,
    /// Positive grows, negative shrinks, zero is inflexible.
    pub flex: f32,
    pub position_type: PositionType,
    pub position: Offsets,

    // =========================================================================
    // DIMENSIONS
    // =========================================================================
    pub width: f32,
    pub height: f32,

    // =========================================================================
    // SPACING
    // =========================================================================
    pub margin: Spacing,
    pub padding: Spacing,
    pub border: Spacing,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            direction: Direction::Inherit,
            flex_direction: FlexDirection::Column,
            flex_wrap: FlexWrap::NoWrap,
            justify_content: JustifyContent::FlexStart,
            align_items: Align::Stretch,

            align_self: Align::Auto,
            flex: 0.0,
            position_type: PositionType::Relative,
            position: Offsets::default(),

            width: UNDEFINED,
            height: UNDEFINED,

            margin: Spacing::new(),
            padding: Spacing::new(),
            border: Spacing::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::spacing::Edge;
    use crate::types::is_undefined;

    #[test]
    fn test_style_defaults() {
        let style = Style::default();
        assert_eq!(style.flex_direction, FlexDirection::Column);
        assert_eq!(style.align_items, Align::Stretch);
        assert_eq!(style.align_self, Align::Auto);
        assert!(is_undefined(style.width));
        assert!(is_undefined(style.position.left));
        assert_eq!(style.padding.get(Edge::Top), 0.0);
    }
}
