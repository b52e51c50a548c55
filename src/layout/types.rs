//! Layout result types shared by the node core and the solver bridge.

use crate::types::{floats_equal, is_undefined, Direction, UNDEFINED};

/// How an available dimension constrains the measured size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MeasureMode {
    /// No constraint: size to content.
    #[default]
    Undefined,
    /// The dimension is fixed to the given value.
    Exactly,
    /// The dimension may not exceed the given value.
    AtMost,
}

/// The input constraints a layout or measurement was produced under.
#[derive(Debug, Clone, Copy)]
pub struct LayoutConstraints {
    pub available_width: f32,
    pub width_mode: MeasureMode,
    pub available_height: f32,
    pub height_mode: MeasureMode,
}

impl LayoutConstraints {
    /// Constraints for a layout pass root: defined dimensions are exact,
    /// `UNDEFINED` ones are unconstrained.
    pub fn for_root(available_width: f32, available_height: f32) -> Self {
        let mode = |value: f32| {
            if is_undefined(value) {
                MeasureMode::Undefined
            } else {
                MeasureMode::Exactly
            }
        };

        Self {
            available_width,
            width_mode: mode(available_width),
            available_height,
            height_mode: mode(available_height),
        }
    }

    /// Same modes and tolerance-equal dimensions.
    pub fn matches(&self, other: &LayoutConstraints) -> bool {
        self.width_mode == other.width_mode
            && self.height_mode == other.height_mode
            && floats_equal(self.available_width, other.available_width)
            && floats_equal(self.available_height, other.available_height)
    }
}

/// A memoized size together with the constraints that produced it.
#[derive(Debug, Clone, Copy)]
pub struct CachedLayout {
    pub constraints: LayoutConstraints,
    pub width: f32,
    pub height: f32,
    /// Set when the node was the root of the pass that produced this entry.
    /// Cleared entries come from the node's measure function.
    pub pass_root: bool,
}

/// Geometry written by the last layout pass.
///
/// Positions are relative to the parent's border box.
#[derive(Debug, Clone, Copy)]
pub struct ComputedLayout {
    pub top: f32,
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
    pub width: f32,
    pub height: f32,
    pub direction: Direction,
}

impl Default for ComputedLayout {
    fn default() -> Self {
        Self {
            top: 0.0,
            left: 0.0,
            bottom: 0.0,
            right: 0.0,
            width: UNDEFINED,
            height: UNDEFINED,
            direction: Direction::Ltr,
        }
    }
}

impl ComputedLayout {
    /// Forget the previous result before a new pass.
    pub fn reset_result(&mut self) {
        *self = Self::default();
    }

    /// Tolerance-equal box and identical direction.
    ///
    /// `bottom` and `right` follow from the parent's size and are ignored.
    pub fn same_as(&self, other: &ComputedLayout) -> bool {
        self.direction == other.direction
            && floats_equal(self.top, other.top)
            && floats_equal(self.left, other.left)
            && floats_equal(self.width, other.width)
            && floats_equal(self.height, other.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_constraints_modes() {
        let c = LayoutConstraints::for_root(200.0, UNDEFINED);
        assert_eq!(c.width_mode, MeasureMode::Exactly);
        assert_eq!(c.height_mode, MeasureMode::Undefined);
    }

    #[test]
    fn test_constraints_match_with_undefined() {
        let a = LayoutConstraints::for_root(200.0, UNDEFINED);
        assert!(a.matches(&LayoutConstraints::for_root(200.0, UNDEFINED)));
        assert!(!a.matches(&LayoutConstraints::for_root(201.0, UNDEFINED)));
        assert!(!a.matches(&LayoutConstraints::for_root(200.0, 50.0)));
    }

    #[test]
    fn test_reset_result() {
        let mut layout = ComputedLayout {
            top: 3.0,
            left: 4.0,
            bottom: 1.0,
            right: 2.0,
            width: 10.0,
            height: 20.0,
            direction: Direction::Rtl,
        };
        layout.reset_result();
        assert_eq!(layout.top, 0.0);
        assert!(is_undefined(layout.width));
        assert_eq!(layout.direction, Direction::Ltr);
        assert!(layout.same_as(&ComputedLayout::default()));
    }

    #[test]
    fn test_same_as_ignores_trailing_edges() {
        let a = ComputedLayout { width: 10.0, height: 5.0, ..Default::default() };
        let b = ComputedLayout { right: 7.0, bottom: 3.0, ..a };
        assert!(a.same_as(&b));
        assert!(!a.same_as(&ComputedLayout { left: 1.0, ..a }));
    }
}
