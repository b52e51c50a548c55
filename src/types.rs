//! Core types for flexcore.
//!
//! Style enumerations, the `UNDEFINED` sentinel, and the float comparison
//! every setter uses to decide whether a write is a real change.

// =============================================================================
// Undefined sentinel and float equality
// =============================================================================

/// Marker for a length that has not been set.
///
/// Stored as NaN. Never compare against it with `==`; use [`is_undefined`]
/// or [`floats_equal`].
pub const UNDEFINED: f32 = f32::NAN;

/// Tolerance below which two lengths are considered the same value.
pub const EPSILON: f32 = 0.00001;

/// Check whether a length is the `UNDEFINED` sentinel.
#[inline]
pub fn is_undefined(value: f32) -> bool {
    value.is_nan()
}

/// Compare two lengths the way the style setters do.
///
/// Two `UNDEFINED` values are equal to each other and to nothing else.
/// Defined values are equal when they differ by less than [`EPSILON`].
#[inline]
pub fn floats_equal(a: f32, b: f32) -> bool {
    if is_undefined(a) || is_undefined(b) {
        return is_undefined(a) && is_undefined(b);
    }
    (a - b).abs() < EPSILON
}

// =============================================================================
// Direction
// =============================================================================

/// Writing direction of a node.
///
/// `Inherit` takes the resolved direction of the parent. A root that
/// inherits resolves to `Ltr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Inherit,
    Ltr,
    Rtl,
}

impl Direction {
    /// Resolve `Inherit` against the parent's resolved direction.
    pub const fn resolve(self, parent: Direction) -> Direction {
        match self {
            Self::Inherit => match parent {
                Self::Rtl => Self::Rtl,
                _ => Self::Ltr,
            },
            other => other,
        }
    }
}

// =============================================================================
// Flex Enums
// =============================================================================

/// Flex direction for container layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlexDirection {
    #[default]
    Column,
    ColumnReverse,
    Row,
    RowReverse,
}

impl FlexDirection {
    /// Check if this is a row direction (Row or RowReverse).
    pub const fn is_row(&self) -> bool {
        matches!(self, Self::Row | Self::RowReverse)
    }

    /// Check if this is a reverse direction (ColumnReverse or RowReverse).
    pub const fn is_reverse(&self) -> bool {
        matches!(self, Self::ColumnReverse | Self::RowReverse)
    }

    /// Apply a resolved writing direction: rows flip under `Rtl`.
    pub const fn resolve(self, direction: Direction) -> FlexDirection {
        match (self, direction) {
            (Self::Row, Direction::Rtl) => Self::RowReverse,
            (Self::RowReverse, Direction::Rtl) => Self::Row,
            (other, _) => other,
        }
    }
}

/// Flex wrap behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlexWrap {
    #[default]
    NoWrap,
    Wrap,
}

/// Justify content (main axis alignment).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JustifyContent {
    #[default]
    FlexStart,
    Center,
    FlexEnd,
    SpaceBetween,
    SpaceAround,
}

/// Cross axis alignment, shared by `align-items` and `align-self`.
///
/// `Auto` only has meaning for `align-self`, where it defers to the
/// parent's `align-items`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Auto,
    FlexStart,
    Center,
    FlexEnd,
    Stretch,
}

/// Positioning scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PositionType {
    #[default]
    Relative,
    Absolute,
}
