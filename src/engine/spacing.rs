//! Spacing - Margin, padding and border storage with edge aliases.
//!
//! A spacing value holds nine slots. Four are physical edges, two are axis
//! aliases (`Vertical`, `Horizontal`), two are direction-relative edges
//! (`Start`, `End`) and one covers every edge (`All`). Reading an edge falls
//! back through the aliases that cover it.

use bitflags::bitflags;

use crate::types::{floats_equal, is_undefined, UNDEFINED};

/// Which spacing slot a setter or getter addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Left,
    Top,
    Right,
    Bottom,
    Vertical,
    Horizontal,
    Start,
    End,
    All,
}

impl Edge {
    const COUNT: usize = 9;

    const fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Top => 1,
            Self::Right => 2,
            Self::Bottom => 3,
            Self::Vertical => 4,
            Self::Horizontal => 5,
            Self::Start => 6,
            Self::End => 7,
            Self::All => 8,
        }
    }

    const fn flag(self) -> EdgeFlags {
        match self {
            Self::Left => EdgeFlags::LEFT,
            Self::Top => EdgeFlags::TOP,
            Self::Right => EdgeFlags::RIGHT,
            Self::Bottom => EdgeFlags::BOTTOM,
            Self::Vertical => EdgeFlags::VERTICAL,
            Self::Horizontal => EdgeFlags::HORIZONTAL,
            Self::Start => EdgeFlags::START,
            Self::End => EdgeFlags::END,
            Self::All => EdgeFlags::ALL,
        }
    }

    /// The axis alias an edge falls back to before `All`.
    const fn axis_alias(self) -> Edge {
        match self {
            Self::Top | Self::Bottom => Self::Vertical,
            _ => Self::Horizontal,
        }
    }
}

bitflags! {
    /// Slots that currently hold a defined value.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    struct EdgeFlags: u16 {
        const LEFT       = 1 << 0;
        const TOP        = 1 << 1;
        const RIGHT      = 1 << 2;
        const BOTTOM     = 1 << 3;
        const VERTICAL   = 1 << 4;
        const HORIZONTAL = 1 << 5;
        const START      = 1 << 6;
        const END        = 1 << 7;
        const ALL        = 1 << 8;

        const ALIASES = Self::VERTICAL.bits() | Self::HORIZONTAL.bits() | Self::ALL.bits();
    }
}

/// Spacing for the nine edge slots plus a table of per-slot defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Spacing {
    values: [f32; Edge::COUNT],
    defaults: [f32; Edge::COUNT],
    defined: EdgeFlags,
}

impl Default for Spacing {
    fn default() -> Self {
        Self::new()
    }
}

impl Spacing {
    pub fn new() -> Self {
        let mut defaults = [0.0; Edge::COUNT];
        defaults[Edge::Start.index()] = UNDEFINED;
        defaults[Edge::End.index()] = UNDEFINED;

        Self {
            values: [UNDEFINED; Edge::COUNT],
            defaults,
            defined: EdgeFlags::empty(),
        }
    }

    /// Set a slot. Returns `true` if the stored value changed.
    ///
    /// Writing `UNDEFINED` clears the slot so reads fall back to aliases
    /// and defaults again.
    pub fn set(&mut self, edge: Edge, value: f32) -> bool {
        let slot = &mut self.values[edge.index()];
        if floats_equal(*slot, value) {
            return false;
        }

        *slot = value;
        self.defined.set(edge.flag(), !is_undefined(value));
        true
    }

    /// Set the fallback used when neither the slot nor an alias is defined.
    /// Returns `true` if the default changed.
    pub fn set_default(&mut self, edge: Edge, value: f32) -> bool {
        let slot = &mut self.defaults[edge.index()];
        if floats_equal(*slot, value) {
            return false;
        }

        *slot = value;
        true
    }

    /// Resolved value for an edge after alias and default fallback.
    pub fn get(&self, edge: Edge) -> f32 {
        let default = self.defaults[edge.index()];
        if self.defined.is_empty() {
            return default;
        }

        if self.defined.contains(edge.flag()) {
            return self.values[edge.index()];
        }

        if self.defined.intersects(EdgeFlags::ALIASES) {
            let alias = edge.axis_alias();
            if self.defined.contains(alias.flag()) {
                return self.values[alias.index()];
            }
            if self.defined.contains(EdgeFlags::ALL) {
                return self.values[Edge::All.index()];
            }
        }

        default
    }

    /// The fallback for an edge, ignoring any written slot.
    pub fn get_default(&self, edge: Edge) -> f32 {
        self.defaults[edge.index()]
    }

    /// The slot exactly as written, without any fallback.
    pub fn get_raw(&self, edge: Edge) -> f32 {
        self.values[edge.index()]
    }
}
