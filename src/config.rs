/// Tuning knobs for a [`LayoutTree`](crate::LayoutTree).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutConfig {
    /// Round computed geometry to whole units in the solver.
    ///
    /// Off by default so results keep the fractional values the style
    /// produces. Terminal and pixel-grid hosts usually want it on.
    pub use_rounding: bool,
    /// Initial slot capacity of the node arena.
    ///
    /// Defaults to `16`.
    pub node_capacity: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            use_rounding: false,
            node_capacity: 16,
        }
    }
}
