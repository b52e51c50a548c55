//! Layout Module
//!
//! Flexbox layout computation for a [`LayoutTree`](crate::engine::LayoutTree)
//! using [Taffy](https://github.com/DioxusLabs/taffy).
//!
//! # Architecture
//!
//! The node core never depends on the solver. A layout pass:
//!
//! 1. Converts node styles → Taffy styles, resolving writing direction
//! 2. Builds a Taffy tree mirroring the subtree under the pass root
//! 3. Calls node measure functions for leaf intrinsic sizing
//! 4. Writes geometry back and publishes it through the freshness protocol
//!
//! # Example
//!
//! ```ignore
//! use flexcore::{LayoutTree, UNDEFINED};
//!
//! let mut tree = LayoutTree::new();
//! let root = tree.new_node();
//! tree.calculate_layout(root, 80.0, UNDEFINED)?;
//! tree.acknowledge_layout(root)?;
//! ```

mod taffy_bridge;
mod text_measure;
mod types;

pub use taffy_bridge::LayoutPass;
pub use text_measure::*;
pub use types::*;
