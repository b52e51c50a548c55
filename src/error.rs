use thiserror::Error;

/// Contract violations reported by tree, freshness and measurement operations.
///
/// None of these are recovered from inside the crate. They describe misuse by
/// the host and are returned to the caller of the offending operation.
#[derive(Error, Debug)]
pub enum NodeError {
    #[error("Child already has a parent, it must be removed first.")]
    AlreadyParented,
    #[error("Child index {index} is out of range for a node with {len} children.")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Measure function isn't defined!")]
    NoMeasurementFunction,
    #[error("Previous layout was ignored! acknowledge_layout() never called.")]
    UnacknowledgedLayoutDiscarded,
    #[error("Expected node to have a new layout to be acknowledged!")]
    NoNewLayoutToAcknowledge,
    #[error("Cannot attach a node beneath itself.")]
    WouldCreateCycle,
    #[error("Node id does not refer to a live node in this tree.")]
    InvalidNode,
    #[error("Layout solver failed: {0}")]
    Solver(#[from] taffy::TaffyError),
}
