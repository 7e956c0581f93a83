use thiserror::Error;

/// Errors reported by [`List`](crate::List), its cursors and the merge engine.
///
/// Every failing operation leaves the lists it touched exactly as they were
/// before the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ListError {
    /// `front`, `back`, `pop_front` or `pop_back` on a list without elements.
    #[error("the list is empty")]
    Empty,

    /// The cursor was default-constructed and never pointed into a list.
    #[error("the cursor does not point into any list")]
    InvalidCursor,

    /// The node behind the cursor has been destroyed.
    #[error("the cursor points to a node that has been destroyed")]
    DanglingCursor,

    /// The cursor is at the end position, which holds no element and has no
    /// successor.
    #[error("the cursor is at the end position")]
    EndPosition,

    /// The cursor is at the first element and cannot move backwards.
    #[error("the cursor cannot move before the first element")]
    BeforeBegin,

    /// The cursor points to a node owned by another list.
    #[error("the cursor points into another list")]
    ForeignCursor,

    /// The two lists were created in different node pools.
    #[error("the lists belong to different node pools")]
    ForeignPool,

    /// A merge input is not sorted.
    #[error("the merge input is not sorted")]
    Unsorted,

    /// The node pool could not grow.
    #[error("failed to allocate a list node")]
    AllocFailed,
}

/// Result type of fallible list operations.
pub type Result<T> = core::result::Result<T, ListError>;
