//! Row-level feature state: pinning, drag reordering and styling hooks.

mod drag;
mod pinning;
mod styling;

pub use drag::{DragOutcome, DragState, RowDrag, RowDragOptions};
pub use pinning::{PinnedPosition, RowPinning};
pub use styling::{RowStyle, RowStyling};
