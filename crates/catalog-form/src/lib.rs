//! Dynamic form engine.
//!
//! [`FormState::reduce`] is the whole state machine: value edits, touches,
//! submission and group toggling are actions applied to an immutable state.
//! [`FormSession`] wraps it with caller callbacks, and [`FormView`] describes
//! what to draw.

mod partition;
mod session;
mod state;
mod view;

pub use partition::{FieldBucket, UNGROUPED_KEY, partition_fields};
pub use session::FormSession;
pub use state::{FormAction, FormEffect, FormState, JsonDraft, Transition};
pub use view::{Control, FieldView, FormView, OptionView, SectionView};
