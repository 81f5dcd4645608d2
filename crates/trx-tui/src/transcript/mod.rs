//! Transcript presentation: cells, styles, wrapping, markdown, collapse
//! state, and scroll/click routing.

mod cell;
mod collapse;
pub mod markdown;
mod state;
mod style;
pub mod text;
mod wrap;

pub use cell::{CellLines, MessageCell};
pub use collapse::CollapseState;
pub use state::{ScrollMode, ScrollState, TranscriptState};
pub use style::{Style, StyledLine, StyledSpan};
pub use wrap::{WrapOptions, wrap_chars, wrap_styled_spans};
