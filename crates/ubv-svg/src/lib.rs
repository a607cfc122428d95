//! SVG emission for the UBVFF converters
//!
//! A strict finite-state emitter: every write operation is legal only from a
//! fixed set of states. An out-of-sequence call means the decoder and the
//! emitter have desynchronized, which aborts the whole conversion rather
//! than producing malformed markup.

mod emitter;
mod patch;

pub use emitter::{Mode, State, SvgEmitter};
pub use patch::{patch_viewbox, VIEWBOX_FIELD_OFFSET, VIEWBOX_FIELD_WIDTH};

use thiserror::Error;

/// Opening tag written when the viewport is not yet known. The quoted
/// placeholder is exactly [`VIEWBOX_FIELD_WIDTH`] bytes at
/// [`VIEWBOX_FIELD_OFFSET`] and is overwritten by [`patch_viewbox`] once the
/// real bounds are known.
pub const SVG_OPEN_PLACEHOLDER: &str = "<svg viewBox=\"VIEWBOX_PLACEHOLDER_1234\" version=\"1.1\" baseProfile=\"full\" xmlns=\"http://www.w3.org/2000/svg\">\n";

/// Closing tag
pub const SVG_CLOSE: &str = "</svg>\n";

/// Emission failure
#[derive(Debug, Error)]
pub enum SvgError {
    #[error("state error: {op} invalid from {state:?}")]
    StateError { op: &'static str, state: State },

    #[error("viewbox patch failed: {0}")]
    PatchFailure(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
