//! UBVFF Type 1 decoder
//!
//! Type 1 files are self-contained: header, interleaved commands and inline
//! point data, footer, all as big-endian 32-bit words. The decoder walks the
//! command stream once and drives the SVG emitter event by event.

mod decoder;

pub use decoder::{convert, Summary, Type1Decoder};

use thiserror::Error;
use ubv_svg::State;

/// Maximum accepted layer-title length, in characters
pub const MAX_TITLE_LEN: usize = 64;

/// Type 1 decode failure
#[derive(Debug, Error)]
pub enum Type1Error {
    #[error(transparent)]
    Truncated(#[from] ubv_binary::ReadError),

    #[error(transparent)]
    Svg(#[from] ubv_svg::SvgError),

    #[error("layer title of {0} characters overflows the {MAX_TITLE_LEN}-character limit")]
    TitleTooLong(usize),

    #[error("stream ended in emitter state {0:?} without an end-of-file command")]
    IncompleteDocument(State),
}
