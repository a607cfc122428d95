//! UBVFF Type 2 decoder
//!
//! Type 2 images are split across two correlated files: a command file of
//! fixed five-word records and a point file consumed from its own running
//! cursor. The command file names the point file in its footer. No usable
//! viewport is declared up front; the real one is discovered from the
//! points actually read and patched into the output afterwards.

mod decoder;
mod points;

pub use decoder::{convert, parse_footer, parse_header, CmdFooter, CmdHeader, Summary};
pub use points::PointSource;

use thiserror::Error;
use ubv_svg::State;

/// A plausible command file declares more commands than this
pub const MIN_CMD_COUNT: u16 = 0x0A;

/// Type 2 decode failure
#[derive(Debug, Error)]
pub enum Type2Error {
    #[error("not a valid command file: {0}")]
    InvalidHeader(String),

    #[error("not a valid command file: {0}")]
    InvalidFooter(String),

    #[error("not a valid point file: {0}")]
    InvalidPointFile(String),

    #[error("command {index}: {reason}")]
    BadCommand { index: u16, reason: String },

    #[error(transparent)]
    Truncated(#[from] ubv_binary::ReadError),

    #[error(transparent)]
    Svg(#[from] ubv_svg::SvgError),

    #[error("stream ended in emitter state {0:?} without an end-of-file command")]
    IncompleteDocument(State),
}
