//! Recursive assembler for multi-layer UBVFF Type 2 images
//!
//! Some Type 2 command files are only a table of contents: they reference
//! other files whose layers, already converted to SVG one by one, make up
//! the final image. The assembler walks that include graph, collects the
//! referenced (file, layer) pairs, and splices the rendered fragments into
//! one composite document with a recomputed viewport.

mod assembler;
mod dumplist;

pub use assembler::{assemble, Outcome};
pub use dumplist::{DumpEntry, DumpList};

use std::path::PathBuf;

use thiserror::Error;

/// Include graphs deeper than this stop descending (cycles terminate here)
pub const MAX_DEPTH: u32 = 10;

/// Assembly failure
#[derive(Debug, Error)]
pub enum AssembleError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    OutputIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("include record carries non-zero reserved word")]
    WeirdHeader,

    #[error("malformed fragment {path}: {reason}")]
    MalformedFragment { path: PathBuf, reason: String },

    #[error(transparent)]
    Truncated(#[from] ubv_binary::ReadError),

    #[error(transparent)]
    Svg(#[from] ubv_svg::SvgError),
}
