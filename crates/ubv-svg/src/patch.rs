//! In-place viewBox patching
//!
//! The placeholder attribute is a fixed-width field; the patch must fill it
//! exactly. Under- or over-filling would corrupt the markup because nothing
//! downstream carries a length prefix.

use std::io::{Seek, SeekFrom, Write};

use crate::SvgError;

/// Byte offset of the quoted viewBox field (`<svg viewBox=` is 13 bytes)
pub const VIEWBOX_FIELD_OFFSET: u64 = 13;

/// Width of the quoted viewBox field, quotes included
pub const VIEWBOX_FIELD_WIDTH: usize = 26;

/// Overwrite the placeholder viewBox with four signed integers, space-padded
/// to the exact field width. The write position is restored afterwards; this
/// is the only operation that touches the stream cursor directly.
pub fn patch_viewbox<W: Write + Seek>(
    out: &mut W,
    min_x: i32,
    min_y: i32,
    max_x: i32,
    max_y: i32,
) -> Result<(), SvgError> {
    out.flush()?;
    let pos = out
        .stream_position()
        .map_err(|e| SvgError::PatchFailure(format!("stream_position failed: {e}")))?;

    let field = format!("\"{min_x} {min_y} {max_x} {max_y}\"");
    if field.len() > VIEWBOX_FIELD_WIDTH {
        return Err(SvgError::PatchFailure(format!(
            "viewBox '{field}' exceeds the {VIEWBOX_FIELD_WIDTH}-byte field"
        )));
    }
    let mut buf = field.into_bytes();
    buf.resize(VIEWBOX_FIELD_WIDTH, b' ');

    out.seek(SeekFrom::Start(VIEWBOX_FIELD_OFFSET))
        .map_err(|e| SvgError::PatchFailure(format!("seek failed: {e}")))?;
    out.write_all(&buf)
        .map_err(|e| SvgError::PatchFailure(format!("write failed: {e}")))?;
    out.seek(SeekFrom::Start(pos))
        .map_err(|e| SvgError::PatchFailure(format!("seek-back failed: {e}")))?;
    Ok(())
}
