//! The Type 2 command loop

use std::io::{Seek, Write};

use ubv_binary::ByteReader;
use ubv_model::{Color, TYPE2_SCALE};
use ubv_svg::{Mode, State, SvgEmitter};

use crate::{PointSource, Type2Error, MIN_CMD_COUNT};

/// Length of the command-file header in bytes (7×u16)
const HEADER_LEN: usize = 14;

/// Length of the command-file footer in bytes (5×u16)
const FOOTER_LEN: usize = 10;

/// Command-file header: two reserved words, a command count, four viewport
/// words. The viewport words are not trusted for output.
#[derive(Debug, Clone, Copy)]
pub struct CmdHeader {
    pub cmd_count: u16,
    pub viewport: [u16; 4],
}

/// Command-file footer: terminator opcode, point-file number, three words
/// that must be zero
#[derive(Debug, Clone, Copy)]
pub struct CmdFooter {
    pub point_file: u16,
}

/// Parse and validate the 14-byte header
pub fn parse_header(data: &[u8]) -> Result<CmdHeader, Type2Error> {
    let mut r = ByteReader::new(data);
    let w = r
        .read_u16s(7)
        .map_err(|e| Type2Error::InvalidHeader(format!("header: {e}")))?;
    let cmd_count = w[1];
    if cmd_count <= MIN_CMD_COUNT {
        return Err(Type2Error::InvalidHeader(format!(
            "command count {cmd_count} is below the plausible minimum"
        )));
    }
    Ok(CmdHeader {
        cmd_count,
        viewport: [w[3], w[4], w[5], w[6]],
    })
}

/// Parse and validate the 10-byte footer at the end of the file
pub fn parse_footer(data: &[u8]) -> Result<CmdFooter, Type2Error> {
    if data.len() < FOOTER_LEN {
        return Err(Type2Error::InvalidFooter("file too short".into()));
    }
    let mut r = ByteReader::new(&data[data.len() - FOOTER_LEN..]);
    let w = r
        .read_u16s(5)
        .map_err(|e| Type2Error::InvalidFooter(format!("footer: {e}")))?;
    if w[0] != 0x01 {
        return Err(Type2Error::InvalidFooter(format!(
            "terminator opcode is {:#06x}, expected 0x0001",
            w[0]
        )));
    }
    if w[2] != 0 || w[3] != 0 || w[4] != 0 {
        return Err(Type2Error::InvalidFooter(
            "reserved footer words are not zero".into(),
        ));
    }
    Ok(CmdFooter { point_file: w[1] })
}

/// Conversion statistics and non-fatal findings
#[derive(Debug, Default, Clone)]
pub struct Summary {
    pub commands: u16,
    pub declared_commands: u16,
    pub count_mismatch: bool,
    pub warnings: u32,
}

/// Per-invocation decoder state
struct Type2Decoder<W: Write + Seek> {
    emitter: SvgEmitter<W>,
    fill: Color,
    stroke: Color,
    stroke_width: i32,
    stroke_flag_a: u16,
    stroke_flag_b: u16,
    has_fill: bool,
    has_stroke: bool,
    summary: Summary,
}

/// Convert one Type 2 command/point file pair to SVG, writing into `out`.
///
/// Both files are validated before any command is decoded; a header or
/// footer that fails its structural check rejects the file outright.
pub fn convert<W: Write + Seek>(
    cmd_data: &[u8],
    point_data: &[u8],
    out: W,
) -> Result<Summary, Type2Error> {
    let header = parse_header(cmd_data)?;
    parse_footer(cmd_data)?;
    let mut points = PointSource::new(point_data)?;

    let decoder = Type2Decoder {
        emitter: SvgEmitter::new(out, Mode::Flat, TYPE2_SCALE),
        fill: Color::default(),
        stroke: Color::default(),
        stroke_width: TYPE2_SCALE, // one scale unit
        stroke_flag_a: 0,
        stroke_flag_b: 0,
        has_fill: false,
        has_stroke: false,
        summary: Summary::default(),
    };
    decoder.run(cmd_data, &header, &mut points)
}

impl<W: Write + Seek> Type2Decoder<W> {
    fn run(
        mut self,
        cmd_data: &[u8],
        header: &CmdHeader,
        points: &mut PointSource<'_>,
    ) -> Result<Summary, Type2Error> {
        self.summary.declared_commands = header.cmd_count;
        self.emitter.emit_header(None)?;

        let mut r = ByteReader::new(cmd_data);
        r.seek(HEADER_LEN);

        let mut counter: u16 = 1;
        while counter < header.cmd_count {
            let w = r.read_u16s(5)?;
            self.summary.commands += 1;
            let stop = self.dispatch(counter, &w, points)?;
            counter += 1;
            if stop {
                break;
            }
        }

        if self.emitter.state() != State::AfterFooter {
            return Err(Type2Error::IncompleteDocument(self.emitter.state()));
        }
        self.emitter.finalize_viewbox(points.bounds())?;

        if counter != header.cmd_count {
            tracing::warn!(
                "command loop stopped at {counter} of {} declared commands",
                header.cmd_count
            );
            self.summary.count_mismatch = true;
            self.summary.warnings += 1;
        }
        if r.remaining() > 0 {
            tracing::warn!(
                "{} additional bytes past the end-of-file command",
                r.remaining()
            );
            self.summary.warnings += 1;
        }
        if points.remaining() > 0 {
            tracing::warn!("{} unread bytes left in the point file", points.remaining());
            self.summary.warnings += 1;
        }
        Ok(self.summary)
    }

    /// Decode one five-word command. Returns `true` on the terminator.
    fn dispatch(
        &mut self,
        index: u16,
        w: &[u16],
        points: &mut PointSource<'_>,
    ) -> Result<bool, Type2Error> {
        match w[0] {
            0x01 => {
                // END_FILE
                self.emitter.emit_footer()?;
                return Ok(true);
            }
            0x02 => {
                // MOVE_TO always carries a point count of one
                if w[1] != 1 {
                    return Err(Type2Error::BadCommand {
                        index,
                        reason: format!("MOVE_TO point count is {}, expected 1", w[1]),
                    });
                }
                let p = points.read_point()?;
                self.emitter.emit_path_start(p)?;
            }
            0x03 => {
                // POINTS_LINES
                let total = w[1];
                if total == 0 {
                    return Err(Type2Error::BadCommand {
                        index,
                        reason: "POINTS_LINES with zero points".into(),
                    });
                }
                for p in points.read_points(total as usize)? {
                    self.emitter.emit_line(p)?;
                }
            }
            0x04 => {
                // POINTS_CUBICS
                let total = w[1];
                if total == 0 || total % 3 != 0 {
                    return Err(Type2Error::BadCommand {
                        index,
                        reason: format!("POINTS_CUBICS point count {total} is not a multiple of three"),
                    });
                }
                for _ in 0..total / 3 {
                    let c = points.read_cubic()?;
                    self.emitter.emit_cubic(&c)?;
                }
            }
            0x05 => self.stroke = Color::new(w[1], w[2], w[3]),
            0x06 => self.fill = Color::new(w[1], w[2], w[3]),
            0x07 => self.end_path(index, w[1])?,
            0x08 => {
                self.stroke_flag_a = w[1];
                tracing::debug!("stroke flag A = {}", self.stroke_flag_a);
            }
            0x09 => {
                self.stroke_flag_b = w[1];
                tracing::debug!("stroke flag B = {}", self.stroke_flag_b);
            }
            0x0A => {
                // two words merged into one 32-bit width, high half second.
                // The original combined them with a bitwise AND, which zeroes
                // every observed operand pair; a merge is plainly intended.
                self.stroke_width = ((u32::from(w[2]) << 16) | u32::from(w[1])) as i32;
            }
            cmd => {
                tracing::warn!(
                    "unknown opcode {cmd:#06x} ({:#06x} {:#06x} {:#06x} {:#06x}), skipped",
                    w[1],
                    w[2],
                    w[3],
                    w[4]
                );
                self.summary.warnings += 1;
            }
        }
        Ok(false)
    }

    /// END_PATH sub-events. The applicability flags accumulate across
    /// sub-events until `finalize` (sub-code 2) closes the element.
    fn end_path(&mut self, index: u16, sub: u16) -> Result<(), Type2Error> {
        match sub {
            0x00 => self.has_stroke = true,
            0x01 => {
                self.emitter.emit_close()?;
                self.has_stroke = false;
                self.has_fill = true;
            }
            0x02 => {
                self.emitter.emit_path_end(
                    self.has_fill,
                    self.fill,
                    self.has_stroke,
                    self.stroke_width,
                    self.stroke,
                )?;
            }
            0x03 => self.has_fill = false,
            // markers bracketing a no-stroke no-fill region; no geometry
            0x04 | 0x05 => {}
            other => {
                return Err(Type2Error::BadCommand {
                    index,
                    reason: format!("unknown END_PATH sub-code {other}"),
                });
            }
        }
        Ok(())
    }
}
