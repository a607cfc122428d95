//! The Type 1 command loop

use std::io::{Seek, Write};

use ubv_binary::ByteReader;
use ubv_model::{Color, Cubic, Point, TYPE1_SCALE};
use ubv_svg::{Mode, State, SvgEmitter};

use crate::{Type1Error, MAX_TITLE_LEN};

/// Type 1 opcodes (32-bit words)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Opcode {
    LayerSep,
    StartLayer,
    EndLayer,
    StartFile,
    StrokeColor,
    FillColor,
    StartPath,
    Line,
    Cubic,
    EndPathStroke,
    EndPathFill,
    EndPathBoth,
    Nop,
    ClosePath,
    Flag1,
    Flag2,
    StrokeWidth,
    EndFile,
}

impl Opcode {
    fn from_u32(cmd: u32) -> Option<Self> {
        Some(match cmd {
            0x00 => Self::LayerSep,
            0x01 => Self::StartLayer,
            0x02 => Self::EndLayer,
            0x03 => Self::StartFile,
            0x04 => Self::StrokeColor,
            0x05 => Self::FillColor,
            0x06 => Self::StartPath,
            0x07 => Self::Line,
            0x08 => Self::Cubic,
            0x09 => Self::EndPathStroke,
            0x0A => Self::EndPathFill,
            0x0B => Self::EndPathBoth,
            0x0C => Self::Nop,
            0x0D => Self::ClosePath,
            0x0E => Self::Flag1,
            0x0F => Self::Flag2,
            0x10 => Self::StrokeWidth,
            0x15 => Self::EndFile,
            _ => return None,
        })
    }
}

/// Declared viewport from the START_FILE command. Zero until seen.
#[derive(Debug, Clone, Copy, Default)]
struct FileHeader {
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
    unknown: i32,
}

/// Conversion statistics and non-fatal findings
#[derive(Debug, Default, Clone)]
pub struct Summary {
    pub commands: u32,
    pub layers: u32,
    pub warnings: u32,
    pub trailing_bytes: usize,
}

/// Per-invocation decoder state. Nothing here outlives one conversion.
pub struct Type1Decoder<W: Write + Seek> {
    emitter: SvgEmitter<W>,
    title: String,
    fill: Color,
    stroke: Color,
    stroke_width: i32,
    header: FileHeader,
    summary: Summary,
}

/// Convert one Type 1 byte stream to SVG, writing into `out`
pub fn convert<W: Write + Seek>(data: &[u8], out: W) -> Result<Summary, Type1Error> {
    Type1Decoder::new(out).run(data)
}

impl<W: Write + Seek> Type1Decoder<W> {
    pub fn new(out: W) -> Self {
        Self {
            emitter: SvgEmitter::new(out, Mode::Layered, TYPE1_SCALE),
            title: String::new(),
            fill: Color::default(),
            stroke: Color::default(),
            stroke_width: TYPE1_SCALE, // one scale unit
            header: FileHeader::default(),
            summary: Summary::default(),
        }
    }

    /// Run the command loop to the end-of-file command
    pub fn run(mut self, data: &[u8]) -> Result<Summary, Type1Error> {
        let mut r = ByteReader::new(data);
        let mut finished = false;

        // End of input at an opcode boundary ends the loop; a short operand
        // read inside a command is a hard truncation.
        while let Ok(cmd) = r.read_u32() {
            self.summary.commands += 1;
            let Some(op) = Opcode::from_u32(cmd) else {
                tracing::warn!("unknown opcode {cmd:#010x}, skipped");
                self.summary.warnings += 1;
                continue;
            };
            self.dispatch(op, &mut r)?;
            if op == Opcode::EndFile {
                finished = true;
                break;
            }
        }

        if !finished || self.emitter.state() != State::AfterFooter {
            return Err(Type1Error::IncompleteDocument(self.emitter.state()));
        }
        if r.remaining() > 0 {
            tracing::warn!(
                "{} additional bytes past the end-of-file command",
                r.remaining()
            );
            self.summary.warnings += 1;
            self.summary.trailing_bytes = r.remaining();
        }
        Ok(self.summary)
    }

    fn dispatch(&mut self, op: Opcode, r: &mut ByteReader<'_>) -> Result<(), Type1Error> {
        match op {
            Opcode::LayerSep | Opcode::Nop => {}
            Opcode::StartLayer => self.start_layer(r)?,
            Opcode::EndLayer => self.end_layer()?,
            Opcode::StartFile => {
                self.header = FileHeader {
                    x1: r.read_i32()?,
                    y1: r.read_i32()?,
                    x2: r.read_i32()?,
                    y2: r.read_i32()?,
                    unknown: r.read_i32()?,
                };
                tracing::debug!(header = ?self.header, "file header");
            }
            Opcode::StrokeColor => self.stroke = read_color(r)?,
            Opcode::FillColor => self.fill = read_color(r)?,
            Opcode::StartPath => {
                let p = read_point(r)?;
                self.emitter.emit_path_start(p)?;
            }
            Opcode::Line => {
                let count = r.read_u32()?;
                for _ in 0..count {
                    let p = read_point(r)?;
                    self.emitter.emit_line(p)?;
                }
            }
            Opcode::Cubic => {
                // three control points per cubic; a trailing remainder is
                // never read
                let count = r.read_u32()?;
                for _ in 0..count / 3 {
                    let c = Cubic::new(read_point(r)?, read_point(r)?, read_point(r)?);
                    self.emitter.emit_cubic(&c)?;
                }
            }
            Opcode::EndPathStroke => self.end_path(false, true)?,
            Opcode::EndPathFill => self.end_path(true, false)?,
            Opcode::EndPathBoth => self.end_path(true, true)?,
            Opcode::ClosePath => self.emitter.emit_close()?,
            Opcode::Flag1 | Opcode::Flag2 => {
                let v = r.read_u32()?;
                tracing::debug!("flag {op:?} = {v:#x}");
            }
            Opcode::StrokeWidth => self.stroke_width = r.read_i32()?,
            Opcode::EndFile => self.emitter.emit_footer()?,
        }
        Ok(())
    }

    fn start_layer(&mut self, r: &mut ByteReader<'_>) -> Result<(), Type1Error> {
        let len = r.read_u32()? as usize;
        if len > MAX_TITLE_LEN {
            return Err(Type1Error::TitleTooLong(len));
        }
        // one 32-bit word per character, high bytes discarded
        self.title.clear();
        for _ in 0..len {
            let dw = r.read_u32()?;
            self.title.push(char::from(dw as u8));
        }
        tracing::debug!(title = %self.title.escape_default(), "start layer");

        // the header can only be written once the first layer arrives
        if self.emitter.state() == State::Begin {
            self.emitter
                .emit_header(Some((self.header.x2, self.header.y2)))?;
        }
        self.emitter.emit_layer_start()?;
        self.summary.layers += 1;
        Ok(())
    }

    fn end_layer(&mut self) -> Result<(), Type1Error> {
        if self.emitter.state() == State::AfterClose {
            // recoverable gap: the path was closed but never ended
            tracing::warn!("missing end-of-path before end-of-layer, synthesizing one");
            self.summary.warnings += 1;
            self.end_path(false, false)?;
        }
        self.emitter.emit_layer_end()?;
        Ok(())
    }

    fn end_path(&mut self, has_fill: bool, has_stroke: bool) -> Result<(), Type1Error> {
        self.emitter.emit_path_end(
            has_fill,
            self.fill,
            has_stroke,
            self.stroke_width,
            self.stroke,
        )?;
        Ok(())
    }
}

fn read_point(r: &mut ByteReader<'_>) -> Result<Point, ubv_binary::ReadError> {
    Ok(Point::new(r.read_i32()?, r.read_i32()?))
}

/// Colors are packed with the red channel in the low byte of the word
/// (on disk: unused, blue, green, red)
fn read_color(r: &mut ByteReader<'_>) -> Result<Color, ubv_binary::ReadError> {
    let v = r.read_u32()?;
    Ok(Color::new(
        (v & 0xFF) as u16,
        ((v >> 8) & 0xFF) as u16,
        ((v >> 16) & 0xFF) as u16,
    ))
}
