//! The emission state machine

use std::io::{Seek, Write};

use ubv_model::{round_int, to_real, Bounds, Color, Cubic, Point};

use crate::patch::patch_viewbox;
use crate::{SvgError, SVG_CLOSE, SVG_OPEN_PLACEHOLDER};

/// Emitter progression. Each write operation moves to exactly one state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Begin,
    AfterHeader,
    AfterLayerStart,
    AfterPathStart,
    AfterSegment,
    AfterClose,
    AfterPathEnd,
    AfterLayerEnd,
    AfterFooter,
}

/// Stream shape being emitted.
///
/// Type 1 documents bracket paths in named layers; Type 2 documents hold one
/// implicit layer, so paths start straight after the header and the footer
/// follows the last path end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Layered,
    Flat,
}

/// Strict SVG writer driven by a decoder, one event at a time
pub struct SvgEmitter<W: Write + Seek> {
    out: W,
    mode: Mode,
    scale: i32,
    state: State,
}

impl<W: Write + Seek> SvgEmitter<W> {
    pub fn new(out: W, mode: Mode, scale: i32) -> Self {
        Self {
            out,
            mode,
            scale,
            state: State::Begin,
        }
    }

    /// Current machine state
    pub fn state(&self) -> State {
        self.state
    }

    /// Consume the emitter, returning the underlying writer
    pub fn into_inner(self) -> W {
        self.out
    }

    fn check(&self, op: &'static str, legal: &[State]) -> Result<(), SvgError> {
        if legal.contains(&self.state) {
            Ok(())
        } else {
            Err(SvgError::StateError {
                op,
                state: self.state,
            })
        }
    }

    /// Write the opening tag. With a known viewport (Type 1) the real
    /// `0 0 W H` box is written; otherwise the fixed-width placeholder
    /// field goes in, to be patched by [`finalize_viewbox`].
    ///
    /// [`finalize_viewbox`]: SvgEmitter::finalize_viewbox
    pub fn emit_header(&mut self, viewbox: Option<(i32, i32)>) -> Result<(), SvgError> {
        self.check("emit_header", &[State::Begin])?;
        match viewbox {
            Some((x2, y2)) => write!(
                self.out,
                "<svg viewBox=\"0 0 {} {}\" version=\"1.1\" baseProfile=\"full\" xmlns=\"http://www.w3.org/2000/svg\">\n",
                round_int(x2, self.scale),
                round_int(y2, self.scale),
            )?,
            None => self.out.write_all(SVG_OPEN_PLACEHOLDER.as_bytes())?,
        }
        self.state = State::AfterHeader;
        Ok(())
    }

    /// Open a layer group
    pub fn emit_layer_start(&mut self) -> Result<(), SvgError> {
        self.check("emit_layer_start", &[State::AfterHeader, State::AfterLayerEnd])?;
        self.out.write_all(b"<g>\n")?;
        self.state = State::AfterLayerStart;
        Ok(())
    }

    /// Open a path, or continue with a new sub-path.
    ///
    /// From a segment or a close this is the implicit sub-path move (`M`);
    /// from a layer start or a path end it opens a fresh `<path>` element.
    /// The logical operation is the same, only the textual prefix differs.
    pub fn emit_path_start(&mut self, p: Point) -> Result<(), SvgError> {
        let prefix = match self.state {
            State::AfterClose | State::AfterSegment => "M ",
            s if self.path_openable(s) => "<path d=\"M ",
            _ => {
                return Err(SvgError::StateError {
                    op: "emit_path_start",
                    state: self.state,
                });
            }
        };
        write!(
            self.out,
            "{}{:.6} {:.6} ",
            prefix,
            to_real(p.x, self.scale),
            to_real(p.y, self.scale)
        )?;
        self.state = State::AfterPathStart;
        Ok(())
    }

    fn path_openable(&self, s: State) -> bool {
        match self.mode {
            Mode::Layered => matches!(s, State::AfterLayerStart | State::AfterPathEnd),
            Mode::Flat => matches!(s, State::AfterHeader | State::AfterPathEnd),
        }
    }

    /// Append a line segment
    pub fn emit_line(&mut self, p: Point) -> Result<(), SvgError> {
        self.check("emit_line", &[State::AfterPathStart, State::AfterSegment])?;
        write!(
            self.out,
            "L {:.6} {:.6} ",
            to_real(p.x, self.scale),
            to_real(p.y, self.scale)
        )?;
        self.state = State::AfterSegment;
        Ok(())
    }

    /// Append a cubic Bézier segment
    pub fn emit_cubic(&mut self, c: &Cubic) -> Result<(), SvgError> {
        self.check("emit_cubic", &[State::AfterPathStart, State::AfterSegment])?;
        write!(
            self.out,
            "C {:.6} {:.6}, {:.6} {:.6}, {:.6} {:.6} ",
            to_real(c.p[0].x, self.scale),
            to_real(c.p[0].y, self.scale),
            to_real(c.p[1].x, self.scale),
            to_real(c.p[1].y, self.scale),
            to_real(c.p[2].x, self.scale),
            to_real(c.p[2].y, self.scale)
        )?;
        self.state = State::AfterSegment;
        Ok(())
    }

    /// Close the current sub-path (`Z`)
    pub fn emit_close(&mut self) -> Result<(), SvgError> {
        match self.mode {
            Mode::Layered => self.check("emit_close", &[State::AfterSegment])?,
            Mode::Flat => {
                self.check("emit_close", &[State::AfterSegment, State::AfterPathStart])?;
            }
        }
        self.out.write_all(b"Z ")?;
        self.state = State::AfterClose;
        Ok(())
    }

    /// Close the `<path>` element with its fill and stroke attributes
    pub fn emit_path_end(
        &mut self,
        has_fill: bool,
        fill: Color,
        has_stroke: bool,
        stroke_width: i32,
        stroke: Color,
    ) -> Result<(), SvgError> {
        self.check("emit_path_end", &[State::AfterSegment, State::AfterClose])?;
        self.out.write_all(b"\" ")?;
        if has_fill {
            write!(self.out, "fill=\"rgb({},{},{})\" ", fill.r, fill.g, fill.b)?;
        } else {
            self.out.write_all(b"fill=\"none\" ")?;
        }
        if has_stroke {
            write!(
                self.out,
                "stroke=\"rgb({},{},{})\" stroke-width=\"{:.6}\" stroke-linecap=\"butt\" stroke-linejoin=\"miter\" stroke-miterlimit=\"10\" ",
                stroke.r,
                stroke.g,
                stroke.b,
                to_real(stroke_width, self.scale)
            )?;
        } else {
            self.out.write_all(b"stroke=\"none\" ")?;
        }
        self.out.write_all(b"/>\n")?;
        self.state = State::AfterPathEnd;
        Ok(())
    }

    /// Close a layer group
    pub fn emit_layer_end(&mut self) -> Result<(), SvgError> {
        self.check(
            "emit_layer_end",
            &[State::AfterPathEnd, State::AfterLayerStart],
        )?;
        self.out.write_all(b"</g>\n")?;
        self.state = State::AfterLayerEnd;
        Ok(())
    }

    /// Write the closing tag
    pub fn emit_footer(&mut self) -> Result<(), SvgError> {
        match self.mode {
            Mode::Layered => self.check("emit_footer", &[State::AfterLayerEnd])?,
            Mode::Flat => self.check("emit_footer", &[State::AfterPathEnd])?,
        }
        self.out.write_all(SVG_CLOSE.as_bytes())?;
        self.state = State::AfterFooter;
        Ok(())
    }

    /// Patch the placeholder viewBox with the discovered bounds, rounded to
    /// scale units. Valid at any state; the write position is restored.
    pub fn finalize_viewbox(&mut self, b: &Bounds) -> Result<(), SvgError> {
        patch_viewbox(
            &mut self.out,
            round_int(b.min_x, self.scale),
            round_int(b.min_y, self.scale),
            round_int(b.max_x, self.scale),
            round_int(b.max_y, self.scale),
        )
    }
}
