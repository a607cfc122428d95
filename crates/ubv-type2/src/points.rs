//! The point-file cursor
//!
//! Point data lives in its own file and is consumed strictly in order by
//! the command loop. Every point read is also folded into a bounds
//! accumulator; that box is the discovered viewport the patcher writes at
//! the end, so the accumulation is part of the decode contract, not
//! instrumentation.

use ubv_binary::{ByteReader, ReadError};
use ubv_model::{Bounds, Cubic, Point, TYPE2_SCALE};

use crate::Type2Error;

/// Byte offset where point data starts
const POINT_DATA_OFFSET: usize = 4;

/// Running cursor over a Type 2 point file
pub struct PointSource<'a> {
    reader: ByteReader<'a>,
    declared_points: u16,
    bounds: Bounds,
}

impl<'a> PointSource<'a> {
    /// Open a point file: 2×u16 header (reserved word, point count), data
    /// from byte offset 4
    pub fn new(data: &'a [u8]) -> Result<Self, Type2Error> {
        let mut reader = ByteReader::new(data);
        let words = reader
            .read_u16s(2)
            .map_err(|e| Type2Error::InvalidPointFile(format!("header: {e}")))?;
        let declared_points = words[1];
        reader.seek(POINT_DATA_OFFSET);
        Ok(Self {
            reader,
            declared_points,
            // one scale unit in each direction until geometry says otherwise
            bounds: Bounds::new(0, 0, TYPE2_SCALE, TYPE2_SCALE),
        })
    }

    /// Point count declared by the file header
    pub fn declared_points(&self) -> u16 {
        self.declared_points
    }

    /// Viewport discovered so far
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Bytes left past the cursor
    pub fn remaining(&self) -> usize {
        self.reader.remaining()
    }

    /// Consume one point, folding it into the discovered viewport
    pub fn read_point(&mut self) -> Result<Point, ReadError> {
        let x = self.reader.read_u32_word_swapped()? as i32;
        let y = self.reader.read_u32_word_swapped()? as i32;
        let p = Point::new(x, y);
        self.bounds.fold_point(p);
        Ok(p)
    }

    /// Consume `count` points
    pub fn read_points(&mut self, count: usize) -> Result<Vec<Point>, ReadError> {
        (0..count).map(|_| self.read_point()).collect()
    }

    /// Consume three points making up one cubic segment
    pub fn read_cubic(&mut self) -> Result<Cubic, ReadError> {
        Ok(Cubic::new(
            self.read_point()?,
            self.read_point()?,
            self.read_point()?,
        ))
    }
}
