//! Include-graph walking and fragment splicing

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use ubv_binary::ByteReader;
use ubv_model::Bounds;
use ubv_svg::{patch_viewbox, SVG_CLOSE, SVG_OPEN_PLACEHOLDER, VIEWBOX_FIELD_OFFSET};

use crate::dumplist::DumpList;
use crate::{AssembleError, MAX_DEPTH};

/// A group header plausibly declares fewer commands than this
const MAX_GROUP_COMMANDS: u32 = 100;

/// Length of a rendered fragment's closing tag
const FRAGMENT_TAIL_LEN: usize = SVG_CLOSE.len();

/// Result of a top-level assembly run
#[derive(Debug)]
pub enum Outcome {
    /// A composite document was written
    Assembled { layers: usize, bounds: Bounds },
    /// The input was not a meaningful top-level target
    Skipped(&'static str),
}

enum Scan {
    Group,
    Leaf,
    Skipped(&'static str),
    DepthCapped,
}

struct Assembler {
    prefix: String,
    list: DumpList,
}

/// Assemble the image referenced by `cmd_path` into `out_path`.
///
/// `prefix` locates sibling files: every reference `NNNNN` resolves to
/// `{prefix}NNNNN.bin` (command files) and `{prefix}NNNNN.svg` (rendered
/// fragments). The composite output is only created when the input
/// actually classifies as a group file.
pub fn assemble(
    cmd_path: &Path,
    prefix: &str,
    out_path: &Path,
) -> Result<Outcome, AssembleError> {
    let mut asm = Assembler {
        prefix: prefix.to_string(),
        list: DumpList::new(),
    };
    match asm.process(cmd_path, 0)? {
        Scan::Group => asm.write_composite(out_path),
        Scan::Leaf | Scan::DepthCapped => unreachable!("only reachable through recursion"),
        Scan::Skipped(reason) => {
            tracing::warn!("skipping {}: {reason}", cmd_path.display());
            Ok(Outcome::Skipped(reason))
        }
    }
}

impl Assembler {
    /// Classify one command file and, for group files, scan its command
    /// stream for include references, recursing up to [`MAX_DEPTH`].
    fn process(&mut self, path: &Path, depth: u32) -> Result<Scan, AssembleError> {
        if depth == MAX_DEPTH {
            tracing::warn!("maximum include depth reached, not descending further");
            return Ok(Scan::DepthCapped);
        }

        let data = fs::read(path).map_err(|source| AssembleError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut r = ByteReader::new(&data);
        let w0 = r.read_u32()?;
        let w1 = r.read_u32()?;
        let w2 = r.read_u32()?;

        if w0 == 1 {
            // a bare include record: one (file, layer) reference
            if w1 != 0 {
                return Err(AssembleError::WeirdHeader);
            }
            if depth == 0 {
                return Ok(Scan::Skipped("bare include file, too shallow"));
            }
            let file_num = (w2 >> 16) as u16;
            let layer_num = (w2 & 0xFFFF) as u16;
            tracing::info!("layer {layer_num} from {}{file_num:05}.svg", self.prefix);
            self.list.add(file_num, layer_num);
            return Ok(Scan::Leaf);
        }
        if w0 < 3 || w0 >= MAX_GROUP_COMMANDS {
            return Ok(Scan::Skipped("implausible command count"));
        }
        if w0 == 3 && depth == 0 {
            return Ok(Scan::Skipped("three-command file, too shallow"));
        }
        if w1 == 0x48 {
            return Ok(Scan::Skipped("0x48 header variant"));
        }
        if w1 != 0 || w2 != 0 {
            return Ok(Scan::Skipped("not a group file"));
        }

        // group file: skip the second header half, then scan for includes
        r.read_u32()?;
        r.read_u32()?;
        r.read_u32()?;
        while let Ok(cmd) = r.read_u16() {
            if cmd != 3 && cmd != 4 {
                continue;
            }
            let Ok(num) = r.read_u16() else {
                tracing::warn!("include opcode at end of {} has no operand", path.display());
                break;
            };
            let child = PathBuf::from(format!("{}{num:05}.bin", self.prefix));
            tracing::info!("include {}", child.display());
            match self.process(&child, depth + 1) {
                Ok(Scan::Skipped(reason)) => {
                    tracing::warn!("skipping {}: {reason}", child.display());
                }
                Ok(_) => {}
                // a broken branch does not fail the whole run
                Err(e) => tracing::warn!("skipping {}: {e}", child.display()),
            }
        }
        Ok(Scan::Group)
    }

    /// Splice the collected fragments, in z-order, into the composite
    /// document and patch its viewport with the folded bounds.
    fn write_composite(self, out_path: &Path) -> Result<Outcome, AssembleError> {
        let mut out = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(out_path)
            .map_err(|source| AssembleError::OutputIo {
                path: out_path.to_path_buf(),
                source,
            })?;
        let io_err = |source| AssembleError::OutputIo {
            path: out_path.to_path_buf(),
            source,
        };

        out.write_all(SVG_OPEN_PLACEHOLDER.as_bytes()).map_err(io_err)?;

        let mut bounds = Bounds::new(0, 0, 1, 1);
        let mut layers = 0usize;
        for entry in self.list.sorted() {
            let path = PathBuf::from(format!("{}{:05}.svg", self.prefix, entry.file_num));
            let data = match fs::read(&path) {
                Ok(data) => data,
                Err(e) => {
                    // the reference is dropped, assembly continues
                    tracing::warn!("unable to open fragment {}: {e}", path.display());
                    continue;
                }
            };
            let (fragment_bounds, body) = split_fragment(&path, &data)?;
            bounds.fold_bounds(&fragment_bounds);

            out.write_all(b"<g>\n").map_err(io_err)?;
            out.write_all(body).map_err(io_err)?;
            out.write_all(b"</g>\n").map_err(io_err)?;
            layers += 1;
        }

        out.write_all(SVG_CLOSE.as_bytes()).map_err(io_err)?;
        patch_viewbox(&mut out, bounds.min_x, bounds.min_y, bounds.max_x, bounds.max_y)?;
        Ok(Outcome::Assembled { layers, bounds })
    }
}

/// Parse a rendered fragment: its viewBox from the fixed-offset field, and
/// its body (everything after the header line, minus the closing tag)
fn split_fragment<'a>(
    path: &Path,
    data: &'a [u8],
) -> Result<(Bounds, &'a [u8]), AssembleError> {
    let malformed = |reason: &str| AssembleError::MalformedFragment {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };

    // the field starts one byte into the quoted attribute
    let field_start = VIEWBOX_FIELD_OFFSET as usize + 1;
    if data.len() < field_start {
        return Err(malformed("shorter than its viewBox field"));
    }
    let field_end = data[field_start..]
        .iter()
        .position(|&b| b == b'"')
        .ok_or_else(|| malformed("unterminated viewBox field"))?;
    let field = std::str::from_utf8(&data[field_start..field_start + field_end])
        .map_err(|_| malformed("viewBox field is not ASCII"))?;
    let values: Vec<i32> = field
        .split_whitespace()
        .map(str::parse)
        .collect::<Result<_, _>>()
        .map_err(|_| malformed("unable to read viewBox"))?;
    let &[min_x, min_y, max_x, max_y] = values.as_slice() else {
        return Err(malformed("viewBox does not hold four integers"));
    };

    let header_end = data
        .iter()
        .position(|&b| b == b'\n')
        .ok_or_else(|| malformed("header line has no terminator"))?;
    if data.len() < header_end + 1 + FRAGMENT_TAIL_LEN {
        return Err(malformed("no room for a closing tag"));
    }
    let body = &data[header_end + 1..data.len() - FRAGMENT_TAIL_LEN];
    Ok((Bounds::new(min_x, min_y, max_x, max_y), body))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(viewbox: &str, body: &str) -> Vec<u8> {
        let mut field = format!("\"{viewbox}\"");
        while field.len() < 26 {
            field.push(' ');
        }
        format!(
            "<svg viewBox={field} version=\"1.1\" baseProfile=\"full\" xmlns=\"http://www.w3.org/2000/svg\">\n{body}</svg>\n"
        )
        .into_bytes()
    }

    #[test]
    fn test_split_fragment_extracts_bounds_and_body() {
        let data = fragment("-5 0 120 80", "<path d=\"M 0 0\" fill=\"none\" stroke=\"none\" />\n");
        let (bounds, body) = split_fragment(Path::new("x.svg"), &data).unwrap();
        assert_eq!(bounds, Bounds::new(-5, 0, 120, 80));
        assert_eq!(
            std::str::from_utf8(body).unwrap(),
            "<path d=\"M 0 0\" fill=\"none\" stroke=\"none\" />\n"
        );
    }

    #[test]
    fn test_split_fragment_rejects_garbage_viewbox() {
        let data = fragment("PLACEHOLDER junk", "");
        assert!(matches!(
            split_fragment(Path::new("x.svg"), &data),
            Err(AssembleError::MalformedFragment { .. })
        ));
    }

    #[test]
    fn test_split_fragment_rejects_truncated_file() {
        assert!(split_fragment(Path::new("x.svg"), b"<svg ").is_err());
    }
}
