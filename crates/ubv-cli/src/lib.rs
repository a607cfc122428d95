//! Shared plumbing for the `ubv1`, `ubv2` and `ubvass` binaries:
//! verbosity-aware logger setup and the file-name conventions of UBVFF
//! archives, where sibling files are named `NNNNN.bin` / `NNNNN.svg`.

use tracing_subscriber::EnvFilter;

/// Detail level driven by `-more`/`-less`. The default prints one line per
/// noteworthy event; `-more` adds per-command detail, `-less` keeps only
/// warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detail(pub i32);

impl Detail {
    pub const DEFAULT: Self = Self(2);

    pub fn more(&mut self) {
        self.0 += 1;
    }

    pub fn less(&mut self) {
        self.0 -= 1;
    }

    fn default_filter(self) -> &'static str {
        match self.0 {
            i32::MIN..=1 => "warn",
            2 => "info",
            _ => "debug",
        }
    }
}

/// Initialize the global subscriber. `RUST_LOG` wins over the flag-derived
/// default when set.
pub fn init_tracing(detail: Detail) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(detail.default_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Derive an output name from an input name: strip a trailing extension
/// when its dot falls within the final five characters and is not followed
/// by a path separator, then append `.svg`.
pub fn auto_svg_name(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut stem_len = input.len();
    if input.len() > 5 {
        let mut dot_pos = None;
        for i in input.len() - 5..input.len() {
            match bytes[i] {
                b'/' | b'\\' => dot_pos = None,
                b'.' => dot_pos = Some(i),
                _ => {}
            }
        }
        if let Some(pos) = dot_pos {
            stem_len = pos;
        }
    }
    format!("{}.svg", &input[..stem_len])
}

/// If `name` follows the `{prefix}NNNNN.bin` convention, the prefix part.
/// Sibling files of the archive live under the same prefix.
pub fn numbered_prefix(name: &str) -> Option<&str> {
    if name.len() <= 9 {
        return None;
    }
    // byte offset; multibyte names can put it mid-character
    let split = name.len() - 9;
    if !name.is_char_boundary(split) {
        return None;
    }
    let (prefix, tail) = name.split_at(split);
    let (digits, ext) = tail.split_at(5);
    if ext == ".bin" && digits.bytes().all(|b| b.is_ascii_digit()) {
        Some(prefix)
    } else {
        None
    }
}

/// Sibling command-file name for a numeric reference
pub fn sibling_bin(prefix: &str, num: u16) -> String {
    format!("{prefix}{num:05}.bin")
}
