//! The dump list: layer references awaiting assembly

/// One include reference: a rendered fragment file and the layer it holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DumpEntry {
    pub file_num: u16,
    pub layer_num: u16,
}

/// Growable, order-stable set of include references, deduplicated by file
/// number (the first reference wins). Sorting by layer number fixes the
/// z-order of the spliced layers; ties keep first-seen order.
#[derive(Debug, Default)]
pub struct DumpList {
    entries: Vec<DumpEntry>,
}

impl DumpList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a reference unless the file is already listed
    pub fn add(&mut self, file_num: u16, layer_num: u16) {
        if self.entries.iter().any(|e| e.file_num == file_num) {
            tracing::debug!("file {file_num:05} already listed, keeping first reference");
            return;
        }
        self.entries.push(DumpEntry { file_num, layer_num });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in z-order: stable sort by layer number
    pub fn sorted(&self) -> Vec<DumpEntry> {
        let mut out = self.entries.clone();
        out.sort_by_key(|e| e.layer_num);
        out
    }
}
