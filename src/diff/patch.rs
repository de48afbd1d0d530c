use std::borrow::Cow;
use diffy::{DiffOptions, Patch};

pub const DEFAULT_CONTEXT_LINES: usize = 3;

/// Creates and applies unified-diff patches. Holds no state beyond the
/// number of context lines around each hunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchCodec {
    context_len: usize,
}

impl Default for PatchCodec {
    fn default() -> Self {
        Self::new(DEFAULT_CONTEXT_LINES)
    }
}

impl PatchCodec {
    pub fn new(context_len: usize) -> Self {
        Self { context_len }
    }

    pub fn context_len(&self) -> usize {
        self.context_len
    }

    /// Render the patch turning `old` into `new`.
    ///
    /// Header lines read `--- <file_name>` / `+++ <file_name>`, followed by a
    /// tab and the header text when one is given.
    pub fn create(
        &self,
        file_name: &str,
        old: &str,
        new: &str,
        old_header: Option<&str>,
        new_header: Option<&str>,
    ) -> String {
        let patch = DiffOptions::new()
            .set_context_len(self.context_len)
            .create_patch(old, new)
            .to_string();

        let mut output = String::with_capacity(patch.len() + 2 * file_name.len());
        output.push_str(&header_line("---", file_name, old_header));
        output.push_str(&header_line("+++", file_name, new_header));
        output.push_str(strip_file_headers(&patch));
        output
    }

    /// Apply `patch_text` to `source`. `None` means the text is not a valid
    /// patch or its hunks do not match `source`.
    pub fn apply(&self, source: &str, patch_text: &str) -> Option<String> {
        let patch_text = strip_header_labels(patch_text);
        let patch = match Patch::from_str(&patch_text) {
            Ok(patch) => patch,
            Err(err) => {
                tracing::warn!("Rejected malformed patch: {}", err);
                return None;
            }
        };

        match diffy::apply(source, &patch) {
            Ok(patched) => Some(patched),
            Err(err) => {
                tracing::warn!("Patch does not apply: {}", err);
                None
            }
        }
    }
}

fn header_line(marker: &str, file_name: &str, header: Option<&str>) -> String {
    match header {
        Some(header) if !header.is_empty() => format!("{} {}\t{}\n", marker, file_name, header),
        _ => format!("{} {}\n", marker, file_name),
    }
}

/// Drop the `---`/`+++` lines that open a rendered patch, keeping the hunks.
fn strip_file_headers(patch: &str) -> &str {
    let mut rest = patch;
    for marker in ["--- ", "+++ "] {
        if rest.starts_with(marker) {
            rest = rest.split_once('\n').map_or("", |(_, tail)| tail);
        }
    }
    rest
}

/// Cut the tab-separated label (timestamp or header text) off the file
/// header lines preceding the first hunk; only hunks matter when applying.
fn strip_header_labels(patch: &str) -> Cow<'_, str> {
    let hunks_at = patch.find("\n@@ ").map_or(patch.len(), |idx| idx + 1);
    let (headers, hunks) = patch.split_at(hunks_at);
    if !headers.contains('\t') {
        return Cow::Borrowed(patch);
    }

    let mut output = String::with_capacity(patch.len());
    for line in headers.split_inclusive('\n') {
        match line.split_once('\t') {
            Some((label, _)) if line.starts_with("--- ") || line.starts_with("+++ ") => {
                output.push_str(label);
                output.push('\n');
            }
            _ => output.push_str(line),
        }
    }
    output.push_str(hunks);
    Cow::Owned(output)
}

/// Create a patch with the default context length.
pub fn create_patch(
    file_name: &str,
    old: &str,
    new: &str,
    old_header: Option<&str>,
    new_header: Option<&str>,
) -> String {
    PatchCodec::default().create(file_name, old, new, old_header, new_header)
}

/// Apply a patch, returning `None` when it cannot be applied cleanly.
pub fn apply_patch(source: &str, patch_text: &str) -> Option<String> {
    PatchCodec::default().apply(source, patch_text)
}
