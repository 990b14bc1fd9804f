//! Offset <-> position conversion
//!
//! Positions follow the editor convention: zero-based lines, and characters
//! counted in UTF-16 code units from the start of the line.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Zero-based line/character position within a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Human-facing output is one-based, like compiler diagnostics
        write!(f, "{}:{}", self.line + 1, self.character + 1)
    }
}

/// Byte offsets at which each line of a text starts
#[derive(Debug, Clone, Default)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self { line_starts }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Convert a byte offset into a position. Offsets past the end clamp to
    /// the end of the text; offsets inside a multi-byte character snap back
    /// to its first byte.
    pub fn position_at(&self, text: &str, offset: usize) -> Position {
        let mut offset = offset.min(text.len());
        while !text.is_char_boundary(offset) {
            offset -= 1;
        }

        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let line_start = self.line_starts[line];
        let character = text[line_start..offset].encode_utf16().count();

        Position::new(line as u32, character as u32)
    }

    /// Convert a position into a byte offset. Characters past the end of the
    /// line clamp to the line end; lines past the end clamp to the text end.
    pub fn offset_at(&self, text: &str, position: Position) -> usize {
        let line = position.line as usize;
        let Some(&line_start) = self.line_starts.get(line) else {
            return text.len();
        };
        let line_end = self
            .line_starts
            .get(line + 1)
            .map(|next| next - 1)
            .unwrap_or(text.len());
        let line_text = text[line_start..line_end].trim_end_matches('\r');

        let mut units = 0usize;
        for (byte_offset, ch) in line_text.char_indices() {
            if units >= position.character as usize {
                return line_start + byte_offset;
            }
            units += ch.len_utf16();
        }

        line_start + line_text.len()
    }
}
