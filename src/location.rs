use rustpython_ast::TextSize;

/// Maps byte offsets in a source buffer to 1-based line numbers.
///
/// The AST carries node positions as byte offsets (`TextSize`), but symbol
/// records and error messages are line-based, so every consumer of node
/// ranges goes through this map.
pub struct LineMap {
    /// Byte offset at which each line starts. `starts[0]` is always 0.
    starts: Vec<u32>,
}

impl LineMap {
    /// Builds a map by recording the offset following each newline.
    pub fn new(source: &str) -> Self {
        let mut starts = vec![0u32];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                starts.push((i + 1) as u32);
            }
        }
        Self { starts }
    }

    /// Returns the 1-based line containing the given byte offset.
    pub fn line_of(&self, offset: TextSize) -> usize {
        let offset = u32::from(offset);
        // Number of line starts at or before the offset = the line number.
        self.starts.partition_point(|&start| start <= offset)
    }

    /// Returns the 1-based column of the given byte offset within its line.
    pub fn column_of(&self, offset: TextSize) -> usize {
        let offset = u32::from(offset);
        let line_start = self.starts[self.line_of(offset.into()) - 1];
        (offset - line_start) as usize + 1
    }
}

/// Counts the newline-delimited lines of the loaded buffer.
///
/// This is the `LinesOfCode` metric: the buffer currently under analysis,
/// not the file on disk.
pub fn lines_of_code(source: &str) -> usize {
    source.lines().count()
}
