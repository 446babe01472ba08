use crate::artifacts::objects::blob;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEdit {
    /// Line of the old content, with its 1-based line number
    Removed(usize, String),
    /// Line of the new content, with its 1-based line number
    Added(usize, String),
}

impl LineEdit {
    pub fn marker(&self) -> char {
        match self {
            LineEdit::Removed(..) => '-',
            LineEdit::Added(..) => '+',
        }
    }

    pub fn text(&self) -> &str {
        match self {
            LineEdit::Removed(_, text) | LineEdit::Added(_, text) => text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentDiff {
    Lines(Vec<LineEdit>),
    /// Either side holds a NUL byte; no line comparison was attempted
    Binary,
}

impl ContentDiff {
    /// Compare two contents line by line at matching positions
    ///
    /// For each index up to the longer side, a differing pair emits the old
    /// line as removed (when present) followed by the new line as added
    /// (when present).
    pub fn compare(old: &[u8], new: &[u8]) -> Self {
        if blob::is_binary(old) || blob::is_binary(new) {
            return ContentDiff::Binary;
        }

        let old_text = String::from_utf8_lossy(old);
        let new_text = String::from_utf8_lossy(new);
        let old_lines = old_text.lines().collect::<Vec<_>>();
        let new_lines = new_text.lines().collect::<Vec<_>>();

        let mut edits = Vec::new();
        for index in 0..old_lines.len().max(new_lines.len()) {
            let old_line = old_lines.get(index);
            let new_line = new_lines.get(index);
            if old_line == new_line {
                continue;
            }

            if let Some(line) = old_line {
                edits.push(LineEdit::Removed(index + 1, line.to_string()));
            }
            if let Some(line) = new_line {
                edits.push(LineEdit::Added(index + 1, line.to_string()));
            }
        }

        ContentDiff::Lines(edits)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ContentDiff::Lines(edits) if edits.is_empty())
    }
}
