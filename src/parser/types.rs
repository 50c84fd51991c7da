use std::ops::Range;

/// Label scope: `Name::` is global, `Name:` is local.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Global,
    Local,
}

impl Scope {
    pub fn as_str(self) -> &'static str {
        match self {
            Scope::Global => "global",
            Scope::Local => "local",
        }
    }
}

/// What a single physical line of a `.inc` script holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    /// Whole-line comment; `marker` is `@`, `//`, `/*` or `#`.
    Comment { marker: &'static str, text: String },
    Label { name: String, scope: Scope },
    /// `.name args`, e.g. `.string "Hi$"` or `.byte 0`.
    Directive { name: String, args: String },
    /// A lone identifier such as `lock` or `end`.
    Bare(String),
    /// `command args` with the raw (unsplit) argument text.
    Call { command: String, args: String },
    /// Anything else; passed through verbatim.
    Other(String),
}

impl LineKind {
    /// `#` lines are C preprocessor directives, not comments.
    pub fn is_preprocessor(&self) -> bool {
        matches!(self, LineKind::Comment { marker: "#", .. })
    }

    /// Lines that carry script content: not blank, not a comment, not a directive.
    pub fn is_payload(&self) -> bool {
        matches!(
            self,
            LineKind::Bare(_) | LineKind::Call { .. } | LineKind::Other(_)
        )
    }
}

/// One source line plus its classification.
#[derive(Debug, Clone)]
pub struct LogicalLine {
    pub text: String,
    pub kind: LineKind,
}

/// Output of preprocessing a whole file.
#[derive(Debug)]
pub struct PreprocessResult {
    pub logical: Vec<LogicalLine>,
}

impl PreprocessResult {
    pub fn len(&self) -> usize {
        self.logical.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logical.is_empty()
    }
}

/// A label line and everything up to the next label (or EOF).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledBlock {
    pub name: String,
    pub scope: Scope,
    /// Index of the label line.
    pub start: usize,
    /// Exclusive end.
    pub end: usize,
}

impl LabeledBlock {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Lines after the label line.
    pub fn payload_range(&self) -> Range<usize> {
        (self.start + 1).min(self.end)..self.end
    }
}

/// A `map_script_2 VAR, value, Script` row of a callback table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableEntry {
    pub var: String,
    pub value: String,
    pub script: String,
}
