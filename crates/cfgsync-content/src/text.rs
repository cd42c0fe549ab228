//! Line splitting that keeps each line's terminator

use serde::Serialize;

/// Terminator that followed a line in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
    Cr,
    /// Last line of a file without a trailing terminator.
    None,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
            Self::Cr => "\r",
            Self::None => "",
        }
    }

    /// The terminator to use for appended lines: the first real terminator
    /// among `endings`, `\n` if there is none.
    pub fn dominant(endings: impl IntoIterator<Item = LineEnding>) -> Self {
        endings
            .into_iter()
            .find(|e| *e != Self::None)
            .unwrap_or_default()
    }
}

/// One line of text without its terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    pub ending: LineEnding,
}

impl Line {
    pub fn new(text: impl Into<String>, ending: LineEnding) -> Self {
        Self {
            text: text.into(),
            ending,
        }
    }
}

/// Split text into lines, recording each terminator.
///
/// `join_lines(&split_lines(s)) == s` holds for every input.
pub fn split_lines(text: &str) -> Vec<Line> {
    let mut lines = Vec::new();
    let bytes = text.as_bytes();
    let mut start = 0;
    let mut idx = 0;

    while idx < bytes.len() {
        let (ending, width) = match bytes[idx] {
            b'\n' => (LineEnding::Lf, 1),
            b'\r' if bytes.get(idx + 1) == Some(&b'\n') => (LineEnding::CrLf, 2),
            b'\r' => (LineEnding::Cr, 1),
            _ => {
                idx += 1;
                continue;
            }
        };
        lines.push(Line::new(&text[start..idx], ending));
        idx += width;
        start = idx;
    }

    if start < text.len() {
        lines.push(Line::new(&text[start..], LineEnding::None));
    }
    lines
}

/// Concatenate lines with their terminators.
pub fn join_lines(lines: &[Line]) -> String {
    let mut out = String::with_capacity(lines.iter().map(|l| l.text.len() + 2).sum());
    for line in lines {
        out.push_str(&line.text);
        out.push_str(line.ending.as_str());
    }
    out
}
