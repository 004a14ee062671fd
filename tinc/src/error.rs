use color_print::cformat;
use thiserror::Error;

// Unified error type for the compiler
#[derive(Debug, Error)]
pub enum Error {
    #[error("{message}")]
    Preprocess { offset: usize, message: String },

    #[error("{message}")]
    Syntax { offset: usize, message: String },

    #[error("undefined symbol '{name}'")]
    UndefinedSymbol { name: String, offset: Option<usize> },

    #[error("symbol '{name}' is not a {expected}")]
    IncorrectSymbolKind {
        name: String,
        expected: &'static str,
        offset: Option<usize>,
    },

    #[error("incorrect number of arguments in call to '{name}' (expected {expected}, got {got})")]
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
        offset: Option<usize>,
    },

    #[error("stack frame of '{0}' does not fit in 8-bit offsets")]
    FrameOverflow(String),

    #[error(transparent)]
    Assembly(#[from] tinasm::Error),

    #[error("Failed to read file: {0}")]
    FileRead(String, #[source] std::io::Error),

    #[error("Failed to write file: {0}")]
    FileWrite(String, #[source] std::io::Error),

    #[error("Failed to serialize symbol map: {0}")]
    SymbolMap(#[from] serde_yaml::Error),
}

impl Error {
    pub fn syntax(offset: usize, message: impl Into<String>) -> Self {
        Error::Syntax {
            offset,
            message: message.into(),
        }
    }

    /// Source byte offset of the error, when one is known.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Error::Preprocess { offset, .. } | Error::Syntax { offset, .. } => Some(*offset),
            Error::UndefinedSymbol { offset, .. }
            | Error::IncorrectSymbolKind { offset, .. }
            | Error::ArityMismatch { offset, .. } => *offset,
            _ => None,
        }
    }

    /// Print error with a one-line excerpt of `source` and a caret under the column
    pub fn print_diag(&self, file: &str, source: &str) {
        eprintln!("{}", cformat!("<red,bold>error</>: {}", self));

        let Some(offset) = self.offset() else {
            return;
        };
        let (line_idx, col, line_content) = locate(source, offset);
        let line_num = line_idx + 1;
        eprintln!("{}", cformat!("     <blue>--></> <underline>{}:{}:{}</>", file, line_num, col + 1));
        eprintln!("{}", cformat!("      <blue>|</>"));
        eprintln!("{}", cformat!(" <blue>{:>4} |</> {}", line_num, line_content));
        let caret = format!("{}^", " ".repeat(col));
        eprintln!("{}", cformat!("      <blue>|</> <red,bold>{}</>", caret));
    }
}

/// (0-based line, 0-based column in chars, line text) of a byte offset.
pub fn locate(source: &str, offset: usize) -> (usize, usize, &str) {
    let mut offset = offset.min(source.len());
    while !source.is_char_boundary(offset) {
        offset -= 1;
    }
    let start = source[..offset].rfind('\n').map_or(0, |i| i + 1);
    let end = source[offset..].find('\n').map_or(source.len(), |i| offset + i);
    let line_idx = source[..start].matches('\n').count();
    let col = source[start..offset].chars().count();
    (line_idx, col, &source[start..end])
}
