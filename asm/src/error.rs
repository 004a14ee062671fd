use color_print::cformat;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown operation: `{0}`")]
    UnknownOperation(String),

    #[error("More argument required for `{0}`")]
    MissingArgument(String),

    #[error("Cannot parse `{0}` as {1}")]
    ParseArgument(String, String),

    #[error("Too many arguments for `{0}`")]
    TrailingArgument(String),

    #[error("line {0}: {1}")]
    AtLine(usize, Box<Error>),

    #[error("undefined symbol '{0}'")]
    UndefinedLabel(String),

    #[error("Re-defined label: `{0}`")]
    RedefinedLabel(String),

    #[error("internal error: `{inst}` encoded to {actual} bytes but declares {declared}")]
    LengthMismatch {
        inst: String,
        declared: u16,
        actual: usize,
    },

    #[error("Program does not fit in the address space ({0} bytes)")]
    ProgramTooLarge(usize),

    #[error(transparent)]
    Decode(#[from] arch::Error),

    #[error("Failed to open file: {0}")]
    FileOpen(String, #[source] std::io::Error),

    #[error("Failed to create file: {0}")]
    FileCreate(String, #[source] std::io::Error),

    #[error("Failed to write file: {0}")]
    FileWrite(String, #[source] std::io::Error),
}

impl Error {
    /// Print error with the offending line of a listing file
    pub fn print_diag(&self, file: &str, text: &str) {
        let (line_idx, err) = match self {
            Error::AtLine(idx, inner) => (Some(*idx), inner.as_ref()),
            _ => (None, self),
        };
        eprintln!("{}", cformat!("<red,bold>error</>: {}", err));

        let Some(line_idx) = line_idx else {
            return;
        };
        let line_num = line_idx + 1;
        let line_content = text.lines().nth(line_idx).unwrap_or("");
        eprintln!("{}", cformat!("     <blue>--></> <underline>{}:{}</>", file, line_num));
        eprintln!("{}", cformat!("      <blue>|</>"));
        eprintln!("{}", cformat!(" <blue>{:>4} |</> {}", line_num, line_content));
        eprintln!("{}", cformat!("      <blue>|</>"));
    }
}
