use std::fmt;

#[derive(Debug)]
pub enum PipelineError {
    /// A required column is absent from a sheet.
    MissingColumn { source: String, column: String },
    /// A sheet has no header row.
    EmptySheet { source: String },
    /// A source could not be read (missing sheet, corrupt file, etc.).
    SourceRead { source: String, message: String },
    /// The reference mapping table could not be read.
    Reference(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingColumn { source, column } => {
                write!(f, "{source}: missing column '{column}'")
            }
            Self::EmptySheet { source } => write!(f, "{source}: sheet has no header row"),
            Self::SourceRead { source, message } => write!(f, "{source}: {message}"),
            Self::Reference(msg) => write!(f, "reference mapping error: {msg}"),
        }
    }
}

impl std::error::Error for PipelineError {}
