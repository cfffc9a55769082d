use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_ref()
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    pub fn invalid_format(name: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidFormat {
                element: name.into(),
                message: Default::default(),
            }
            .into(),
        )
    }

    pub fn invalid_arg(name: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidArgument {
                name: name.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn io(context: impl Into<String>, source: std::io::Error) -> Error {
        Error(
            ErrorKind::Io {
                context: context.into(),
                source,
            }
            .into(),
        )
    }

    pub fn unsupported_width(bits: u32) -> Error {
        Error(ErrorKind::UnsupportedWidth { bits }.into())
    }

    pub fn index_out_of_range(index: u64, len: u64) -> Error {
        Error(ErrorKind::IndexOutOfRange { index, len }.into())
    }

    pub fn value_out_of_range(value: u64, bits: u32) -> Error {
        Error(ErrorKind::ValueOutOfRange { value, bits }.into())
    }

    pub fn closed() -> Error {
        Error(ErrorKind::Closed.into())
    }

    pub fn backing_file(path: impl Into<PathBuf>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::BackingFile {
                path: path.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    /// Returns `true` if the error reports use of an array after it was closed.
    pub fn is_closed(&self) -> bool {
        matches!(self.kind(), ErrorKind::Closed)
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },

    #[error("invalid storage format for '{element}': {message}")]
    InvalidFormat { element: String, message: String },

    #[error("IO error for '{context}': {source}")]
    Io {
        context: String,
        source: std::io::Error,
    },

    #[error("value width of {bits} bits is not supported (expected 1..=64)")]
    UnsupportedWidth { bits: u32 },

    #[error("index {index} is out of range for an array of {len} values")]
    IndexOutOfRange { index: u64, len: u64 },

    #[error("value {value:#x} does not fit in {bits} bits")]
    ValueOutOfRange { value: u64, bits: u32 },

    #[error("array storage has been closed")]
    Closed,

    #[error("backing file '{}': {message}", path.display())]
    BackingFile { path: PathBuf, message: String },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind.into())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::io("", e)
    }
}
