use csv::Error as CsvError;
use std::{fmt, io, path::PathBuf};

#[derive(Debug)]
pub enum TaggerError {
    /// A file could not be opened or created.
    Path { path: PathBuf, source: io::Error },
    Io(io::Error),
    Csv(CsvError),
}

impl TaggerError {
    pub fn path(path: impl Into<PathBuf>, source: io::Error) -> Self {
        TaggerError::Path {
            path: path.into(),
            source,
        }
    }
}

impl fmt::Display for TaggerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaggerError::Path { path, source } => write!(f, "{}: {}", path.display(), source),
            TaggerError::Io(err) => write!(f, "{}", err),
            TaggerError::Csv(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for TaggerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TaggerError::Path { source, .. } => Some(source),
            TaggerError::Io(err) => Some(err),
            TaggerError::Csv(err) => Some(err),
        }
    }
}

impl From<io::Error> for TaggerError {
    fn from(err: io::Error) -> Self {
        TaggerError::Io(err)
    }
}

impl From<CsvError> for TaggerError {
    fn from(err: CsvError) -> Self {
        TaggerError::Csv(err)
    }
}

/// The result of a stage that degrades instead of failing.
///
/// `value` always holds whatever the stage produced (an empty lookup table,
/// partial tallies, ...). `error` is set when the stage hit a failure it
/// could not recover from and stopped early.
#[derive(Debug)]
pub struct Outcome<T> {
    pub value: T,
    pub error: Option<TaggerError>,
}

impl<T> Outcome<T> {
    pub fn complete(value: T) -> Self {
        Outcome { value, error: None }
    }

    pub fn degraded(value: T, error: TaggerError) -> Self {
        Outcome {
            value,
            error: Some(error),
        }
    }
}
