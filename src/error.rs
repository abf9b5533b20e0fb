use std::convert::From;
use std::error;
use std::fmt;
use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: Option<String>,
}

#[derive(Debug)]
pub enum ErrorKind {
    MissingDate,
    InvertedRange,
    RangeTooLong,
    DateParse,
    SymbolParse,
    TooManySymbols,
    DuplicateSymbol,
    UnknownSymbol,
    NoActiveSymbol,
    NoCalendar,
    StaleGeneration,
    NotSelectable,
    HolidayFetch,
    HolidayParse,
    ConfigParse,
    IOError(io::Error),
}

impl Error {
    pub fn new(kind: ErrorKind, msg: &str) -> Self {
        Error {
            kind,
            message: Some(msg.to_owned()),
        }
    }

    /// Whether this error stems from user input to the generate action
    /// rather than from the environment.
    pub fn is_validation(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::MissingDate
                | ErrorKind::InvertedRange
                | ErrorKind::RangeTooLong
                | ErrorKind::DateParse
        )
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            kind,
            message: None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(io_error: io::Error) -> Error {
        Error::from(ErrorKind::IOError(io_error))
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Error {
        Error::new(ErrorKind::HolidayParse, &error.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Error {
        Error::new(ErrorKind::HolidayFetch, &error.to_string())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(msg) => write!(f, "{}: {}", self.kind.as_str(), msg),
            None => write!(f, "{}", self.kind.as_str()),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match &self.kind {
            ErrorKind::IOError(err) => Some(err),
            _ => None,
        }
    }
}

impl ErrorKind {
    pub fn as_str(&self) -> String {
        match self {
            ErrorKind::MissingDate => "start and end date are required".to_owned(),
            ErrorKind::InvertedRange => "end date must not be before start date".to_owned(),
            ErrorKind::RangeTooLong => "range must not exceed 6 months".to_owned(),
            ErrorKind::DateParse => "invalid date format".to_owned(),
            ErrorKind::SymbolParse => "invalid symbol".to_owned(),
            ErrorKind::TooManySymbols => "at most 4 symbols can be configured".to_owned(),
            ErrorKind::DuplicateSymbol => "symbol configured twice".to_owned(),
            ErrorKind::UnknownSymbol => "symbol is not in the palette".to_owned(),
            ErrorKind::NoActiveSymbol => "no symbol selected".to_owned(),
            ErrorKind::NoCalendar => "no calendar generated yet".to_owned(),
            ErrorKind::StaleGeneration => "calendar has been regenerated".to_owned(),
            ErrorKind::NotSelectable => "day cannot be marked".to_owned(),
            ErrorKind::HolidayFetch => "could not fetch holidays".to_owned(),
            ErrorKind::HolidayParse => "invalid holiday table".to_owned(),
            ErrorKind::ConfigParse => "invalid configuration".to_owned(),
            ErrorKind::IOError(err) => err.to_string(),
        }
    }
}
