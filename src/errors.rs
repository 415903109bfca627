//! Utilities dealing with error handling in this crate.

use failure::Fail;

/// Errors produced by this crate.
#[derive(Debug, Fail)]
pub enum Error {
    /// Errors originating from calls to `std::io::*`.
    #[fail(display = "IO Error - {}", _0)]
    IO(#[cause] std::io::Error),
    /// Errors originating from calls to `std::env::*`.
    #[fail(display = "Env Error - {}", _0)]
    Env(#[cause] std::env::VarError),
    /// Malformed event definitions.
    #[fail(display = "Format Error - {}", _0)]
    Format(#[cause] FormatError),
    /// Errors deserializing a platform metadata snapshot.
    #[fail(display = "JSON Error - {}", _0)]
    Json(#[cause] serde_json::Error),
    /// Errors parsing Glob patterns.
    #[fail(display = "Glob Error - {}", _0)]
    GlobPattern(#[cause] glob::PatternError),
    /// Errors interating over entries in a glob.
    #[fail(display = "Glob Error - {}", _0)]
    GlobIter(#[cause] glob::GlobError),
    /// Errors caused by parsing integers from strings.
    #[fail(display = "Parse Error - {}", _0)]
    ParseInt(#[cause] std::num::ParseIntError),
    /// A collection scope that is not one of `system`, `process` or `cgroup`.
    #[fail(display = "Unknown collection scope - {}", _0)]
    UnknownScope(String),
}

/// Every way a line of an event definition file can be malformed.
#[derive(Debug, Clone, PartialEq, Eq, Fail)]
pub enum FormatError {
    /// The line had no fields at all.
    #[fail(display = "unrecognized event format, no fields")]
    Empty,
    /// The last field of a multi-field line does not start with `name=`.
    #[fail(display = "unrecognized event format, name field not found: {}", _0)]
    MissingNameField(String),
    /// The `name=` field is not a single-quoted string.
    #[fail(display = "unrecognized event format, name is not quoted: {}", _0)]
    UnquotedName(String),
    /// An uncore event does not follow `<type>/event=0x..,umask=0x..,name='..'`.
    #[fail(display = "unexpected raw event format: {}", _0)]
    UnexpectedRawEvent(String),
}

macro_rules! error_from {
    ($et: ty => $cet: expr) => {
        impl From<$et> for Error {
            #[inline]
            fn from(err: $et) -> Self {
                $cet(err)
            }
        }
    };
}

error_from!(std::io::Error => Error::IO);
error_from!(std::env::VarError => Error::Env);
error_from!(FormatError => Error::Format);
error_from!(serde_json::Error => Error::Json);
error_from!(glob::PatternError => Error::GlobPattern);
error_from!(glob::GlobError => Error::GlobIter);
error_from!(std::num::ParseIntError => Error::ParseInt);

/// Result type used in this crate.
pub type Result<T> = std::result::Result<T, Error>;
