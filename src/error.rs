//! Error types for geosite-compiler.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for a whole compilation run.
#[derive(Error, Debug)]
pub enum Error {
    /// A rule line failed to lex, with the file and 1-based line it came from.
    #[error("{}:{line}: {source}", file.display())]
    Parse {
        file: PathBuf,
        line: usize,
        source: ParseError,
    },

    /// A data file's base name is not a valid list name.
    #[error("invalid list name: {0}")]
    Name(String),

    /// An include or export referenced a list that was never loaded.
    #[error("non-existent list: {0}")]
    Reference(String),

    /// The inclusion graph contains a cycle through the named path.
    #[error("circular inclusion: {0}")]
    Cycle(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for geosite-compiler operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for a single rule line.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Unrecognized rule kind prefix
    #[error("invalid type: {0}")]
    InvalidType(String),

    /// Value violates the domain/keyword charset
    #[error("invalid domain: {0}")]
    InvalidDomain(String),

    /// Attribute violates the attribute charset
    #[error("invalid attribute: {0}")]
    InvalidAttribute(String),

    /// Affiliation violates the list-name charset
    #[error("invalid affiliation: {0}")]
    InvalidAffiliation(String),

    /// Include target violates the list-name charset
    #[error("invalid include name: {0}")]
    InvalidIncludeName(String),

    /// Decorator token starts with neither `@` nor `&`
    #[error("invalid decorator: {0}")]
    InvalidDecorator(String),

    /// `&` affiliations are not allowed on include lines
    #[error("affiliation on include: {0}")]
    AffiliationOnInclude(String),

    /// Regexp rule whose pattern does not compile
    #[error("invalid regexp: {0}")]
    InvalidRegexp(#[from] regex::Error),
}
