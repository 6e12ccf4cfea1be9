use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] InvalidArgument),
}

/// Precondition violations detected while building a sort specification or a sorted read.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InvalidArgument {
    #[error("sort key field name must not be empty")]
    EmptyFieldName,
    #[error("field \"{0}\" appears more than once in a sort specification")]
    DuplicateField(String),
    #[error("unknown sort direction \"{0}\", expected one of asc, ascending, 1, desc, descending, -1")]
    UnknownDirection(String),
    #[error("skip of {0} is larger than the server accepts")]
    SkipOutOfRange(u64),
    #[error("limit must be at least 1")]
    ZeroLimit,
}
