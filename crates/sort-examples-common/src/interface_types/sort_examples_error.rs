use std::borrow::Cow;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SortExamplesError {
    #[error("invalid connection configuration: {0}")]
    InvalidConfiguration(Cow<'static, str>),

    #[error("{0}")]
    MongoDB(#[from] mongodb::error::Error),

    #[error("{0}")]
    MongoDBSupport(#[from] mongodb_support::error::Error),
}
