mod connection_config;
mod sort_examples_error;

pub use self::connection_config::ConnectionConfig;
pub use self::sort_examples_error::SortExamplesError;
