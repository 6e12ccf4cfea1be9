use serde::{Deserialize, Serialize};

/// Everything needed to reach the database. Callers build this value explicitly, from command line
/// arguments, environment, or a configuration file; nothing in this crate reads the process
/// environment.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionConfig {
    /// A `mongodb://` or `mongodb+srv://` connection string
    pub connection_uri: String,

    /// Name of the database to use. When absent the database named in the connection string is
    /// used, falling back to [crate::state::DEFAULT_DATABASE_NAME].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
}

impl ConnectionConfig {
    pub fn new(connection_uri: impl Into<String>) -> Self {
        ConnectionConfig {
            connection_uri: connection_uri.into(),
            database: None,
        }
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }
}
