use mongodb::{Client, Database};

use crate::{
    interface_types::{ConnectionConfig, SortExamplesError},
    mongodb_connection::get_mongodb_client,
};

/// Database used when neither the configuration nor the connection string names one.
pub const DEFAULT_DATABASE_NAME: &str = "tea";

#[derive(Clone, Debug)]
pub struct SortExamplesState {
    client: Client,

    /// Name of the database to connect to
    database: String,
}

impl SortExamplesState {
    pub fn database(&self) -> Database {
        self.client.database(&self.database)
    }

    pub fn database_name(&self) -> &str {
        &self.database
    }

    /// Close connections and end server sessions. Call this when done with the client.
    pub async fn shutdown(self) {
        self.client.shutdown().await
    }
}

pub async fn try_init_state(
    config: &ConnectionConfig,
) -> Result<SortExamplesState, SortExamplesError> {
    if config.connection_uri.trim().is_empty() {
        return Err(SortExamplesError::InvalidConfiguration(
            "connection URI must not be empty".into(),
        ));
    }
    let client = get_mongodb_client(&config.connection_uri).await?;
    let database = resolve_database_name(
        config.database.as_deref(),
        client.default_database().map(|db| db.name().to_owned()),
    )?;
    tracing::debug!(database = %database, "initialized MongoDB client");
    Ok(SortExamplesState { client, database })
}

fn resolve_database_name(
    configured: Option<&str>,
    from_uri: Option<String>,
) -> Result<String, SortExamplesError> {
    match (configured, from_uri) {
        (Some(""), _) => Err(SortExamplesError::InvalidConfiguration(
            "database name must not be empty".into(),
        )),
        (Some(name), _) => Ok(name.to_owned()),
        (None, Some(name)) => Ok(name),
        (None, None) => Ok(DEFAULT_DATABASE_NAME.to_owned()),
    }
}
