//! Tests that run against a live MongoDB server. They are compiled only with the `integration`
//! feature, and read the server address from `MONGODB_URI`:
//!
//! ```sh
//! MONGODB_URI=mongodb://localhost:27017 cargo test -p integration-tests --features integration
//! ```
//!
//! Each test works in its own freshly named collection in a dedicated database, so tests may run
//! in parallel and never touch the `tea.ratings` collection that the command line tool uses.

#[cfg(all(test, feature = "integration"))]
mod tests;

use std::env;

use anyhow::anyhow;
use mongodb::{
    bson::{oid::ObjectId, Document},
    Collection,
};
use sort_examples_common::{
    interface_types::ConnectionConfig,
    state::{try_init_state, SortExamplesState},
};

const MONGODB_URI: &str = "MONGODB_URI";

pub const TEST_DATABASE_NAME: &str = "sort_examples_test";

/// A collection that exists for the duration of one test.
pub struct TestCollection {
    state: SortExamplesState,
    name: String,
}

impl TestCollection {
    /// Connect using `MONGODB_URI` and pick a collection name that no other test uses.
    pub async fn new(prefix: &str) -> anyhow::Result<Self> {
        let uri = env::var(MONGODB_URI).map_err(|_| {
            anyhow!("please set {MONGODB_URI} to the connection string of a running MongoDB server")
        })?;
        let config = ConnectionConfig::new(uri).with_database(TEST_DATABASE_NAME);
        let state = try_init_state(&config).await?;
        let name = format!("{prefix}_{}", ObjectId::new().to_hex());
        Ok(TestCollection { state, name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn database(&self) -> mongodb::Database {
        self.state.database()
    }

    pub fn collection(&self) -> Collection<Document> {
        self.state.database().collection(&self.name)
    }

    /// Drop the collection and close the client.
    pub async fn cleanup(self) -> anyhow::Result<()> {
        self.collection().drop(None).await?;
        self.state.shutdown().await;
        Ok(())
    }
}
