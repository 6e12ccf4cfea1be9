use futures::Stream;
use futures_util::TryStreamExt as _;
use mongodb::bson;
use tracing::{instrument, Instrument};

use super::{SortPath, SortedQuery};
use crate::{interface_types::SortExamplesError, mongodb::CollectionTrait};

type Result<T> = std::result::Result<T, SortExamplesError>;

/// Execute a sorted read using whichever path is requested.
///
/// The use of `CollectionTrait` lets us inject a mock implementation of the MongoDB driver for
/// testing.
pub async fn run_sorted(
    collection: &impl CollectionTrait,
    path: SortPath,
    query: &SortedQuery,
) -> Result<Vec<bson::Document>> {
    match path {
        SortPath::Find => find_sorted(collection, query).await,
        SortPath::Aggregate => aggregate_sorted(collection, query).await,
    }
}

/// Execute the query as a find command with the sort given as a find option.
#[instrument(name = "Find Sorted", skip_all, fields(sort = %query.sort))]
pub async fn find_sorted(
    collection: &impl CollectionTrait,
    query: &SortedQuery,
) -> Result<Vec<bson::Document>> {
    let options = query.find_options();
    tracing::info!(filter = %query.filter, ?options, "executing find");
    let cursor = collection
        .find(query.filter.clone(), Some(options))
        .instrument(tracing::info_span!("MongoDB Find Command"))
        .await?;
    collect_response_documents(cursor).await
}

/// Execute the query as an aggregation pipeline with the sort given as a `$sort` stage.
#[instrument(name = "Aggregate Sorted", skip_all, fields(sort = %query.sort))]
pub async fn aggregate_sorted(
    collection: &impl CollectionTrait,
    query: &SortedQuery,
) -> Result<Vec<bson::Document>> {
    let pipeline = query.pipeline();
    tracing::info!(?pipeline, "executing aggregate");
    let cursor = collection
        .aggregate(pipeline, None)
        .instrument(tracing::info_span!("MongoDB Aggregate Command"))
        .await?;
    collect_response_documents(cursor).await
}

#[instrument(name = "Collect Response Documents", skip_all)]
async fn collect_response_documents(
    document_cursor: impl Stream<Item = std::result::Result<bson::Document, mongodb::error::Error>>,
) -> Result<Vec<bson::Document>> {
    let documents = document_cursor
        .map_err(SortExamplesError::MongoDB)
        .try_collect::<Vec<_>>()
        .await?;
    tracing::debug!(count = documents.len(), "response from MongoDB");
    Ok(documents)
}
