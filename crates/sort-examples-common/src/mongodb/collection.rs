use async_trait::async_trait;
use futures_util::Stream;
use itertools::Itertools as _;
use mongodb::{
    bson::{Bson, Document},
    error::Error,
    options::{AggregateOptions, FindOptions},
    Collection,
};
use mongodb_support::aggregate::Pipeline;

#[cfg(any(test, feature = "test-helpers"))]
use mockall::automock;

#[cfg(any(test, feature = "test-helpers"))]
use super::test_helpers::MockCursor;

/// The collection operations the sort examples use. Code that takes `impl CollectionTrait` runs
/// against a live [Collection] or, in tests, against `MockCollectionTrait`, which `automock`
/// generates from this trait.
#[cfg_attr(any(test, feature = "test-helpers"), automock(
    type DocumentCursor=MockCursor<Document>;
))]
#[async_trait]
pub trait CollectionTrait {
    type DocumentCursor: Stream<Item = Result<Document, Error>> + Send + Unpin + 'static;

    async fn aggregate(
        &self,
        pipeline: Pipeline,
        options: Option<AggregateOptions>,
    ) -> Result<Self::DocumentCursor, Error>;

    async fn find(
        &self,
        filter: Document,
        options: Option<FindOptions>,
    ) -> Result<Self::DocumentCursor, Error>;

    /// Insert documents in the given order. Returns the `_id` of each inserted document, in the
    /// same order.
    async fn insert_many(&self, documents: Vec<Document>) -> Result<Vec<Bson>, Error>;

    /// Drop the collection. Dropping a collection that does not exist is not an error.
    async fn drop_collection(&self) -> Result<(), Error>;
}

#[async_trait]
impl CollectionTrait for Collection<Document> {
    type DocumentCursor = mongodb::Cursor<Document>;

    async fn aggregate(
        &self,
        pipeline: Pipeline,
        options: Option<AggregateOptions>,
    ) -> Result<Self::DocumentCursor, Error> {
        Collection::aggregate(self, pipeline, options).await
    }

    async fn find(
        &self,
        filter: Document,
        options: Option<FindOptions>,
    ) -> Result<Self::DocumentCursor, Error> {
        Collection::find(self, filter, options).await
    }

    async fn insert_many(&self, documents: Vec<Document>) -> Result<Vec<Bson>, Error> {
        let result = Collection::insert_many(self, documents, None).await?;
        Ok(result
            .inserted_ids
            .into_iter()
            .sorted_by_key(|(index, _)| *index)
            .map(|(_, id)| id)
            .collect())
    }

    async fn drop_collection(&self) -> Result<(), Error> {
        Collection::drop(self, None).await
    }
}
