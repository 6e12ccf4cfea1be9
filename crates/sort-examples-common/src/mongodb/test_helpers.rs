use futures_util::stream::{iter, Iter};
use mongodb::{
    bson::{oid::ObjectId, to_bson, Bson, Document},
    error::Error,
    options::{AggregateOptions, FindOptions},
};
use mongodb_support::{aggregate::Stage, SortSpecification};
use pretty_assertions::assert_eq;

use super::{MockCollectionTrait, MockDatabaseTrait};

// In MockCollectionTrait the cursor type is implemented using `Iter` which is a struct that wraps
// around an iterator, and implements `Stream` (and by extension implements `TryStreamExt`). The
// iterator type is the one produced when calling `into_iter` on a `Vec`.
//
// To produce a mock stream use the `mock_stream` function in this module.
pub type MockCursor<T> = futures::stream::Iter<<Vec<Result<T, Error>> as IntoIterator>::IntoIter>;

/// Create a stream that can be returned from mock implementations for
/// CollectionTrait::aggregate or CollectionTrait::find.
pub fn mock_stream<T>(
    items: Vec<Result<T, Error>>,
) -> Iter<<Vec<Result<T, Error>> as IntoIterator>::IntoIter> {
    iter(items)
}

fn ok_stream(documents: Vec<Document>) -> MockCursor<Document> {
    mock_stream(documents.into_iter().map(Ok).collect())
}

/// Mocks a database that hands out the given collection when asked for a collection with the
/// given name.
pub fn mock_database_with_collection(
    collection_name: impl ToString,
    collection: MockCollectionTrait,
) -> MockDatabaseTrait {
    let collection_name = collection_name.to_string();
    let mut db = MockDatabaseTrait::new();
    db.expect_collection()
        .times(1)
        .withf(move |name| *name == collection_name)
        .return_once(move |_| collection);
    db
}

/// Mocks the result of a find call. Asserts that the find call receives the given filter and sort
/// document.
pub fn mock_collection_find_response_for_sort(
    expected_filter: Document,
    expected_sort: Option<Document>,
    result: Vec<Document>,
) -> MockCollectionTrait {
    let mut collection = MockCollectionTrait::new();
    collection
        .expect_find()
        .returning(move |filter, options: Option<FindOptions>| {
            assert_eq!(filter, expected_filter, "actual filter (left) did not match expected (right)");
            assert_eq!(
                options.and_then(|options| options.sort),
                expected_sort,
                "actual sort (left) did not match expected (right)"
            );
            Ok(ok_stream(result.clone()))
        });
    collection
}

/// Mocks the result of an aggregate call. Asserts that the pipeline that the aggregate call
/// receives matches the given pipeline.
pub fn mock_collection_aggregate_response_for_pipeline(
    expected_pipeline: Bson,
    result: Vec<Document>,
) -> MockCollectionTrait {
    let mut collection = MockCollectionTrait::new();
    collection
        .expect_aggregate()
        .returning(move |pipeline, _: Option<AggregateOptions>| {
            assert_eq!(
                to_bson(&pipeline).unwrap(),
                expected_pipeline,
                "actual pipeline (left) did not match expected (right)"
            );
            Ok(ok_stream(result.clone()))
        });
    collection
}

/// Mocks a collection holding the given documents that sorts them the way the server would for
/// both find and aggregate calls. Filters, skips, limits, and projections are ignored. Documents
/// without an `_id` are given one.
pub fn mock_collection_sorting_locally(documents: Vec<Document>) -> MockCollectionTrait {
    let documents: Vec<Document> = documents
        .into_iter()
        .map(|mut document| {
            if !document.contains_key("_id") {
                document.insert("_id", ObjectId::new());
            }
            document
        })
        .collect();

    let find_documents = documents.clone();
    let aggregate_documents = documents;

    let mut collection = MockCollectionTrait::new();
    collection
        .expect_find()
        .returning(move |_filter, options: Option<FindOptions>| {
            let sort = options
                .and_then(|options| options.sort)
                .map(|sort| SortSpecification::from_sort_document(&sort).unwrap())
                .unwrap_or_default();
            Ok(ok_stream(sorted(&sort, find_documents.clone())))
        });
    collection
        .expect_aggregate()
        .returning(move |pipeline, _: Option<AggregateOptions>| {
            let result = pipeline
                .stages
                .iter()
                .fold(aggregate_documents.clone(), |documents, stage| match stage {
                    Stage::Sort(sort_document) => sorted(
                        &SortSpecification::from_sort_document(&sort_document.0).unwrap(),
                        documents,
                    ),
                    _ => documents,
                });
            Ok(ok_stream(result))
        });
    collection
}

fn sorted(spec: &SortSpecification, mut documents: Vec<Document>) -> Vec<Document> {
    documents.sort_by(|a, b| spec.compare(a, b));
    documents
}

/// Adds expectations that the collection is dropped and then seeded with exactly the given
/// documents, in that order.
pub fn expect_seed(collection: &mut MockCollectionTrait, expected_documents: Vec<Document>) {
    let mut sequence = mockall::Sequence::new();
    collection
        .expect_drop_collection()
        .times(1)
        .in_sequence(&mut sequence)
        .returning(|| Ok(()));
    collection
        .expect_insert_many()
        .times(1)
        .in_sequence(&mut sequence)
        .returning(move |documents| {
            assert_eq!(
                documents, expected_documents,
                "actual seed documents (left) did not match expected (right)"
            );
            Ok(documents
                .iter()
                .map(|_| Bson::ObjectId(ObjectId::new()))
                .collect())
        });
}
