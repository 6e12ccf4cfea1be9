use mongodb::{bson::Document, Database};

#[cfg(any(test, feature = "test-helpers"))]
use mockall::automock;

use super::CollectionTrait;

#[cfg(any(test, feature = "test-helpers"))]
use super::MockCollectionTrait;

/// Hands out collections by name, so that a test can give [crate::demonstrations::run_examples]
/// a `MockDatabaseTrait` that returns a mocked collection. Collections hold plain documents.
#[cfg_attr(any(test, feature = "test-helpers"), automock(
    type Collection = MockCollectionTrait;
))]
pub trait DatabaseTrait {
    type Collection: CollectionTrait;

    fn collection(&self, name: &str) -> Self::Collection;
}

impl DatabaseTrait for Database {
    type Collection = mongodb::Collection<Document>;

    fn collection(&self, name: &str) -> Self::Collection {
        Database::collection::<Document>(self, name)
    }
}
