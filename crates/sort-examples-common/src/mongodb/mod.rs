mod collection;
mod database;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use self::collection::CollectionTrait;
pub use self::database::DatabaseTrait;

// MockCollectionTrait is generated by automock when the test flag is active.
#[cfg(any(test, feature = "test-helpers"))]
pub use self::collection::MockCollectionTrait;

// MockDatabaseTrait is generated by automock when the test flag is active.
#[cfg(any(test, feature = "test-helpers"))]
pub use self::database::MockDatabaseTrait;
