use mongodb::bson::{doc, Document};
use tracing::instrument;

use crate::{interface_types::SortExamplesError, mongodb::CollectionTrait};

/// Tea ratings used by the sort demonstrations. Two teas share the rating 5 so that sorting on
/// `rating` alone leaves a tie.
pub fn tea_ratings() -> Vec<Document> {
    vec![
        doc! { "type": "Masala", "rating": 10 },
        doc! { "type": "Assam", "rating": 5 },
        doc! { "type": "Oolong", "rating": 7 },
        doc! { "type": "Earl Grey", "rating": 8 },
        doc! { "type": "English Breakfast", "rating": 5 },
    ]
}

/// Drop the collection, then insert the given documents in order. Returns the number of
/// documents inserted.
#[instrument(name = "Seed Collection", skip_all, fields(documents = documents.len()))]
pub async fn reset_and_seed(
    collection: &impl CollectionTrait,
    documents: Vec<Document>,
) -> Result<usize, SortExamplesError> {
    collection.drop_collection().await?;
    if documents.is_empty() {
        // the driver rejects an insert_many with no documents
        return Ok(0);
    }
    let inserted_ids = collection.insert_many(documents).await?;
    tracing::info!(inserted = inserted_ids.len(), "seeded collection");
    Ok(inserted_ids.len())
}
