//! The four sorted reads the examples walk through: ascending, descending, and multi-key sorts
//! through find, and a multi-key sort through an aggregation pipeline.

use mongodb::bson::Document;
use mongodb_support::{sort::OrderViolation, SortKey, SortSpecification};

use crate::{
    interface_types::SortExamplesError,
    mongodb::{CollectionTrait, DatabaseTrait},
    query::{run_sorted, SortPath, SortedQuery},
    seed::reset_and_seed,
};

#[derive(Clone, Debug, PartialEq)]
pub struct SortDemonstration {
    pub title: &'static str,
    pub path: SortPath,
    pub sort: SortSpecification,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DemonstrationOutcome {
    pub demonstration: SortDemonstration,
    pub documents: Vec<Document>,

    /// Set when the server's result does not follow the demonstration's sort specification.
    pub order_violation: Option<OrderViolation>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExamplesRun {
    /// Number of documents inserted, or `None` if seeding was skipped
    pub inserted: Option<usize>,
    pub outcomes: Vec<DemonstrationOutcome>,
}

pub fn sort_demonstrations() -> Result<Vec<SortDemonstration>, SortExamplesError> {
    Ok(vec![
        SortDemonstration {
            title: "Ascending Sort",
            path: SortPath::Find,
            sort: SortSpecification::build([SortKey::ascending("rating")])?,
        },
        SortDemonstration {
            title: "Descending Sort",
            path: SortPath::Find,
            sort: SortSpecification::build([SortKey::descending("rating")])?,
        },
        SortDemonstration {
            title: "Multi Sort",
            path: SortPath::Find,
            sort: SortSpecification::build([
                SortKey::ascending("rating"),
                SortKey::descending("type"),
            ])?,
        },
        SortDemonstration {
            title: "Aggregation Sort",
            path: SortPath::Aggregate,
            sort: SortSpecification::build([
                SortKey::descending("rating"),
                SortKey::ascending("type"),
            ])?,
        },
    ])
}

/// Run every demonstration against the collection in order.
pub async fn run_demonstrations(
    collection: &impl CollectionTrait,
) -> Result<Vec<DemonstrationOutcome>, SortExamplesError> {
    let mut outcomes = vec![];
    for demonstration in sort_demonstrations()? {
        let query = SortedQuery::new(demonstration.sort.clone());
        let documents = run_sorted(collection, demonstration.path, &query).await?;
        let order_violation = demonstration.sort.check_order(&documents).err();
        if let Some(violation) = order_violation {
            tracing::warn!(
                title = demonstration.title,
                sort = %demonstration.sort,
                %violation,
                "result is not in the requested order"
            );
        }
        outcomes.push(DemonstrationOutcome {
            demonstration,
            documents,
            order_violation,
        });
    }
    Ok(outcomes)
}

/// Seed the named collection (unless `seed` is `None`), then run the demonstrations against it.
pub async fn run_examples(
    database: &impl DatabaseTrait,
    collection_name: &str,
    seed: Option<Vec<Document>>,
) -> Result<ExamplesRun, SortExamplesError> {
    let collection = database.collection(collection_name);
    let inserted = match seed {
        Some(documents) => Some(reset_and_seed(&collection, documents).await?),
        None => None,
    };
    let outcomes = run_demonstrations(&collection).await?;
    Ok(ExamplesRun { inserted, outcomes })
}
