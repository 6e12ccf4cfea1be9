use itertools::{EitherOrBoth, Itertools as _};
use mongodb::bson::Document;
use tracing::instrument;

use super::{aggregate_sorted, find_sorted, SortedQuery};
use crate::{interface_types::SortExamplesError, mongodb::CollectionTrait};

/// Results of running the same sorted query through both the find and the aggregate path.
#[derive(Clone, Debug, PartialEq)]
pub struct PathComparison {
    pub find: Vec<Document>,
    pub aggregate: Vec<Document>,
}

impl PathComparison {
    /// Position of the first document that differs between the two result sets, if any.
    pub fn first_difference(&self) -> Option<usize> {
        self.find
            .iter()
            .zip_longest(self.aggregate.iter())
            .position(|pair| match pair {
                EitherOrBoth::Both(from_find, from_aggregate) => from_find != from_aggregate,
                EitherOrBoth::Left(_) | EitherOrBoth::Right(_) => true,
            })
    }

    pub fn is_equivalent(&self) -> bool {
        self.first_difference().is_none()
    }
}

/// Run the query through find and through aggregate and compare the results document by
/// document. Only a specification that totally orders the data guarantees equivalent results;
/// documents tied on every sort key may come back in different orders.
#[instrument(name = "Compare Sort Paths", skip_all, fields(sort = %query.sort))]
pub async fn compare_paths(
    collection: &impl CollectionTrait,
    query: &SortedQuery,
) -> Result<PathComparison, SortExamplesError> {
    let find = find_sorted(collection, query).await?;
    let aggregate = aggregate_sorted(collection, query).await?;
    let comparison = PathComparison { find, aggregate };
    match comparison.first_difference() {
        Some(position) => tracing::warn!(position, "find and aggregate results differ"),
        None => tracing::debug!("find and aggregate results are identical"),
    }
    Ok(comparison)
}
