use mongodb::bson;
use serde::{Deserialize, Serialize};

use crate::sort::SortSpecification;

/// Wraps a BSON document that represents a set of sort criteria, e.g. `{ "rating": -1, "type": 1 }`.
/// The same document is accepted by the `sort` option of a find command and as the argument to
/// a `$sort` pipeline stage. Field order in the document is sort precedence.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct SortDocument(pub bson::Document);

impl From<&SortSpecification> for SortDocument {
    fn from(spec: &SortSpecification) -> Self {
        SortDocument(
            spec.keys()
                .iter()
                .map(|key| (key.field.clone(), key.direction.as_bson()))
                .collect(),
        )
    }
}

impl From<SortDocument> for bson::Document {
    fn from(value: SortDocument) -> Self {
        value.0
    }
}
