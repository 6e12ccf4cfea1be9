use mongodb::bson::{self, Bson};
use serde::{Deserialize, Serialize};

use super::SortDocument;

/// One stage of an aggregation pipeline. Only the stages a sorted read needs are modeled: a
/// pipeline that filters, orders, pages, and shapes documents the same way a find command with
/// options does. Stage reference:
/// https://www.mongodb.com/docs/manual/reference/operator/aggregation-pipeline/
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub enum Stage {
    /// Takes the same query document a find command takes as its filter.
    #[serde(rename = "$match")]
    Match(bson::Document),

    /// Orders documents by the keys of the sort document, in key order.
    #[serde(rename = "$sort")]
    Sort(SortDocument),

    #[serde(rename = "$limit")]
    Limit(Bson),

    #[serde(rename = "$skip")]
    Skip(Bson),

    #[serde(rename = "$project")]
    Project(bson::Document),

    /// Any stage not listed above, serialized as given
    #[serde(untagged)]
    Other(bson::Document),
}
