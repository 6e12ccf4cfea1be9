mod compare_paths;
mod execute_sorted_query;
mod sorted_query;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use self::{
    compare_paths::{compare_paths, PathComparison},
    execute_sorted_query::{aggregate_sorted, find_sorted, run_sorted},
    sorted_query::SortedQuery,
};

/// The two ways a sort can be requested from the server: the `sort` option of a find command, or
/// a `$sort` stage in an aggregation pipeline. Both produce the same order for the same
/// specification and data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SortPath {
    Find,
    Aggregate,
}

impl fmt::Display for SortPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortPath::Find => f.write_str("find"),
            SortPath::Aggregate => f.write_str("aggregate"),
        }
    }
}
