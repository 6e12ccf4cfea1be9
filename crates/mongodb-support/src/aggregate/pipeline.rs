use std::ops::Deref;

use mongodb::bson;
use serde::{Deserialize, Serialize};

use super::stage::Stage;
use crate::sort::SortSpecification;

/// Aggregation Pipeline
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Pipeline {
    pub stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new(stages: Vec<Stage>) -> Pipeline {
        Pipeline { stages }
    }

    pub fn empty() -> Pipeline {
        Pipeline { stages: vec![] }
    }

    /// A pipeline consisting of a single `$sort` stage, or no stages at all when the
    /// specification is unordered.
    pub fn sorted(spec: &SortSpecification) -> Pipeline {
        Pipeline::empty().then_sort(spec)
    }

    /// Append a `$sort` stage unless the specification is unordered.
    pub fn then_sort(mut self, spec: &SortSpecification) -> Pipeline {
        if let Some(sort_document) = spec.to_sort_document() {
            self.push(Stage::Sort(sort_document));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn push(&mut self, stage: Stage) {
        self.stages.push(stage);
    }
}

impl Deref for Pipeline {
    type Target = [Stage];

    fn deref(&self) -> &Self::Target {
        &self.stages
    }
}

/// This impl allows passing a [Pipeline] as the first argument to [mongodb::Collection::aggregate].
impl IntoIterator for Pipeline {
    type Item = bson::Document;

    // The concrete type produced by Iterator::map includes a closure which cannot be named, so the
    // iterator is boxed.
    type IntoIter = Box<dyn Iterator<Item = Self::Item>>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.stages.into_iter().map(|stage| {
            bson::ser::to_document(&stage).expect("An error occurred serializing a pipeline stage")
        }))
    }
}

impl FromIterator<Stage> for Pipeline {
    fn from_iter<T: IntoIterator<Item = Stage>>(iter: T) -> Self {
        Pipeline {
            stages: iter.into_iter().collect(),
        }
    }
}

impl From<Pipeline> for Vec<bson::Document> {
    fn from(value: Pipeline) -> Self {
        value.into_iter().collect()
    }
}
