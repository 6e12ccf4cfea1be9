use mongodb::{
    bson::{Bson, Document},
    options::FindOptions,
};
use mongodb_support::{
    aggregate::{Pipeline, Stage},
    error::{Error, InvalidArgument},
    SortSpecification,
};

/// A read with an explicit ordering. The same query can be expressed as a find command with
/// options or as an aggregation pipeline; both forms select, order, and page documents the same
/// way.
///
/// Paging is only settable through [SortedQuery::with_skip] and [SortedQuery::with_limit], which
/// reject values that find and `$skip`/`$limit` would interpret differently.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SortedQuery {
    pub filter: Document,
    pub sort: SortSpecification,
    skip: Option<i64>,
    limit: Option<u32>,
    pub projection: Option<Document>,
}

impl SortedQuery {
    pub fn new(sort: SortSpecification) -> Self {
        SortedQuery {
            sort,
            ..Default::default()
        }
    }

    pub fn with_filter(mut self, filter: Document) -> Self {
        self.filter = filter;
        self
    }

    /// Fails if `skip` does not fit in the 64-bit signed integer `$skip` takes.
    pub fn with_skip(mut self, skip: u64) -> Result<Self, Error> {
        let skip = i64::try_from(skip).map_err(|_| InvalidArgument::SkipOutOfRange(skip))?;
        self.skip = Some(skip);
        Ok(self)
    }

    /// Fails on zero: find reads it as "no limit" while `$limit` rejects it.
    pub fn with_limit(mut self, limit: u32) -> Result<Self, Error> {
        if limit == 0 {
            return Err(InvalidArgument::ZeroLimit.into());
        }
        self.limit = Some(limit);
        Ok(self)
    }

    pub fn with_projection(mut self, projection: Document) -> Self {
        self.projection = Some(projection);
        self
    }

    pub fn skip(&self) -> Option<u64> {
        self.skip.map(i64::unsigned_abs)
    }

    pub fn limit(&self) -> Option<u32> {
        self.limit
    }

    pub fn find_options(&self) -> FindOptions {
        FindOptions::builder()
            .sort(self.sort.to_sort_document().map(Document::from))
            .skip(self.skip())
            .limit(self.limit.map(i64::from))
            .projection(self.projection.clone())
            .build()
    }

    /// Stages in the order find applies them: filter, sort, skip, limit, then projection.
    pub fn pipeline(&self) -> Pipeline {
        let mut pipeline = Pipeline::empty();
        if !self.filter.is_empty() {
            pipeline.push(Stage::Match(self.filter.clone()));
        }
        let mut pipeline = pipeline.then_sort(&self.sort);
        if let Some(skip) = self.skip {
            pipeline.push(Stage::Skip(Bson::Int64(skip)));
        }
        if let Some(limit) = self.limit {
            pipeline.push(Stage::Limit(Bson::Int64(limit.into())));
        }
        if let Some(projection) = &self.projection {
            pipeline.push(Stage::Project(projection.clone()));
        }
        pipeline
    }
}

#[cfg(test)]
mod tests {
    use mongodb::bson::{bson, doc, to_bson};
    use mongodb_support::{
        error::{Error, InvalidArgument},
        SortKey, SortSpecification,
    };
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use test_helpers::arb_sort_specification;

    use super::SortedQuery;

    fn rating_then_type() -> SortSpecification {
        SortSpecification::build([SortKey::descending("rating"), SortKey::ascending("type")])
            .unwrap()
    }

    #[test]
    fn find_options_carry_the_sort_document() {
        let options = SortedQuery::new(rating_then_type()).find_options();
        assert_eq!(options.sort, Some(doc! { "rating": -1, "type": 1 }));
        assert_eq!(options.skip, None);
        assert_eq!(options.limit, None);
    }

    #[test]
    fn unordered_query_sets_no_sort_option() {
        let options = SortedQuery::new(SortSpecification::unordered()).find_options();
        assert_eq!(options.sort, None);
    }

    #[test]
    fn find_sort_matches_pipeline_sort_stage() -> anyhow::Result<()> {
        let query = SortedQuery::new(rating_then_type());
        let find_sort = query.find_options().sort;
        let pipeline = to_bson(&query.pipeline())?;
        assert_eq!(pipeline, bson!([{ "$sort": find_sort }]));
        Ok(())
    }

    proptest! {
        #[test]
        fn both_paths_receive_the_same_sort_document(sort in arb_sort_specification(0..6)) {
            let query = SortedQuery::new(sort.clone());
            let find_sort = query.find_options().sort;
            let pipeline = query.pipeline();
            match find_sort {
                Some(find_sort) => {
                    prop_assert_eq!(pipeline.len(), 1);
                    prop_assert_eq!(
                        to_bson(&pipeline[0]).unwrap(),
                        bson!({ "$sort": find_sort })
                    );
                }
                None => {
                    prop_assert!(sort.is_unordered());
                    prop_assert!(pipeline.is_empty());
                }
            }
        }
    }

    #[test]
    fn pipeline_orders_stages_like_find() -> anyhow::Result<()> {
        let query = SortedQuery::new(rating_then_type())
            .with_filter(doc! { "rating": { "$gt": 5 } })
            .with_skip(1)?
            .with_limit(2)?
            .with_projection(doc! { "_id": 0 });
        assert_eq!(
            to_bson(&query.pipeline())?,
            bson!([
                { "$match": { "rating": { "$gt": 5 } } },
                { "$sort": { "rating": -1, "type": 1 } },
                { "$skip": 1_i64 },
                { "$limit": 2_i64 },
                { "$project": { "_id": 0 } },
            ])
        );
        Ok(())
    }

    #[test]
    fn find_and_pipeline_page_the_same_way() -> anyhow::Result<()> {
        let query = SortedQuery::new(rating_then_type())
            .with_skip(i64::MAX as u64)?
            .with_limit(u32::MAX)?;
        let options = query.find_options();
        assert_eq!(options.skip, Some(i64::MAX as u64));
        assert_eq!(options.limit, Some(i64::from(u32::MAX)));
        assert_eq!(
            to_bson(&query.pipeline())?,
            bson!([
                { "$sort": { "rating": -1, "type": 1 } },
                { "$skip": i64::MAX },
                { "$limit": i64::from(u32::MAX) },
            ])
        );
        Ok(())
    }

    #[test]
    fn rejects_zero_limit() {
        assert_eq!(
            SortedQuery::new(rating_then_type()).with_limit(0),
            Err(Error::InvalidArgument(InvalidArgument::ZeroLimit))
        );
    }

    #[test]
    fn rejects_skip_beyond_signed_range() {
        assert_eq!(
            SortedQuery::new(rating_then_type()).with_skip(u64::MAX),
            Err(Error::InvalidArgument(InvalidArgument::SkipOutOfRange(
                u64::MAX
            )))
        );
        assert_eq!(
            SortedQuery::new(rating_then_type()).with_skip(i64::MAX as u64 + 1),
            Err(Error::InvalidArgument(InvalidArgument::SkipOutOfRange(
                i64::MAX as u64 + 1
            )))
        );
    }
}
