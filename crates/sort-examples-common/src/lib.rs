//! Plumbing for issuing sorted reads against MongoDB: client construction, seeding, `find` and
//! `aggregate` execution with a [mongodb_support::SortSpecification], and the demonstrations the
//! command line tool prints.

pub mod demonstrations;
pub mod interface_types;
pub mod mongodb;
pub mod mongodb_connection;
pub mod query;
pub mod seed;
pub mod state;
