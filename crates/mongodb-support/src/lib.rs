pub mod aggregate;
pub mod error;
mod extended_json_mode;
pub mod sort;

pub use self::extended_json_mode::ExtendedJsonMode;
pub use self::sort::{SortDirection, SortKey, SortSpecification};
