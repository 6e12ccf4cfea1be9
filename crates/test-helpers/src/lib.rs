pub mod arb_sort;
pub mod arb_tea_ratings;

pub use arb_sort::{arb_sort_direction, arb_sort_key, arb_sort_specification};
pub use arb_tea_ratings::{arb_tea_rating, arb_tea_ratings};
