use mongodb::bson::{doc, Document};
use proptest::{collection, prelude::*, sample::SizeRange};

const TEAS: [&str; 8] = [
    "Masala",
    "Assam",
    "Oolong",
    "Earl Grey",
    "English Breakfast",
    "Darjeeling",
    "Sencha",
    "Rooibos",
];

/// A `{ type, rating }` document. Ratings are drawn from a small range so that generated
/// collections contain ties.
pub fn arb_tea_rating() -> impl Strategy<Value = Document> {
    (prop::sample::select(TEAS.to_vec()), 1..=10_i32)
        .prop_map(|(tea, rating)| doc! { "type": tea, "rating": rating })
}

pub fn arb_tea_ratings(size: impl Into<SizeRange>) -> impl Strategy<Value = Vec<Document>> {
    collection::vec(arb_tea_rating(), size)
}
