use mongodb_support::{SortDirection, SortKey, SortSpecification};
use proptest::{collection, prelude::*, sample::SizeRange};

pub fn arb_sort_direction() -> impl Strategy<Value = SortDirection> {
    prop_oneof![Just(SortDirection::Ascending), Just(SortDirection::Descending)]
}

/// Field names that need no escaping: no leading `$`, no dots.
fn arb_field_name() -> impl Strategy<Value = String> {
    "[a-zA-Z_][a-zA-Z0-9_]{0,12}"
}

pub fn arb_sort_key() -> impl Strategy<Value = SortKey> {
    (arb_field_name(), arb_sort_direction())
        .prop_map(|(field, direction)| SortKey::new(field, direction))
}

/// Valid specifications: field names are unique. The size range counts keys; a range that
/// includes zero can produce the unordered specification.
pub fn arb_sort_specification(
    size: impl Into<SizeRange>,
) -> impl Strategy<Value = SortSpecification> {
    collection::btree_map(arb_field_name(), arb_sort_direction(), size)
        .prop_map(|fields| {
            fields
                .into_iter()
                .map(|(field, direction)| SortKey::new(field, direction))
                .collect::<Vec<_>>()
        })
        // BTreeMap yields fields alphabetically; shuffle so that key order does not follow
        // field names.
        .prop_shuffle()
        .prop_map(|keys| {
            SortSpecification::build(keys).expect("generated field names are unique and non-empty")
        })
}
