use std::cmp::Ordering;

use mongodb::bson::{Bson, Document};
use thiserror::Error;

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("document at position {position} sorts before the document preceding it")]
pub struct OrderViolation {
    pub position: usize,
}

/// Resolve a possibly-dotted field path. A missing field, or a path that passes through
/// a non-document value, resolves to `None`.
pub(super) fn lookup<'a>(document: &'a Document, path: &str) -> Option<&'a Bson> {
    if let Some(value) = document.get(path) {
        return Some(value);
    }
    let mut segments = path.split('.');
    let first = document.get(segments.next()?)?;
    segments.try_fold(first, |value, segment| match value {
        Bson::Document(nested) => nested.get(segment),
        _ => None,
    })
}

/// Position of a value's type in MongoDB's cross-type comparison order. Missing fields compare
/// as null.
fn type_rank(value: Option<&Bson>) -> u8 {
    match value {
        Some(Bson::MinKey) => 1,
        None | Some(Bson::Null) | Some(Bson::Undefined) => 2,
        Some(Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_) | Bson::Decimal128(_)) => 3,
        Some(Bson::String(_) | Bson::Symbol(_)) => 4,
        Some(Bson::Document(_)) => 5,
        Some(Bson::Array(_)) => 6,
        Some(Bson::Binary(_)) => 7,
        Some(Bson::ObjectId(_)) => 8,
        Some(Bson::Boolean(_)) => 9,
        Some(Bson::DateTime(_)) => 10,
        Some(Bson::Timestamp(_)) => 11,
        Some(Bson::RegularExpression(_)) => 12,
        Some(Bson::MaxKey) => 14,
        Some(_) => 13,
    }
}

/// Ascending comparison of two field values under the simple binary collation.
///
/// Arrays compare element by element. The server instead sorts an array field by its smallest
/// (ascending) or largest (descending) element, so results sorted on array fields may not agree
/// with this comparison. Decimal128 values compare through their nearest double, so two decimals
/// that differ only beyond double precision compare equal.
pub fn compare_values(a: Option<&Bson>, b: Option<&Bson>) -> Ordering {
    let by_type = type_rank(a).cmp(&type_rank(b));
    if by_type.is_ne() {
        return by_type;
    }
    match (a, b) {
        (Some(a), Some(b)) => compare_same_rank(a, b),
        _ => Ordering::Equal,
    }
}

fn compare_same_rank(a: &Bson, b: &Bson) -> Ordering {
    match (a, b) {
        (Bson::String(a) | Bson::Symbol(a), Bson::String(b) | Bson::Symbol(b)) => a.cmp(b),
        (Bson::Boolean(a), Bson::Boolean(b)) => a.cmp(b),
        (Bson::ObjectId(a), Bson::ObjectId(b)) => a.bytes().cmp(&b.bytes()),
        (Bson::DateTime(a), Bson::DateTime(b)) => a.timestamp_millis().cmp(&b.timestamp_millis()),
        (Bson::Timestamp(a), Bson::Timestamp(b)) => {
            (a.time, a.increment).cmp(&(b.time, b.increment))
        }
        (Bson::Binary(a), Bson::Binary(b)) => a
            .bytes
            .len()
            .cmp(&b.bytes.len())
            .then_with(|| u8::from(a.subtype).cmp(&u8::from(b.subtype)))
            .then_with(|| a.bytes.cmp(&b.bytes)),
        (Bson::Document(a), Bson::Document(b)) => compare_documents(a, b),
        (Bson::Array(a), Bson::Array(b)) => compare_arrays(a, b),
        (a, b) => match (Number::from_bson(a), Number::from_bson(b)) {
            (Some(a), Some(b)) => a.compare(b),
            _ => Ordering::Equal,
        },
    }
}

#[derive(Clone, Copy, Debug)]
enum Number {
    Integer(i64),
    Float(f64),
}

impl Number {
    fn from_bson(value: &Bson) -> Option<Self> {
        match value {
            Bson::Int32(n) => Some(Number::Integer(i64::from(*n))),
            Bson::Int64(n) => Some(Number::Integer(*n)),
            Bson::Double(n) => Some(Number::Float(*n)),
            Bson::Decimal128(d) => Some(Number::Float(decimal128_to_f64(&d.bytes()))),
            _ => None,
        }
    }

    /// NaN sorts below every other number. Integers and floats compare by exact value.
    fn compare(self, other: Number) -> Ordering {
        match (self, other) {
            (Number::Integer(a), Number::Integer(b)) => a.cmp(&b),
            (Number::Integer(a), Number::Float(b)) => compare_integer_to_float(a, b),
            (Number::Float(a), Number::Integer(b)) => compare_integer_to_float(b, a).reverse(),
            (Number::Float(a), Number::Float(b)) => a
                .partial_cmp(&b)
                .unwrap_or_else(|| a.is_nan().cmp(&b.is_nan()).reverse()),
        }
    }
}

/// 2^63 as a double, the first double above `i64::MAX`
const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;

fn compare_integer_to_float(integer: i64, float: f64) -> Ordering {
    if float.is_nan() {
        return Ordering::Greater;
    }
    if float >= TWO_POW_63 {
        return Ordering::Less;
    }
    if float < -TWO_POW_63 {
        return Ordering::Greater;
    }
    // in range, so the truncated value converts to i64 exactly
    let truncated = float.trunc();
    integer.cmp(&(truncated as i64)).then_with(|| {
        if float > truncated {
            Ordering::Less
        } else if float < truncated {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    })
}

const DECIMAL128_EXPONENT_BIAS: i32 = 6176;
const DECIMAL128_MAX_COEFFICIENT: u128 = 9_999_999_999_999_999_999_999_999_999_999;

/// Nearest double to an IEEE 754-2008 decimal128 value in binary integer decimal encoding, the
/// encoding BSON uses.
fn decimal128_to_f64(bytes: &[u8; 16]) -> f64 {
    let bits = u128::from_le_bytes(*bytes);
    let negative = bits >> 127 == 1;
    let signed = |magnitude: f64| if negative { -magnitude } else { magnitude };
    let combination = (bits >> 122) & 0b1_1111;
    if combination == 0b1_1111 {
        return f64::NAN;
    }
    if combination == 0b1_1110 {
        return signed(f64::INFINITY);
    }
    let (exponent, coefficient) = if (bits >> 125) & 0b11 == 0b11 {
        // coefficients in this form exceed the maximum and are read as zero
        (((bits >> 111) & 0x3fff) as i32, 0)
    } else {
        (((bits >> 113) & 0x3fff) as i32, bits & ((1 << 113) - 1))
    };
    let coefficient = if coefficient > DECIMAL128_MAX_COEFFICIENT {
        0
    } else {
        coefficient
    };
    let exponent = exponent - DECIMAL128_EXPONENT_BIAS;
    let magnitude = format!("{coefficient}e{exponent}")
        .parse::<f64>()
        .unwrap_or(f64::NAN);
    signed(magnitude)
}

/// Field by field: type, then field name, then value. A document that is a prefix of the other
/// sorts first.
fn compare_documents(a: &Document, b: &Document) -> Ordering {
    a.iter()
        .zip(b.iter())
        .map(|((a_key, a_value), (b_key, b_value))| {
            type_rank(Some(a_value))
                .cmp(&type_rank(Some(b_value)))
                .then_with(|| a_key.cmp(b_key))
                .then_with(|| compare_same_rank(a_value, b_value))
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or_else(|| a.len().cmp(&b.len()))
}

fn compare_arrays(a: &[Bson], b: &[Bson]) -> Ordering {
    a.iter()
        .zip(b.iter())
        .map(|(a, b)| compare_values(Some(a), Some(b)))
        .find(|ordering| ordering.is_ne())
        .unwrap_or_else(|| a.len().cmp(&b.len()))
}

#[cfg(test)]
mod tests {
    use mongodb::bson::{bson, doc, Decimal128, Document};
    use pretty_assertions::assert_eq;
    use proptest::{collection::vec, prelude::*};

    use crate::{SortKey, SortSpecification};

    use super::*;

    fn tea_ratings() -> Vec<Document> {
        vec![
            doc! { "type": "Masala", "rating": 10 },
            doc! { "type": "Assam", "rating": 5 },
            doc! { "type": "Oolong", "rating": 7 },
            doc! { "type": "Earl Grey", "rating": 8 },
            doc! { "type": "English Breakfast", "rating": 5 },
        ]
    }

    // Stand-in for the server: a stable sort under the specification's ordering.
    fn sorted(spec: &SortSpecification, mut documents: Vec<Document>) -> Vec<Document> {
        documents.sort_by(|a, b| spec.compare(a, b));
        documents
    }

    fn field_values(documents: &[Document], field: &str) -> Vec<Bson> {
        documents
            .iter()
            .map(|doc| doc.get(field).cloned().unwrap_or(Bson::Null))
            .collect()
    }

    #[test]
    fn sorts_by_rating_ascending_with_ties_adjacent() -> anyhow::Result<()> {
        let spec = SortSpecification::build([SortKey::ascending("rating")])?;
        let result = sorted(&spec, tea_ratings());

        assert_eq!(
            field_values(&result, "rating"),
            [bson!(5), bson!(5), bson!(7), bson!(8), bson!(10)]
        );
        let mut tied = field_values(&result[0..2], "type");
        tied.sort_by(|a, b| compare_values(Some(a), Some(b)));
        assert_eq!(tied, [bson!("Assam"), bson!("English Breakfast")]);
        assert_eq!(spec.check_order(&result), Ok(()));
        Ok(())
    }

    #[test]
    fn secondary_key_breaks_rating_ties() -> anyhow::Result<()> {
        let spec = SortSpecification::build([
            SortKey::descending("rating"),
            SortKey::ascending("type"),
        ])?;
        let result = sorted(&spec, tea_ratings());
        assert_eq!(
            field_values(&result, "type"),
            [
                bson!("Masala"),
                bson!("Earl Grey"),
                bson!("Oolong"),
                bson!("Assam"),
                bson!("English Breakfast"),
            ]
        );
        Ok(())
    }

    #[test]
    fn multi_sort_with_descending_secondary_key() -> anyhow::Result<()> {
        let spec = SortSpecification::build([
            SortKey::ascending("rating"),
            SortKey::descending("type"),
        ])?;
        let result = sorted(&spec, tea_ratings());
        assert_eq!(
            field_values(&result, "type"),
            [
                bson!("English Breakfast"),
                bson!("Assam"),
                bson!("Oolong"),
                bson!("Earl Grey"),
                bson!("Masala"),
            ]
        );
        Ok(())
    }

    #[test]
    fn reports_first_out_of_order_position() -> anyhow::Result<()> {
        let spec = SortSpecification::build([SortKey::ascending("rating")])?;
        let documents = tea_ratings();
        assert_eq!(
            spec.check_order(&documents),
            Err(OrderViolation { position: 1 })
        );
        assert_eq!(SortSpecification::unordered().check_order(&documents), Ok(()));
        Ok(())
    }

    #[test]
    fn missing_fields_sort_with_nulls_before_numbers() {
        let spec = SortSpecification::build([SortKey::ascending("rating")]).unwrap();
        let with_rating = doc! { "type": "Assam", "rating": 5 };
        let without_rating = doc! { "type": "Rooibos" };
        let null_rating = doc! { "type": "Sencha", "rating": null };
        assert_eq!(spec.compare(&without_rating, &with_rating), Ordering::Less);
        assert_eq!(spec.compare(&without_rating, &null_rating), Ordering::Equal);
    }

    #[test]
    fn compares_numbers_across_numeric_types() {
        assert_eq!(
            compare_values(Some(&bson!(5_i32)), Some(&bson!(5.5_f64))),
            Ordering::Less
        );
        assert_eq!(
            compare_values(Some(&bson!(7_i64)), Some(&bson!(7_i32))),
            Ordering::Equal
        );
        assert_eq!(
            compare_values(Some(&bson!(f64::NAN)), Some(&bson!(-1000))),
            Ordering::Less
        );
        assert_eq!(
            compare_values(Some(&bson!(100)), Some(&bson!("1"))),
            Ordering::Less
        );
    }

    #[test]
    fn resolves_dotted_paths() {
        let spec = SortSpecification::build([SortKey::ascending("origin.country")]).unwrap();
        let india = doc! { "type": "Assam", "origin": { "country": "India" } };
        let china = doc! { "type": "Oolong", "origin": { "country": "China" } };
        assert_eq!(spec.compare(&china, &india), Ordering::Less);
    }

    fn decimal(coefficient: u128, exponent: i32, negative: bool) -> Bson {
        let biased = (exponent + DECIMAL128_EXPONENT_BIAS) as u128;
        let bits = (u128::from(negative) << 127) | (biased << 113) | coefficient;
        Bson::Decimal128(Decimal128::from_bytes(bits.to_le_bytes()))
    }

    #[test]
    fn embedded_documents_compare_field_names_before_values() {
        assert_eq!(
            compare_values(Some(&bson!({ "a": 5 })), Some(&bson!({ "b": 1 }))),
            Ordering::Less
        );
        // a field's type outranks its name
        assert_eq!(
            compare_values(Some(&bson!({ "b": 1 })), Some(&bson!({ "a": "x" }))),
            Ordering::Less
        );
        assert_eq!(
            compare_values(Some(&bson!({ "a": 1 })), Some(&bson!({ "a": 1, "b": 0 }))),
            Ordering::Less
        );
    }

    #[test]
    fn compares_large_integers_to_doubles_exactly() {
        let two_pow_53 = 1_i64 << 53;
        assert_eq!(
            compare_values(
                Some(&bson!(two_pow_53 + 1)),
                Some(&bson!(two_pow_53 as f64))
            ),
            Ordering::Greater
        );
        assert_eq!(
            compare_values(Some(&bson!(two_pow_53 as f64)), Some(&bson!(two_pow_53 + 1))),
            Ordering::Less
        );
        assert_eq!(
            compare_values(Some(&bson!(i64::MAX)), Some(&bson!(TWO_POW_63))),
            Ordering::Less
        );
        assert_eq!(
            compare_values(Some(&bson!(-3_i64)), Some(&bson!(-2.5))),
            Ordering::Less
        );
        assert_eq!(
            compare_values(Some(&bson!(2_i64)), Some(&bson!(2.0))),
            Ordering::Equal
        );
    }

    #[test]
    fn compares_decimals_by_value() {
        assert_eq!(
            compare_values(Some(&decimal(100, 0, false)), Some(&bson!(1))),
            Ordering::Greater
        );
        assert_eq!(
            compare_values(Some(&decimal(25, -1, false)), Some(&bson!(2.5))),
            Ordering::Equal
        );
        assert_eq!(
            compare_values(Some(&decimal(1, 0, true)), Some(&decimal(1, -3, false))),
            Ordering::Less
        );
    }

    fn arb_rating_documents() -> impl Strategy<Value = Vec<Document>> {
        vec(("[A-Z][a-z]{0,6}", 0..10_i32), 0..20).prop_map(|rows| {
            rows.into_iter()
                .map(|(tea, rating)| doc! { "type": tea, "rating": rating })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn descending_is_the_reverse_of_ascending(documents in arb_rating_documents()) {
            let ascending = SortSpecification::build([SortKey::ascending("rating")]).unwrap();
            let descending = ascending.reversed();

            let mut ascending_ratings = field_values(&sorted(&ascending, documents.clone()), "rating");
            ascending_ratings.reverse();
            let descending_ratings = field_values(&sorted(&descending, documents), "rating");
            prop_assert_eq!(ascending_ratings, descending_ratings);
        }

        #[test]
        fn adjacent_documents_respect_key_precedence(documents in arb_rating_documents()) {
            let spec = SortSpecification::build([
                SortKey::descending("rating"),
                SortKey::ascending("type"),
            ]).unwrap();
            let result = sorted(&spec, documents);
            for pair in result.windows(2) {
                let rating = compare_values(pair[0].get("rating"), pair[1].get("rating"));
                let tea = compare_values(pair[0].get("type"), pair[1].get("type"));
                prop_assert!(
                    rating == Ordering::Greater || (rating == Ordering::Equal && tea != Ordering::Greater)
                );
            }
            prop_assert_eq!(spec.check_order(&result), Ok(()));
        }
    }
}
