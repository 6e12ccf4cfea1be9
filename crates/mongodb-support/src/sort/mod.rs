//! Sort specifications: ordered lists of field/direction pairs that determine the precedence of
//! result ordering for `find` requests and `$sort` aggregation stages.

mod compare;

use std::{cmp::Ordering, fmt, str::FromStr};

use enum_iterator::Sequence;
use itertools::Itertools as _;
use mongodb::bson::{Bson, Document};
use serde::{Deserialize, Serialize};

use crate::{
    aggregate::SortDocument,
    error::{Error, InvalidArgument},
};

pub use self::compare::{compare_values, OrderViolation};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize, Sequence)]
#[serde(rename_all = "camelCase")]
pub enum SortDirection {
    #[default]
    #[serde(alias = "asc")]
    Ascending,
    #[serde(alias = "desc")]
    Descending,
}

impl SortDirection {
    pub fn reverse(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// The value MongoDB expects in a sort document: `1` for ascending, `-1` for descending.
    pub fn as_bson(self) -> Bson {
        match self {
            SortDirection::Ascending => Bson::Int32(1),
            SortDirection::Descending => Bson::Int32(-1),
        }
    }

    /// Orient an ascending comparison result according to this direction.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

impl From<SortDirection> for Bson {
    fn from(value: SortDirection) -> Self {
        value.as_bson()
    }
}

/// Accepts the numeric direction values MongoDB accepts in sort documents.
impl TryFrom<&Bson> for SortDirection {
    type Error = Error;

    fn try_from(value: &Bson) -> Result<Self, Self::Error> {
        match value {
            Bson::Int32(1) | Bson::Int64(1) => Ok(SortDirection::Ascending),
            Bson::Int32(-1) | Bson::Int64(-1) => Ok(SortDirection::Descending),
            Bson::Double(n) if *n == 1.0 => Ok(SortDirection::Ascending),
            Bson::Double(n) if *n == -1.0 => Ok(SortDirection::Descending),
            Bson::String(s) => s.parse(),
            _ => Err(InvalidArgument::UnknownDirection(value.to_string()).into()),
        }
    }
}

impl FromStr for SortDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" | "1" => Ok(SortDirection::Ascending),
            "desc" | "descending" | "-1" => Ok(SortDirection::Descending),
            _ => Err(InvalidArgument::UnknownDirection(s.to_owned()).into()),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascending => f.write_str("asc"),
            SortDirection::Descending => f.write_str("desc"),
        }
    }
}

/// One field of a sort specification together with the direction to sort it in.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct SortKey {
    /// Name of the field to sort on. May be a dotted path into nested documents.
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortKey {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        SortKey {
            field: field.into(),
            direction,
        }
    }

    pub fn ascending(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Ascending)
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Descending)
    }

    pub fn reversed(&self) -> Self {
        Self::new(self.field.clone(), self.direction.reverse())
    }
}

/// Parses `field`, `field:asc`, or `field:desc`. The direction defaults to ascending.
impl FromStr for SortKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, direction) = match s.rsplit_once(':') {
            Some((field, direction)) => (field, direction.parse()?),
            None => (s, SortDirection::Ascending),
        };
        if field.is_empty() {
            return Err(InvalidArgument::EmptyFieldName.into());
        }
        Ok(SortKey::new(field, direction))
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.field, self.direction)
    }
}

/// An ordered sequence of sort keys. The first key is the primary sort key; each following key
/// breaks ties left by the keys before it. Key order is never changed after construction.
///
/// An empty specification is the "unordered" marker: results come back in whatever order the
/// database produces.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "Vec<SortKey>", into = "Vec<SortKey>")]
pub struct SortSpecification {
    keys: Vec<SortKey>,
}

impl SortSpecification {
    /// Build a specification from keys in precedence order. Fails with
    /// [InvalidArgument::EmptyFieldName] if any field name is empty, and with
    /// [InvalidArgument::DuplicateField] if a field is named more than once.
    pub fn build(keys: impl IntoIterator<Item = SortKey>) -> Result<Self, Error> {
        let keys: Vec<SortKey> = keys.into_iter().collect();
        if keys.iter().any(|key| key.field.is_empty()) {
            return Err(InvalidArgument::EmptyFieldName.into());
        }
        if let Some(field) = keys.iter().map(|key| &key.field).duplicates().next() {
            return Err(InvalidArgument::DuplicateField(field.clone()).into());
        }
        Ok(SortSpecification { keys })
    }

    /// Read a specification back out of a sort document such as `{ "rating": -1, "type": 1 }`.
    pub fn from_sort_document(document: &Document) -> Result<Self, Error> {
        let keys = document
            .iter()
            .map(|(field, direction)| Ok(SortKey::new(field.clone(), direction.try_into()?)))
            .collect::<Result<Vec<_>, Error>>()?;
        Self::build(keys)
    }

    pub fn unordered() -> Self {
        SortSpecification { keys: vec![] }
    }

    pub fn is_unordered(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Same as [SortSpecification::is_unordered].
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// The same keys in the same precedence order with every direction flipped.
    pub fn reversed(&self) -> Self {
        SortSpecification {
            keys: self.keys.iter().map(SortKey::reversed).collect(),
        }
    }

    /// The sort document to hand to the driver, or `None` if no ordering was requested.
    pub fn to_sort_document(&self) -> Option<SortDocument> {
        if self.is_unordered() {
            None
        } else {
            Some(self.into())
        }
    }

    /// Compare two documents the way the database orders them under this specification.
    pub fn compare(&self, a: &Document, b: &Document) -> Ordering {
        self.keys
            .iter()
            .map(|key| {
                let ordering = compare_values(
                    compare::lookup(a, &key.field),
                    compare::lookup(b, &key.field),
                );
                key.direction.apply(ordering)
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }

    /// Check that every document is ordered no earlier than the document before it.
    pub fn check_order<'a>(
        &self,
        documents: impl IntoIterator<Item = &'a Document>,
    ) -> Result<(), OrderViolation> {
        documents
            .into_iter()
            .tuple_windows()
            .enumerate()
            .try_for_each(|(index, (previous, current))| {
                if self.compare(previous, current) == Ordering::Greater {
                    Err(OrderViolation {
                        position: index + 1,
                    })
                } else {
                    Ok(())
                }
            })
    }
}

impl TryFrom<Vec<SortKey>> for SortSpecification {
    type Error = Error;

    fn try_from(keys: Vec<SortKey>) -> Result<Self, Self::Error> {
        Self::build(keys)
    }
}

impl From<SortSpecification> for Vec<SortKey> {
    fn from(value: SortSpecification) -> Self {
        value.keys
    }
}

impl<'a> IntoIterator for &'a SortSpecification {
    type Item = &'a SortKey;
    type IntoIter = std::slice::Iter<'a, SortKey>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}

impl fmt::Display for SortSpecification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unordered() {
            f.write_str("unordered")
        } else {
            write!(f, "{}", self.keys.iter().join(", "))
        }
    }
}
