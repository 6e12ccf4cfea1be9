use mongodb::bson::{Bson, Document};
use serde::{Deserialize, Serialize};

/// How BSON values are rendered as JSON. Canonical mode preserves every BSON type; relaxed mode
/// prints numbers and dates as plain JSON where that loses no information that matters for reading.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ExtendedJsonMode {
    #[default]
    Canonical,
    Relaxed,
}

impl ExtendedJsonMode {
    pub fn into_extjson(self, value: Bson) -> serde_json::Value {
        match self {
            ExtendedJsonMode::Canonical => value.into_canonical_extjson(),
            ExtendedJsonMode::Relaxed => value.into_relaxed_extjson(),
        }
    }

    /// Render a document as a single line of extended JSON.
    pub fn render_document(self, document: Document) -> String {
        self.into_extjson(Bson::Document(document)).to_string()
    }
}

#[cfg(test)]
mod tests {
    use mongodb::bson::doc;
    use pretty_assertions::assert_eq;

    use super::ExtendedJsonMode;

    #[test]
    fn renders_canonical_numbers_with_type_wrappers() {
        let rendered =
            ExtendedJsonMode::Canonical.render_document(doc! { "type": "Oolong", "rating": 7 });
        assert_eq!(rendered, r#"{"type":"Oolong","rating":{"$numberInt":"7"}}"#);
    }

    #[test]
    fn renders_relaxed_numbers_as_plain_json() {
        let rendered =
            ExtendedJsonMode::Relaxed.render_document(doc! { "type": "Oolong", "rating": 7 });
        assert_eq!(rendered, r#"{"type":"Oolong","rating":7}"#);
    }
}
