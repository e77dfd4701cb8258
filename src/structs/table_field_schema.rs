use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Type {
    String,
    Bytes,
    Integer,
    Int64,
    Float,
    Float64,
    Numeric,
    Boolean,
    Bool,
    Timestamp,
    Date,
    Time,
    Datetime,
    Record,
    Struct,
    // serde requires the catch-all variant to come last
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mode {
    #[default]
    Nullable,
    Required,
    Repeated,
}

// https://cloud.google.com/bigquery/docs/reference/rest/v2/tables#TableFieldSchema
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableFieldSchema {
    pub name: String,
    #[serde(rename = "type", default)]
    pub field_type: Type,
    #[serde(default)]
    pub mode: Mode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<TableFieldSchema>>,
}

impl TableFieldSchema {
    /// Record fields carry their child descriptors inline; everything else is a leaf.
    pub fn is_record(&self) -> bool {
        self.fields.is_some()
    }

    pub fn is_repeated(&self) -> bool {
        self.mode == Mode::Repeated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn known_and_unlisted_types_deserialize() {
        let field: TableFieldSchema = serde_json::from_value(json!({
            "name": "ts", "type": "TIMESTAMP", "mode": "REQUIRED"
        }))
        .unwrap();
        assert_eq!(field.field_type, Type::Timestamp);
        assert_eq!(field.mode, Mode::Required);

        // service types this crate does not enumerate fall back to Unknown
        let field: TableFieldSchema = serde_json::from_value(json!({
            "name": "area", "type": "GEOGRAPHY"
        }))
        .unwrap();
        assert_eq!(field.field_type, Type::Unknown);
        assert_eq!(field.mode, Mode::Nullable);
    }
}
