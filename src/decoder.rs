use crate::error::BigQueryError;
use crate::structs::table_field_schema::TableFieldSchema;
use crate::structs::table_row::TableRow;

/// One decoded result cell. Records keep their entries in schema field order.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(serde_json::Value),
    List(Vec<Value>),
    Record(Vec<(String, Value)>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(serde_json::Value::String(val)) => Some(val),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Scalar(serde_json::Value::Null))
    }

    /// Looks up a record entry by field name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Record(entries) => entries
                .iter()
                .find(|(entry_name, _)| entry_name == name)
                .map(|(_, value)| value),
            _ => None,
        }
    }
}

/// Decodes one raw row into one value per top-level schema field, in schema order.
pub fn decode_row(row: &TableRow, fields: &[TableFieldSchema]) -> Result<Vec<Value>, BigQueryError> {
    let cells = row.fields.as_deref().unwrap_or(&[]);
    if cells.len() != fields.len() {
        return Err(BigQueryError::RowSchemaMismatch(format!(
            "expected {} cells to match the schema, found {}",
            fields.len(),
            cells.len()
        )));
    }
    cells
        .iter()
        .zip(fields)
        .map(|(cell, field)| match &cell.value {
            Some(value) => unwrap_value(value, field),
            // serde folds {"v": null} into a missing value
            None => Ok(Value::Scalar(serde_json::Value::Null)),
        })
        .collect()
}

// The service wraps every cell in tagged containers: {"v": ...} around single
// values, {"f": [...]} around record cells, and a plain JSON array around
// repeated elements. Recursion depth is bounded by the schema's declared
// nesting, not by the result size.
fn unwrap_value(value: &serde_json::Value, field: &TableFieldSchema) -> Result<Value, BigQueryError> {
    match value {
        serde_json::Value::Object(map) => {
            if let Some(wrapped) = map.get("v") {
                return unwrap_value(wrapped, field);
            }
            if let Some(cells) = map.get("f") {
                return unwrap_record(cells, field);
            }
            Err(BigQueryError::DecodeInvariant(format!(
                "cell for field '{}' is an object with neither a 'v' nor an 'f' key: {}",
                field.name, value
            )))
        }
        serde_json::Value::Array(items) => {
            if !field.is_repeated() {
                return Err(BigQueryError::DecodeInvariant(format!(
                    "cell for field '{}' is an array, but the field is not repeated",
                    field.name
                )));
            }
            // repetition does not change the element type, so every element
            // decodes against the same descriptor
            let items = items
                .iter()
                .map(|item| unwrap_value(item, field))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::List(items))
        }
        other => Ok(Value::Scalar(other.clone())),
    }
}

fn unwrap_record(
    cells: &serde_json::Value,
    field: &TableFieldSchema,
) -> Result<Value, BigQueryError> {
    let children = field.fields.as_deref().ok_or_else(|| {
        BigQueryError::DecodeInvariant(format!(
            "cell for field '{}' carries record cells, but the schema declares no child fields",
            field.name
        ))
    })?;
    let cells = cells.as_array().ok_or_else(|| {
        BigQueryError::DecodeInvariant(format!(
            "record cells of field '{}' are not an array: {}",
            field.name, cells
        ))
    })?;
    if cells.len() != children.len() {
        return Err(BigQueryError::RowSchemaMismatch(format!(
            "record '{}' has {} cells for {} child fields",
            field.name,
            cells.len(),
            children.len()
        )));
    }
    let mut entries = Vec::with_capacity(children.len());
    for (cell, child) in cells.iter().zip(children) {
        entries.push((child.name.clone(), unwrap_value(cell, child)?));
    }
    Ok(Value::Record(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::table_schema::TableSchema;
    use serde_json::json;

    fn schema(fields: serde_json::Value) -> TableSchema {
        serde_json::from_value(json!({ "fields": fields })).unwrap()
    }

    #[test]
    fn decodes_scalar_row() {
        let schema = schema(json!([
            { "name": "user_id", "type": "STRING", "mode": "NULLABLE" },
            { "name": "user_id_nullable", "type": "STRING", "mode": "NULLABLE" },
            { "name": "event_timestamp", "type": "INTEGER", "mode": "NULLABLE" }
        ]));
        let row: TableRow = serde_json::from_value(json!({
            "f": [
                { "v": "user1" },
                { "v": null },
                { "v": "1648823841187011" }
            ]
        }))
        .unwrap();
        let values = decode_row(&row, &schema.fields).unwrap();
        assert_eq!(values.len(), 3);
        assert_eq!(values[0].as_str(), Some("user1"));
        assert!(values[1].is_null());
        assert_eq!(values[2].as_str(), Some("1648823841187011"));
    }

    #[test]
    fn decodes_nested_record_with_repeated_child() {
        let addr: TableFieldSchema = serde_json::from_value(json!({
            "name": "addr",
            "type": "RECORD",
            "mode": "NULLABLE",
            "fields": [
                { "name": "city", "type": "STRING", "mode": "NULLABLE" },
                { "name": "zips", "type": "STRING", "mode": "REPEATED" }
            ]
        }))
        .unwrap();
        let wire = json!({
            "f": [
                { "v": { "v": "Springfield" } },
                { "v": [ { "v": { "v": "11111" } }, { "v": { "v": "22222" } } ] }
            ]
        });
        let value = unwrap_value(&wire, &addr).unwrap();
        assert_eq!(value.get("city").unwrap().as_str(), Some("Springfield"));
        assert_eq!(
            value.get("zips").unwrap(),
            &Value::List(vec![
                Value::Scalar(json!("11111")),
                Value::Scalar(json!("22222")),
            ])
        );
    }

    #[test]
    fn decodes_repeated_records() {
        let events: TableFieldSchema = serde_json::from_value(json!({
            "name": "events",
            "type": "RECORD",
            "mode": "REPEATED",
            "fields": [
                { "name": "key", "type": "STRING", "mode": "NULLABLE" },
                { "name": "count", "type": "INTEGER", "mode": "NULLABLE" }
            ]
        }))
        .unwrap();
        let wire = json!([
            { "v": { "f": [ { "v": "a" }, { "v": "1" } ] } },
            { "v": { "f": [ { "v": "b" }, { "v": "2" } ] } }
        ]);
        let value = unwrap_value(&wire, &events).unwrap();
        let items = match value {
            Value::List(items) => items,
            other => panic!("expected a list, got {:?}", other),
        };
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].get("key").unwrap().as_str(), Some("a"));
        assert_eq!(items[1].get("count").unwrap().as_str(), Some("2"));
    }

    #[test]
    fn round_trips_wrapped_scalars_and_lists() {
        let tags: TableFieldSchema = serde_json::from_value(json!({
            "name": "tags",
            "type": "STRING",
            "mode": "REPEATED"
        }))
        .unwrap();
        let wire = json!([ { "v": "red" }, { "v": "green" }, { "v": "blue" } ]);
        assert_eq!(
            unwrap_value(&wire, &tags).unwrap(),
            Value::List(vec![
                Value::Scalar(json!("red")),
                Value::Scalar(json!("green")),
                Value::Scalar(json!("blue")),
            ])
        );
        // already-plain scalars pass through untouched
        let plain: TableFieldSchema =
            serde_json::from_value(json!({ "name": "n", "type": "INTEGER" })).unwrap();
        assert_eq!(
            unwrap_value(&json!("42"), &plain).unwrap(),
            Value::Scalar(json!("42"))
        );
    }

    #[test]
    fn malformed_cell_is_a_decode_error() {
        let addr: TableFieldSchema = serde_json::from_value(json!({
            "name": "addr",
            "type": "RECORD",
            "mode": "NULLABLE",
            "fields": [ { "name": "city", "type": "STRING", "mode": "NULLABLE" } ]
        }))
        .unwrap();
        let wire = json!({ "x": "neither value nor fields" });
        match unwrap_value(&wire, &addr) {
            Err(BigQueryError::DecodeInvariant(_)) => {}
            other => panic!("expected a decode invariant error, got {:?}", other),
        }
    }

    #[test]
    fn record_cells_under_childless_field_are_a_decode_error() {
        let plain: TableFieldSchema =
            serde_json::from_value(json!({ "name": "n", "type": "STRING" })).unwrap();
        let wire = json!({ "f": [ { "v": "oops" } ] });
        match unwrap_value(&wire, &plain) {
            Err(BigQueryError::DecodeInvariant(_)) => {}
            other => panic!("expected a decode invariant error, got {:?}", other),
        }
    }

    #[test]
    fn cell_count_must_match_schema() {
        let schema = schema(json!([
            { "name": "a", "type": "STRING", "mode": "NULLABLE" },
            { "name": "b", "type": "STRING", "mode": "NULLABLE" }
        ]));
        let row: TableRow = serde_json::from_value(json!({ "f": [ { "v": "only one" } ] })).unwrap();
        match decode_row(&row, &schema.fields) {
            Err(BigQueryError::RowSchemaMismatch(_)) => {}
            other => panic!("expected a schema mismatch error, got {:?}", other),
        }
    }
}
