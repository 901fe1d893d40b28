use crate::adapters::{coerce, FormatAdapter, SourceFormat};
use crate::domain::model::{Record, SchemaFamily};
use crate::utils::error::{EtlError, Result};
use std::path::Path;

/// Newline-delimited JSON: one object per non-blank line.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonAdapter;

impl FormatAdapter for JsonAdapter {
    fn format(&self) -> SourceFormat {
        SourceFormat::Json
    }

    fn parse_bytes(&self, path: &Path, data: &[u8], schema: SchemaFamily) -> Result<Vec<Record>> {
        let text = std::str::from_utf8(data)
            .map_err(|e| EtlError::malformed(path, SourceFormat::Json, e))?;

        let mut records = Vec::new();
        for (line_no, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            let value: serde_json::Value = serde_json::from_str(line).map_err(|e| {
                EtlError::malformed(path, SourceFormat::Json, format!("line {}: {}", line_no + 1, e))
            })?;

            let serde_json::Value::Object(obj) = value else {
                return Err(EtlError::malformed(
                    path,
                    SourceFormat::Json,
                    format!("line {}: expected a JSON object", line_no + 1),
                ));
            };

            let mut record = Record::empty(schema);
            for (i, field) in schema.fields().iter().enumerate() {
                let value = obj
                    .get(field.name)
                    .and_then(|raw| coerce::from_json(field.kind, raw));
                record.set(i, value);
            }
            records.push(record);
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Value;

    fn parse(data: &str, schema: SchemaFamily) -> Result<Vec<Record>> {
        JsonAdapter.parse_bytes(Path::new("test.json"), data.as_bytes(), schema)
    }

    #[test]
    fn test_parse_lines() {
        let data = r#"{"car_model":"alto 800","year_of_manufacture":2017,"price":3253.731343283582,"fuel":"Petrol"}
{"car_model":"ciaz","year_of_manufacture":2015,"price":10223.880597014925,"fuel":"Diesel"}
"#;
        let records = parse(data, SchemaFamily::Vehicle).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("car_model"), Some(&Value::Text("alto 800".into())));
        assert_eq!(records[1].get("year_of_manufacture"), Some(&Value::Integer(2015)));
        assert_eq!(records[1].get("price"), Some(&Value::Float(10223.880597014925)));
    }

    #[test]
    fn test_missing_keys_are_null_and_extra_keys_ignored() {
        let data = "{\"name\":\"Ann\",\"age\":31}\n\n{\"height\":\"tall\",\"weight\":150}\n";
        let records = parse(data, SchemaFamily::Person).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].values(), &[Some(Value::Text("Ann".into())), None, None]);
        assert_eq!(records[1].get("name"), None);
        assert_eq!(records[1].get("height"), None);
        assert_eq!(records[1].get("weight"), Some(&Value::Float(150.0)));
    }

    #[test]
    fn test_invalid_json_line_is_malformed() {
        let data = "{\"name\":\"Ann\"}\n{\"name\":\n";
        let err = parse(data, SchemaFamily::Person).unwrap_err();
        match err {
            EtlError::MalformedFile { message, .. } => assert!(message.starts_with("line 2")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_object_line_is_malformed() {
        let err = parse("[1,2,3]\n", SchemaFamily::Person).unwrap_err();
        assert!(matches!(err, EtlError::MalformedFile { .. }));
    }
}
