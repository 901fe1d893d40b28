use crate::adapters::{coerce, FormatAdapter, SourceFormat};
use crate::domain::model::{Record, SchemaFamily};
use crate::utils::error::{EtlError, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use std::path::Path;

const RECORD_DEPTH: usize = 2;
const FIELD_DEPTH: usize = 3;

/// Reads `<root><tag><field>text</field>...</tag>...</root>` documents where
/// `tag` is the schema's record tag. Only flat records are supported.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlAdapter;

/// Leaf texts of the record element being read.
struct PendingRecord {
    texts: Vec<Option<String>>,
    collecting: Option<usize>,
}

impl PendingRecord {
    fn new(schema: SchemaFamily) -> Self {
        Self {
            texts: vec![None; schema.fields().len()],
            collecting: None,
        }
    }

    /// Marks a field child as present. The first occurrence wins.
    fn open_field(&mut self, schema: SchemaFamily, name: &[u8]) -> Option<usize> {
        let name = std::str::from_utf8(name).ok()?;
        let index = schema.field_index(name)?;
        if self.texts[index].is_some() {
            return None;
        }
        self.texts[index] = Some(String::new());
        Some(index)
    }

    fn push_text(&mut self, text: &str) {
        if let Some(i) = self.collecting {
            if let Some(buf) = self.texts[i].as_mut() {
                buf.push_str(text);
            }
        }
    }

    fn finish(self, schema: SchemaFamily) -> Record {
        let mut record = Record::empty(schema);
        for (i, (field, text)) in schema.fields().iter().zip(self.texts).enumerate() {
            record.set(i, coerce::from_xml_text(field.kind, text.as_deref()));
        }
        record
    }
}

fn is_tag(start: &BytesStart<'_>, tag: &str) -> bool {
    start.local_name().as_ref() == tag.as_bytes()
}

impl FormatAdapter for XmlAdapter {
    fn format(&self) -> SourceFormat {
        SourceFormat::Xml
    }

    fn parse_bytes(&self, path: &Path, data: &[u8], schema: SchemaFamily) -> Result<Vec<Record>> {
        let malformed = |message: String| EtlError::malformed(path, SourceFormat::Xml, message);

        let text = std::str::from_utf8(data).map_err(|e| malformed(e.to_string()))?;
        let mut reader = Reader::from_str(text);
        let tag = schema.xml_record_tag();

        let mut records = Vec::new();
        let mut pending: Option<PendingRecord> = None;
        let mut depth = 0usize;
        let mut root_seen = false;

        loop {
            let event = reader.read_event().map_err(|e| {
                malformed(format!("at byte {}: {}", reader.buffer_position(), e))
            })?;

            match event {
                Event::Start(start) => {
                    depth += 1;
                    match depth {
                        1 if root_seen => return Err(malformed("multiple root elements".into())),
                        1 => root_seen = true,
                        RECORD_DEPTH if is_tag(&start, tag) => {
                            pending = Some(PendingRecord::new(schema));
                        }
                        RECORD_DEPTH => tracing::warn!(
                            "{}: skipping unexpected element <{}>",
                            path.display(),
                            String::from_utf8_lossy(start.local_name().as_ref())
                        ),
                        FIELD_DEPTH => {
                            if let Some(p) = pending.as_mut() {
                                p.collecting = p.open_field(schema, start.local_name().as_ref());
                            }
                        }
                        _ => {
                            // nested child ends the field's own text
                            if let Some(p) = pending.as_mut() {
                                p.collecting = None;
                            }
                        }
                    }
                }
                Event::Empty(start) => match depth + 1 {
                    1 if root_seen => return Err(malformed("multiple root elements".into())),
                    1 => root_seen = true,
                    RECORD_DEPTH if is_tag(&start, tag) => {
                        records.push(Record::empty(schema));
                    }
                    RECORD_DEPTH => tracing::warn!(
                        "{}: skipping unexpected element <{}/>",
                        path.display(),
                        String::from_utf8_lossy(start.local_name().as_ref())
                    ),
                    FIELD_DEPTH => {
                        if let Some(p) = pending.as_mut() {
                            p.open_field(schema, start.local_name().as_ref());
                        }
                    }
                    _ => {
                        if let Some(p) = pending.as_mut() {
                            p.collecting = None;
                        }
                    }
                },
                Event::Text(t) => {
                    let content = t.unescape().map_err(|e| malformed(e.to_string()))?;
                    if depth == 0 && !content.trim().is_empty() {
                        return Err(malformed("text outside the root element".into()));
                    }
                    if depth == FIELD_DEPTH {
                        if let Some(p) = pending.as_mut() {
                            p.push_text(&content);
                        }
                    }
                }
                Event::CData(c) => {
                    if depth == FIELD_DEPTH {
                        if let Some(p) = pending.as_mut() {
                            p.push_text(&String::from_utf8_lossy(&c));
                        }
                    }
                }
                Event::End(_) => {
                    match depth {
                        0 => return Err(malformed("unbalanced closing tag".into())),
                        RECORD_DEPTH => {
                            if let Some(p) = pending.take() {
                                records.push(p.finish(schema));
                            }
                        }
                        FIELD_DEPTH => {
                            if let Some(p) = pending.as_mut() {
                                p.collecting = None;
                            }
                        }
                        _ => {}
                    }
                    depth -= 1;
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if depth != 0 {
            return Err(malformed("unexpected end of document".into()));
        }
        if !root_seen {
            return Err(malformed("no root element".into()));
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Value;

    fn parse(data: &str, schema: SchemaFamily) -> Result<Vec<Record>> {
        XmlAdapter.parse_bytes(Path::new("test.xml"), data.as_bytes(), schema)
    }

    #[test]
    fn test_vehicle_record_with_bad_price() {
        let data = "<data><car><car_model>Model T</car_model>\
                    <year_of_manufacture>1920</year_of_manufacture>\
                    <price>abc</price><fuel>Gas</fuel></car></data>";
        let records = parse(data, SchemaFamily::Vehicle).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].values(),
            &[
                Some(Value::Text("Model T".into())),
                Some(Value::Integer(1920)),
                None,
                Some(Value::Text("Gas".into())),
            ]
        );
    }

    #[test]
    fn test_pretty_printed_document() {
        let data = r#"<?xml version="1.0"?>
<data>
    <car>
        <car_model>corolla altis</car_model>
        <year_of_manufacture>2009</year_of_manufacture>
        <price>5597.014925373134</price>
        <fuel>Petrol</fuel>
    </car>
    <car>
        <car_model>etios &amp; co</car_model>
        <year_of_manufacture>-2015</year_of_manufacture>
        <price>7089.552238805969</price>
    </car>
</data>
"#;
        let records = parse(data, SchemaFamily::Vehicle).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("price"), Some(&Value::Float(5597.014925373134)));
        assert_eq!(records[1].get("car_model"), Some(&Value::Text("etios & co".into())));
        assert_eq!(records[1].get("year_of_manufacture"), None);
        assert_eq!(records[1].get("fuel"), None);
    }

    #[test]
    fn test_empty_children_and_empty_record() {
        let data = "<people><person><name/><height>70</height><weight></weight></person><person/></people>";
        let records = parse(data, SchemaFamily::Person).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].values(), &[None, Some(Value::Float(70.0)), None]);
        assert_eq!(records[1], Record::empty(SchemaFamily::Person));
    }

    #[test]
    fn test_unexpected_elements_are_skipped() {
        let data = "<people><meta><name>x</name></meta><person><name>Ann</name></person></people>";
        let records = parse(data, SchemaFamily::Person).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("name"), Some(&Value::Text("Ann".into())));
    }

    #[test]
    fn test_self_closing_unexpected_element_is_skipped() {
        let data = "<people><other/><person><name>Ann</name></person><other/></people>";
        let records = parse(data, SchemaFamily::Person).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("name"), Some(&Value::Text("Ann".into())));
    }

    #[test]
    fn test_first_duplicate_child_wins_and_nested_text_ignored() {
        let data = "<people><person>\
                    <name>Ann<nick>A</nick>tail</name><name>Other</name>\
                    </person></people>";
        let records = parse(data, SchemaFamily::Person).unwrap();
        assert_eq!(records[0].get("name"), Some(&Value::Text("Ann".into())));
    }

    #[test]
    fn test_empty_root_yields_no_records() {
        assert!(parse("<data/>", SchemaFamily::Vehicle).unwrap().is_empty());
        assert!(parse("<data></data>", SchemaFamily::Vehicle).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_documents() {
        for data in [
            "",
            "<data><car><price>1</car></data>",
            "<data><car><price>1</price></car>",
            "<a/><b/>",
        ] {
            let err = parse(data, SchemaFamily::Vehicle).unwrap_err();
            assert!(
                matches!(err, EtlError::MalformedFile { format: SourceFormat::Xml, .. }),
                "expected malformed for {data:?}, got {err}"
            );
        }
    }
}
