use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::error::{EtlError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Integer,
    Float,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldType,
}

const fn field(name: &'static str, kind: FieldType) -> Field {
    Field { name, kind }
}

const VEHICLE_FIELDS: [Field; 4] = [
    field("car_model", FieldType::Text),
    field("year_of_manufacture", FieldType::Integer),
    field("price", FieldType::Float),
    field("fuel", FieldType::Text),
];

const PERSON_FIELDS: [Field; 3] = [
    field("name", FieldType::Text),
    field("height", FieldType::Float),
    field("weight", FieldType::Float),
];

/// The set of typed fields every record of a run shares.
///
/// Chosen once per run by configuration; never inferred from the source files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum SchemaFamily {
    Vehicle,
    Person,
}

impl SchemaFamily {
    pub fn fields(&self) -> &'static [Field] {
        match self {
            SchemaFamily::Vehicle => &VEHICLE_FIELDS,
            SchemaFamily::Person => &PERSON_FIELDS,
        }
    }

    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields().iter().map(|f| f.name).collect()
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields().iter().position(|f| f.name == name)
    }

    /// Tag of the repeated element holding one record in XML sources.
    pub fn xml_record_tag(&self) -> &'static str {
        match self {
            SchemaFamily::Vehicle => "car",
            SchemaFamily::Person => "person",
        }
    }
}

impl fmt::Display for SchemaFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaFamily::Vehicle => write!(f, "vehicle"),
            SchemaFamily::Person => write!(f, "person"),
        }
    }
}

impl std::str::FromStr for SchemaFamily {
    type Err = EtlError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vehicle" => Ok(SchemaFamily::Vehicle),
            "person" => Ok(SchemaFamily::Person),
            other => Err(EtlError::InvalidConfigValueError {
                field: "schema".to_string(),
                value: other.to_string(),
                reason: "Supported schemas: vehicle, person".to_string(),
            }),
        }
    }
}

/// A non-null field value. Absence is modelled as `None` at the record level.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl Value {
    pub fn kind(&self) -> FieldType {
        match self {
            Value::Text(_) => FieldType::Text,
            Value::Integer(_) => FieldType::Integer,
            Value::Float(_) => FieldType::Float,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(v) => Some(*v as f64),
            Value::Text(_) => None,
        }
    }

    /// Textual form used in CSV output. Floats always keep a fractional part.
    pub fn render(&self) -> String {
        match self {
            Value::Text(s) => s.clone(),
            Value::Integer(v) => v.to_string(),
            Value::Float(v) => {
                let s = v.to_string();
                if s.contains('.') || !v.is_finite() {
                    s
                } else {
                    format!("{}.0", s)
                }
            }
        }
    }
}

/// One normalized row: exactly one slot per schema field, in declared order.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    schema: SchemaFamily,
    values: Vec<Option<Value>>,
}

impl Record {
    pub fn new(schema: SchemaFamily, values: Vec<Option<Value>>) -> Result<Self> {
        let fields = schema.fields();
        if values.len() != fields.len() {
            return Err(EtlError::SchemaMismatch {
                schema: schema.to_string(),
                message: format!("expected {} fields, got {}", fields.len(), values.len()),
            });
        }

        for (field, value) in fields.iter().zip(&values) {
            if let Some(value) = value {
                if value.kind() != field.kind {
                    return Err(EtlError::SchemaMismatch {
                        schema: schema.to_string(),
                        message: format!(
                            "field '{}' expects {:?}, got {:?}",
                            field.name,
                            field.kind,
                            value.kind()
                        ),
                    });
                }
            }
        }

        Ok(Self { schema, values })
    }

    /// A record with every field null.
    pub fn empty(schema: SchemaFamily) -> Self {
        Self {
            schema,
            values: vec![None; schema.fields().len()],
        }
    }

    pub fn schema(&self) -> SchemaFamily {
        self.schema
    }

    pub fn values(&self) -> &[Option<Value>] {
        &self.values
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.schema
            .field_index(name)
            .and_then(|i| self.values[i].as_ref())
    }

    /// Returns a copy of this record with `name` replaced by the result of `f`.
    ///
    /// `f` must keep the field's declared type; unknown names leave the record unchanged.
    pub fn map_field<F>(mut self, name: &str, f: F) -> Self
    where
        F: FnOnce(Option<Value>) -> Option<Value>,
    {
        if let Some(i) = self.schema.field_index(name) {
            let kind = self.schema.fields()[i].kind;
            let mapped = f(self.values[i].take());
            debug_assert!(mapped.as_ref().map_or(true, |v| v.kind() == kind));
            self.values[i] = mapped;
        }
        self
    }

    pub(crate) fn set(&mut self, index: usize, value: Option<Value>) {
        self.values[index] = value;
    }
}

/// Ordered sequence of records sharing one schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    schema: SchemaFamily,
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(schema: SchemaFamily) -> Self {
        Self {
            schema,
            records: Vec::new(),
        }
    }

    pub fn from_records(schema: SchemaFamily, records: Vec<Record>) -> Result<Self> {
        let mut dataset = Self::new(schema);
        dataset.append(records)?;
        Ok(dataset)
    }

    pub fn schema(&self) -> SchemaFamily {
        self.schema
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rewrites every record, keeping order. `f` must not change a record's schema.
    pub fn map_records<F>(self, f: F) -> Dataset
    where
        F: FnMut(Record) -> Record,
    {
        let schema = self.schema;
        let records: Vec<Record> = self.records.into_iter().map(f).collect();
        debug_assert!(records.iter().all(|r| r.schema() == schema));
        Dataset { schema, records }
    }

    /// Appends one adapter batch, keeping its order.
    pub fn append(&mut self, records: Vec<Record>) -> Result<()> {
        if let Some(bad) = records.iter().find(|r| r.schema() != self.schema) {
            return Err(EtlError::SchemaMismatch {
                schema: self.schema.to_string(),
                message: format!("cannot append a {} record", bad.schema()),
            });
        }
        self.records.extend(records);
        Ok(())
    }
}
