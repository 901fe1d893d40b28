use crate::domain::model::{Dataset, Record, SchemaFamily, Value};

pub const MM_PER_INCH: f64 = 25.4;
pub const KG_PER_POUND: f64 = 0.45359237;

/// Rounds to `decimals` places, ties to even.
///
/// The value is scaled, rounded and scaled back, so a tie is only a tie when
/// the scaled binary value is exactly halfway: `0.125` gives `0.12`, while
/// `1.005` (scaled to 100.49999...) gives `1.0`.
pub fn round_half_even(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round_ties_even() / factor
}

fn round2(value: Option<Value>) -> Option<Value> {
    scale_and_round(value, 1.0)
}

// results that overflow to infinity become null
fn scale_and_round(value: Option<Value>, factor: f64) -> Option<Value> {
    value
        .and_then(|v| v.as_f64())
        .map(|v| round_half_even(v * factor, 2))
        .filter(|v| v.is_finite())
        .map(Value::Float)
}

/// Applies the schema's field rules. Pure and total.
#[derive(Debug, Clone, Copy)]
pub struct Transformer {
    schema: SchemaFamily,
}

impl Transformer {
    pub fn new(schema: SchemaFamily) -> Self {
        Self { schema }
    }

    pub fn transform(&self, data: Dataset) -> Dataset {
        debug_assert_eq!(data.schema(), self.schema);
        let dataset = data.map_records(|record| self.transform_record(record));
        tracing::debug!("Transformed {} {} records", dataset.len(), dataset.schema());
        dataset
    }

    pub fn transform_record(&self, record: Record) -> Record {
        match self.schema {
            SchemaFamily::Vehicle => record.map_field("price", round2),
            SchemaFamily::Person => record
                .map_field("height", |v| scale_and_round(v, MM_PER_INCH))
                .map_field("weight", |v| scale_and_round(v, KG_PER_POUND)),
        }
    }
}
