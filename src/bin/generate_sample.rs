//! Write a synthetic language collection as JSON and as a wide Parquet table.
//!
//! Usage: `generate_sample [count] [seed]`

use std::collections::BTreeSet;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, StringArray, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use wals_explorer::data::model::Language;
use wals_explorer::data::synthetic::generate_languages;

fn string_column<'a>(values: impl Iterator<Item = Option<&'a str>>) -> ArrayRef {
    Arc::new(StringArray::from(values.collect::<Vec<_>>()))
}

fn write_parquet(languages: &[Language], output_path: &str) {
    let feature_keys: BTreeSet<&str> = languages
        .iter()
        .flat_map(|l| l.features.keys().map(String::as_str))
        .collect();

    let mut fields = vec![
        Field::new("id", DataType::Utf8, false),
        Field::new("name", DataType::Utf8, false),
        Field::new("family", DataType::Utf8, false),
        Field::new("latitude", DataType::Float64, false),
        Field::new("longitude", DataType::Float64, false),
        Field::new("macroarea", DataType::Utf8, true),
        Field::new("speakers", DataType::UInt64, true),
        Field::new("iso_code", DataType::Utf8, true),
    ];
    let mut columns: Vec<ArrayRef> = vec![
        string_column(languages.iter().map(|l| Some(l.id.as_str()))),
        string_column(languages.iter().map(|l| Some(l.name.as_str()))),
        string_column(languages.iter().map(|l| Some(l.family.as_str()))),
        Arc::new(Float64Array::from(
            languages.iter().map(|l| l.latitude).collect::<Vec<_>>(),
        )),
        Arc::new(Float64Array::from(
            languages.iter().map(|l| l.longitude).collect::<Vec<_>>(),
        )),
        string_column(languages.iter().map(|l| l.macroarea.as_deref())),
        Arc::new(UInt64Array::from(
            languages.iter().map(|l| l.speakers).collect::<Vec<_>>(),
        )),
        string_column(languages.iter().map(|l| l.iso_code.as_deref())),
    ];
    for key in &feature_keys {
        fields.push(Field::new(*key, DataType::Utf8, true));
        columns.push(string_column(
            languages
                .iter()
                .map(|l| l.features.get(*key).map(String::as_str)),
        ));
    }

    let schema = Arc::new(Schema::new(fields));
    let batch =
        RecordBatch::try_new(schema.clone(), columns).expect("Failed to create RecordBatch");

    let file = std::fs::File::create(output_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    println!(
        "Wrote {} languages ({} feature columns) to {output_path}",
        languages.len(),
        feature_keys.len()
    );
}

fn main() {
    let mut args = std::env::args().skip(1);
    let count: usize = args
        .next()
        .map(|a| a.parse().expect("count must be a number"))
        .unwrap_or(300);
    let seed: u64 = args
        .next()
        .map(|a| a.parse().expect("seed must be a number"))
        .unwrap_or(42);

    let languages = generate_languages(count, seed);

    let json_path = "sample_languages.json";
    let file = std::fs::File::create(json_path).expect("Failed to create output file");
    serde_json::to_writer_pretty(std::io::BufWriter::new(file), &languages)
        .expect("Failed to write JSON");
    println!("Wrote {} languages to {json_path}", languages.len());

    write_parquet(&languages, "sample_languages.parquet");
}
