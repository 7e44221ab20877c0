use std::collections::{BTreeMap, HashSet};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
    UInt32Array, UInt64Array,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Language, UNKNOWN_FAMILY};
use super::source::LoadError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a language collection from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.json`    – `[{ "id": ..., "name": ..., "features": {...} }, ...]`
/// * `.csv`     – wide table, one column per feature key
/// * `.parquet` – same wide layout as CSV
pub fn load_file(path: &Path) -> Result<Vec<Language>, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let parsed = match ext.as_str() {
        "json" => std::fs::File::open(path)
            .context("opening JSON file")
            .and_then(read_json),
        "csv" => std::fs::File::open(path)
            .context("opening CSV file")
            .and_then(read_csv),
        "parquet" | "pq" => load_parquet(path),
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };

    let languages = parsed.map_err(|cause| LoadError::File {
        path: path.to_path_buf(),
        cause,
    })?;
    ensure_unique_ids(&languages)?;
    log::info!("Parsed {} languages from {}", languages.len(), path.display());
    Ok(languages)
}

/// Ids must be unique within one load.
pub fn ensure_unique_ids(languages: &[Language]) -> Result<(), LoadError> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(languages.len());
    for lang in languages {
        if !seen.insert(lang.id.as_str()) {
            return Err(LoadError::DuplicateId(lang.id.clone()));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   {
///     "id": "lang-0",
///     "name": "English",
///     "family": "Indo-European",
///     "latitude": 52.0,
///     "longitude": 0.0,
///     "features": { "Word Order: Order of Subject, Object and Verb": "SVO" }
///   },
///   ...
/// ]
/// ```
pub fn read_json<R: Read>(reader: R) -> Result<Vec<Language>> {
    let root: JsonValue = serde_json::from_reader(reader).context("parsing JSON")?;

    let records = match root {
        JsonValue::Array(records) => records,
        _ => bail!("Expected top-level JSON array"),
    };

    records
        .into_iter()
        .enumerate()
        .map(|(i, rec)| {
            if !rec.is_object() {
                bail!("Row {i} is not a JSON object");
            }
            serde_json::from_value(rec).with_context(|| format!("Row {i}: invalid language record"))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Wide tables (CSV / Parquet)
// ---------------------------------------------------------------------------

/// Which language field a table column feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Id,
    Name,
    Family,
    Latitude,
    Longitude,
    Macroarea,
    Speakers,
    IsoCode,
    Genus,
    CountryCode,
    Feature,
}

impl Column {
    fn classify(header: &str) -> Column {
        match header.trim().to_ascii_lowercase().as_str() {
            "id" => Column::Id,
            "name" => Column::Name,
            "family" => Column::Family,
            "latitude" | "lat" => Column::Latitude,
            "longitude" | "lon" | "lng" => Column::Longitude,
            "macroarea" => Column::Macroarea,
            "speakers" => Column::Speakers,
            "iso_code" | "isocode" | "iso" => Column::IsoCode,
            "genus" | "genera" => Column::Genus,
            "country_code" | "countrycode" => Column::CountryCode,
            _ => Column::Feature,
        }
    }
}

/// Header layout of a wide table, checked once per file.
struct TableLayout {
    columns: Vec<(Column, String)>,
}

impl TableLayout {
    fn new<'h>(headers: impl IntoIterator<Item = &'h str>) -> Result<Self> {
        let columns: Vec<(Column, String)> = headers
            .into_iter()
            .map(|h| (Column::classify(h), h.to_string()))
            .collect();
        for (required, name) in [
            (Column::Id, "id"),
            (Column::Name, "name"),
            (Column::Latitude, "latitude"),
            (Column::Longitude, "longitude"),
        ] {
            if !columns.iter().any(|(c, _)| *c == required) {
                bail!("table missing '{name}' column");
            }
        }
        Ok(TableLayout { columns })
    }

    /// Build one language from a row of optional display strings, in
    /// header order. Empty cells count as absent.
    fn language(&self, row: usize, cells: Vec<Option<String>>) -> Result<Language> {
        let mut id = None;
        let mut name = None;
        let mut family = None;
        let mut latitude = None;
        let mut longitude = None;
        let mut macroarea = None;
        let mut speakers = None;
        let mut iso_code = None;
        let mut genus = None;
        let mut country_code = None;
        let mut features = BTreeMap::new();

        for ((column, header), cell) in self.columns.iter().zip(cells) {
            let Some(value) = cell.filter(|v| !v.trim().is_empty()) else {
                continue;
            };
            match column {
                Column::Id => id = Some(value),
                Column::Name => name = Some(value),
                Column::Family => family = Some(value),
                Column::Latitude => latitude = Some(parse_degrees(&value, row, header)?),
                Column::Longitude => longitude = Some(parse_degrees(&value, row, header)?),
                Column::Macroarea => macroarea = Some(value),
                Column::Speakers => speakers = parse_speakers(&value, row),
                Column::IsoCode => iso_code = Some(value),
                Column::Genus => genus = Some(value),
                Column::CountryCode => country_code = Some(value),
                Column::Feature => {
                    features.insert(header.clone(), value);
                }
            }
        }

        Ok(Language {
            id: id.with_context(|| format!("Row {row}: missing id"))?,
            name: name.with_context(|| format!("Row {row}: missing name"))?,
            family: family.unwrap_or_else(|| UNKNOWN_FAMILY.to_string()),
            latitude: latitude.with_context(|| format!("Row {row}: missing latitude"))?,
            longitude: longitude.with_context(|| format!("Row {row}: missing longitude"))?,
            macroarea,
            speakers,
            iso_code,
            genus,
            country_code,
            features,
        })
    }
}

fn parse_degrees(s: &str, row: usize, col: &str) -> Result<f64> {
    s.trim()
        .parse::<f64>()
        .with_context(|| format!("Row {row}, {col}: '{s}' is not a number"))
}

/// Speaker counts are advisory; unreadable values are dropped with a warning.
fn parse_speakers(s: &str, row: usize) -> Option<u64> {
    let s = s.trim();
    if let Ok(n) = s.parse::<u64>() {
        return Some(n);
    }
    match s.parse::<f64>() {
        Ok(f) if f.is_finite() && f > 0.0 => Some(f.round() as u64),
        _ => {
            log::warn!("Row {row}: ignoring speaker count '{s}'");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout:  header row with column names.
/// `id`, `name`, `latitude`, `longitude` are required; `family`,
/// `macroarea`, `speakers`, `iso_code`, `genus`, `country_code` optional.
/// Every other column is a feature keyed by its header.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<Language>> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers = reader.headers().context("reading CSV headers")?.clone();
    let layout = TableLayout::new(headers.iter())?;

    let mut languages = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let cells = (0..headers.len())
            .map(|i| record.get(i).map(str::to_string))
            .collect();
        languages.push(layout.language(row_no, cells)?);
    }
    Ok(languages)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with the same wide layout as the CSV loader.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Vec<Language>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut languages = Vec::new();
    let mut row_base = 0;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();
        let layout = TableLayout::new(schema.fields().iter().map(|f| f.name().as_str()))?;

        for row in 0..batch.num_rows() {
            let cells = batch
                .columns()
                .iter()
                .map(|col| cell_to_string(col, row))
                .collect();
            languages.push(layout.language(row_base + row, cells)?);
        }
        row_base += batch.num_rows();
    }

    Ok(languages)
}

/// Display string of a single Arrow cell. `None` for nulls.
fn cell_to_string(col: &Arc<dyn Array>, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    let any = col.as_any();
    let value = match col.data_type() {
        DataType::Utf8 => any.downcast_ref::<StringArray>()?.value(row).to_string(),
        DataType::LargeUtf8 => col.as_string::<i64>().value(row).to_string(),
        DataType::Int32 => any.downcast_ref::<Int32Array>()?.value(row).to_string(),
        DataType::Int64 => any.downcast_ref::<Int64Array>()?.value(row).to_string(),
        DataType::UInt32 => any.downcast_ref::<UInt32Array>()?.value(row).to_string(),
        DataType::UInt64 => any.downcast_ref::<UInt64Array>()?.value(row).to_string(),
        DataType::Float32 => any.downcast_ref::<Float32Array>()?.value(row).to_string(),
        DataType::Float64 => any.downcast_ref::<Float64Array>()?.value(row).to_string(),
        DataType::Boolean => any.downcast_ref::<BooleanArray>()?.value(row).to_string(),
        other => {
            log::warn!("Unsupported parquet column type {other:?}, cell skipped");
            return None;
        }
    };
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_records_parse() {
        let json = r#"[
            {"id":"lang-0","name":"English","family":"Indo-European",
             "latitude":52.0,"longitude":0.0,"isoCode":"eng","speakers":1000,
             "features":{"Word Order: Order of Subject, Object and Verb":"SVO"}},
            {"id":"lang-1","name":"Basque","latitude":43.0,"longitude":-2.0,"macroarea":"Europe"}
        ]"#;
        let langs = read_json(json.as_bytes()).unwrap();
        assert_eq!(langs.len(), 2);
        assert_eq!(
            langs[0].feature("Word Order", "Order of Subject, Object and Verb"),
            Some("SVO")
        );
        assert_eq!(langs[1].family, UNKNOWN_FAMILY);
        assert_eq!(langs[1].macroarea.as_deref(), Some("Europe"));
    }

    #[test]
    fn json_rejects_non_array_and_bad_rows() {
        assert!(read_json(r#"{"id":"x"}"#.as_bytes()).is_err());
        let bad_row = r#"[{"id":"x","name":"X","latitude":"north","longitude":0}]"#;
        let err = read_json(bad_row.as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("Row 0"));
    }

    #[test]
    fn csv_extra_columns_become_features() {
        let csv = "id,name,family,latitude,longitude,speakers,Phonology: Tone System,Tone\n\
                   a,Alpha,Uralic,60.5,25.0,1200,No tones,\n\
                   b,Beta,,10,-5,lots,Complex tone system,High\n";
        let langs = read_csv(csv.as_bytes()).unwrap();
        assert_eq!(langs.len(), 2);
        assert_eq!(langs[0].speakers, Some(1200));
        assert_eq!(langs[0].features.len(), 1);
        assert_eq!(langs[0].features["Phonology: Tone System"], "No tones");
        assert_eq!(langs[1].family, UNKNOWN_FAMILY);
        assert_eq!(langs[1].speakers, None);
        assert_eq!(langs[1].features["Tone"], "High");
    }

    #[test]
    fn csv_requires_core_columns() {
        let err = read_csv("id,name,latitude\na,A,1\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("longitude"));
        let err = read_csv("id,name,latitude,longitude\na,A,x,1\n".as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("not a number"));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let csv = "id,name,latitude,longitude\na,A,1,1\na,B,2,2\n";
        let langs = read_csv(csv.as_bytes()).unwrap();
        match ensure_unique_ids(&langs) {
            Err(LoadError::DuplicateId(id)) => assert_eq!(id, "a"),
            other => panic!("expected duplicate id error, got {other:?}"),
        }
    }

    #[test]
    fn parquet_wide_table_loads() {
        use arrow::array::ArrayRef;
        use arrow::datatypes::{Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let schema = Arc::new(Schema::new(vec![
            Field::new("id", DataType::Utf8, false),
            Field::new("name", DataType::Utf8, false),
            Field::new("latitude", DataType::Float64, false),
            Field::new("longitude", DataType::Float64, false),
            Field::new("speakers", DataType::UInt64, true),
            Field::new("Word Order: Order of Subject, Object and Verb", DataType::Utf8, true),
        ]));
        let columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(vec!["a", "b"])),
            Arc::new(StringArray::from(vec!["Alpha", "Beta"])),
            Arc::new(Float64Array::from(vec![10.5, -3.0])),
            Arc::new(Float64Array::from(vec![20.0, 170.0])),
            Arc::new(UInt64Array::from(vec![Some(5000), None])),
            Arc::new(StringArray::from(vec![Some("SOV"), None])),
        ];
        let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();

        let path = std::env::temp_dir().join(format!("wals-loader-{}.parquet", std::process::id()));
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let langs = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(langs.len(), 2);
        assert_eq!(langs[0].latitude, 10.5);
        assert_eq!(langs[0].speakers, Some(5000));
        assert_eq!(
            langs[0].feature("Word Order", "Order of Subject, Object and Verb"),
            Some("SOV")
        );
        assert_eq!(langs[1].speakers, None);
        assert!(langs[1].features.is_empty());
        assert_eq!(langs[1].family, UNKNOWN_FAMILY);
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        let err = load_file(Path::new("languages.xlsx")).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat(ext) if ext == "xlsx"));
    }
}
