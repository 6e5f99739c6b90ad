use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, AsArray, Float32Array, Float64Array, Int32Array, Int64Array};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::model::{Dataset, Record, Species};

/// The dataset compiled into the binary.
const BUNDLED_CSV: &str = include_str!("../../assets/penguins.csv");

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the bundled Palmer penguins table.
pub fn load_bundled() -> Result<Dataset> {
    load_csv_reader(BUNDLED_CSV.as_bytes()).context("parsing bundled penguins dataset")
}

/// Load a penguins dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with at least the columns `species`, `island`,
///   `bill_length_mm`, `bill_depth_mm` and `body_mass_g`
/// * `.json`    – `[{ "species": "Adelie", "island": ..., ... }, ...]`
/// * `.parquet` – same column names, numeric columns as float or int
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path).context("opening CSV file")?;
            load_csv_reader(file)
        }
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    if dataset.is_empty() {
        bail!("{} contains no records", path.display());
    }
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Missing-value handling
// ---------------------------------------------------------------------------

fn is_missing(s: &str) -> bool {
    let s = s.trim();
    s.is_empty() || s.eq_ignore_ascii_case("na") || s.eq_ignore_ascii_case("nan")
}

fn parse_measure(s: &str, row: usize, col: &str) -> Result<Option<f64>> {
    if is_missing(s) {
        return Ok(None);
    }
    let v = s
        .trim()
        .parse::<f64>()
        .with_context(|| format!("Row {row}, {col}: '{s}' is not a number"))?;
    Ok(Some(v))
}

fn parse_year(s: &str, row: usize) -> Result<Option<i64>> {
    if is_missing(s) {
        return Ok(None);
    }
    let v = s
        .trim()
        .parse::<i64>()
        .with_context(|| format!("Row {row}, year: '{s}' is not a whole year"))?;
    Ok(Some(v))
}

fn parse_text(s: &str) -> Option<String> {
    (!is_missing(s)).then(|| s.trim().to_string())
}

fn parse_species(s: &str, row: usize) -> Result<Species> {
    s.parse::<Species>()
        .with_context(|| format!("Row {row}: invalid species"))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// One CSV row as text; `NA` cells are resolved in [`CsvRow::into_record`].
#[derive(Debug, Deserialize)]
struct CsvRow {
    species: String,
    island: String,
    bill_length_mm: String,
    bill_depth_mm: String,
    #[serde(default)]
    flipper_length_mm: String,
    body_mass_g: String,
    #[serde(default)]
    sex: String,
    #[serde(default)]
    year: String,
}

impl CsvRow {
    fn into_record(self, row: usize) -> Result<Record> {
        Ok(Record {
            species: parse_species(&self.species, row)?,
            island: self.island.trim().to_string(),
            bill_length_mm: parse_measure(&self.bill_length_mm, row, "bill_length_mm")?,
            bill_depth_mm: parse_measure(&self.bill_depth_mm, row, "bill_depth_mm")?,
            flipper_length_mm: parse_measure(&self.flipper_length_mm, row, "flipper_length_mm")?,
            body_mass_g: parse_measure(&self.body_mass_g, row, "body_mass_g")?,
            sex: parse_text(&self.sex),
            year: parse_year(&self.year, row)?,
        })
    }
}

fn load_csv_reader<R: Read>(reader: R) -> Result<Dataset> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut records = Vec::new();

    for (row_no, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;
        records.push(row.into_record(row_no)?);
    }

    Ok(Dataset::from_records(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "species": "Adelie", "island": "Torgersen",
///     "bill_length_mm": 39.1, "bill_depth_mm": 18.7,
///     "body_mass_g": 3750, "sex": "male", "year": 2007 },
///   ...
/// ]
/// ```
///
/// Missing values may be `null`, absent, or the string `"NA"`.
fn load_json(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

fn parse_json(text: &str) -> Result<Dataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let rows = root.as_array().context("Expected top-level JSON array")?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let text_field = |key: &str| obj.get(key).and_then(json_to_text);
        let number_field = |key: &str| -> Result<Option<f64>> {
            match obj.get(key) {
                None | Some(JsonValue::Null) => Ok(None),
                Some(JsonValue::Number(n)) => Ok(n.as_f64()),
                Some(JsonValue::String(s)) => parse_measure(s, i, key),
                Some(other) => bail!("Row {i}, {key}: expected a number, got {other}"),
            }
        };

        let year = match obj.get("year") {
            None | Some(JsonValue::Null) => None,
            Some(JsonValue::Number(n)) => Some(
                n.as_i64()
                    .with_context(|| format!("Row {i}, year: {n} is not a whole year"))?,
            ),
            Some(JsonValue::String(s)) => parse_year(s, i)?,
            Some(other) => bail!("Row {i}, year: expected a number, got {other}"),
        };

        let species = text_field("species").with_context(|| format!("Row {i}: missing species"))?;
        records.push(Record {
            species: parse_species(&species, i)?,
            island: text_field("island").unwrap_or_default(),
            bill_length_mm: number_field("bill_length_mm")?,
            bill_depth_mm: number_field("bill_depth_mm")?,
            flipper_length_mm: number_field("flipper_length_mm")?,
            body_mass_g: number_field("body_mass_g")?,
            sex: text_field("sex"),
            year,
        });
    }

    Ok(Dataset::from_records(records))
}

fn json_to_text(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::String(s) => parse_text(s),
        JsonValue::Null => None,
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with the penguins columns.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`); numeric columns may be Float64,
/// Float32, Int64 or Int32, `year` must be Int64 or Int32, and nulls become
/// missing values.
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        records_from_batch(&batch, records.len(), &mut records)?;
    }

    Ok(Dataset::from_records(records))
}

fn records_from_batch(batch: &RecordBatch, first_row: usize, out: &mut Vec<Record>) -> Result<()> {
    let column = |name: &str| batch.schema().index_of(name).ok().map(|i| batch.column(i).clone());
    let required = |name: &str| {
        column(name).with_context(|| format!("Parquet file missing '{name}' column"))
    };

    let species = required("species")?;
    let island = required("island")?;
    let bill_length = required("bill_length_mm")?;
    let bill_depth = required("bill_depth_mm")?;
    let body_mass = required("body_mass_g")?;
    let flipper = column("flipper_length_mm");
    let sex = column("sex");
    let year = column("year");

    for row in 0..batch.num_rows() {
        let row_no = first_row + row;
        let label = extract_text(&species, row)?
            .with_context(|| format!("Row {row_no}: missing species"))?;
        let optional_number = |col: &Option<Arc<dyn Array>>| -> Result<Option<f64>> {
            col.as_ref().map_or(Ok(None), |c| extract_f64(c, row))
        };
        let optional_text = |col: &Option<Arc<dyn Array>>| -> Result<Option<String>> {
            col.as_ref().map_or(Ok(None), |c| extract_text(c, row))
        };

        out.push(Record {
            species: parse_species(&label, row_no)?,
            island: extract_text(&island, row)?.unwrap_or_default(),
            bill_length_mm: extract_f64(&bill_length, row)?,
            bill_depth_mm: extract_f64(&bill_depth, row)?,
            flipper_length_mm: optional_number(&flipper)?,
            body_mass_g: extract_f64(&body_mass, row)?,
            sex: optional_text(&sex)?,
            year: year.as_ref().map_or(Ok(None), |c| extract_i64(c, row))?,
        });
    }
    Ok(())
}

// -- Arrow helpers --

/// Extract a numeric cell as `f64`; nulls and NaN are missing.
fn extract_f64(col: &Arc<dyn Array>, row: usize) -> Result<Option<f64>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let value = match col.data_type() {
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .map(|a| a.value(row)),
        DataType::Float32 => col
            .as_any()
            .downcast_ref::<Float32Array>()
            .map(|a| a.value(row) as f64),
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .map(|a| a.value(row) as f64),
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .map(|a| a.value(row) as f64),
        other => bail!("Expected a numeric column, got {other:?}"),
    }
    .context("numeric column does not match its declared type")?;
    Ok((!value.is_nan()).then_some(value))
}

/// Extract an integer cell; nulls are missing.
fn extract_i64(col: &Arc<dyn Array>, row: usize) -> Result<Option<i64>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let value = match col.data_type() {
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .map(|a| a.value(row)),
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .map(|a| a.value(row) as i64),
        other => bail!("Expected an integer column, got {other:?}"),
    }
    .context("integer column does not match its declared type")?;
    Ok(Some(value))
}

/// Extract a string cell; nulls and `NA` are missing.
fn extract_text(col: &Arc<dyn Array>, row: usize) -> Result<Option<String>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let value = match col.data_type() {
        DataType::Utf8 => col.as_string::<i32>().value(row),
        DataType::LargeUtf8 => col.as_string::<i64>().value(row),
        other => bail!("Expected a string column, got {other:?}"),
    };
    Ok(parse_text(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Float64Array, Int32Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use parquet::arrow::ArrowWriter;

    const CSV: &str = "\
species,island,bill_length_mm,bill_depth_mm,flipper_length_mm,body_mass_g,sex,year
Adelie,Torgersen,39.1,18.7,181,3750,male,2007
Adelie,Torgersen,NA,NA,NA,NA,NA,2007
Gentoo,Biscoe,46.1,13.2,211,4500,female,2008
";

    #[test]
    fn test_bundled_dataset_loads() {
        let ds = load_bundled().expect("bundled data parses");
        assert_eq!(ds.len(), 344);
        assert_eq!(ds.species().len(), 3);
        let unmeasured = ds
            .records()
            .iter()
            .filter(|r| r.body_mass_g.is_none() && r.bill_length_mm.is_none())
            .count();
        assert_eq!(unmeasured, 2);
        assert!(ds.records().iter().all(|r| r.year.is_some()));
    }

    #[test]
    fn test_bundled_filter_counts() {
        use crate::data::filter::{filtered_indices, FilterState};

        let ds = load_bundled().expect("bundled data parses");
        // Four Gentoo weigh 6000 g or more; the comparison is strict.
        assert_eq!(filtered_indices(&ds, &FilterState::default()).len(), 338);
        let weighed = FilterState::new(Species::ALL, f64::INFINITY);
        assert_eq!(filtered_indices(&ds, &weighed).len(), 342);
        let gentoo = FilterState::new([Species::Gentoo], 5000.0);
        assert_eq!(filtered_indices(&ds, &gentoo).len(), 56);
    }

    #[test]
    fn test_csv_missing_values() {
        let ds = load_csv_reader(CSV.as_bytes()).expect("valid csv");
        assert_eq!(ds.len(), 3);
        let first = &ds.records()[0];
        assert_eq!(first.species, Species::Adelie);
        assert_eq!(first.body_mass_g, Some(3750.0));
        assert_eq!(first.sex.as_deref(), Some("male"));
        let missing = &ds.records()[1];
        assert_eq!(missing.bill_length_mm, None);
        assert_eq!(missing.body_mass_g, None);
        assert_eq!(missing.sex, None);
        assert_eq!(missing.year, Some(2007));
    }

    #[test]
    fn test_csv_optional_columns() {
        let csv = "species,island,bill_length_mm,bill_depth_mm,body_mass_g\nChinstrap,Dream,46.5,17.9,3500\n";
        let ds = load_csv_reader(csv.as_bytes()).expect("valid csv");
        let r = &ds.records()[0];
        assert_eq!(r.species, Species::Chinstrap);
        assert_eq!(r.flipper_length_mm, None);
        assert_eq!(r.year, None);
    }

    #[test]
    fn test_csv_rejects_bad_values() {
        let bad_species = "species,island,bill_length_mm,bill_depth_mm,body_mass_g\nEmperor,Ross,1,1,1\n";
        assert!(load_csv_reader(bad_species.as_bytes()).is_err());

        let bad_number = "species,island,bill_length_mm,bill_depth_mm,body_mass_g\nAdelie,Dream,long,1,1\n";
        let err = load_csv_reader(bad_number.as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("bill_length_mm"));

        let fractional_year = "species,island,bill_length_mm,bill_depth_mm,body_mass_g,year\nAdelie,Dream,1,1,1,2007.9\n";
        let err = load_csv_reader(fractional_year.as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("year"));

        let missing_column = "species,island,bill_length_mm\nAdelie,Dream,1\n";
        assert!(load_csv_reader(missing_column.as_bytes()).is_err());
    }

    #[test]
    fn test_json_records() {
        let json = r#"[
            {"species": "Adelie", "island": "Dream", "bill_length_mm": 39.5,
             "bill_depth_mm": 17.4, "body_mass_g": 3800, "year": 2007},
            {"species": "Gentoo", "island": "Biscoe", "bill_length_mm": null,
             "bill_depth_mm": "NA", "body_mass_g": 5700, "sex": "NA"}
        ]"#;
        let ds = parse_json(json).expect("valid json");
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records()[0].body_mass_g, Some(3800.0));
        assert_eq!(ds.records()[0].year, Some(2007));
        assert_eq!(ds.records()[1].bill_length_mm, None);
        assert_eq!(ds.records()[1].bill_depth_mm, None);
        assert_eq!(ds.records()[1].sex, None);

        assert!(parse_json(r#"[{"species": "Adelie", "year": 2007.9}]"#).is_err());
        assert!(parse_json(r#"[{"species": "Adelie", "year": "2007.9"}]"#).is_err());
        let ds = parse_json(r#"[{"species": "Adelie", "year": "2009"}]"#).expect("valid json");
        assert_eq!(ds.records()[0].year, Some(2009));

        assert!(parse_json(r#"{"species": "Adelie"}"#).is_err());
        assert!(parse_json(r#"[{"island": "Dream"}]"#).is_err());
    }

    #[test]
    fn test_parquet_roundtrip_with_nulls() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("species", DataType::Utf8, false),
            Field::new("island", DataType::Utf8, false),
            Field::new("bill_length_mm", DataType::Float64, true),
            Field::new("bill_depth_mm", DataType::Float64, true),
            Field::new("body_mass_g", DataType::Int64, true),
            Field::new("year", DataType::Int32, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["Adelie", "Gentoo"])),
                Arc::new(StringArray::from(vec!["Torgersen", "Biscoe"])),
                Arc::new(Float64Array::from(vec![Some(39.1), None])),
                Arc::new(Float64Array::from(vec![Some(18.7), Some(f64::NAN)])),
                Arc::new(Int64Array::from(vec![Some(3750), None])),
                Arc::new(Int32Array::from(vec![Some(2007), None])),
            ],
        )
        .expect("valid batch");

        let path = std::env::temp_dir().join(format!(
            "penguins-dashboard-test-{}.parquet",
            std::process::id()
        ));
        let file = std::fs::File::create(&path).expect("create temp file");
        let mut writer = ArrowWriter::try_new(file, schema, None).expect("writer");
        writer.write(&batch).expect("write batch");
        writer.close().expect("close writer");

        let loaded = load_file(&path);
        let _ = std::fs::remove_file(&path);
        let ds = loaded.expect("parquet loads");

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records()[0].body_mass_g, Some(3750.0));
        assert_eq!(ds.records()[1].species, Species::Gentoo);
        assert_eq!(ds.records()[1].bill_length_mm, None);
        assert_eq!(ds.records()[1].bill_depth_mm, None);
        assert_eq!(ds.records()[1].body_mass_g, None);
        assert_eq!(ds.records()[0].year, Some(2007));
        assert_eq!(ds.records()[1].year, None);
    }

    #[test]
    fn test_unsupported_extension() {
        let err = load_file(Path::new("penguins.xlsx")).unwrap_err();
        assert!(format!("{err:#}").contains("Unsupported file extension"));
    }
}
