use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use arrow::array::Array;
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::clean::{clean_genotype, clean_missing, clean_numeric};
use super::error::LoadError;
use super::header::{HeaderMapping, LogicalField};
use super::merge::DonorTable;
use super::model::{DonorAttributes, PatientCollection, PatientRecord};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load patients from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`              – comma separated, header row required
/// * `.tsv` / `.tab`     – tab separated, header row required
/// * `.json`             – `[{ "Donor ID": "D1", "APOE Genotype": "3/4", ... }, ...]`
/// * `.parquet` / `.pq`  – any flat schema; every cell is read as text
///
/// Anything else is read as comma separated. Rows without a usable onset age
/// are dropped before a record is built.
pub fn load_file(path: &Path) -> Result<PatientCollection, LoadError> {
    let mut records = Vec::new();
    let mut skipped = 0usize;

    scan_file(path, |mapping, row| match patient_from_row(mapping, row) {
        Some(record) => records.push(record),
        None => skipped += 1,
    })?;

    log::info!(
        "Loaded {} patients from {} ({skipped} rows without an onset age skipped)",
        records.len(),
        path.display()
    );
    Ok(PatientCollection::from_records(records))
}

/// Load patients from delimited text held by any reader.
pub fn load_reader<R: Read>(reader: R, delimiter: u8) -> Result<PatientCollection, LoadError> {
    let mut records = Vec::new();
    scan_delimited(reader, delimiter, |mapping, row| {
        if let Some(record) = patient_from_row(mapping, row) {
            records.push(record);
        }
    })?;
    Ok(PatientCollection::from_records(records))
}

/// Load a secondary table keyed by donor id. No onset filter is applied;
/// rows without a donor id are ignored and the first row for a donor wins.
pub fn load_donor_table(path: &Path) -> Result<DonorTable, LoadError> {
    let mut table = DonorTable::default();
    scan_file(path, |mapping, row| {
        let Some(donor_id) = clean_missing(mapping.cell(LogicalField::DonorId, row)) else {
            return;
        };
        if !table.insert(donor_id.to_string(), attributes_from_row(mapping, row)) {
            log::warn!("Donor '{donor_id}' appears more than once; keeping the first row");
        }
    })?;

    log::info!("Loaded {} donors from {}", table.len(), path.display());
    Ok(table)
}

// ---------------------------------------------------------------------------
// Row → record
// ---------------------------------------------------------------------------

fn attributes_from_row(mapping: &HeaderMapping, row: &[String]) -> DonorAttributes {
    DonorAttributes {
        genotype: clean_genotype(mapping.cell(LogicalField::Genotype, row)),
        age_of_onset: clean_numeric(mapping.cell(LogicalField::AgeOfOnset, row)).value(),
        age_of_diagnosis: clean_numeric(mapping.cell(LogicalField::AgeOfDiagnosis, row)).value(),
        sex: clean_missing(mapping.cell(LogicalField::Sex, row)).map(str::to_string),
        years_education: clean_numeric(mapping.cell(LogicalField::YearsEducation, row)).value(),
    }
}

/// `None` when the onset age is missing or malformed.
fn patient_from_row(mapping: &HeaderMapping, row: &[String]) -> Option<PatientRecord> {
    let Some(age_of_onset) = clean_numeric(mapping.cell(LogicalField::AgeOfOnset, row)).value()
    else {
        log::trace!("Skipping row without onset age: {row:?}");
        return None;
    };

    let attrs = attributes_from_row(mapping, row);
    Some(PatientRecord {
        donor_id: clean_missing(mapping.cell(LogicalField::DonorId, row)).map(str::to_string),
        genotype: attrs.genotype,
        age_of_onset,
        age_of_diagnosis: attrs.age_of_diagnosis,
        sex: attrs.sex,
        years_education: attrs.years_education,
    })
}

fn log_mapping(mapping: &HeaderMapping) {
    for field in LogicalField::ALL {
        if let Some(col) = mapping.column(field) {
            log::debug!("{field} ← column {} '{}'", col.index, col.header);
        }
    }
    let unresolved = mapping.unresolved();
    if !unresolved.is_empty() {
        log::warn!("No column found for {unresolved:?}; treating as missing for every row");
    }
}

// ---------------------------------------------------------------------------
// Format readers – every format is reduced to a header row plus text rows
// ---------------------------------------------------------------------------

fn scan_file<F>(path: &Path, visit: F) -> Result<(), LoadError>
where
    F: FnMut(&HeaderMapping, &[String]),
{
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "parquet" | "pq" => scan_parquet(open(path)?, visit),
        "json" => scan_json(open(path)?, visit),
        "tsv" | "tab" => scan_delimited(open(path)?, b'\t', visit),
        _ => scan_delimited(open(path)?, b',', visit),
    }
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })
}

/// Short rows read as missing cells and surplus cells are ignored.
fn scan_delimited<R, F>(reader: R, delimiter: u8, mut visit: F) -> Result<(), LoadError>
where
    R: Read,
    F: FnMut(&HeaderMapping, &[String]),
{
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mapping = HeaderMapping::from_headers(&headers);
    log_mapping(&mapping);

    let mut row = Vec::with_capacity(headers.len());
    for result in reader.records() {
        let record = result?;
        row.clear();
        row.extend(record.iter().map(str::to_string));
        visit(&mapping, row.as_slice());
    }
    Ok(())
}

/// Records-oriented JSON, the default `df.to_json(orient='records')`. The
/// header row is the union of keys in first-seen order.
fn scan_json<R, F>(reader: R, mut visit: F) -> Result<(), LoadError>
where
    R: Read,
    F: FnMut(&HeaderMapping, &[String]),
{
    let root: JsonValue = serde_json::from_reader(BufReader::new(reader))?;
    let records = root
        .as_array()
        .ok_or_else(|| LoadError::JsonShape("expected a top-level array".to_string()))?;

    let mut objects = Vec::with_capacity(records.len());
    let mut headers: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| LoadError::JsonShape(format!("record {i} is not an object")))?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
        objects.push(obj);
    }

    let mapping = HeaderMapping::from_headers(&headers);
    log_mapping(&mapping);

    for obj in objects {
        let row: Vec<String> = headers
            .iter()
            .map(|h| obj.get(h).map(json_cell_text).unwrap_or_default())
            .collect();
        visit(&mapping, row.as_slice());
    }
    Ok(())
}

fn json_cell_text(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

/// Works with files written by both Pandas and Polars; nulls read as empty.
fn scan_parquet<F>(file: File, mut visit: F) -> Result<(), LoadError>
where
    F: FnMut(&HeaderMapping, &[String]),
{
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let mapping = HeaderMapping::from_headers(&headers);
    log_mapping(&mapping);

    let reader = builder.build()?;
    let mut row = Vec::with_capacity(headers.len());
    for batch_result in reader {
        let batch = batch_result?;
        for i in 0..batch.num_rows() {
            row.clear();
            for col in batch.columns() {
                let text = if col.is_null(i) {
                    String::new()
                } else {
                    array_value_to_string(col.as_ref(), i)?
                };
                row.push(text);
            }
            visit(&mapping, row.as_slice());
        }
    }
    Ok(())
}
