use std::fs;
use std::process::Command;
use std::sync::Arc;

use apoe_onset::analysis::{
    compare_onset, regress_onset_on_education, summarize_cohorts, AnalysisError,
};
use apoe_onset::data::error::LoadError;
use apoe_onset::data::loader::{load_donor_table, load_file};
use apoe_onset::data::merge::merge_by_donor;
use approx::assert_relative_eq;
use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use tempfile::tempdir;

const METADATA: &str = "\
Donor ID,APOE Genotype,Age of onset cognitive symptoms,Age of Dementia diagnosis,Sex
H1,3/4,70,74,Female
H2,4/4,72,75,Male
H3,3 / 4,74,,Female
H4,3/3,80,83,Male
H5,2/3,82,84,Female
H6,,84,88,
H7,3/3,,90,Male
H8,4/4,N/A,70,Female
H9,3/3,abc,71,Male
";

const EDUCATION: &str = "\
donor_id\tYears of Education
H1\t12
H2\t16
H3\t20
H4\tna
H9\t18
H1\t99
";

#[test]
fn csv_file_to_cohort_comparison() {
    let tmp = tempdir().expect("temporary directory");
    let path = tmp.path().join("metadata.csv");
    fs::write(&path, METADATA).expect("write metadata");

    let patients = load_file(&path).expect("load");
    assert_eq!(patients.len(), 6);
    assert!(patients.iter().all(|p| p.donor_id.as_deref() != Some("H7")));
    assert!(patients.iter().all(|p| p.donor_id.as_deref() != Some("H8")));
    assert!(patients.iter().all(|p| p.donor_id.as_deref() != Some("H9")));

    let cmp = compare_onset(patients.records()).expect("comparison");
    assert_relative_eq!(cmp.summaries.present.mean, 72.0);
    assert_relative_eq!(cmp.summaries.not_present.mean, 82.0);
    assert_eq!(cmp.summaries.not_present.missing_genotype, 1);
    assert!(cmp.test.t < 0.0);
    assert!(cmp.test.p_value < 0.05);
    assert!(cmp.test.significant);

    // No education column in this file.
    assert_eq!(
        regress_onset_on_education(patients.records()).unwrap_err(),
        AnalysisError::InsufficientRegressionData { points: 0 }
    );

    let again = load_file(&path).expect("second load");
    assert_eq!(patients, again);
}

#[test]
fn education_merged_by_donor_id() {
    let tmp = tempdir().expect("temporary directory");
    let meta = tmp.path().join("metadata.csv");
    let edu = tmp.path().join("education.tsv");
    fs::write(&meta, METADATA).expect("write metadata");
    fs::write(&edu, EDUCATION).expect("write education");

    let table = load_donor_table(&edu).expect("donor table");
    assert_eq!(table.len(), 5);
    assert_eq!(table.get("H1").unwrap().years_education, Some(12.0));

    let merged = merge_by_donor(load_file(&meta).expect("load"), &table);
    assert_eq!(merged.enriched, 3);
    assert_eq!(merged.unmatched, 2);
    assert_eq!(merged.onset_conflicts, 0);

    let fit = regress_onset_on_education(merged.patients.records()).expect("regression");
    assert_eq!(fit.n, 3);
    assert_relative_eq!(fit.slope, 0.5, epsilon = 1e-9);
    assert_relative_eq!(fit.intercept, 64.0, epsilon = 1e-9);
    assert_relative_eq!(fit.r_squared, 1.0, epsilon = 1e-9);
}

#[test]
fn json_source_reads_like_csv() {
    let tmp = tempdir().expect("temporary directory");
    let path = tmp.path().join("records.json");
    fs::write(
        &path,
        r#"[
            {"donor id": "J1", "apoe": "4/4", "onset age": 60, "gender": "F"},
            {"donor id": "J2", "apoe": "3/3", "onset age": 75.5, "gender": "M"},
            {"donor id": "J3", "apoe": "3/3", "onset age": null}
        ]"#,
    )
    .expect("write json");

    let patients = load_file(&path).expect("load");
    assert_eq!(patients.len(), 2);
    let s = summarize_cohorts(patients.records()).expect("summaries");
    assert_eq!(s.present.n, 1);
    assert_relative_eq!(s.not_present.mean, 75.5);
}

#[test]
fn parquet_source_drops_null_onsets() {
    let tmp = tempdir().expect("temporary directory");
    let path = tmp.path().join("patients.parquet");

    let batch = RecordBatch::try_from_iter(vec![
        (
            "Donor ID",
            Arc::new(StringArray::from(vec!["P1", "P2", "P3"])) as ArrayRef,
        ),
        (
            "APOE Genotype",
            Arc::new(StringArray::from(vec![Some("3 / 4"), Some("4/4"), None])) as ArrayRef,
        ),
        (
            "Age of Onset",
            Arc::new(Int64Array::from(vec![Some(70), None, Some(80)])) as ArrayRef,
        ),
        (
            "Years of Education",
            Arc::new(Int64Array::from(vec![12, 14, 16])) as ArrayRef,
        ),
    ])
    .expect("record batch");
    let file = fs::File::create(&path).expect("create parquet file");
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None).expect("writer");
    writer.write(&batch).expect("write batch");
    writer.close().expect("close writer");

    let patients = load_file(&path).expect("load");
    let r = patients.records();
    assert_eq!(r.len(), 2);
    assert_eq!(r[0].donor_id.as_deref(), Some("P1"));
    assert_eq!(r[0].genotype.as_deref(), Some("3/4"));
    assert_eq!(r[0].age_of_onset, 70.0);
    assert_eq!(r[0].years_education, Some(12.0));
    assert_eq!(r[1].donor_id.as_deref(), Some("P3"));
    assert_eq!(r[1].genotype, None);
}

#[test]
fn extension_picks_the_delimiter() {
    let tmp = tempdir().expect("temporary directory");
    let tab = tmp.path().join("patients.tab");
    let txt = tmp.path().join("patients.txt");
    let tab_in_txt = tmp.path().join("tabbed.txt");
    fs::write(&tab, "Donor ID\tAPOE\tAge of Onset\nT1\t3/4\t66\n").expect("write");
    fs::write(&txt, "Donor ID,APOE,Age of Onset\nC1,3/3,71\n").expect("write");
    fs::write(&tab_in_txt, "Donor ID\tAPOE\tAge of Onset\nT1\t3/4\t66\n").expect("write");

    let from_tab = load_file(&tab).expect("load tab");
    assert_eq!(from_tab.len(), 1);
    assert_eq!(from_tab.records()[0].genotype.as_deref(), Some("3/4"));

    let from_txt = load_file(&txt).expect("load txt");
    assert_eq!(from_txt.len(), 1);
    assert_eq!(from_txt.records()[0].age_of_onset, 71.0);

    // Unknown extensions are comma separated, so a tabbed file has one
    // unrecognised column.
    assert!(load_file(&tab_in_txt).expect("load tabbed txt").is_empty());
}

#[test]
fn header_only_and_unrecognised_files_are_empty_not_errors() {
    let tmp = tempdir().expect("temporary directory");
    let header_only = tmp.path().join("header.csv");
    let unrecognised = tmp.path().join("other.csv");
    fs::write(&header_only, "Donor ID,APOE,Age of Onset\n").expect("write");
    fs::write(&unrecognised, "x,y\n1,2\n").expect("write");

    assert!(load_file(&header_only).expect("load").is_empty());
    assert!(load_file(&unrecognised).expect("load").is_empty());
}

#[test]
fn unreadable_source_is_fatal() {
    let tmp = tempdir().expect("temporary directory");
    let err = load_file(&tmp.path().join("missing.csv")).unwrap_err();
    assert!(matches!(err, LoadError::SourceUnavailable { .. }));
}

#[test]
fn report_cli_prints_text_and_json() {
    let tmp = tempdir().expect("temporary directory");
    let meta = tmp.path().join("metadata.csv");
    let edu = tmp.path().join("education.tsv");
    fs::write(&meta, METADATA).expect("write metadata");
    fs::write(&edu, EDUCATION).expect("write education");

    let exe = env!("CARGO_BIN_EXE_report");
    let out = Command::new(exe)
        .arg(&meta)
        .arg("--merge")
        .arg(&edu)
        .output()
        .expect("run report");
    assert!(out.status.success(), "report exited with {:?}", out.status);
    let text = String::from_utf8(out.stdout).expect("utf-8");
    assert!(text.starts_with("DonorID\tGroup\t\tAgeOnset\n"));
    assert!(text.contains("H3\tE4 Present\t74\n"));
    assert!(text.contains("H6\tE4 Not Present\t84\n"));
    assert!(text.contains("Result: Statistically significant difference"));
    assert!(text.contains("Slope = 0.5000"));

    let out = Command::new(exe)
        .arg(&meta)
        .args(["--format", "json"])
        .output()
        .expect("run report");
    assert!(out.status.success());
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).expect("json");
    assert_eq!(value["rows"].as_array().map(Vec::len), Some(6));
    assert_eq!(value["comparison"]["computed"]["significant"], true);
    assert_eq!(value["regression"]["unavailable"]["condition"], "insufficient_regression_data");

    let missing = Command::new(exe)
        .arg(tmp.path().join("nope.csv"))
        .output()
        .expect("run report");
    assert!(!missing.status.success());
}
