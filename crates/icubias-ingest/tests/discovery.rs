//! Tests for source file discovery and end-to-end stream loading.

use std::fs;
use std::path::Path;

use icubias_ingest::{
    IngestError, StreamColumns, build_patient_streams, list_data_files, read_measurement_table,
};

fn touch(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).expect("write file");
}

#[test]
fn lists_csv_files_sorted_and_ignores_others() {
    let dir = tempfile::tempdir().expect("create temp dir");
    touch(dir.path(), "part_2.csv", "patientid,datetime\n");
    touch(dir.path(), "part_1.CSV", "patientid,datetime\n");
    touch(dir.path(), "notes.txt", "ignore me");
    fs::create_dir(dir.path().join("nested.csv")).expect("create dir");

    let files = list_data_files(dir.path()).expect("list csv");
    let names: Vec<_> = files
        .iter()
        .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
        .collect();
    assert_eq!(names, vec!["part_1.CSV", "part_2.csv"]);
}

#[test]
fn missing_directory_is_an_error() {
    let err = list_data_files(Path::new("/nonexistent/icubias-data")).unwrap_err();
    assert!(matches!(err, IngestError::DirectoryNotFound { .. }));
}

#[test]
fn loads_streams_from_file() {
    let dir = tempfile::tempdir().expect("create temp dir");
    touch(
        dir.path(),
        "merged.csv",
        "patientid,datetime,vm1,pm41\n\
         7,2024-01-15 10:00:00,80,0\n\
         7,2024-01-15 10:02:10,81,\n\
         7,2024-01-15 10:04:20,83,2.5\n",
    );
    let df = read_measurement_table(&dir.path().join("merged.csv")).expect("read table");
    let columns = StreamColumns {
        patient_column: "patientid".to_string(),
        timestamp_column: "datetime".to_string(),
        variables: vec!["vm1".to_string(), "pm41".to_string()],
    };
    let build = build_patient_streams(&df, &columns).expect("build streams");

    assert_eq!(build.patients.len(), 1);
    let patient = &build.patients[0];
    assert_eq!(patient.patient_id.as_str(), "7");
    assert_eq!(patient.stream("vm1").unwrap().len(), 3);
    assert_eq!(patient.stream("pm41").unwrap().values(), vec![0.0, 2.5]);
}
