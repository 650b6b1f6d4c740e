//! Batch processing over real files

use std::fs;
use std::sync::Arc;

use jobreq_batch::{BatchProcessor, RowInfo, DEFAULT_EXTENSIONS, DEFAULT_TEXT_COLUMN};
use jobreq_core::{AppConfig, JobReqError, RequirementCategory};
use jobreq_extractor::RequirementsExtractor;

fn processor() -> BatchProcessor {
    let config = AppConfig::default();
    let extractor = RequirementsExtractor::new(&config, None).unwrap();
    BatchProcessor::new(Arc::new(extractor), config.extraction)
}

fn job_directory() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("backend.txt"),
        "Backend engineer. 5+ years experience with Python. Bachelor's degree required.",
    )
    .unwrap();
    fs::write(
        dir.path().join("frontend.md"),
        "# Frontend\n- React and TypeScript\n- Experience with Figma",
    )
    .unwrap();
    fs::write(dir.path().join("notes.csv"), "ignored,file").unwrap();
    fs::write(dir.path().join("broken.txt"), [0xff, 0xfe, 0xfd]).unwrap();
    dir
}

#[test]
fn test_process_directory_filters_and_sorts() {
    let dir = job_directory();
    let mut processor = processor();

    let items = processor
        .process_directory(dir.path(), DEFAULT_EXTENSIONS)
        .unwrap();

    let names: Vec<&str> = items
        .iter()
        .map(|i| i.file_info.as_ref().unwrap().filename.as_str())
        .collect();
    assert_eq!(names, vec!["backend.txt", "broken.txt", "frontend.md"]);

    assert!(items[0].is_success());
    assert!(items[1].error().is_some());
    assert!(items[2].is_success());

    let backend = items[0].analysis().unwrap();
    assert!(backend
        .requirements
        .categorized_requirements
        .contains(RequirementCategory::Education, "Bachelor's degree"));
    assert_eq!(
        items[0].file_info.as_ref().unwrap().file_size,
        Some(backend.text_length)
    );
}

#[test]
fn test_parallel_matches_sequential() {
    let dir = job_directory();

    let mut sequential = processor();
    sequential
        .process_directory(dir.path(), DEFAULT_EXTENSIONS)
        .unwrap();

    let mut parallel = processor().with_parallel(true);
    parallel
        .process_directory(dir.path(), DEFAULT_EXTENSIONS)
        .unwrap();

    let to_json = |p: &BatchProcessor| serde_json::to_string(p.results()).unwrap();
    assert_eq!(to_json(&sequential), to_json(&parallel));
}

#[test]
fn test_missing_directory() {
    let mut processor = processor();
    let err = processor
        .process_directory(std::path::Path::new("/nonexistent/jobs"), DEFAULT_EXTENSIONS)
        .unwrap_err();
    assert!(matches!(err, JobReqError::InvalidInput(_)));
}

#[test]
fn test_save_results_and_summary() {
    let dir = job_directory();
    let mut processor = processor();
    processor
        .process_directory(dir.path(), &["txt", ".md"])
        .unwrap();

    let output = dir.path().join("results.json");
    processor.save_results(&output).unwrap();

    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    let records = saved.as_array().unwrap();
    assert_eq!(records.len(), 3);
    assert!(records[0]["requirements"]["summary"]["total_sentences"].is_number());
    assert!(records[1]["error"].is_string());
    assert_eq!(records[2]["file_info"]["filename"], "frontend.md");

    let summary = processor.summary_report().unwrap();
    assert_eq!(summary.total_files_processed, 3);
    assert_eq!(summary.successful_analyses, 2);
    assert_eq!(summary.failed_analyses, 1);
    assert!(summary.category_distribution[&RequirementCategory::TechnicalSkill] >= 2);
}

fn jobs_csv(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("jobs.csv");
    fs::write(
        &path,
        "id,title,description\n\
         job-1,Backend,\"Backend engineer. 5+ years experience with Python. Bachelor's degree required.\"\n\
         ,Frontend,\"Frontend role\n- React and TypeScript\n- Experience with Figma\"\n\
         job-3,Broken\n",
    )
    .unwrap();
    path
}

#[test]
fn test_process_csv_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = jobs_csv(&dir);
    let mut processor = processor();

    let items = processor
        .process_csv(&path, DEFAULT_TEXT_COLUMN, Some("id"))
        .unwrap();

    assert_eq!(items.len(), 3);
    assert_eq!(
        items[0].row_info,
        Some(RowInfo {
            row_number: 1,
            row_id: "job-1".to_string()
        })
    );
    assert_eq!(items[1].row_info.as_ref().unwrap().row_id, "Row_2");
    assert!(items[0].is_success());
    assert!(items[1].is_success());
    assert!(items[2].error().unwrap().contains("malformed CSV row"));

    let backend = items[0].analysis().unwrap();
    assert!(backend
        .requirements
        .categorized_requirements
        .contains(RequirementCategory::Education, "Bachelor's degree"));

    let frontend = items[1].analysis().unwrap();
    assert!(frontend
        .requirements
        .individual_requirements
        .contains(&"Experience with Figma".to_string()));
}

#[test]
fn test_process_csv_missing_column_or_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = jobs_csv(&dir);
    let mut processor = processor();

    let err = processor.process_csv(&path, "body", None).unwrap_err();
    assert!(matches!(err, JobReqError::InvalidInput(ref m) if m.contains("'body'")));

    let err = processor
        .process_csv(&dir.path().join("missing.csv"), DEFAULT_TEXT_COLUMN, None)
        .unwrap_err();
    assert!(matches!(err, JobReqError::InvalidInput(_)));
}

#[test]
fn test_save_results_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = jobs_csv(&dir);
    let mut processor = processor();
    processor
        .process_csv(&path, DEFAULT_TEXT_COLUMN, Some("id"))
        .unwrap();

    let output = dir.path().join("results.csv");
    processor.save_results_csv(&output).unwrap();

    let mut reader = csv::Reader::from_path(&output).unwrap();
    let headers = reader.headers().unwrap().clone();
    let column = |name: &str| headers.iter().position(|h| h == name).unwrap();
    let records: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();

    assert_eq!(records.len(), 3);
    assert_eq!(&records[0][column("source")], "job-1");
    assert_eq!(&records[0][column("degraded")], "true");
    assert!(records[0][column("education_count")].parse::<usize>().unwrap() >= 1);
    assert_eq!(&records[1][column("source")], "Row_2");
    assert_eq!(&records[2][column("text_length")], "");
    assert!(records[2][column("error")].contains("malformed"));

    let json_output = dir.path().join("results.json");
    processor.save_results(&json_output).unwrap();
    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_output).unwrap()).unwrap();
    assert_eq!(saved[0]["row_info"]["row_id"], "job-1");
    assert_eq!(saved[0]["row_info"]["row_number"], 1);
}
