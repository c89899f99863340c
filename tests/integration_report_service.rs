//! Integration tests for the report pipeline over CSV files on disk
//!
//! These tests write the three input tables into a temporary directory, run
//! report jobs through the service and check the artifacts they leave behind.

use chrono::{Duration, TimeZone, Utc};
use std::fs;
use std::path::Path;
use store_monitor::app::models::ReferenceInstant;
use store_monitor::app::services::job_registry::{JobId, JobStatus, ReportPoll};
use store_monitor::app::services::report_service::ReportService;
use store_monitor::config::Config;
use tempfile::TempDir;

/// Write a small dataset: store 1 polled every minute for the last 30
/// minutes, store 2 closed at the reference instant, store 3 never polled
fn write_dataset(dir: &Path) {
    let reference = Utc.with_ymd_and_hms(2023, 1, 25, 18, 0, 0).unwrap();

    fs::write(
        dir.join("stores.csv"),
        "store_id,timezone_str\n1,UTC\n2,America/New_York\n3,\n",
    )
    .unwrap();

    // Wednesday is day 2; store 2 is only open in the morning local time
    fs::write(
        dir.join("business_hours.csv"),
        "store_id,day,start_time_local,end_time_local\n2,2,06:00:00,09:00:00\n",
    )
    .unwrap();

    let mut status = String::from("store_id,timestamp_utc,status\n");
    for minute in 1..=30 {
        let ts = reference - Duration::minutes(minute);
        let state = if minute <= 20 { "active" } else { "inactive" };
        status.push_str(&format!(
            "1,{} UTC,{}\n",
            ts.format("%Y-%m-%d %H:%M:%S%.6f"),
            state
        ));
        status.push_str(&format!(
            "2,{} UTC,active\n",
            ts.format("%Y-%m-%d %H:%M:%S")
        ));
    }
    fs::write(dir.join("store_status.csv"), status).unwrap();
}

fn service_for(data_dir: &Path, output_dir: &Path) -> ReportService {
    let reference = Utc.with_ymd_and_hms(2023, 1, 25, 18, 0, 0).unwrap();
    let config = Config::default()
        .with_data_dir(data_dir)
        .with_output_dir(output_dir)
        .with_reference(ReferenceInstant::Fixed(reference));
    config.validate().unwrap();
    ReportService::from_config(&config).unwrap()
}

#[tokio::test]
async fn test_report_job_writes_one_row_per_store() {
    let data_dir = TempDir::new().unwrap();
    let output_dir = TempDir::new().unwrap();
    write_dataset(data_dir.path());
    let service = service_for(data_dir.path(), output_dir.path());

    let (job_id, handle) = service.trigger_tracked();
    handle.await.unwrap();

    let expected_path = output_dir.path().join(format!("{}.csv", job_id));
    assert_eq!(
        service.poll(&job_id),
        ReportPoll::Complete(expected_path.clone())
    );

    let content = fs::read_to_string(&expected_path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 4, "header plus three stores: {}", content);
    assert!(lines[0].starts_with("store_id,uptime_last_hour(in minutes)"));

    // Store 1 is open around the clock: 20 minutes up, 10 down
    assert_eq!(lines[1], "1,20,0.33,0.33,10,0.17,0.17");

    // Store 2 is closed at 13:00 New York time, so nothing counts
    assert_eq!(lines[2], "2,0,0.0,0.0,0,0.0,0.0");

    // Store 3 has no observations at all
    assert_eq!(lines[3], "3,0,0.0,0.0,0,0.0,0.0");
}

#[tokio::test]
async fn test_missing_input_marks_job_failed() {
    let data_dir = TempDir::new().unwrap();
    let output_dir = TempDir::new().unwrap();
    fs::write(data_dir.path().join("stores.csv"), "store_id\n1\n").unwrap();
    let service = service_for(data_dir.path(), output_dir.path());

    let (job_id, handle) = service.trigger_tracked();
    handle.await.unwrap();

    assert_eq!(service.poll(&job_id), ReportPoll::Failed);
    let record = service.registry().get(&job_id).unwrap();
    assert_eq!(record.status(), JobStatus::Failed);
    assert!(record.finished_at.is_some());
    assert!(
        fs::read_dir(output_dir.path()).unwrap().next().is_none(),
        "no artifact should be written for a failed job"
    );
}

#[tokio::test]
async fn test_unknown_report_id_is_not_found() {
    let data_dir = TempDir::new().unwrap();
    let output_dir = TempDir::new().unwrap();
    write_dataset(data_dir.path());
    let service = service_for(data_dir.path(), output_dir.path());

    assert_eq!(service.poll(&JobId::from("does-not-exist")), ReportPoll::NotFound);
}

#[tokio::test]
async fn test_concurrent_jobs_produce_identical_reports() {
    let data_dir = TempDir::new().unwrap();
    let output_dir = TempDir::new().unwrap();
    write_dataset(data_dir.path());
    let service = service_for(data_dir.path(), output_dir.path());

    let jobs: Vec<_> = (0..4).map(|_| service.trigger_tracked()).collect();
    let mut paths = Vec::new();
    for (job_id, handle) in jobs {
        handle.await.unwrap();
        match service.poll(&job_id) {
            ReportPoll::Complete(path) => paths.push(path),
            other => panic!("job {} did not complete: {:?}", job_id, other),
        }
    }

    let first = fs::read_to_string(&paths[0]).unwrap();
    for path in &paths[1..] {
        assert_ne!(path, &paths[0]);
        assert_eq!(fs::read_to_string(path).unwrap(), first);
    }
    assert_eq!(service.registry().len(), 4);
}
