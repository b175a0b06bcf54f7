/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

use crate::fixtures::{at, unique, TestFixture};
use chrono::Utc;
use serial_test::serial;
use shiptrack_models::models::deploy_alert_jobs::{
    DeployAlertPayload, NewDeployAlertJob, JOB_STATUS_DEAD, JOB_STATUS_PENDING, JOB_STATUS_SUCCESS,
};
use shiptrack_models::models::DeployAlertJob;

fn enqueue_job(fixture: &TestFixture) -> DeployAlertJob {
    let deploy = fixture.insert_deploy("api", &unique("server"), Some("v2"), at(0));
    let payload = DeployAlertPayload::new(&deploy, None, "Release not authorised".to_string());
    fixture
        .dal
        .deploy_alert_jobs()
        .enqueue(&NewDeployAlertJob::new(&payload).unwrap())
        .expect("Failed to enqueue job")
}

#[test]
#[serial]
fn test_enqueued_job_is_pending() {
    let fixture = TestFixture::new();
    let job = enqueue_job(&fixture);

    assert_eq!(job.status, JOB_STATUS_PENDING);
    assert_eq!(job.attempts, 0);
    assert_eq!(job.decode_payload().unwrap().app_name, "api");

    let pending = fixture.dal.deploy_alert_jobs().get_pending(10).unwrap();
    assert!(pending.iter().any(|j| j.id == job.id));
}

#[test]
#[serial]
fn test_failed_job_backs_off() {
    let fixture = TestFixture::new();
    let job = enqueue_job(&fixture);

    let failed = fixture
        .dal
        .deploy_alert_jobs()
        .mark_failed(job.id, "relay down", 5)
        .unwrap();

    assert_eq!(failed.status, JOB_STATUS_PENDING);
    assert_eq!(failed.attempts, 1);
    assert_eq!(failed.last_error.as_deref(), Some("relay down"));
    assert!(failed.next_attempt_at > Utc::now());

    let pending = fixture.dal.deploy_alert_jobs().get_pending(10).unwrap();
    assert!(pending.iter().all(|j| j.id != job.id));
}

#[test]
#[serial]
fn test_job_dies_after_max_retries() {
    let fixture = TestFixture::new();
    let job = enqueue_job(&fixture);
    let jobs = fixture.dal.deploy_alert_jobs();

    jobs.mark_failed(job.id, "first", 2).unwrap();
    let dead = jobs.mark_failed(job.id, "second", 2).unwrap();

    assert_eq!(dead.status, JOB_STATUS_DEAD);
    assert_eq!(dead.attempts, 2);
    assert!(dead.completed_at.is_some());
}

#[test]
#[serial]
fn test_success_and_cleanup() {
    let fixture = TestFixture::new();
    let done = enqueue_job(&fixture);
    let waiting = enqueue_job(&fixture);
    let jobs = fixture.dal.deploy_alert_jobs();

    let done = jobs.mark_success(done.id).unwrap();
    assert_eq!(done.status, JOB_STATUS_SUCCESS);
    assert_eq!(done.attempts, 1);

    assert_eq!(jobs.cleanup_old(7).unwrap(), 0);
    assert_eq!(jobs.cleanup_old(0).unwrap(), 1);
    assert!(jobs.get(done.id).unwrap().is_none());
    assert!(jobs.get(waiting.id).unwrap().is_some());
}
