/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Data Access Layer for DeployAlertJob operations.
//!
//! The alert queue: jobs are enqueued by deploy ingestion, claimed in batches
//! by the worker, and either completed or rescheduled with backoff until the
//! retry budget runs out.

use crate::dal::{DalError, DAL};
use chrono::{DateTime, Duration, Utc};
use diesel::prelude::*;
use shiptrack_models::models::deploy_alert_jobs::{
    backoff_after, DeployAlertJob, NewDeployAlertJob, JOB_STATUS_DEAD, JOB_STATUS_PENDING,
    JOB_STATUS_SUCCESS,
};
use shiptrack_models::schema::deploy_alert_jobs;
use uuid::Uuid;

/// Data Access Layer for DeployAlertJob operations.
pub struct DeployAlertJobsDAL<'a> {
    /// Reference to the main DAL instance.
    pub dal: &'a DAL,
}

impl DeployAlertJobsDAL<'_> {
    /// Adds a job to the queue, due immediately.
    pub fn enqueue(&self, new_job: &NewDeployAlertJob) -> Result<DeployAlertJob, DalError> {
        let conn = &mut self.dal.pool.get()?;

        Ok(diesel::insert_into(deploy_alert_jobs::table)
            .values(new_job)
            .returning(DeployAlertJob::as_returning())
            .get_result(conn)?)
    }

    pub fn get(&self, id: Uuid) -> Result<Option<DeployAlertJob>, DalError> {
        let conn = &mut self.dal.pool.get()?;

        Ok(deploy_alert_jobs::table
            .find(id)
            .select(DeployAlertJob::as_select())
            .first(conn)
            .optional()?)
    }

    /// Gets pending jobs whose next attempt is due, oldest due first.
    ///
    /// # Arguments
    ///
    /// * `limit` - Maximum number of jobs to return.
    pub fn get_pending(&self, limit: i64) -> Result<Vec<DeployAlertJob>, DalError> {
        let conn = &mut self.dal.pool.get()?;

        Ok(deploy_alert_jobs::table
            .filter(deploy_alert_jobs::status.eq(JOB_STATUS_PENDING))
            .filter(deploy_alert_jobs::next_attempt_at.le(Utc::now()))
            .order(deploy_alert_jobs::next_attempt_at.asc())
            .limit(limit)
            .select(DeployAlertJob::as_select())
            .load(conn)?)
    }

    /// Records a successful attempt.
    pub fn mark_success(&self, id: Uuid) -> Result<DeployAlertJob, DalError> {
        let conn = &mut self.dal.pool.get()?;

        Ok(diesel::update(deploy_alert_jobs::table.find(id))
            .set((
                deploy_alert_jobs::status.eq(JOB_STATUS_SUCCESS),
                deploy_alert_jobs::attempts.eq(deploy_alert_jobs::attempts + 1),
                deploy_alert_jobs::completed_at.eq(Utc::now()),
                deploy_alert_jobs::last_error.eq(None::<String>),
            ))
            .returning(DeployAlertJob::as_returning())
            .get_result(conn)?)
    }

    /// Records a failed attempt.
    ///
    /// The job goes back to pending with an exponential delay, or is marked
    /// dead once `max_retries` attempts have been made.
    pub fn mark_failed(
        &self,
        id: Uuid,
        error: &str,
        max_retries: i32,
    ) -> Result<DeployAlertJob, DalError> {
        let conn = &mut self.dal.pool.get()?;

        let job: DeployAlertJob = deploy_alert_jobs::table
            .find(id)
            .select(DeployAlertJob::as_select())
            .first(conn)?;

        let attempts = job.attempts + 1;
        let now = Utc::now();

        if attempts >= max_retries {
            Ok(diesel::update(deploy_alert_jobs::table.find(id))
                .set((
                    deploy_alert_jobs::status.eq(JOB_STATUS_DEAD),
                    deploy_alert_jobs::attempts.eq(attempts),
                    deploy_alert_jobs::completed_at.eq(Some(now)),
                    deploy_alert_jobs::last_error.eq(error),
                ))
                .returning(DeployAlertJob::as_returning())
                .get_result(conn)?)
        } else {
            Ok(diesel::update(deploy_alert_jobs::table.find(id))
                .set((
                    deploy_alert_jobs::status.eq(JOB_STATUS_PENDING),
                    deploy_alert_jobs::attempts.eq(attempts),
                    deploy_alert_jobs::next_attempt_at.eq(now + backoff_after(attempts)),
                    deploy_alert_jobs::last_error.eq(error),
                ))
                .returning(DeployAlertJob::as_returning())
                .get_result(conn)?)
        }
    }

    /// Deletes finished jobs created more than `retention_days` ago.
    ///
    /// Returns the number of deleted jobs.
    pub fn cleanup_old(&self, retention_days: i64) -> Result<usize, DalError> {
        let conn = &mut self.dal.pool.get()?;
        let cutoff: DateTime<Utc> = Utc::now() - Duration::days(retention_days);

        Ok(diesel::delete(
            deploy_alert_jobs::table
                .filter(deploy_alert_jobs::created_at.lt(cutoff))
                .filter(
                    deploy_alert_jobs::status
                        .eq(JOB_STATUS_SUCCESS)
                        .or(deploy_alert_jobs::status.eq(JOB_STATUS_DEAD)),
                ),
        )
        .execute(conn)?)
    }
}
