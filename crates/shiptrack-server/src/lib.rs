/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! # Shiptrack Server
//!
//! HTTP service that records deploys, reconciles them against expected
//! versions, audits new deploys and delivers alert notifications.
//!
//! The pieces are wired together in [`cli::commands::serve`]: a diesel
//! connection pool behind the [`dal::DAL`], the axum router in [`api`], the
//! alert worker in [`utils::background_tasks`], and the injected services
//! ([`utils::pak::PakService`], [`metrics::MetricsCollector`],
//! [`notifications::AlertNotifier`]) carried in [`api::AppState`].

pub mod api;
pub mod cli;
pub mod dal;
pub mod db;
pub mod metrics;
pub mod notifications;
pub mod utils;
