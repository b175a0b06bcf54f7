/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Shared data layer for shiptrack: diesel schema, row models, validation,
//! and the pure reconciliation and audit logic built on them.

pub mod audit;
pub mod models;
pub mod reconciliation;
pub mod schema;
pub mod validation;
