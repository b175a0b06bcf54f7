/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Utility functions and structures for the shiptrack server.
//!
//! Admin key bootstrap, deploy auditing glue, background tasks and shutdown.

use crate::dal::DAL;
use shiptrack_utils::config::Settings;
use shiptrack_utils::logging::prelude::*;
use std::fs;
use std::path::Path;
use tokio::sync::oneshot;

pub mod background_tasks;
pub mod deploy_audit;
pub mod pak;

/// File the generated admin key is written to.
pub const ADMIN_KEY_PATH: &str = "/tmp/shiptrack-keys/admin.txt";

/// Waits for the shutdown signal.
pub async fn shutdown(shutdown_rx: oneshot::Receiver<()>) {
    let _ = shutdown_rx.await;
    info!("Shutdown signal received, draining connections");
}

/// Performs first-time startup operations: creates the admin key.
pub fn first_startup(
    dal: &DAL,
    pak: &pak::PakService,
    config: &Settings,
) -> Result<Option<String>, Box<dyn std::error::Error>> {
    upsert_admin(dal, pak, config)
}

/// Stores the admin PAK hash.
///
/// A hash from `server.admin_pak_hash` is used as is. Otherwise a new key is
/// generated, written to [`ADMIN_KEY_PATH`] and returned.
pub fn upsert_admin(
    dal: &DAL,
    pak: &pak::PakService,
    config: &Settings,
) -> Result<Option<String>, Box<dyn std::error::Error>> {
    let (pak_hash, new_key) = match &config.server.admin_pak_hash {
        Some(hash) if !hash.is_empty() => {
            if !pak::validate_pak_hash(hash) {
                return Err("Invalid PAK hash provided in configuration".into());
            }
            (hash.clone(), None)
        }
        _ => {
            let (key, hash) = pak.generate()?;

            let key_path = Path::new(ADMIN_KEY_PATH);
            if let Some(parent) = key_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(key_path, &key)?;
            info!("Wrote admin PAK to {}", ADMIN_KEY_PATH);

            (hash, Some(key))
        }
    };

    dal.admin().set_pak_hash(&pak_hash)?;
    Ok(new_key)
}
