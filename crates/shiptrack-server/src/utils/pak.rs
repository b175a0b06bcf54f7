/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Prefixed API key (PAK) generation and verification.
//!
//! Keys look like `<prefix>_<short token>_<long token>`; only a SHA-256 hash
//! of the long token is ever stored.

use prefixed_api_key::{PrefixedApiKey, PrefixedApiKeyController};
use rand::rngs::OsRng;
use sha2::Sha256;
use shiptrack_utils::config::PAK;
use shiptrack_utils::logging::prelude::*;

#[derive(Debug, thiserror::Error)]
pub enum PakError {
    #[error("invalid PAK configuration: {0}")]
    Config(String),
    #[error("failed to generate PAK: {0}")]
    Generate(String),
}

/// Issues and checks API keys. Built once from settings and shared through `AppState`.
pub struct PakService {
    controller: PrefixedApiKeyController<OsRng, Sha256>,
}

impl PakService {
    pub fn new(config: &PAK) -> Result<Self, PakError> {
        let prefix = config
            .prefix
            .clone()
            .ok_or_else(|| PakError::Config("pak.prefix is required".to_string()))?;
        let short_token_length = config
            .short_token_length
            .ok_or_else(|| PakError::Config("pak.short_token_length is required".to_string()))?;
        let long_token_length = config
            .long_token_length
            .ok_or_else(|| PakError::Config("pak.long_token_length is required".to_string()))?;

        let controller = PrefixedApiKeyController::configure()
            .prefix(prefix)
            .short_token_length(short_token_length)
            .short_token_prefix(config.short_token_prefix.clone())
            .long_token_length(long_token_length)
            .rng_osrng()
            .digest_sha256()
            .finalize()
            .map_err(|e| PakError::Config(format!("{:?}", e)))?;

        Ok(PakService { controller })
    }

    /// Generates a new key, returning `(key, hash)`.
    pub fn generate(&self) -> Result<(String, String), PakError> {
        self.controller
            .try_generate_key_and_hash()
            .map(|(pak, hash)| (pak.to_string(), hash))
            .map_err(|e| PakError::Generate(format!("{:?}", e)))
    }

    /// Whether `pak` hashes to `stored_hash`. Malformed keys never verify.
    pub fn verify(&self, pak: &str, stored_hash: &str) -> bool {
        match PrefixedApiKey::from_string(pak) {
            Ok(parsed) => self.controller.check_hash(&parsed, stored_hash),
            Err(_) => {
                debug!("Rejecting malformed PAK");
                false
            }
        }
    }
}

/// Whether `hash` has the shape of a stored SHA-256 PAK hash.
pub fn validate_pak_hash(hash: &str) -> bool {
    hash.len() == 64 && hash.chars().all(|c| c.is_ascii_hexdigit())
}
