//! Layer pipeline engine
//!
//! Runs an ordered algorithm chain forward for encryption and in exact
//! reverse for decryption, threading each layer's output into the next
//! layer's input and recording a performance sample per layer. The engine
//! holds no state between calls; every run owns its key map, layer list,
//! and accumulators, so independent runs can proceed concurrently.

use crate::cipher;
use crate::error::{CipherStackError, Result};
use crate::keys::KeyMap;
use crate::metrics::{summarize, MetricsSummary, NullSampler, PerformanceSample, ResourceSampler};
use crate::policy::{Algorithm, SecurityMode};
use serde::Serialize;
use std::time::Instant;

/// One algorithm's application within a chain
#[derive(Debug, Clone, Serialize)]
pub struct EncryptionLayer {
    pub algorithm: Algorithm,
    pub key: String,
    /// 1-based processing position: chain position for encryption, actual
    /// (reversed) processing order for decryption
    pub order: usize,
}

/// Result of one chain run
#[derive(Debug)]
pub struct ChainRun {
    /// Final output text: ciphertext after encryption, plaintext after
    /// decryption
    pub text: String,
    /// Layers in the order they were processed
    pub layers: Vec<EncryptionLayer>,
    /// One sample per processed layer
    pub samples: Vec<PerformanceSample>,
    /// Complete key set, including keys generated mid-run; losing any of
    /// these makes the ciphertext unrecoverable
    pub keys: KeyMap,
}

impl ChainRun {
    /// Aggregate metrics across all layers
    pub fn metrics(&self) -> MetricsSummary {
        summarize(&self.samples)
    }
}

/// Encrypt through the chain in order
///
/// Keys present in `keys` are reused; missing ones are generated at the
/// mode's strength, one layer at a time in chain order, so a caller can
/// surface progress between the expensive generations.
pub fn encrypt_chain(
    plaintext: &str,
    chain: &[Algorithm],
    keys: &KeyMap,
    mode: SecurityMode,
    sampler: &dyn ResourceSampler,
) -> Result<ChainRun> {
    let mut keys = keys.clone();
    let mut text = plaintext.to_string();
    let mut layers = Vec::with_capacity(chain.len());
    let mut samples = Vec::with_capacity(chain.len());

    for (index, &algorithm) in chain.iter().enumerate() {
        let order = index + 1;
        if !keys.contains_key(&algorithm) {
            let key = cipher::generate_key(algorithm, mode)
                .map_err(|e| layer_failure(order, algorithm, mode, e))?;
            keys.insert(algorithm, key);
        }
        let key = keys[&algorithm].clone();

        let input_bytes = text.len();
        let memory_before = sampler.memory_bytes();
        let start = Instant::now();
        text = cipher::encrypt(algorithm, &text, &key, mode)
            .map_err(|e| layer_failure(order, algorithm, mode, e))?;
        samples.push(PerformanceSample::capture(
            start.elapsed().as_secs_f64(),
            sampler.memory_bytes().saturating_sub(memory_before),
            input_bytes,
        ));
        layers.push(EncryptionLayer {
            algorithm,
            key,
            order,
        });
    }

    Ok(ChainRun {
        text,
        layers,
        samples,
        keys,
    })
}

/// Decrypt through the chain in strict reverse order
///
/// Every chain algorithm must have a non-empty key before any cipher work
/// starts; the up-front check reports all missing algorithms at once. A
/// failing layer aborts the rest of the chain and is reported with its
/// processing position, algorithm, and mode.
pub fn decrypt_chain(
    ciphertext: &str,
    chain: &[Algorithm],
    keys: &KeyMap,
    mode: SecurityMode,
    sampler: &dyn ResourceSampler,
) -> Result<ChainRun> {
    let missing: Vec<Algorithm> = chain
        .iter()
        .copied()
        .filter(|algorithm| keys.get(algorithm).map_or(true, |k| k.is_empty()))
        .collect();
    if !missing.is_empty() {
        return Err(CipherStackError::MissingKeys(missing));
    }

    let mut text = ciphertext.to_string();
    let mut layers = Vec::with_capacity(chain.len());
    let mut samples = Vec::with_capacity(chain.len());

    for (index, &algorithm) in chain.iter().rev().enumerate() {
        let order = index + 1;
        let key = keys[&algorithm].clone();

        let input_bytes = text.len();
        let memory_before = sampler.memory_bytes();
        let start = Instant::now();
        text = cipher::decrypt(algorithm, &text, &key, mode)
            .map_err(|e| layer_failure(order, algorithm, mode, e))?;
        samples.push(PerformanceSample::capture(
            start.elapsed().as_secs_f64(),
            sampler.memory_bytes().saturating_sub(memory_before),
            input_bytes,
        ));
        layers.push(EncryptionLayer {
            algorithm,
            key,
            order,
        });
    }

    Ok(ChainRun {
        text,
        layers,
        samples,
        keys: keys.clone(),
    })
}

/// Encrypt with the mode's default chain, generating all keys
pub fn encrypt_with_mode(plaintext: &str, mode: SecurityMode) -> Result<ChainRun> {
    encrypt_chain(plaintext, mode.chain(), &KeyMap::new(), mode, &NullSampler)
}

/// Decrypt with the mode's default chain and a full key map
pub fn decrypt_with_mode(ciphertext: &str, mode: SecurityMode, keys: &KeyMap) -> Result<ChainRun> {
    decrypt_chain(ciphertext, mode.chain(), keys, mode, &NullSampler)
}

fn layer_failure(
    order: usize,
    algorithm: Algorithm,
    mode: SecurityMode,
    source: CipherStackError,
) -> CipherStackError {
    CipherStackError::LayerFailure {
        order,
        algorithm,
        mode,
        cause: source.to_string(),
    }
}
