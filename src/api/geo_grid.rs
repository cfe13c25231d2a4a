//! Grid aggregation: bucket geo points by cell and count them.
//!
//! [`GeoGridConfig`] is the user facing request (hash type, precision and
//! bucket limits). Precision is only checked when the config is built into a
//! [`GeoGridAggregator`], since whether it is valid depends on the hash type.

use crate::api::hash_type::{CellHasher, GeoHashType};
use crate::core::bounds::CellBounds;
use crate::util::coord::Coordinate;
use crate::util::error::GridHashError;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::HashMap;

pub const DEFAULT_PRECISION: i32 = 5;
pub const DEFAULT_MAX_NUM_CELLS: usize = 10_000;

/// Grid aggregation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeoGridConfig {
    #[serde(rename = "type", default)]
    pub hash_type: GeoHashType,

    #[serde(default = "GeoGridConfig::default_precision")]
    pub precision: i32,

    /// Number of buckets returned
    #[serde(default = "GeoGridConfig::default_size")]
    pub size: usize,

    /// Number of buckets each shard keeps before merging
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shard_size: Option<usize>,
}

impl Default for GeoGridConfig {
    fn default() -> Self {
        Self {
            hash_type: GeoHashType::default(),
            precision: Self::default_precision(),
            size: Self::default_size(),
            shard_size: None,
        }
    }
}

impl GeoGridConfig {
    const fn default_precision() -> i32 {
        DEFAULT_PRECISION
    }

    const fn default_size() -> usize {
        DEFAULT_MAX_NUM_CELLS
    }

    pub fn new(hash_type: GeoHashType, precision: i32) -> Self {
        Self {
            hash_type,
            precision,
            ..Self::default()
        }
    }

    pub fn with_hash_type(mut self, hash_type: GeoHashType) -> Self {
        self.hash_type = hash_type;
        self
    }

    pub fn with_precision(mut self, precision: i32) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_size(mut self, size: usize) -> Result<Self, GridHashError> {
        if size == 0 {
            return Err(GridHashError::InvalidConfig(
                "[size] must be greater than 0. Found [0]".to_string(),
            ));
        }
        self.size = size;
        Ok(self)
    }

    pub fn with_shard_size(mut self, shard_size: usize) -> Result<Self, GridHashError> {
        if shard_size == 0 {
            return Err(GridHashError::InvalidConfig(
                "[shard_size] must be greater than 0. Found [0]".to_string(),
            ));
        }
        self.shard_size = Some(shard_size);
        Ok(self)
    }

    /// Checks the bucket limits. Precision is checked by [`GeoGridConfig::build`].
    pub fn validate(&self) -> Result<(), GridHashError> {
        if self.size == 0 {
            return Err(GridHashError::InvalidConfig(
                "[size] must be greater than 0".to_string(),
            ));
        }
        if self.shard_size == Some(0) {
            return Err(GridHashError::InvalidConfig(
                "[shard_size] must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, GridHashError> {
        let config: GeoGridConfig =
            serde_json::from_str(json).map_err(|e| GridHashError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, GridHashError> {
        serde_json::to_string(self).map_err(|e| GridHashError::IoError(e.to_string()))
    }

    /// Validates the request and resolves the shard size for `number_of_shards`.
    pub fn build(&self, number_of_shards: usize) -> Result<GeoGridAggregator, GridHashError> {
        self.validate()?;
        self.hash_type.validate_precision(self.precision)?;

        let shard_size = match self.shard_size {
            Some(shard_size) => shard_size,
            // over-fetch per shard to limit ranking errors from distributed counting
            None => suggest_shard_size(self.size, number_of_shards)?,
        };

        Ok(GeoGridAggregator {
            hash_type: self.hash_type,
            precision: self.precision,
            size: self.size,
            shard_size: shard_size.max(self.size),
        })
    }
}

/// Per-shard bucket count heuristic for a requested bucket count.
pub fn suggest_shard_size(size: usize, number_of_shards: usize) -> Result<usize, GridHashError> {
    if size == 0 || number_of_shards == 0 {
        return Err(GridHashError::InvalidConfig(format!(
            "size [{size}] and number of shards [{number_of_shards}] must be greater than 0"
        )));
    }
    if number_of_shards == 1 {
        return Ok(size);
    }
    let sample = (size as f64 * 1.5 + 10.0) as u64;
    let shard_size = sample.min(i32::MAX as u64) as usize;
    log::trace!("Shard size {} for size {} over {} shards", shard_size, size, number_of_shards);
    Ok(shard_size)
}

/// All cell hashes of one document's points, sorted ascending.
pub fn cell_values<C: Coordinate>(
    points: &[C],
    hash_type: GeoHashType,
    precision: i32,
) -> Result<Vec<u64>, GridHashError> {
    let mut values = points
        .iter()
        .map(|p| hash_type.encode(p.lon(), p.lat(), precision))
        .collect::<Result<Vec<u64>, _>>()?;
    values.sort_unstable();
    Ok(values)
}

/// One cell of an aggregation result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoGridBucket {
    pub hash: u64,
    pub key: String,
    pub doc_count: u64,
    pub bounds: CellBounds,
}

/// A validated grid aggregation ready to count documents.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoGridAggregator {
    hash_type: GeoHashType,
    precision: i32,
    size: usize,
    shard_size: usize,
}

fn top_buckets(counts: HashMap<u64, u64>, limit: usize) -> Vec<(u64, u64)> {
    let mut buckets: Vec<(u64, u64)> = counts.into_iter().collect();
    buckets.sort_unstable_by_key(|&(hash, count)| (Reverse(count), hash));
    buckets.truncate(limit);
    buckets
}

impl GeoGridAggregator {
    pub fn hash_type(&self) -> GeoHashType {
        self.hash_type
    }

    pub fn precision(&self) -> i32 {
        self.precision
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn shard_size(&self) -> usize {
        self.shard_size
    }

    /// Counts documents per cell on one shard and keeps the `shard_size` largest cells.
    ///
    /// A document with several points in the same cell counts once for that cell.
    pub fn shard_buckets<C: Coordinate + Sync>(
        &self,
        documents: &[Vec<C>],
    ) -> Result<Vec<(u64, u64)>, GridHashError> {
        let per_document = documents
            .par_iter()
            .map(|doc| -> Result<Vec<u64>, GridHashError> {
                let mut values = cell_values(doc, self.hash_type, self.precision)?;
                values.dedup();
                Ok(values)
            })
            .collect::<Result<Vec<Vec<u64>>, GridHashError>>()?;

        let mut counts: HashMap<u64, u64> = HashMap::new();
        for hash in per_document.into_iter().flatten() {
            *counts.entry(hash).or_insert(0) += 1;
        }
        log::debug!(
            "Shard collected {} cells from {} documents",
            counts.len(),
            documents.len()
        );

        Ok(top_buckets(counts, self.shard_size))
    }

    /// Merges shard results into the final `size` buckets, largest first.
    pub fn reduce(&self, shards: Vec<Vec<(u64, u64)>>) -> Result<Vec<GeoGridBucket>, GridHashError> {
        let mut counts: HashMap<u64, u64> = HashMap::new();
        for (hash, count) in shards.into_iter().flatten() {
            *counts.entry(hash).or_insert(0) += count;
        }

        top_buckets(counts, self.size)
            .into_iter()
            .map(|(hash, doc_count)| -> Result<GeoGridBucket, GridHashError> {
                Ok(GeoGridBucket {
                    hash,
                    key: self.hash_type.decode_to_key(hash)?,
                    doc_count,
                    bounds: self.hash_type.decode_to_bounds(hash)?,
                })
            })
            .collect()
    }

    /// Aggregates documents that live on a single shard.
    pub fn collect_documents<C: Coordinate + Sync>(
        &self,
        documents: &[Vec<C>],
    ) -> Result<Vec<GeoGridBucket>, GridHashError> {
        let shard = self.shard_buckets(documents)?;
        self.reduce(vec![shard])
    }

    /// Aggregates single-point documents.
    pub fn collect<C: Coordinate + Clone + Sync>(
        &self,
        points: &[C],
    ) -> Result<Vec<GeoGridBucket>, GridHashError> {
        let documents: Vec<Vec<C>> = points.iter().map(|p| vec![p.clone()]).collect();
        self.collect_documents(&documents)
    }

    /// Aggregates documents spread over several shards.
    pub fn collect_shards<C: Coordinate + Sync>(
        &self,
        shards: &[Vec<Vec<C>>],
    ) -> Result<Vec<GeoGridBucket>, GridHashError> {
        let shard_results = shards
            .iter()
            .map(|docs| self.shard_buckets(docs))
            .collect::<Result<Vec<_>, _>>()?;
        self.reduce(shard_results)
    }
}
