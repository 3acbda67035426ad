//! Content fingerprint for settled-screen detection
//!
//! Every node of the unfiltered tree adds one count to a histogram bucket
//! chosen from its class, text, screen quadrant and depth. Two fingerprints
//! are compared with a normalized Manhattan distance, which is far cheaper
//! than diffing the trees themselves.

use thiserror::Error;

use super::snapshot::string_hash;
use super::types::{Node, ScreenInfo, Snapshot};

pub const DEFAULT_BUCKETS: usize = 256;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FingerprintError {
    #[error("fingerprint length mismatch: {left} vs {right} buckets")]
    LengthMismatch { left: usize, right: usize },
}

/// Fixed-length node histogram of one snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint {
    buckets: Vec<u32>,
}

impl Fingerprint {
    pub fn from_buckets(buckets: Vec<u32>) -> Self {
        Self { buckets }
    }

    pub fn buckets(&self) -> &[u32] {
        &self.buckets
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.buckets.iter().map(|&b| b as u64).sum()
    }
}

/// Histogram of every node in `snapshot` over `bucket_count` buckets (at least 1)
pub fn generate(snapshot: &Snapshot, bucket_count: usize) -> Fingerprint {
    let bucket_count = bucket_count.max(1);
    let mut buckets = vec![0u32; bucket_count];

    for window in &snapshot.windows {
        let mut stack = vec![(window.tree.as_ref(), 0usize)];
        while let Some((node, depth)) = stack.pop() {
            let bucket = string_hash(&bucket_key(node, depth, &snapshot.screen)) as usize % bucket_count;
            buckets[bucket] = buckets[bucket].saturating_add(1);
            stack.extend(node.children.iter().map(|c| (c.as_ref(), depth + 1)));
        }
    }

    Fingerprint { buckets }
}

fn bucket_key(node: &Node, depth: usize, screen: &ScreenInfo) -> String {
    format!(
        "{}|{}|{}|{}",
        node.class_name.as_deref().unwrap_or(""),
        node.text.as_deref().unwrap_or("<none>"),
        quadrant(node, screen),
        depth
    )
}

/// 0 top-left, 1 top-right, 2 bottom-left, 3 bottom-right, by the node's centre
fn quadrant(node: &Node, screen: &ScreenInfo) -> u8 {
    let (cx, cy) = node.bounds.center();
    let right = cx >= screen.width / 2;
    let bottom = cy >= screen.height / 2;
    ((bottom as u8) << 1) | right as u8
}

/// Similarity in `0..=100`; identical histograms (including two empty ones) score 100.
///
/// # Panics
/// If the fingerprints differ in length. Mixing bucket counts is a programming
/// error; use [`try_compare`] to check instead.
pub fn compare(a: &Fingerprint, b: &Fingerprint) -> u8 {
    match try_compare(a, b) {
        Ok(score) => score,
        Err(e) => panic!("{}", e),
    }
}

pub fn try_compare(a: &Fingerprint, b: &Fingerprint) -> Result<u8, FingerprintError> {
    if a.len() != b.len() {
        return Err(FingerprintError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    let (distance, total) = a
        .buckets
        .iter()
        .zip(&b.buckets)
        .fold((0u64, 0u64), |(d, t), (&x, &y)| {
            (d + (x as i64 - y as i64).unsigned_abs(), t + x as u64 + y as u64)
        });

    if total == 0 {
        return Ok(100);
    }

    let similarity = 100.0 * (1.0 - distance as f64 / total as f64);
    Ok(similarity.round().clamp(0.0, 100.0) as u8)
}
