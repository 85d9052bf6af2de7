//! Frequency analysis for byte streams.
//!
//! Counts the occurrence of each byte value (0-255) in an input buffer
//! and computes Shannon entropy. Counting may run on multiple threads;
//! each worker fills a private histogram over a disjoint chunk and the
//! results are summed after all workers join, so the output is
//! deterministic and independent of the thread count.

/// Inputs below this size are always counted on a single thread.
const PARALLEL_THRESHOLD: usize = 1024 * 1024;

/// Upper bound on counting workers.
const MAX_WORKERS: usize = 64;

/// A frequency table that tracks byte occurrence counts.
#[derive(Debug, Clone)]
pub struct FrequencyTable {
    /// Count of each byte value (index = byte value, value = count).
    pub byte: [u64; 256],
    /// Sum of all counts.
    pub total: u64,
    /// Number of distinct byte values with nonzero count.
    pub used: u32,
}

impl FrequencyTable {
    /// Create a new, zeroed frequency table.
    pub fn new() -> Self {
        Self {
            byte: [0u64; 256],
            total: 0,
            used: 0,
        }
    }

    /// Count byte frequencies in the input buffer on the calling thread.
    pub fn count(&mut self, input: &[u8]) {
        self.byte = histogram(input);
        self.finish();
    }

    /// Count byte frequencies using up to `threads` worker threads
    /// (0 = one per available core).
    ///
    /// The input is split into disjoint chunks, one histogram per
    /// worker, reduced here after all workers have joined.
    pub fn count_parallel(&mut self, input: &[u8], threads: usize) {
        let workers = worker_count(input.len(), threads);
        if workers <= 1 {
            self.count(input);
            return;
        }

        let chunk_size = input.len() / workers;
        let locals: Vec<[u64; 256]> = std::thread::scope(|scope| {
            let mut handles = Vec::with_capacity(workers);
            for w in 0..workers {
                let start = w * chunk_size;
                let end = if w == workers - 1 {
                    input.len()
                } else {
                    start + chunk_size
                };
                let chunk = &input[start..end];
                handles.push(scope.spawn(move || histogram(chunk)));
            }
            handles
                .into_iter()
                .map(|h| h.join().expect("frequency worker panicked"))
                .collect()
        });

        self.byte = [0u64; 256];
        for local in &locals {
            for (dst, src) in self.byte.iter_mut().zip(local.iter()) {
                *dst += src;
            }
        }
        self.finish();
    }

    fn finish(&mut self) {
        self.total = self.byte.iter().sum();
        self.used = self.byte.iter().filter(|&&c| c > 0).count() as u32;
    }

    /// Compute the Shannon entropy of the distribution (in bits per symbol).
    ///
    /// Returns 0.0 if the table is empty.
    pub fn entropy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let total = self.total as f64;
        self.byte
            .iter()
            .filter(|&&c| c > 0)
            .map(|&c| {
                let prob = c as f64 / total;
                -prob * prob.log2()
            })
            .sum()
    }

    /// Get the count for a specific byte value.
    pub fn get(&self, byte: u8) -> u64 {
        self.byte[byte as usize]
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

fn worker_count(input_len: usize, threads: usize) -> usize {
    if input_len < PARALLEL_THRESHOLD {
        return 1;
    }
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    let requested = if threads == 0 { cores } else { threads };
    requested.min(cores).min(MAX_WORKERS).max(1)
}

/// Histogram a buffer with an 8-way unrolled inner loop.
fn histogram(input: &[u8]) -> [u64; 256] {
    let mut counts = [0u64; 256];
    let mut chunks = input.chunks_exact(8);
    for group in &mut chunks {
        counts[group[0] as usize] += 1;
        counts[group[1] as usize] += 1;
        counts[group[2] as usize] += 1;
        counts[group[3] as usize] += 1;
        counts[group[4] as usize] += 1;
        counts[group[5] as usize] += 1;
        counts[group[6] as usize] += 1;
        counts[group[7] as usize] += 1;
    }
    for &b in chunks.remainder() {
        counts[b as usize] += 1;
    }
    counts
}

/// Convenience function: compute a frequency table from input.
pub fn get_frequency(input: &[u8]) -> FrequencyTable {
    let mut table = FrequencyTable::new();
    table.count(input);
    table
}
