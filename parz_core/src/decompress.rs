//! Parallel subblock decompression.

use std::time::Instant;

use crate::codec::BlockCodec;
use crate::config::{Compression, Performance};
use crate::error::{Error, Result};
use crate::parallel;
use crate::shuffle::unshuffle;
use crate::subblock::{checksum64, serialized_size, Subblock};

/// Decompress a subblock list into `dst`, returning the produced byte count.
///
/// `dst` must be at least as large as the sum of the list's uncompressed
/// sizes. Subblocks are distributed over workers as contiguous runs; each
/// worker writes into its own disjoint destination range, so no byte of
/// `dst` is ever written by two threads. An empty list returns 0 — the
/// caller handles the stored-raw case itself.
///
/// There is no graceful fallback here: checksum mismatches, codec failures,
/// and size mismatches are all fatal, surfaced together after every worker
/// has finished.
pub fn uncompress(
    codec: &dyn BlockCodec,
    config: &Compression,
    dst: &mut [u8],
    subblocks: &[Subblock],
    perf: Option<&mut Performance>,
) -> Result<usize> {
    if subblocks.is_empty() {
        return Ok(0);
    }

    let mut total = 0usize;
    for sb in subblocks {
        if sb.payload.is_empty() || sb.uncompressed_size == 0 {
            return Err(Error::InvalidSubblock);
        }
        total += sb.uncompressed_size;
    }
    if dst.len() < total {
        return Err(Error::InsufficientBuffer {
            required: total as u64,
            available: dst.len() as u64,
        });
    }

    let threads = parallel::thread_count(config, subblocks.len());
    let ranges = parallel::partition(subblocks.len(), threads);

    // Carve the destination into one disjoint slice per worker, at the byte
    // offsets given by prefix-summing uncompressed sizes along the
    // partition boundaries.
    let mut parts: Vec<(&mut [u8], u64, &[Subblock])> = Vec::with_capacity(threads);
    let mut rest: &mut [u8] = &mut dst[..total];
    let mut offset = 0u64;
    for range in &ranges {
        let run = &subblocks[range.start..range.end];
        let bytes: usize = run.iter().map(|sb| sb.uncompressed_size).sum();
        let (head, tail) = std::mem::take(&mut rest).split_at_mut(bytes);
        rest = tail;
        parts.push((head, offset, run));
        offset += bytes as u64;
    }

    let t = Instant::now();
    let results: Vec<Result<usize>> = if threads == 1 {
        let (out, base, run) = parts.pop().unwrap();
        vec![run_worker(codec, out, base, run)]
    } else {
        std::thread::scope(|scope| {
            let handles: Vec<_> = parts
                .into_iter()
                .map(|(out, base, run)| {
                    scope.spawn(move || run_worker(codec, out, base, run))
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap_or_else(|p| Err(parallel::fault_to_error(p))))
                .collect()
        })
    };
    let mut elapsed = t.elapsed().as_secs_f64();

    let (_, errors) = parallel::split_results(results);
    if !errors.is_empty() {
        return Err(Error::Compression {
            algorithm: codec.name(),
            errors,
        });
    }

    if config.shuffling_active() {
        let t = Instant::now();
        unshuffle(&mut dst[..total], config.item_size);
        elapsed += t.elapsed().as_secs_f64();
    }

    if let Some(perf) = perf {
        let compressed_size = serialized_size(subblocks);
        perf.size_reduction = (total as f64 - compressed_size as f64) / total as f64;
        perf.throughput = if elapsed > 0.0 {
            total as f64 / elapsed / (1024.0 * 1024.0)
        } else {
            0.0
        };
        perf.thread_count = threads;
    }

    Ok(total)
}

/// Decode one worker's run of subblocks into its destination slice.
/// `base_offset` is the run's absolute byte offset, used in error messages.
fn run_worker(
    codec: &dyn BlockCodec,
    out: &mut [u8],
    base_offset: u64,
    subblocks: &[Subblock],
) -> Result<usize> {
    let expected = out.len();
    let mut produced = 0usize;

    for sb in subblocks {
        let offset = base_offset + produced as u64;

        if sb.checksum != 0 {
            let got = checksum64(&sb.payload);
            if got != sb.checksum {
                return Err(Error::ChecksumMismatch {
                    offset,
                    expected: sb.checksum,
                    got,
                });
            }
        }

        if sb.payload.len() < sb.uncompressed_size {
            // Compressed subblock. The codec may use the rest of this
            // worker's range as capacity; the produced size still has to
            // match the record exactly.
            let n = codec.uncompress_block(&mut out[produced..], &sb.payload);
            if n == 0 {
                return Err(Error::CodecFailure {
                    offset,
                    uncompressed_size: sb.uncompressed_size as u64,
                    compressed_size: sb.payload.len() as u64,
                });
            }
            if n != sb.uncompressed_size {
                return Err(Error::SizeMismatch {
                    offset,
                    expected: sb.uncompressed_size as u64,
                    got: n as u64,
                });
            }
        } else {
            // Verbatim subblock.
            out[produced..produced + sb.uncompressed_size]
                .copy_from_slice(&sb.payload[..sb.uncompressed_size]);
        }

        produced += sb.uncompressed_size;
    }

    if produced != expected {
        return Err(Error::SizeMismatch {
            offset: base_offset,
            expected: expected as u64,
            got: produced as u64,
        });
    }

    Ok(produced)
}
