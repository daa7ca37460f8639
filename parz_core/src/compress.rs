//! Parallel subblock compression.

use std::ops::Range;
use std::time::Instant;

use crate::codec::BlockCodec;
use crate::config::{Compression, Performance};
use crate::error::{Error, Result};
use crate::parallel;
use crate::shuffle::shuffle;
use crate::subblock::{checksum64, serialized_size, Subblock, SubblockList};

/// Compress `data` into an ordered subblock list.
///
/// The input is split into `config.subblock_size` chunks (clamped to the
/// codec's bounds) which are compressed concurrently. A chunk that the codec
/// cannot shrink is stored verbatim; decode distinguishes the two cases by
/// comparing payload length against `uncompressed_size`. When the whole
/// list's serialized footprint would not beat `data.len()`, the empty list
/// is returned and the caller is expected to store the raw input itself.
///
/// Worker failures do not interrupt the remaining workers; after the join
/// they are surfaced together as one [`Error::Compression`].
pub fn compress(
    codec: &dyn BlockCodec,
    config: &Compression,
    data: &[u8],
    perf: Option<&mut Performance>,
) -> Result<SubblockList> {
    if data.is_empty() {
        return Ok(Vec::new());
    }

    let level = config.clamped_level(codec);
    let subblock_size = config.clamped_subblock_size(codec);
    let num_subblocks = data.len() / subblock_size;
    let remainder = data.len() % subblock_size;
    // The trailing item is always scheduled; workers skip it when empty.
    let total_items = num_subblocks + 1;

    let mut elapsed = 0f64;

    let shuffled;
    let src: &[u8] = if config.shuffling_active() {
        let t = Instant::now();
        shuffled = shuffle(data, config.item_size);
        elapsed += t.elapsed().as_secs_f64();
        &shuffled
    } else {
        data
    };

    let threads = parallel::thread_count(config, total_items);
    let ranges = parallel::partition(total_items, threads);

    let job = CompressJob {
        codec,
        src,
        level,
        subblock_size,
        num_subblocks,
        remainder,
        checksums: config.checksums,
    };

    let t = Instant::now();
    let results: Vec<Result<SubblockList>> = if threads == 1 {
        vec![job.run(ranges.into_iter().next().unwrap())]
    } else {
        std::thread::scope(|scope| {
            let job = &job;
            let handles: Vec<_> = ranges
                .into_iter()
                .map(|range| scope.spawn(move || job.run(range)))
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap_or_else(|p| Err(parallel::fault_to_error(p))))
                .collect()
        })
    };
    elapsed += t.elapsed().as_secs_f64();

    let (lists, errors) = parallel::split_results(results);
    if !errors.is_empty() {
        return Err(Error::Compression {
            algorithm: codec.name(),
            errors,
        });
    }

    let subblocks: SubblockList = lists.into_iter().flatten().collect();
    let compressed_size = serialized_size(&subblocks);

    if let Some(perf) = perf {
        perf.size_reduction =
            (data.len() as f64 - compressed_size as f64) / data.len() as f64;
        perf.throughput = if elapsed > 0.0 {
            data.len() as f64 / elapsed / (1024.0 * 1024.0)
        } else {
            0.0
        };
        perf.thread_count = threads;
    }

    // Not worth storing compressed: the caller keeps the raw data instead.
    if compressed_size >= data.len() {
        return Ok(Vec::new());
    }

    Ok(subblocks)
}

/// Read-only state shared by every compression worker.
struct CompressJob<'a> {
    codec: &'a dyn BlockCodec,
    src: &'a [u8],
    level: i32,
    subblock_size: usize,
    num_subblocks: usize,
    remainder: usize,
    checksums: bool,
}

impl CompressJob<'_> {
    /// Process one contiguous range of item indices. The produced subblocks
    /// depend only on the indices, never on the partitioning, which is what
    /// makes the output independent of the worker count.
    fn run(&self, items: Range<usize>) -> Result<SubblockList> {
        let mut subblocks = Vec::new();

        for i in items {
            let usz = if i < self.num_subblocks {
                self.subblock_size
            } else {
                self.remainder
            };
            if usz == 0 {
                continue;
            }

            let begin = i * self.subblock_size;
            let block = &self.src[begin..begin + usz];

            let payload = match self.compress_one(block, usz)? {
                Some(compressed) => compressed,
                // Subblock too small to be compressed, or data not compressible.
                None => block.to_vec(),
            };

            let checksum = if self.checksums { checksum64(&payload) } else { 0 };

            subblocks.push(Subblock {
                payload,
                uncompressed_size: usz,
                checksum,
            });
        }

        Ok(subblocks)
    }

    /// Run the codec over one chunk. `None` means "store verbatim".
    fn compress_one(&self, block: &[u8], usz: usize) -> Result<Option<Vec<u8>>> {
        if usz < self.codec.min_block_size() {
            return Ok(None);
        }

        let bound = self.codec.max_compressed_size(usz);
        let mut buf: Vec<u8> = Vec::new();
        buf.try_reserve_exact(bound).map_err(|_| Error::OutOfMemory)?;
        buf.resize(bound, 0);

        let csz = self.codec.compress_block(&mut buf, block, self.level);
        if csz > 0 && csz < usz {
            Ok(Some(buf[..csz].to_vec()))
        } else {
            Ok(None)
        }
    }
}
