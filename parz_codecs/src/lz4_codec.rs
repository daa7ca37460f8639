use lz4_flex::block::{compress_into, decompress_into, get_maximum_output_size};

use parz_core::format::CODEC_LZ4;
use parz_core::BlockCodec;

/// LZ4 block codec (raw block format, no size prefix — the subblock record
/// already carries the uncompressed size).
///
/// Fastest of the bundled codecs, typically 3–5 GB/s on decode. LZ4 has a
/// single speed/ratio operating point, so the level plumbing collapses to 1.
pub struct Lz4Codec;

impl BlockCodec for Lz4Codec {
    fn id(&self) -> u16 {
        CODEC_LZ4
    }

    fn name(&self) -> &'static str {
        "lz4"
    }

    fn max_level(&self) -> i32 {
        1
    }

    fn default_level(&self) -> i32 {
        1
    }

    fn min_block_size(&self) -> usize {
        16
    }

    fn max_block_size(&self) -> usize {
        // LZ4's format limit on a single block.
        0x7E00_0000
    }

    fn max_compressed_size(&self, uncompressed: usize) -> usize {
        get_maximum_output_size(uncompressed)
    }

    fn compress_block(&self, dst: &mut [u8], src: &[u8], _level: i32) -> usize {
        compress_into(src, dst).unwrap_or(0)
    }

    fn uncompress_block(&self, dst: &mut [u8], src: &[u8]) -> usize {
        decompress_into(src, dst).unwrap_or(0)
    }
}
