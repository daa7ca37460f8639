use flate2::{Compress, Compression, Decompress, FlushCompress, FlushDecompress, Status};

use parz_core::format::CODEC_DEFLATE;
use parz_core::BlockCodec;

/// DEFLATE block codec (zlib framing).
///
/// The broadest-compatibility choice of the bundled codecs: moderate ratio,
/// moderate speed. Levels 1–9 trade speed for density the usual zlib way.
pub struct DeflateCodec;

impl BlockCodec for DeflateCodec {
    fn id(&self) -> u16 {
        CODEC_DEFLATE
    }

    fn name(&self) -> &'static str {
        "deflate"
    }

    fn max_level(&self) -> i32 {
        9
    }

    fn default_level(&self) -> i32 {
        6
    }

    fn min_block_size(&self) -> usize {
        64
    }

    fn max_block_size(&self) -> usize {
        u32::MAX as usize
    }

    fn max_compressed_size(&self, uncompressed: usize) -> usize {
        // zlib's compressBound: worst case for stored blocks plus framing.
        uncompressed + (uncompressed >> 12) + (uncompressed >> 14) + (uncompressed >> 25) + 13
    }

    fn compress_block(&self, dst: &mut [u8], src: &[u8], level: i32) -> usize {
        let mut stream = Compress::new(Compression::new(level as u32), true);
        loop {
            let in_pos = stream.total_in() as usize;
            let out_pos = stream.total_out() as usize;
            if out_pos >= dst.len() {
                return 0;
            }
            match stream.compress(&src[in_pos..], &mut dst[out_pos..], FlushCompress::Finish) {
                Ok(Status::StreamEnd) => return stream.total_out() as usize,
                Ok(Status::Ok) => {
                    if stream.total_in() as usize == in_pos
                        && stream.total_out() as usize == out_pos
                    {
                        return 0;
                    }
                }
                Ok(Status::BufError) | Err(_) => return 0,
            }
        }
    }

    fn uncompress_block(&self, dst: &mut [u8], src: &[u8]) -> usize {
        let mut stream = Decompress::new(true);
        loop {
            let in_pos = stream.total_in() as usize;
            let out_pos = stream.total_out() as usize;
            match stream.decompress(&src[in_pos..], &mut dst[out_pos..], FlushDecompress::Finish) {
                Ok(Status::StreamEnd) => return stream.total_out() as usize,
                Ok(Status::Ok) => {
                    if stream.total_in() as usize == in_pos
                        && stream.total_out() as usize == out_pos
                    {
                        return 0;
                    }
                }
                Ok(Status::BufError) | Err(_) => return 0,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_roundtrip() {
        let codec = DeflateCodec;
        let src: Vec<u8> = b"the quick brown fox jumps over the lazy dog. "
            .iter()
            .cycle()
            .take(4096)
            .copied()
            .collect();

        let mut compressed = vec![0u8; codec.max_compressed_size(src.len())];
        let csz = codec.compress_block(&mut compressed, &src, codec.default_level());
        assert!(csz > 0 && csz < src.len());

        let mut out = vec![0u8; src.len()];
        let n = codec.uncompress_block(&mut out, &compressed[..csz]);
        assert_eq!(n, src.len());
        assert_eq!(out, src);
    }

    #[test]
    fn garbage_input_fails_to_decode() {
        let codec = DeflateCodec;
        let mut out = vec![0u8; 256];
        assert_eq!(codec.uncompress_block(&mut out, &[0x00, 0x01, 0x02, 0x03]), 0);
    }

    #[test]
    fn tiny_destination_reports_incompressible() {
        let codec = DeflateCodec;
        let src = vec![7u8; 1024];
        let mut dst = vec![0u8; 4];
        assert_eq!(codec.compress_block(&mut dst, &src, 6), 0);
    }
}
