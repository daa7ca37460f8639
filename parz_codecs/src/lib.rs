mod deflate_codec;
mod lz4_codec;
mod zstd_codec;

pub use deflate_codec::DeflateCodec;
pub use lz4_codec::Lz4Codec;
pub use zstd_codec::ZstdCodec;

use std::sync::Arc;

use parz_core::format::{CODEC_DEFLATE, CODEC_LZ4, CODEC_ZSTD};
use parz_core::BlockCodec;

/// Resolve a codec from its container `codec_id`.
///
/// Called by the CLI when opening an existing PARZ1 container, so decoding
/// can be initialized with the right codec automatically.
pub fn codec_by_id(id: u16) -> anyhow::Result<Arc<dyn BlockCodec>> {
    match id {
        CODEC_DEFLATE => Ok(Arc::new(DeflateCodec)),
        CODEC_LZ4 => Ok(Arc::new(Lz4Codec)),
        CODEC_ZSTD => Ok(Arc::new(ZstdCodec)),
        _ => anyhow::bail!("unknown codec id {}; supported: 1 (deflate), 2 (lz4), 3 (zstd)", id),
    }
}

/// Resolve a codec from a user-facing name.
pub fn codec_by_name(name: &str) -> anyhow::Result<Arc<dyn BlockCodec>> {
    match name {
        "deflate" | "zlib" | "d" => Ok(Arc::new(DeflateCodec)),
        "lz4" | "l" => Ok(Arc::new(Lz4Codec)),
        "zstd" | "z" => Ok(Arc::new(ZstdCodec)),
        other => anyhow::bail!(
            "unknown codec '{}'. Valid options: deflate, lz4, zstd",
            other
        ),
    }
}
