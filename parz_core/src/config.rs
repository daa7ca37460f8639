use crate::codec::BlockCodec;
use crate::parallel;

/// Default target subblock size: 64 KB.
pub const DEFAULT_SUBBLOCK_SIZE: usize = 64 * 1024;

/// Per-call engine configuration. Read-only for the duration of a
/// `compress`/`uncompress` call.
#[derive(Debug, Clone)]
pub struct Compression {
    /// Compression level. `<= 0` selects the codec default; anything else
    /// is clamped to `[1, codec.max_level()]`.
    pub level: i32,
    /// Target chunk size in bytes. Values outside
    /// `[codec.min_block_size(), codec.max_block_size()]` (including 0)
    /// snap to `codec.max_block_size()`.
    pub subblock_size: usize,
    /// Byte width of items for the shuffle filter; 1 disables shuffling.
    pub item_size: usize,
    /// Byte shuffling switch, effective only when `item_size > 1`.
    pub byte_shuffling: bool,
    /// When true every subblock carries a nonzero xxh3-64 checksum.
    pub checksums: bool,
    pub parallel: bool,
    /// Upper bound on worker threads when `parallel` is set.
    pub max_processors: usize,
}

impl Default for Compression {
    fn default() -> Self {
        Self {
            level: 0,
            subblock_size: DEFAULT_SUBBLOCK_SIZE,
            item_size: 1,
            byte_shuffling: false,
            checksums: true,
            parallel: true,
            max_processors: parallel::max_threads(),
        }
    }
}

impl Compression {
    /// Effective compression level for `codec` per the clamping rules.
    pub fn clamped_level(&self, codec: &dyn BlockCodec) -> i32 {
        if self.level <= 0 {
            codec.default_level()
        } else {
            self.level.clamp(1, codec.max_level())
        }
    }

    /// Effective subblock size for `codec` per the clamping rules.
    pub fn clamped_subblock_size(&self, codec: &dyn BlockCodec) -> usize {
        if self.subblock_size < codec.min_block_size()
            || self.subblock_size > codec.max_block_size()
        {
            codec.max_block_size()
        } else {
            self.subblock_size
        }
    }

    /// Whether the shuffle filter applies to this call.
    #[inline]
    pub fn shuffling_active(&self) -> bool {
        self.byte_shuffling && self.item_size > 1
    }
}

/// Wall-clock metrics for one engine call, filled on request.
#[derive(Debug, Clone, Copy, Default)]
pub struct Performance {
    /// Fractional size reduction relative to the uncompressed data; can be
    /// negative when the subblock overhead exceeds the savings.
    pub size_reduction: f64,
    /// MiB/s of uncompressed data over the measured interval.
    pub throughput: f64,
    /// Worker threads used.
    pub thread_count: usize,
}
