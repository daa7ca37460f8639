use xxhash_rust::xxh3::xxh3_64;

/// Serialized bytes per subblock record, excluding the payload:
///   uncompressed_size:u64 + payload_len:u64 + checksum:u64 = 24
pub const SUBBLOCK_OVERHEAD: usize = 24;

/// Size of the u64 count prefix in front of a serialized subblock list.
pub const COUNT_PREFIX_SIZE: usize = 8;

/// One independently (de)compressible fragment of the input stream.
///
/// `payload` holds either codec output or a verbatim copy of the source
/// range; the two cases are distinguished on decode solely by comparing
/// `payload.len()` against `uncompressed_size` — no explicit tag exists.
/// `checksum` is an xxh3-64 of `payload`, with 0 reserved to mean
/// "not checked".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subblock {
    pub payload: Vec<u8>,
    /// Number of original bytes this subblock represents.
    pub uncompressed_size: usize,
    /// xxh3-64 of `payload`, or 0 when checksums were disabled.
    pub checksum: u64,
}

impl Subblock {
    /// A verbatim subblock stores its source range uncompressed.
    #[inline]
    pub fn is_verbatim(&self) -> bool {
        self.payload.len() == self.uncompressed_size
    }

    /// Bytes this subblock occupies in serialized form.
    #[inline]
    pub fn serialized_size(&self) -> usize {
        SUBBLOCK_OVERHEAD + self.payload.len()
    }
}

/// Ordered sequence of subblocks; order encodes concatenation order of the
/// original data. An empty list is the "store raw" give-up sentinel.
pub type SubblockList = Vec<Subblock>;

/// Total serialized footprint of a subblock list, count prefix included.
/// This is the figure the compression engine compares against the input
/// size when deciding whether to give up.
pub fn serialized_size(subblocks: &[Subblock]) -> usize {
    COUNT_PREFIX_SIZE + subblocks.iter().map(Subblock::serialized_size).sum::<usize>()
}

/// Payload hash used for subblock checksums. xxh3 can in principle produce
/// 0, which would read back as "not checked"; that value is remapped to 1
/// so an enabled checksum is always nonzero.
pub fn checksum64(payload: &[u8]) -> u64 {
    match xxh3_64(payload) {
        0 => 1,
        h => h,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbatim_is_length_equality() {
        let sb = Subblock {
            payload: vec![1, 2, 3],
            uncompressed_size: 3,
            checksum: 0,
        };
        assert!(sb.is_verbatim());

        let sb = Subblock {
            payload: vec![1, 2],
            uncompressed_size: 3,
            checksum: 0,
        };
        assert!(!sb.is_verbatim());
    }

    #[test]
    fn serialized_footprint_counts_prefix_and_overhead() {
        let list = vec![
            Subblock {
                payload: vec![0; 10],
                uncompressed_size: 100,
                checksum: 1,
            },
            Subblock {
                payload: vec![0; 20],
                uncompressed_size: 20,
                checksum: 1,
            },
        ];
        assert_eq!(serialized_size(&list), 8 + (24 + 10) + (24 + 20));
    }

    #[test]
    fn checksum_is_never_zero() {
        assert_ne!(checksum64(b""), 0);
        assert_ne!(checksum64(b"parz"), 0);
    }
}
