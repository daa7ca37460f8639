/// Core compression abstraction.
///
/// Each `BlockCodec` implementation:
/// - Is identified by a stable numeric `id()` stored in the PARZ1 container
///   header, and a `name()` used in error messages.
/// - Must compress/uncompress individual subblocks independently — no
///   cross-block state is permitted. This is the invariant that makes the
///   parallel engine possible.
/// - Is pure: no per-instance state is mutated across calls, so one codec
///   value may be shared by any number of worker threads.
///
/// The engine owns every buffer. `compress_block` and `uncompress_block`
/// write into caller-provided slices and report the produced size; a return
/// of 0 is the failure sentinel. The engine treats a 0 from `compress_block`
/// as "not compressible" and stores the subblock verbatim, while a 0 from
/// `uncompress_block` is a fatal decode error.
pub trait BlockCodec: Send + Sync {
    /// Stable codec ID stored in the PARZ1 container header.
    fn id(&self) -> u16;

    /// Human-readable codec name for error messages and CLI display.
    fn name(&self) -> &'static str;

    /// Largest meaningful compression level for this codec.
    fn max_level(&self) -> i32;

    /// Level used when the caller does not specify one (`level <= 0`).
    fn default_level(&self) -> i32;

    /// Smallest uncompressed block worth feeding to the codec. Shorter
    /// subblocks are stored verbatim without calling `compress_block`.
    fn min_block_size(&self) -> usize;

    /// Largest uncompressed block the codec accepts.
    fn max_block_size(&self) -> usize;

    /// Pessimistic upper bound on the compressed size of `uncompressed`
    /// input bytes. The engine allocates exactly this much per working
    /// buffer, so the bound must hold for any input.
    fn max_compressed_size(&self, uncompressed: usize) -> usize;

    /// Compress one block of `src` into `dst` at the given (pre-clamped)
    /// level. Returns the produced size, or 0 if the data did not fit in
    /// `dst` or could not be compressed.
    fn compress_block(&self, dst: &mut [u8], src: &[u8], level: i32) -> usize;

    /// Uncompress one block of `src` into `dst`. Returns the produced size,
    /// or 0 on any decode failure.
    fn uncompress_block(&self, dst: &mut [u8], src: &[u8]) -> usize;
}
