pub mod codec;
pub mod config;
pub mod error;
pub mod format;
pub mod shuffle;
pub mod subblock;

mod compress;
mod decompress;
mod parallel;

pub use codec::BlockCodec;
pub use compress::compress;
pub use config::{Compression, Performance, DEFAULT_SUBBLOCK_SIZE};
pub use decompress::uncompress;
pub use error::{Error, Result};
pub use shuffle::{shuffle, unshuffle};
pub use subblock::{Subblock, SubblockList};
