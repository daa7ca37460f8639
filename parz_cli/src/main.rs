use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};

use parz_codecs::{codec_by_id, codec_by_name};
use parz_core::format::{
    read_container, write_container, ContainerContents, FLAG_CHECKSUMS, FLAG_RAW, FLAG_SHUFFLED,
};
use parz_core::subblock::serialized_size;
use parz_core::{compress, uncompress, Compression, Performance, DEFAULT_SUBBLOCK_SIZE};

// ── CLI definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "parz",
    about = "Parallel subblock compression — compress, decompress, and inspect PARZ1 containers",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a file into a PARZ1 container
    Compress {
        /// Source file to compress ("-" reads stdin)
        input: PathBuf,
        /// Destination PARZ1 container
        output: PathBuf,
        /// Codec to use: deflate | lz4 | zstd
        #[arg(short, long, default_value = "zstd")]
        codec: String,
        /// Compression level (0 = codec default)
        #[arg(short, long, default_value_t = 0)]
        level: i32,
        /// Target uncompressed bytes per subblock (default: 65536 = 64 KB)
        #[arg(short, long, default_value_t = DEFAULT_SUBBLOCK_SIZE)]
        subblock_size: usize,
        /// Byte-shuffle fixed-width items before compressing
        #[arg(long)]
        shuffle: bool,
        /// Item width in bytes for --shuffle (e.g. 4 for int32/float32 data)
        #[arg(long, default_value_t = 1)]
        item_size: usize,
        /// Skip per-subblock checksums
        #[arg(long)]
        no_checksums: bool,
        /// Compress on the calling thread only
        #[arg(long)]
        serial: bool,
        /// Cap on worker threads (0 = all available)
        #[arg(short, long, default_value_t = 0)]
        threads: usize,
    },
    /// Decompress a PARZ1 container back to raw bytes
    Decompress {
        /// Source PARZ1 container
        input: PathBuf,
        /// Destination file ("-" writes to stdout)
        output: PathBuf,
    },
    /// Print container header metadata and subblock statistics
    Inspect {
        /// PARZ1 container to inspect
        file: PathBuf,
        /// Print per-subblock details
        #[arg(long)]
        subblocks: bool,
    },
    /// Repeatedly compress and decompress a file, reporting throughput
    Bench {
        /// Source file with representative data
        input: PathBuf,
        /// Codec to use: deflate | lz4 | zstd
        #[arg(short, long, default_value = "zstd")]
        codec: String,
        /// Number of compress/decompress iterations
        #[arg(short, long, default_value_t = 5)]
        iterations: u32,
    },
}

// ── Helpers ────────────────────────────────────────────────────────────────

fn human_bytes(n: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut v = n as f64;
    let mut unit = 0;
    while v >= 1024.0 && unit < UNITS.len() - 1 {
        v /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", n)
    } else {
        format!("{:.2} {}", v, UNITS[unit])
    }
}

fn read_input(path: &PathBuf) -> anyhow::Result<Vec<u8>> {
    if path.to_str() == Some("-") {
        let mut data = Vec::new();
        io::stdin().lock().read_to_end(&mut data)?;
        Ok(data)
    } else {
        std::fs::read(path).with_context(|| format!("reading input file {:?}", path))
    }
}

// ── Subcommand implementations ─────────────────────────────────────────────

#[allow(clippy::too_many_arguments)]
fn run_compress(
    input: PathBuf,
    output: PathBuf,
    codec_name: &str,
    level: i32,
    subblock_size: usize,
    shuffle: bool,
    item_size: usize,
    no_checksums: bool,
    serial: bool,
    threads: usize,
) -> anyhow::Result<()> {
    let codec = codec_by_name(codec_name)?;
    let mut config = Compression {
        level,
        subblock_size,
        item_size,
        byte_shuffling: shuffle,
        checksums: !no_checksums,
        parallel: !serial,
        ..Compression::default()
    };
    if threads > 0 {
        config.max_processors = threads;
    }

    let data = read_input(&input)?;
    let mut perf = Performance::default();
    let subblocks = compress(codec.as_ref(), &config, &data, Some(&mut perf))?;

    let mut w = BufWriter::new(
        File::create(&output).with_context(|| format!("creating output file {:?}", output))?,
    );
    write_container(&mut w, codec.id(), &config, &data, &subblocks)?;
    w.flush()?;

    let compressed = std::fs::metadata(&output)?.len();
    eprintln!("  codec       : {}", codec.name());
    eprintln!("  raw size    : {}", human_bytes(data.len() as u64));
    eprintln!("  compressed  : {}", human_bytes(compressed));
    if subblocks.is_empty() {
        eprintln!("  subblocks   : none (incompressible, stored raw)");
    } else {
        eprintln!("  subblocks   : {}", subblocks.len());
        eprintln!("  reduction   : {:.1}%", perf.size_reduction * 100.0);
    }
    eprintln!("  throughput  : {:.1} MiB/s", perf.throughput);
    eprintln!("  threads     : {}", perf.thread_count);
    Ok(())
}

fn run_decompress(input: PathBuf, output: PathBuf) -> anyhow::Result<()> {
    let mut r = BufReader::new(
        File::open(&input).with_context(|| format!("opening input file {:?}", input))?,
    );
    let (header, contents) = read_container(&mut r)?;

    let mut perf = Performance::default();
    let data = match contents {
        ContainerContents::Raw(raw) => raw,
        ContainerContents::Subblocks(subblocks) => {
            let codec = codec_by_id(header.codec_id)?;
            let config = parz_core::format::decode_config(&header);
            let mut out = vec![0u8; header.raw_size as usize];
            let n = uncompress(codec.as_ref(), &config, &mut out, &subblocks, Some(&mut perf))?;
            out.truncate(n);
            out
        }
    };

    if output.to_str() == Some("-") {
        io::stdout().lock().write_all(&data)?;
    } else {
        std::fs::write(&output, &data)
            .with_context(|| format!("writing output file {:?}", output))?;
    }

    eprintln!("  raw size    : {}", human_bytes(data.len() as u64));
    eprintln!("  throughput  : {:.1} MiB/s", perf.throughput);
    eprintln!("  threads     : {}", perf.thread_count);
    Ok(())
}

fn run_inspect(file: PathBuf, show_subblocks: bool) -> anyhow::Result<()> {
    let mut r = BufReader::new(File::open(&file)?);
    let (header, contents) = read_container(&mut r)?;

    let codec_name = codec_by_id(header.codec_id)
        .map(|c| c.name())
        .unwrap_or("unknown");

    println!("=== PARZ1 container: {:?} ===", file);
    println!();
    println!("  format version : {}", header.version);
    println!("  codec          : {} (id={})", codec_name, header.codec_id);
    println!("  raw size       : {}", human_bytes(header.raw_size));
    println!("  subblocks      : {}", header.subblock_count);
    println!("  checksums      : {}", header.has_flag(FLAG_CHECKSUMS));
    println!(
        "  shuffled       : {} (item size {})",
        header.has_flag(FLAG_SHUFFLED),
        header.item_size
    );
    println!("  stored raw     : {}", header.has_flag(FLAG_RAW));

    if let ContainerContents::Subblocks(subblocks) = &contents {
        let footprint = serialized_size(subblocks);
        println!("  footprint      : {}", human_bytes(footprint as u64));
        println!(
            "  ratio          : {:.2}x",
            header.raw_size as f64 / footprint as f64
        );

        if show_subblocks {
            println!();
            println!(
                "  {:>8}  {:>12}  {:>12}  {:>9}  {:>16}",
                "subblock", "raw", "payload", "verbatim", "checksum"
            );
            println!("  {}", "-".repeat(64));
            for (i, sb) in subblocks.iter().enumerate() {
                println!(
                    "  {:>8}  {:>12}  {:>12}  {:>9}  {:016x}",
                    i,
                    human_bytes(sb.uncompressed_size as u64),
                    human_bytes(sb.payload.len() as u64),
                    sb.is_verbatim(),
                    sb.checksum
                );
            }
        }
    }

    Ok(())
}

fn run_bench(input: PathBuf, codec_name: &str, iterations: u32) -> anyhow::Result<()> {
    let codec = codec_by_name(codec_name)?;
    let data = read_input(&input)?;
    let config = Compression::default();

    eprintln!(
        "benchmarking {} over {} ({} iterations)...",
        codec.name(),
        human_bytes(data.len() as u64),
        iterations
    );

    let mut compress_secs = 0f64;
    let mut decompress_secs = 0f64;
    let mut footprint = data.len();

    for _ in 0..iterations {
        let t0 = Instant::now();
        let subblocks = compress(codec.as_ref(), &config, &data, None)?;
        compress_secs += t0.elapsed().as_secs_f64();

        if subblocks.is_empty() {
            anyhow::bail!("input is incompressible; nothing to benchmark");
        }
        footprint = serialized_size(&subblocks);

        let mut out = vec![0u8; data.len()];
        let t0 = Instant::now();
        uncompress(codec.as_ref(), &config, &mut out, &subblocks, None)?;
        decompress_secs += t0.elapsed().as_secs_f64();
    }

    let mib = data.len() as f64 / (1024.0 * 1024.0) * iterations as f64;
    println!();
    println!("=== {} ===", codec.name());
    println!("  ratio       : {:.2}x", data.len() as f64 / footprint as f64);
    println!("  compress    : {:.1} MiB/s", mib / compress_secs);
    println!("  decompress  : {:.1} MiB/s", mib / decompress_secs);
    Ok(())
}

// ── Entry point ────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Compress {
            input,
            output,
            codec,
            level,
            subblock_size,
            shuffle,
            item_size,
            no_checksums,
            serial,
            threads,
        } => run_compress(
            input,
            output,
            &codec,
            level,
            subblock_size,
            shuffle,
            item_size,
            no_checksums,
            serial,
            threads,
        ),
        Commands::Decompress { input, output } => run_decompress(input, output),
        Commands::Inspect { file, subblocks } => run_inspect(file, subblocks),
        Commands::Bench {
            input,
            codec,
            iterations,
        } => run_bench(input, &codec, iterations),
    }
}
