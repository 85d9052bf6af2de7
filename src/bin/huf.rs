/// huf – CLI for static Huffman file compression.
///
/// Works similar to gzip:
///   huf file.txt            → compress to file.txt.huf (removes original)
///   huf -d file.txt.huf     → decompress to file.txt (removes original)
///   huf -k file.txt         → keep original after compress
///   huf -o out.huf file.txt → name the output explicitly
///   huf -l file.txt.huf     → list info about a compressed file
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{self, ExitCode};

use huf::container;
use huf::huffman::MAX_SYMBOLS;
use huf::{EncodeOptions, Stats};

fn usage() {
    eprintln!("huf - static Huffman file compression");
    eprintln!();
    eprintln!("Usage: huf [OPTIONS] FILE...");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -d, --decompress   Decompress mode");
    eprintln!("  -k, --keep         Keep original file");
    eprintln!("  -f, --force        Overwrite existing output files");
    eprintln!("  -o, --output PATH  Write to PATH (single input only)");
    eprintln!("  -l, --list         List info about compressed file");
    eprintln!("  -t, --threads N    Counting threads (0=auto, 1=single-threaded)");
    eprintln!("      --codes        Print the code table after compressing");
    eprintln!("  -v, --verbose      Verbose output");
    eprintln!("  -q, --quiet        Suppress warnings");
    eprintln!("  -h, --help         Show this help");
    eprintln!();
    eprintln!("Compressed files use the .huf extension.");
}

#[derive(Debug)]
struct Opts {
    decompress: bool,
    keep: bool,
    force: bool,
    list: bool,
    verbose: bool,
    quiet: bool,
    codes: bool,
    threads: usize,
    output: Option<String>,
    files: Vec<String>,
}

fn parse_args() -> Opts {
    let args: Vec<String> = env::args().skip(1).collect();
    let mut opts = Opts {
        decompress: false,
        keep: false,
        force: false,
        list: false,
        verbose: false,
        quiet: false,
        codes: false,
        threads: 0,
        output: None,
        files: Vec::new(),
    };

    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];
        match arg.as_str() {
            "-d" | "--decompress" => opts.decompress = true,
            "-k" | "--keep" => opts.keep = true,
            "-f" | "--force" => opts.force = true,
            "-l" | "--list" => opts.list = true,
            "-v" | "--verbose" => opts.verbose = true,
            "-q" | "--quiet" => opts.quiet = true,
            "--codes" => opts.codes = true,
            "-h" | "--help" => {
                usage();
                process::exit(0);
            }
            "-o" | "--output" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("huf: missing argument for -o");
                    process::exit(1);
                }
                opts.output = Some(args[i].clone());
            }
            "-t" | "--threads" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("huf: missing argument for -t");
                    process::exit(1);
                }
                opts.threads = match args[i].parse::<usize>() {
                    Ok(n) => n,
                    Err(_) => {
                        eprintln!("huf: invalid thread count '{}'", args[i]);
                        process::exit(1);
                    }
                };
            }
            // Handle combined short flags like -dk, -kv, etc.
            s if s.starts_with('-') && !s.starts_with("--") && s.len() > 2 => {
                for ch in s[1..].chars() {
                    match ch {
                        'd' => opts.decompress = true,
                        'k' => opts.keep = true,
                        'f' => opts.force = true,
                        'l' => opts.list = true,
                        'v' => opts.verbose = true,
                        'q' => opts.quiet = true,
                        _ => {
                            eprintln!("huf: unknown flag '-{ch}'");
                            process::exit(1);
                        }
                    }
                }
            }
            _ => {
                opts.files.push(arg.clone());
            }
        }
        i += 1;
    }

    opts
}

/// Determine the output filename for compression.
fn compress_output_path(input: &str) -> PathBuf {
    PathBuf::from(format!("{input}.huf"))
}

/// Determine the output filename for decompression.
fn decompress_output_path(input: &str) -> Option<PathBuf> {
    let path = Path::new(input);
    match path.extension().and_then(|e| e.to_str()) {
        Some("huf") => Some(path.with_extension("")),
        _ => None,
    }
}

/// Print the code table of the last compression, one symbol per line.
fn print_code_table(stats: &Stats) {
    println!("--- code table ---");
    for symbol in 0..MAX_SYMBOLS {
        let code = &stats.codes[symbol];
        if code.bit_count == 0 {
            continue;
        }
        let glyph = if (0x20..=0x7E).contains(&symbol) {
            format!("'{}'", symbol as u8 as char)
        } else {
            "   ".to_string()
        };
        let bits: String = (0..code.bit_count as usize)
            .map(|j| if code.bit(j) == 1 { '1' } else { '0' })
            .collect();
        println!("0x{symbol:02X} {glyph} {bits} ({} bits)", code.bit_count);
    }
}

fn list_file(path: &str) -> Result<(), String> {
    let data = fs::read(path).map_err(|e| format!("{path}: {e}"))?;
    if !container::is_container(&data) {
        return Err(format!("{path}: not in huf format"));
    }
    if data[..4] == container::LEGACY_MAGIC {
        return Err(format!("{path}: legacy HUF1 container is not supported"));
    }
    if data.len() < container::HEADER_LEN {
        return Err(format!("{path}: truncated header"));
    }
    let orig_size = u64::from_le_bytes(data[4..12].try_into().unwrap());
    let ratio = if orig_size > 0 {
        (data.len() as f64 / orig_size as f64) * 100.0
    } else {
        0.0
    };
    println!("{:>12} {:>12} {:5.1}% {}", orig_size, data.len(), ratio, path);
    Ok(())
}

fn process_compress(opts: &Opts, path: &str) -> Result<(), String> {
    let out_path = match &opts.output {
        Some(explicit) => PathBuf::from(explicit),
        None => compress_output_path(path),
    };
    let out_str = out_path.display().to_string();

    if out_path.exists() && !opts.force {
        return Err(format!("{out_str} already exists; use -f to overwrite"));
    }

    let mut stats = Stats::default();
    let options = EncodeOptions {
        threads: opts.threads,
    };
    huf::encode_with_options(path, &out_path, Some(&mut stats), &options)
        .map_err(|e| format!("{path}: {e}"))?;

    if opts.verbose {
        let ratio = if stats.original_size > 0 {
            (stats.compressed_size as f64 / stats.original_size as f64) * 100.0
        } else {
            0.0
        };
        eprintln!(
            "{path}: {:.1}% ({} → {} bytes, {:.4} bits/sym entropy, \
             {:.4} bits/sym avg, {:.3}s)",
            ratio,
            stats.original_size,
            stats.compressed_size,
            stats.entropy,
            stats.avg_code_len,
            stats.elapsed.as_secs_f64(),
        );
    }
    if opts.codes {
        print_code_table(&stats);
    }

    if !opts.keep && opts.output.is_none() {
        fs::remove_file(path).map_err(|e| format!("{path}: cannot remove: {e}"))?;
    }

    Ok(())
}

fn process_decompress(opts: &Opts, path: &str) -> Result<(), String> {
    let out_path = match &opts.output {
        Some(explicit) => PathBuf::from(explicit),
        None => decompress_output_path(path)
            .ok_or_else(|| format!("{path}: unknown suffix -- ignored"))?,
    };
    let out_str = out_path.display().to_string();

    if out_path.exists() && !opts.force {
        return Err(format!("{out_str} already exists; use -f to overwrite"));
    }

    let mut stats = Stats::default();
    huf::decode(path, &out_path, Some(&mut stats)).map_err(|e| format!("{path}: {e}"))?;

    if opts.verbose {
        eprintln!(
            "{path}: {} bytes in {:.3}s",
            stats.original_size,
            stats.elapsed.as_secs_f64(),
        );
    }

    if !opts.keep && opts.output.is_none() {
        fs::remove_file(path).map_err(|e| format!("{path}: cannot remove: {e}"))?;
    }

    Ok(())
}

fn run() -> Result<(), ()> {
    let opts = parse_args();
    let mut had_error = false;

    if opts.files.is_empty() {
        usage();
        return Err(());
    }
    if opts.output.is_some() && opts.files.len() > 1 {
        eprintln!("huf: -o requires exactly one input file");
        return Err(());
    }

    for path in &opts.files {
        let result = if opts.list {
            list_file(path)
        } else if opts.decompress {
            process_decompress(&opts, path)
        } else {
            process_compress(&opts, path)
        };

        if let Err(msg) = result {
            if !opts.quiet {
                eprintln!("huf: {msg}");
            }
            had_error = true;
        }
    }

    if had_error {
        Err(())
    } else {
        Ok(())
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(()) => ExitCode::FAILURE,
    }
}
