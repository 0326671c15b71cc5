//! pcapneedle CLI entry point.

use std::num::NonZeroUsize;
use std::thread;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pcapneedle::capture::CaptureReader;
use pcapneedle::cli::{write_matches, Args};
use pcapneedle::decode::known_layers;
use pcapneedle::scan::{scan, PayloadMatcher, ProtocolFilter};

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Set up logging
    let filter = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .init();

    // Handle info-only commands
    if args.is_info_only() {
        list_protocols();
        return Ok(());
    }

    let pcap_file = args
        .pcap_file
        .context("PCAP file required. Use --help for usage.")?;
    let pattern = args
        .pattern
        .context("search pattern required. Use --help for usage.")?;

    // Fail fast: compile the pattern and validate the protocol filter
    // before touching the capture file.
    let matcher = PayloadMatcher::compile(&pattern, args.ignore_case)?;
    let protocol_filter = ProtocolFilter::new(args.protocol, known_layers())?;

    let reader = CaptureReader::open(&pcap_file)
        .with_context(|| format!("failed to open PCAP file: {}", pcap_file.display()))?;

    let jobs = args.jobs.unwrap_or_else(default_parallelism);
    let matches = scan(reader, &matcher, &protocol_filter, jobs)?;

    write_matches(&args.output, &matches)
        .with_context(|| format!("failed to write results to {}", args.output.display()))?;
    eprintln!(
        "[+] {} matches saved to {}",
        matches.len(),
        args.output.display()
    );

    Ok(())
}

fn default_parallelism() -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

fn list_protocols() {
    println!("Known protocol layers:");
    for name in known_layers() {
        println!("  {name}");
    }
}
