//! Command-line argument definitions.

use clap::Parser;
use std::path::PathBuf;

/// Search for patterns in PCAP files.
#[derive(Parser, Debug)]
#[command(name = "pcapneedle")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// PCAP file to scan
    #[arg(value_name = "FILE")]
    pub pcap_file: Option<PathBuf>,

    /// Regular expression to search for in packet payloads
    #[arg(value_name = "PATTERN")]
    pub pattern: Option<String>,

    /// Case-insensitive search
    #[arg(short = 'i', long = "ignore-case")]
    pub ignore_case: bool,

    /// Only scan packets exposing this protocol layer
    #[arg(short = 'p', long = "protocol", value_name = "LAYER")]
    pub protocol: Option<String>,

    /// Output JSON file
    #[arg(
        short = 'o',
        long = "output",
        value_name = "OUTPUT_FILE",
        default_value = "output.json"
    )]
    pub output: PathBuf,

    /// Number of worker threads (default: available CPUs)
    #[arg(short = 'j', long = "jobs", value_name = "N")]
    pub jobs: Option<usize>,

    /// List protocol layers the decoder understands
    #[arg(long = "list-protocols")]
    pub list_protocols: bool,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Check if this is an info-only command (no PCAP file needed).
    pub fn is_info_only(&self) -> bool {
        self.list_protocols
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positionals_and_flags() {
        let args = Args::parse_from([
            "pcapneedle",
            "capture.pcap",
            "secret",
            "-i",
            "-p",
            "tcp",
            "-o",
            "out/results.json",
            "-j",
            "4",
        ]);

        assert_eq!(args.pcap_file, Some(PathBuf::from("capture.pcap")));
        assert_eq!(args.pattern.as_deref(), Some("secret"));
        assert!(args.ignore_case);
        assert_eq!(args.protocol.as_deref(), Some("tcp"));
        assert_eq!(args.output, PathBuf::from("out/results.json"));
        assert_eq!(args.jobs, Some(4));
    }

    #[test]
    fn output_defaults_to_output_json() {
        let args = Args::parse_from(["pcapneedle", "capture.pcap", "x"]);
        assert_eq!(args.output, PathBuf::from("output.json"));
        assert!(!args.ignore_case);
        assert!(args.jobs.is_none());
    }

    #[test]
    fn list_protocols_needs_no_file() {
        let args = Args::parse_from(["pcapneedle", "--list-protocols"]);
        assert!(args.is_info_only());
        assert!(args.pcap_file.is_none());
    }
}
