use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI для разбора дампов NVS-раздела ESP-IDF
#[derive(Parser, Debug)]
#[command(name = "nvsdump", version, about = "ESP-IDF NVS partition inspector")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Detect NVS format version (v1/v2) from page headers
    Detect {
        #[arg(long)]
        path: PathBuf,
        /// JSON output (single object)
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Full parse: pages, namespaces, entries, diagnostics
    ///
    /// Пример:
    ///   nvsdump parse --path ./nvs.bin
    ///   nvsdump parse --path ./nvs.bin --json --format-version 2
    Parse {
        #[arg(long)]
        path: PathBuf,
        #[arg(long, default_value_t = false)]
        json: bool,
        /// Skip detection and parse as this version (1 or 2)
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=2))]
        format_version: Option<u8>,
    },
    /// Print page records only
    Pages {
        #[arg(long)]
        path: PathBuf,
        #[arg(long, default_value_t = false)]
        json: bool,
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=2))]
        format_version: Option<u8>,
    },
    /// Print entries, optionally limited to one namespace
    Entries {
        #[arg(long)]
        path: PathBuf,
        /// Namespace name (e.g. "nvs.net80211" or "namespace#3")
        #[arg(long)]
        namespace: Option<String>,
        #[arg(long, default_value_t = false)]
        json: bool,
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=2))]
        format_version: Option<u8>,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}
