//! Centralized configuration and builder for the NVS parser.
//!
//! Goals:
//! - Single place to collect tunables instead of scattering env lookups.
//! - ParseConfig::default() never reads env, so library output stays deterministic;
//!   ParseConfig::from_env() / ParserBuilder::new() pick up the NVS_* variables.
//!
//! Tunables:
//! - detect_pages (ENV NVS_DETECT_PAGES): non-blank pages sampled by version detection.
//! - parallel_fallback (ENV NVS_PARALLEL_FALLBACK): run the v1/v2 heuristic passes on two threads.
//! - force_version (ENV NVS_FORCE_VERSION = 1|2): skip detection and parse with this version.
//! - preview_bytes (ENV NVS_PREVIEW_BYTES): bytes shown in hex value previews.

use std::fmt;

use crate::detect::NvsVersion;
use crate::page::common::DETECT_MAX_PAGES;

/// Default number of bytes in hex previews.
pub const DEFAULT_PREVIEW_BYTES: usize = 16;

#[inline]
fn env_flag(v: &str) -> bool {
    let s = v.trim().to_ascii_lowercase();
    s == "1" || s == "true" || s == "yes" || s == "on"
}

/// Top-level configuration for a parse run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseConfig {
    /// Max non-blank pages inspected by the version detector.
    /// Env: NVS_DETECT_PAGES (default 16)
    pub detect_pages: usize,

    /// Run the two heuristic fallback passes concurrently.
    /// Env: NVS_PARALLEL_FALLBACK (default true; "0|false|off|no" => false)
    pub parallel_fallback: bool,

    /// Parse with this version regardless of detection.
    /// Env: NVS_FORCE_VERSION = 1|2 (default None)
    pub force_version: Option<NvsVersion>,

    /// Bytes shown in hex value previews.
    /// Env: NVS_PREVIEW_BYTES (default 16)
    pub preview_bytes: usize,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            detect_pages: DETECT_MAX_PAGES,
            parallel_fallback: true,
            force_version: None,
            preview_bytes: DEFAULT_PREVIEW_BYTES,
        }
    }
}

impl ParseConfig {
    /// Load configuration from environment variables on top of defaults.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("NVS_DETECT_PAGES") {
            if let Ok(n) = v.trim().parse::<usize>() {
                cfg.detect_pages = n;
            }
        }

        if let Ok(v) = std::env::var("NVS_PARALLEL_FALLBACK") {
            cfg.parallel_fallback = env_flag(&v);
        }

        if let Ok(v) = std::env::var("NVS_FORCE_VERSION") {
            if let Ok(n) = v.trim().parse::<u8>() {
                cfg.force_version = NvsVersion::from_number(n);
            }
        }

        if let Ok(v) = std::env::var("NVS_PREVIEW_BYTES") {
            if let Ok(n) = v.trim().parse::<usize>() {
                cfg.preview_bytes = n;
            }
        }

        cfg
    }

    /// Fluent setters (builder-style) to override specific fields.

    pub fn with_detect_pages(mut self, pages: usize) -> Self {
        self.detect_pages = pages;
        self
    }

    pub fn with_parallel_fallback(mut self, on: bool) -> Self {
        self.parallel_fallback = on;
        self
    }

    pub fn with_force_version(mut self, version: Option<NvsVersion>) -> Self {
        self.force_version = version;
        self
    }

    pub fn with_preview_bytes(mut self, n: usize) -> Self {
        self.preview_bytes = n;
        self
    }

    /// Finish the builder and obtain the configuration.
    pub fn build(self) -> Self {
        self
    }
}

impl fmt::Display for ParseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ParseConfig {{ \
             detect_pages: {}, \
             parallel_fallback: {}, \
             force_version: {}, \
             preview_bytes: {} \
             }}",
            self.detect_pages,
            self.parallel_fallback,
            self.force_version
                .map(|v| v.to_string())
                .unwrap_or_else(|| "auto".to_string()),
            self.preview_bytes,
        )
    }
}

/// Lightweight builder that produces a ParseConfig.
#[derive(Clone, Debug)]
pub struct ParserBuilder {
    cfg: ParseConfig,
}

impl Default for ParserBuilder {
    fn default() -> Self {
        // Start from env, then allow overrides.
        Self {
            cfg: ParseConfig::from_env(),
        }
    }
}

impl ParserBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a clean default (without reading env).
    pub fn from_default() -> Self {
        Self {
            cfg: ParseConfig::default(),
        }
    }

    pub fn detect_pages(mut self, pages: usize) -> Self {
        self.cfg.detect_pages = pages;
        self
    }

    pub fn parallel_fallback(mut self, on: bool) -> Self {
        self.cfg.parallel_fallback = on;
        self
    }

    pub fn force_version(mut self, version: Option<NvsVersion>) -> Self {
        self.cfg.force_version = version;
        self
    }

    pub fn preview_bytes(mut self, n: usize) -> Self {
        self.cfg.preview_bytes = n;
        self
    }

    /// Finish the builder and obtain the configuration.
    pub fn build(self) -> ParseConfig {
        self.cfg
    }
}
