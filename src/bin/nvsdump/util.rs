use anyhow::{anyhow, Context, Result};
use std::fs::OpenOptions;
use std::io::Read;
use std::path::PathBuf;

use nvsinspect::{parse_nvs_partition_with, NvsVersion, ParseConfig, ParseResult};

pub fn read_all(p: &PathBuf) -> Result<Vec<u8>> {
    let mut f = OpenOptions::new()
        .read(true)
        .open(p)
        .with_context(|| format!("open {}", p.display()))?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)
        .with_context(|| format!("read {}", p.display()))?;
    Ok(buf)
}

/// Конфиг из ENV + явная версия из CLI (если задана).
pub fn config_for(format_version: Option<u8>) -> Result<ParseConfig> {
    let cfg = ParseConfig::from_env();
    match format_version {
        None => Ok(cfg),
        Some(n) => {
            let v = NvsVersion::from_number(n)
                .ok_or_else(|| anyhow!("unsupported format version {}", n))?;
            Ok(cfg.with_force_version(Some(v)))
        }
    }
}

/// Прочитать дамп и разобрать его.
pub fn load_and_parse(path: &PathBuf, format_version: Option<u8>) -> Result<ParseResult> {
    let cfg = config_for(format_version)?;
    let data = read_all(path)?;
    log::debug!("loaded {} ({} bytes), {}", path.display(), data.len(), cfg);
    Ok(parse_nvs_partition_with(&data, &cfg))
}

pub fn print_json<T: serde::Serialize>(v: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(v).context("serialize JSON output")?;
    println!("{}", s);
    Ok(())
}

pub fn fmt_opt_bool(v: Option<bool>) -> &'static str {
    match v {
        Some(true) => "ok",
        Some(false) => "BAD",
        None => "?",
    }
}

pub fn print_diagnostics(res: &ParseResult) {
    for w in &res.warnings {
        println!("warning: {}", w);
    }
    for e in &res.errors {
        println!("error:   {}", e);
    }
}
