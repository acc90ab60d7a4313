use anyhow::Result;
use std::path::PathBuf;

use nvsinspect::{detect_version_with, ParseConfig};

use super::util::{print_json, read_all};

pub fn exec(path: PathBuf, json: bool) -> Result<()> {
    let cfg = ParseConfig::from_env();
    let data = read_all(&path)?;
    let det = detect_version_with(&data, cfg.detect_pages);

    if json {
        return print_json(&det);
    }
    match det.version {
        0 => println!("version: unknown"),
        v => println!("version: v{}", v),
    }
    println!("reason:  {}", det.reason);
    Ok(())
}
