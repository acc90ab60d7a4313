use anyhow::Result;
use std::path::PathBuf;

use super::util::{load_and_parse, print_json};

pub fn exec(path: PathBuf, json: bool, format_version: Option<u8>) -> Result<()> {
    let res = load_and_parse(&path, format_version)?;

    if json {
        return print_json(&res.pages);
    }

    for p in &res.pages {
        let state = p
            .state
            .map(|s| s.to_string())
            .unwrap_or_else(|| "TRUNCATED".to_string());
        let seq = p
            .seq
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "page {:>4} @0x{:06x} state={:<13} seq={:<10} valid={}",
            p.index, p.offset, state, seq, p.valid
        );
        for e in &p.errors {
            println!("      error: {}", e);
        }
        for w in &p.warnings {
            println!("      warning: {}", w);
        }
    }
    Ok(())
}
