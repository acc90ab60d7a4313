use anyhow::Result;
use std::path::PathBuf;

use nvsinspect::NvsEntry;

use super::util::{fmt_opt_bool, load_and_parse, print_json};

pub fn exec(
    path: PathBuf,
    namespace: Option<String>,
    json: bool,
    format_version: Option<u8>,
) -> Result<()> {
    let res = load_and_parse(&path, format_version)?;

    let selected: Vec<&NvsEntry> = match namespace.as_deref() {
        Some(ns) => res.entries_in(ns).collect(),
        None => res.entries.iter().collect(),
    };

    if json {
        return print_json(&selected);
    }

    if selected.is_empty() {
        println!("(no items)");
        return Ok(());
    }
    for e in selected {
        println!(
            "{}/{} [{}] = {}  crc={}",
            e.namespace,
            e.key,
            e.value_type,
            e.value_preview,
            fmt_opt_bool(e.crc_ok)
        );
    }
    Ok(())
}
