use anyhow::Result;
use log::info;
use std::path::PathBuf;

use super::util::{fmt_opt_bool, load_and_parse, print_diagnostics, print_json};

pub fn exec(path: PathBuf, json: bool, format_version: Option<u8>) -> Result<()> {
    let res = load_and_parse(&path, format_version)?;

    if json {
        return print_json(&res);
    }

    println!("NVS {}: {} page(s)", res.version, res.pages.len());
    println!("namespaces:");
    if res.namespaces.is_empty() {
        println!("  (none)");
    }
    for ns in &res.namespaces {
        println!("  {:>3}  {}", ns.id, ns.name);
    }

    println!("entries:");
    if res.entries.is_empty() {
        println!("  (no items)");
    }
    for e in &res.entries {
        println!(
            "  {}/{} [{}] = {}  crc={}  @page {} entry {}",
            e.namespace,
            e.key,
            e.value_type,
            e.value_preview,
            fmt_opt_bool(e.crc_ok),
            e.location.page_index,
            e.location.entry_index
        );
        for w in &e.warnings {
            println!("      ! {}", w);
        }
    }

    print_diagnostics(&res);
    info!(
        "parsed {}: {} entries, {} warning(s), {} error(s)",
        path.display(),
        res.entries.len(),
        res.warnings.len(),
        res.errors.len()
    );
    Ok(())
}
