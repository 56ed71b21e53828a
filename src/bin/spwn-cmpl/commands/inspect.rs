//! `spwn-cmpl inspect` command

use anyhow::{Context, Result};

use crate::cli::InspectArgs;
use spwn_cmpl::ops::inspect::inspect;

pub fn execute(args: InspectArgs) -> Result<()> {
    let info = inspect(&args.artifact)?;

    if args.json {
        let out = serde_json::to_string_pretty(&info).context("failed to serialize report")?;
        println!("{}", out);
        return Ok(());
    }

    println!("artifact: {}", info.path.display());
    println!("command:  {}", info.command);
    println!();
    println!("{:<8} {:>12} {:>12}", "segment", "offset", "size");

    let mut offset = 0;
    for (name, size) in [
        ("wrapper", info.wrapper_size),
        ("runtime", info.runtime_size),
        ("payload", info.payload_size),
        ("footer", info.footer_size),
    ] {
        println!("{:<8} {:>12} {:>12}", name, offset, size);
        offset += size;
    }
    println!("{:<8} {:>12} {:>12}", "total", "", info.total_size);

    println!();
    println!("runtime sha256: {}", info.runtime_sha256);
    println!("payload sha256: {}", info.payload_sha256);
    println!();
    println!("payload files ({}):", info.files.len());
    for file in &info.files {
        println!("  {}", file);
    }

    Ok(())
}
