//! `spwn-cmpl build` command

use std::io::IsTerminal;

use anyhow::Result;

use crate::cli::BuildArgs;
use crate::commands::{context, display_path};
use spwn_cmpl::builder::PathLookup;
use spwn_cmpl::ops::cmpl_build::{build, BuildOptions};

pub fn execute(args: BuildArgs) -> Result<()> {
    let (cwd, config) = context()?;

    let mut opts = BuildOptions::new(args.entry);
    opts.out_dir = args.out;
    opts.name = args.name;
    opts.includes = args.include;
    opts.pass_through = args.args;
    opts.runtime = args.runtime;
    opts.wrapper = args.wrapper;
    opts.containers_dir = args.containers;
    opts.platform = args.platform;
    opts.progress = std::io::stderr().is_terminal();

    let result = build(&opts, &config, &PathLookup, &cwd)?;
    let report = &result.report;

    eprintln!(
        "    Packaged {} files ({} from the standard library)",
        report.files, report.stdlib_files
    );
    eprintln!(
        "    Finished `{}` -> {} ({} bytes)",
        report.command,
        display_path(&cwd, &report.output),
        report.total_size
    );

    Ok(())
}
