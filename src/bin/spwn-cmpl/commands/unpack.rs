//! `spwn-cmpl unpack` command

use anyhow::Result;

use crate::cli::UnpackArgs;
use crate::commands::{context, display_path};
use spwn_cmpl::core::Platform;
use spwn_cmpl::ops::unpack::unpack;

pub fn execute(args: UnpackArgs) -> Result<()> {
    let (cwd, _) = context()?;
    let dest = cwd.join(&args.dest);

    let result = unpack(&args.artifact, &dest, Platform::host())?;

    eprintln!(
        "    Unpacked {} files -> {}",
        result.files.len(),
        display_path(&cwd, &dest)
    );
    println!("{}", result.launch_line());

    Ok(())
}
