//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use spwn_cmpl::core::Platform;

/// spwn-cmpl - Package SPWN programs into standalone executables
#[derive(Parser)]
#[command(name = "spwn-cmpl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a standalone executable from an entry file
    Build(BuildArgs),

    /// Print the files an entry file pulls in, without building
    Resolve(ResolveArgs),

    /// Show the layout and contents of a built executable
    Inspect(InspectArgs),

    /// Extract the runtime and program files from a built executable
    Unpack(UnpackArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct BuildArgs {
    /// Entry source file
    #[arg(short, long)]
    pub entry: PathBuf,

    /// Output directory [default: bin]
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Output file name [default: <platform><ext>]
    #[arg(short, long)]
    pub name: Option<String>,

    /// Extra files, directories or glob patterns to package (not scanned for imports)
    #[arg(short = 'I', long = "include", num_args = 1..)]
    pub include: Vec<PathBuf>,

    /// Arguments passed to the runtime when the executable starts
    #[arg(short = 'A', long, allow_hyphen_values = true)]
    pub args: Option<String>,

    /// Runtime executable to embed (default: looked up on PATH)
    #[arg(long)]
    pub runtime: Option<PathBuf>,

    /// Wrapper stub to use instead of the platform default
    #[arg(long)]
    pub wrapper: Option<PathBuf>,

    /// Directory holding the platform wrapper stubs
    #[arg(long, env = "SPWN_CMPL_CONTAINERS")]
    pub containers: Option<PathBuf>,

    /// Platform to build for: windows, darwin or linux [default: host]
    #[arg(long)]
    pub platform: Option<Platform>,
}

#[derive(Args)]
pub struct ResolveArgs {
    /// Entry source file
    #[arg(short, long)]
    pub entry: PathBuf,

    /// Extra files, directories or glob patterns to list
    #[arg(short = 'I', long = "include", num_args = 1..)]
    pub include: Vec<PathBuf>,

    /// Print JSON instead of a plain list
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct InspectArgs {
    /// Built executable
    pub artifact: PathBuf,

    /// Print JSON instead of a summary
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct UnpackArgs {
    /// Built executable
    pub artifact: PathBuf,

    /// Destination directory
    #[arg(short, long, default_value = "unpacked")]
    pub dest: PathBuf,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
