use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "gdgen",
    about = "GDScript generator and Godot version migration toolkit",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print pipeline diagnostics to stderr
    #[arg(long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a GDScript file from a JSON script description
    Generate {
        /// Input JSON script description
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// JSON file with option overrides
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Godot major version to generate for
        #[arg(short, long)]
        target_version: Option<u32>,

        /// Godot major version the callable code is written for
        #[arg(long)]
        code_version: Option<u32>,

        /// Write the script here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Rewrite GDScript code from one Godot version to another
    Migrate {
        /// Input code file, or '-' for stdin
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Godot major version the code is written for
        #[arg(long)]
        from: u32,

        /// Godot major version to migrate to
        #[arg(long)]
        to: u32,

        /// Write the result here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write an example JSON script description
    Init {
        /// Output file for the template
        #[arg(short, long, default_value = "script.json")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
