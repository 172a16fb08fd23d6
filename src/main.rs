use anyhow::Result;
use gdscript_gen::cli;

fn main() -> Result<()> {
    cli::run()
}
