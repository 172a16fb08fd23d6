use crate::cli::args::{Cli, Commands};
use crate::logging::init_tracing;
use crate::script::loader::JsonFileLoader;
use crate::transpiler::{Defaults, Migrator, Runner};
use anyhow::{Context, Result, anyhow};
use clap::Parser;
use serde_json::{Map, Value};
use std::fs;
use std::io::{self, Read};
use std::path::Path;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    if cli.verbose {
        eprintln!("GDScript generator v{}", env!("CARGO_PKG_VERSION"));
    }

    match cli.command {
        Commands::Generate {
            input,
            config,
            target_version,
            code_version,
            output,
        } => generate_command(
            &input,
            config.as_deref(),
            target_version,
            code_version,
            output.as_deref(),
            cli.verbose,
        ),
        Commands::Migrate {
            input,
            from,
            to,
            output,
        } => migrate_command(&input, from, to, output.as_deref(), cli.verbose),
        Commands::Init { output, force } => init_command(&output, force, cli.verbose),
    }
}

fn generate_command(
    input: &Path,
    config: Option<&Path>,
    target_version: Option<u32>,
    code_version: Option<u32>,
    output: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    if verbose {
        eprintln!("🔧 Generating GDScript from: {}", input.display());
    }

    let mut defaults = Defaults::builtin();
    if let Some(config_path) = config {
        let source = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
        let settings: Value = serde_json::from_str(&source)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;
        defaults.merge(&settings)?;
        if verbose {
            eprintln!("⚙️  Loaded options from: {}", config_path.display());
        }
    }

    let mut overrides = Map::new();
    if let Some(version) = target_version {
        overrides.insert("target_version".to_string(), Value::from(version));
    }
    if let Some(version) = code_version {
        overrides.insert("code_version".to_string(), Value::from(version));
    }

    let runner = Runner::new(JsonFileLoader::new(input))
        .with_defaults(defaults)
        .with_overrides(Value::Object(overrides));

    let report = match output {
        Some(output_path) => {
            // Render fully before touching the output file.
            let report = runner.generate()?;
            fs::write(output_path, &report.script)
                .with_context(|| format!("Failed to write {}", output_path.display()))?;
            println!("✅ Generated GDScript: {}", output_path.display());
            report
        }
        None => runner.run(&mut io::stdout().lock())?,
    };

    if verbose {
        if report.diagnostics.is_empty() {
            eprintln!("✅ No warnings");
        } else {
            eprintln!("⚠️  {} warning(s):", report.diagnostics.len());
            for diagnostic in report.diagnostics.iter() {
                eprintln!("   - {}", diagnostic);
            }
        }
    }

    Ok(())
}

fn migrate_command(
    input: &Path,
    from: u32,
    to: u32,
    output: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    if verbose {
        eprintln!("🔄 Migrating {} from Godot {} to Godot {}", input.display(), from, to);
    }

    let source = if input == Path::new("-") {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read code from stdin")?;
        buffer
    } else {
        fs::read_to_string(input)
            .map_err(|e| anyhow!("Failed to read input file: {}", e))?
    };

    let migrated = Migrator::godot().migrate_text(&source, from, to)?;

    if let Some(output_path) = output {
        fs::write(output_path, &migrated)?;
        println!("✅ Migrated code written to: {}", output_path.display());
    } else {
        print!("{}", migrated);
    }

    Ok(())
}

fn init_command(output: &Path, force: bool, verbose: bool) -> Result<()> {
    if verbose {
        eprintln!("🏗️ Writing example script description");
    }

    if output.exists() && !force {
        return Err(anyhow!(
            "{} already exists, use --force to overwrite",
            output.display()
        ));
    }

    fs::write(output, example_template())?;

    println!("✅ Created script description: {}", output.display());
    println!("📝 Run `gdgen generate {}` to render it", output.display());

    Ok(())
}

fn example_template() -> &'static str {
    r#"{
    "settings": {
        "target_version": 4
    },
    "header_comments": [
        "Player controller.",
        "Generated by gdgen, edit script.json instead."
    ],
    "constants": [
        {"name": "gravity", "type": "float", "value": 980.0, "tooltip": ["Pixels per second squared."]}
    ],
    "variables": [
        {
            "name": "speed",
            "type": "float",
            "value": 200.0,
            "export": true,
            "generate_default": true,
            "tooltip": ["Horizontal speed.", ["Pixels per second."]]
        },
        {"name": "jumping", "type": "bool", "value": false}
    ],
    "functions": [
        {
            "name": "_physics_process",
            "parameters": ["delta: float"],
            "code": [
                "velocity.y += GRAVITY * delta",
                "velocity.x = Input.get_axis(\"ui_left\", \"ui_right\") * speed",
                "move_and_slide()"
            ]
        },
        {
            "name": "is_falling",
            "code": ["var falling := velocity.y > 0.0", "return falling"]
        },
        {"name": "_ready"}
    ]
}
"#
}
