use anyhow::Result;
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};
use std::env;
use std::path::PathBuf;
use timegrid::config::Config;
use timegrid::paths::AppPaths;
use timegrid::{cli, controller};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let binary_name = args
        .first()
        .and_then(|a| std::path::Path::new(a).file_name())
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "timegrid".to_string());

    let mut config_path: Option<PathBuf> = None;
    let mut level = LevelFilter::Info;
    let mut init = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" | "help" => {
                cli::print_help(&binary_name);
                return Ok(());
            }
            "--config" | "-c" => {
                let Some(path) = args.get(i + 1) else {
                    anyhow::bail!("--config needs a path");
                };
                config_path = Some(PathBuf::from(path));
                i += 1;
            }
            "--verbose" | "-v" => level = LevelFilter::Debug,
            "--quiet" | "-q" => level = LevelFilter::Warn,
            "init" => init = true,
            other => {
                eprintln!("Unknown argument: {}", other);
                cli::print_help(&binary_name);
                std::process::exit(2);
            }
        }
        i += 1;
    }

    // Falls back to no logging if the terminal cannot be used
    let _ = TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    );

    let config_path = match config_path {
        Some(p) => p,
        None => AppPaths::get_config_file_path()?,
    };

    if init {
        if config_path.exists() {
            anyhow::bail!("Config already exists at {}", config_path.display());
        }
        Config::default().save(&config_path)?;
        println!("Wrote default config to {}", config_path.display());
        return Ok(());
    }

    let config = match Config::load(&config_path) {
        Ok(c) => c,
        Err(e) if Config::is_missing_config_error(&e) => {
            eprintln!("No config found at {}", config_path.display());
            eprintln!("Run '{} init' to create one.", binary_name);
            std::process::exit(1);
        }
        Err(e) => return Err(e),
    };

    let (reports, manifest) = controller::generate(&config)?;
    for report in &reports {
        println!(
            "{}: {} events, {} subjects",
            report.name, report.events, report.subjects
        );
    }
    println!(
        "Wrote {} calendars to {}",
        manifest.calendars.len(),
        config.resolve(&config.output_dir).display()
    );
    Ok(())
}
