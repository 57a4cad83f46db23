use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::Parser;
use comrak::Arena;
use supermd::Config;

mod cli;

use cli::{Cli, Commands};

/// Read the document and the configuration that applies to it.
///
/// Config discovery starts next to the input file, or in the working
/// directory when reading from stdin.
fn read_input(config: Option<&Path>, file: &Option<PathBuf>) -> io::Result<(String, Config)> {
    let (input, config_root) = match file.as_deref() {
        Some(path) => {
            let root = path
                .parent()
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
            (fs::read_to_string(path)?, root)
        }
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            (buf, std::env::current_dir()?)
        }
    };

    let (cfg, cfg_path) = supermd::config::load(config, &config_root)?;
    match &cfg_path {
        Some(path) => log::debug!("Using config from: {}", path.display()),
        None => log::debug!("Using default config"),
    }

    Ok((input, cfg))
}

fn display_name(path: &Option<PathBuf>) -> String {
    match path {
        Some(p) => p.display().to_string(),
        None => "<stdin>".to_string(),
    }
}

fn main() -> io::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check { file } => {
            let (input, cfg) = read_input(cli.config.as_deref(), &file)?;
            let diagnostics = supermd::check(&input, &cfg);

            if diagnostics.is_empty() {
                println!("No directive errors found");
                return Ok(());
            }

            let name = display_name(&file);
            for diagnostic in &diagnostics {
                eprintln!("{name}:{diagnostic}");
            }
            std::process::exit(1);
        }
        Commands::Parse { file } => {
            let (input, cfg) = read_input(cli.config.as_deref(), &file)?;
            let arena = Arena::new();
            let compiled = supermd::compile(&arena, &input, &cfg);

            print!("{}", compiled.dump());

            let name = display_name(&file);
            for diagnostic in &compiled.diagnostics {
                eprintln!("{name}:{diagnostic}");
            }
            Ok(())
        }
    }
}
