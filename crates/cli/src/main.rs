//! 18export - compiles 18xx game definitions into renderer models.

#![allow(clippy::print_stdout)]

use std::{fs::OpenOptions, path::PathBuf, sync::Mutex};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{prelude::*, EnvFilter};

use export18_core::{
    config::{self, AppConfig},
    DefinitionSource, FsDefinitionSource, GameCompiler, JsonRenderer, Renderer, Tables,
    TileCatalogCompiler,
};

/// Compile 18xx game and tile definitions
#[derive(Parser, Debug)]
#[command(name = "18export")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Content database root (overrides the configured data_root)
    #[arg(long, global = true)]
    data_root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile the full tile catalog
    Tiles,

    /// Compile one game
    Game {
        /// Game id or title
        name: String,

        /// Map variation index
        #[arg(short, long, default_value = "0")]
        variation: usize,
    },

    /// List known games
    List {
        /// Only show games whose id or title contains this text
        query: Option<String>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    config::ensure_default_config()?;
    let mut config = AppConfig::load()?;
    if let Some(root) = args.data_root {
        config.data_root = root;
    }
    init_logging(&config)?;

    let source = FsDefinitionSource::from_config(&config);
    let tables = Tables::default();

    match args.command {
        Commands::Tiles => {
            let catalog = source.tiles()?;
            let compiled = TileCatalogCompiler::new(&tables).compile(&catalog);
            info!(colors = compiled.colors.len(), "compiled tile catalog");
            println!("{}", JsonRenderer.render_catalog(&compiled)?);
        }
        Commands::Game { name, variation } => {
            let definition = source.game(&name)?;
            let catalog = if config.tiles_path().exists() {
                Some(source.tiles()?)
            } else {
                warn!(
                    "tile catalog {} not found; broken tiles are kept",
                    config.tiles_path().display()
                );
                None
            };

            let mut compiler = GameCompiler::new(&tables);
            if let Some(catalog) = catalog.as_ref() {
                compiler = compiler.with_catalog(catalog);
            }
            let compiled = compiler
                .compile(&definition, variation)
                .with_context(|| format!("failed to compile game '{name}'"))?;
            println!("{}", JsonRenderer.render_game(&compiled)?);
        }
        Commands::List { query } => {
            let games = source.games_matching(query.as_deref().unwrap_or_default())?;
            for game in games {
                println!("{}", game.display_name());
            }
        }
    }

    Ok(())
}

fn init_logging(config: &AppConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .context("invalid log filter")?;

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr);

    let file_layer = match config.log_file.as_ref() {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_ansi(false)
                    .compact()
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(())
}
