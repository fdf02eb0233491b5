mod commands;
mod settings;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use sl2_core::GameVariant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sl2edit")]
#[command(version, about = "Souls/runes editor for BND4 save files (.sl2)")]
struct Cli {
    /// Config file (default: <config dir>/sl2edit/config.toml)
    #[arg(long, global = true, env = "SL2EDIT_CONFIG")]
    config: Option<PathBuf>,

    /// Game: dsr, ds2, ds3 or er (default: `game` from the config file)
    #[arg(short, long, global = true, value_parser = parse_game)]
    game: Option<GameVariant>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List occupied slots and their character names
    List {
        /// Input .sl2 file
        input: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Raise the souls/runes value of one or all slots
    Patch {
        /// Input .sl2 file (never modified)
        input: PathBuf,

        /// Output .sl2 file
        #[arg(short, long)]
        output: PathBuf,

        /// New value, 1..=999999999 (default: `value` from the config file)
        #[arg(short = 'n', long)]
        value: Option<u32>,

        /// Slot to patch (default: every occupied slot)
        #[arg(short, long)]
        slot: Option<usize>,
    },
    /// Write every decrypted entry to a directory
    Dump {
        /// Input .sl2 file
        input: PathBuf,

        /// Output directory (default: `dump_dir` from the config file)
        dir: Option<PathBuf>,
    },
    /// Show decrypted entry bytes in hexdump format
    Hexdump {
        /// Input .sl2 file
        input: PathBuf,

        /// Entry index
        entry: usize,

        /// Start offset inside the entry (hex, with or without 0x)
        #[arg(long, default_value = "0")]
        offset: String,

        /// Number of bytes to show
        #[arg(long, default_value = "256")]
        size: usize,

        /// Show ASCII column
        #[arg(long)]
        ascii: bool,
    },
}

fn parse_game(s: &str) -> Result<GameVariant, String> {
    GameVariant::from_token(s).map_err(|e| e.to_string())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let directive = if cli.verbose {
        "sl2_core=debug"
    } else {
        "sl2_core=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .with_writer(std::io::stderr)
        .init();

    let config = settings::load(cli.config.as_deref());
    let game = settings::resolve_game(cli.game, &config)?;

    match cli.command {
        Command::List { input, json } => commands::list::run(game, &input, json),
        Command::Patch {
            input,
            output,
            value,
            slot,
        } => commands::patch::run(
            game,
            &input,
            &output,
            value.unwrap_or(config.value),
            slot.into(),
        ),
        Command::Dump { input, dir } => {
            let dir = settings::resolve_dump_dir(dir, &config)?;
            commands::dump::run(game, &input, &dir)
        }
        Command::Hexdump {
            input,
            entry,
            offset,
            size,
            ascii,
        } => {
            let offset = commands::hex_utils::parse_hex_offset(&offset)?;
            commands::hexdump::run(game, &input, entry, offset, size, ascii)
        }
    }
}
