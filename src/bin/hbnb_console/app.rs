use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Parser;
use log::info;

use hbnb::{Console, Outcome};

use crate::context::Context;
use crate::formatter::TextFormatter;
use crate::repl::Repl;

#[derive(Parser)]
#[command(name = "hbnb-console")]
#[command(about = "Interactive console for HBnB objects", long_about = None)]
pub struct Cli {
    /// Niveau de verbosité (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Snapshot file holding every object
    #[arg(short, long, default_value = "file.json")]
    file: PathBuf,

    /// Keep objects in memory only; nothing is read or written
    #[arg(long)]
    in_memory: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Command history file
    #[arg(long, default_value = ".hbnb_history")]
    history: PathBuf,

    /// Run these command lines, then exit
    #[arg(short = 'c', long = "command", value_name = "LINE")]
    commands: Vec<String>,
}

impl Cli {
    /// Niveau de log par défaut selon -v
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// Exécute l'application CLI
pub fn run(cli: Cli) -> Result<()> {
    // Charger le snapshot; un fichier illisible empêche le démarrage
    let console = if cli.in_memory {
        Console::in_memory()
    } else {
        Console::open(&cli.file)
            .with_context(|| format!("cannot load snapshot {}", cli.file.display()))?
    };
    info!("{} objects loaded", console.store().count());

    let mut context = Context::new(console, TextFormatter::new(!cli.no_color));

    // Commandes passées en arguments
    if !cli.commands.is_empty() {
        for line in &cli.commands {
            if context.execute(line)? == Outcome::Quit {
                break;
            }
        }
        return Ok(());
    }

    // Mode interactif
    let mut repl = Repl::new(context, cli.history)?;
    repl.run(std::io::stdin().is_terminal())
}
