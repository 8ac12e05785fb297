mod history;

use std::path::PathBuf;

use anyhow::Result;
use hbnb::Outcome;
use log::warn;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::context::Context;
use self::history::History;

const PROMPT: &str = "(hbnb) ";

/// Mode interactif (REPL)
pub struct Repl {
    /// Contexte d'exécution
    context: Context,

    /// Éditeur de ligne
    editor: DefaultEditor,

    /// Historique persistant
    history: History,
}

impl Repl {
    /// Crée un nouveau REPL
    pub fn new(context: Context, history_path: PathBuf) -> Result<Self> {
        let mut editor = DefaultEditor::new()?;

        // Charger l'historique s'il existe
        let mut history = History::new(history_path, 1000);
        if let Err(e) = history.load() {
            warn!("Could not load command history: {}", e);
        }

        // Charger l'historique dans l'éditeur
        for cmd in history.get_all() {
            let _ = editor.add_history_entry(cmd.as_str());
        }

        Ok(Repl {
            context,
            editor,
            history,
        })
    }

    /// Exécute le REPL jusqu'à `quit` ou la fin de l'entrée
    pub fn run(&mut self, banner: bool) -> Result<()> {
        if banner {
            println!("{}", self.context.formatter().format_info("HBnB console. Type help to list commands, quit to leave."));
        }

        loop {
            match self.editor.readline(PROMPT) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        let _ = self.editor.add_history_entry(line.as_str());
                        self.history.add(&line);
                    }

                    if self.context.execute(&line)? == Outcome::Quit {
                        break;
                    }
                },
                Err(ReadlineError::Interrupted) => {
                    // Ctrl-C: abandonner la ligne courante
                    continue;
                },
                Err(ReadlineError::Eof) => {
                    // Ctrl-D: même effet que la commande EOF
                    self.context.execute("EOF")?;
                    break;
                },
                Err(err) => {
                    println!("{}", self.context.formatter().format_error(&format!("Error: {}", err)));
                    break;
                },
            }
        }

        // Sauvegarder l'historique
        if let Err(e) = self.history.save() {
            warn!("Could not save command history: {}", e);
        }

        Ok(())
    }
}
