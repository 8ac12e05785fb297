use std::io::{self, Write};

use anyhow::Result;
use hbnb::{CommandError, Console, Outcome};

use crate::formatter::TextFormatter;

/// Contexte d'exécution de la console
pub struct Context {
    /// Interpréteur et son store
    console: Console,

    /// Formateur des messages
    formatter: TextFormatter,
}

impl Context {
    /// Crée un nouveau contexte
    pub fn new(console: Console, formatter: TextFormatter) -> Self {
        Context { console, formatter }
    }

    /// Obtient le formateur
    pub fn formatter(&self) -> &TextFormatter {
        &self.formatter
    }

    /// Exécute une ligne et affiche son résultat ou son erreur
    pub fn execute(&mut self, line: &str) -> Result<Outcome> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        let outcome = run_line(&mut self.console, &self.formatter, line, &mut out)?;
        out.flush()?;
        Ok(outcome)
    }
}

/// Les erreurs de commande sont affichées; seule une sortie cassée est fatale
fn run_line<W: Write>(
    console: &mut Console,
    formatter: &TextFormatter,
    line: &str,
    out: &mut W,
) -> Result<Outcome> {
    match console.execute(line, out) {
        Ok(outcome) => Ok(outcome),
        Err(CommandError::Io(e)) => Err(e.into()),
        Err(e) => {
            writeln!(out, "{}", formatter.format_error(&e.to_string()))?;
            Ok(Outcome::Continue)
        },
    }
}
