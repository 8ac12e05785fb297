use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use anyhow::Result;

/// Structure pour gérer l'historique des commandes
pub struct History {
    /// Chemin du fichier d'historique
    file_path: PathBuf,

    /// Commandes en mémoire
    commands: Vec<String>,

    /// Taille maximale de l'historique
    max_size: usize,
}

impl History {
    /// Crée un nouvel historique
    pub fn new(file_path: impl Into<PathBuf>, max_size: usize) -> Self {
        History {
            file_path: file_path.into(),
            commands: Vec::new(),
            max_size,
        }
    }

    /// Charge l'historique depuis un fichier; un fichier absent donne un historique vide
    pub fn load(&mut self) -> Result<()> {
        let text = match fs::read_to_string(&self.file_path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        self.commands = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect();
        self.truncate();

        Ok(())
    }

    /// Sauvegarde l'historique dans un fichier
    pub fn save(&self) -> Result<()> {
        let mut file = fs::File::create(&self.file_path)?;
        for cmd in &self.commands {
            writeln!(file, "{}", cmd)?;
        }
        Ok(())
    }

    /// Ajoute une commande à l'historique
    pub fn add(&mut self, command: &str) {
        let command = command.trim();
        if command.is_empty() {
            return;
        }

        // Éviter les doublons consécutifs
        if self.commands.last().map(String::as_str) == Some(command) {
            return;
        }

        self.commands.push(command.to_string());
        self.truncate();
    }

    /// Récupère toutes les commandes
    pub fn get_all(&self) -> &[String] {
        &self.commands
    }

    /// Garde les `max_size` commandes les plus récentes
    fn truncate(&mut self) {
        if self.commands.len() > self.max_size {
            let excess = self.commands.len() - self.max_size;
            self.commands.drain(..excess);
        }
    }
}
