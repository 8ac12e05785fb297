use colored::*;

/// Formateur au format texte
pub struct TextFormatter {
    /// Indique si les couleurs sont activées
    colored: bool,
}

impl TextFormatter {
    /// Crée un nouveau formateur texte
    pub fn new(colored: bool) -> Self {
        TextFormatter { colored }
    }

    /// Formate un message d'erreur
    pub fn format_error(&self, error: &str) -> String {
        if self.colored {
            format!("{}", error.red().bold())
        } else {
            error.to_string()
        }
    }

    /// Formate un message d'information
    pub fn format_info(&self, info: &str) -> String {
        if self.colored {
            format!("{}", info.blue())
        } else {
            info.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_messages_are_untouched() {
        let formatter = TextFormatter::new(false);

        assert_eq!(formatter.format_error("** no instance found **"), "** no instance found **");
        assert_eq!(formatter.format_info("ready"), "ready");
    }

    #[test]
    fn test_colored_messages_keep_text() {
        let formatter = TextFormatter::new(true);

        assert!(formatter.format_error("boom").contains("boom"));
        assert!(formatter.format_info("ready").contains("ready"));
    }
}
