//! Command console
//!
//! This module interprets command lines against an object store. Two
//! surface syntaxes are accepted and lead to the same handlers:
//!
//! ```text
//! update User 1234 name "Bob"
//! User.update("1234", "name", "Bob")
//! User.update("1234", {"name": "Bob"})
//! ```

pub mod args;
pub mod error;
pub mod literal;

use std::io::Write;
use std::path::PathBuf;

use log::debug;

use crate::core::class::{Class, RESERVED_ATTRIBUTES};
use crate::core::entity::Entity;
use crate::core::store::Store;
use crate::core::value::{quote, Value};
use crate::storage::{MemoryStore, PersistentStore};
use self::literal::{Literal, LiteralError};

pub use error::CommandError;

/// Result type for console commands
pub type Result<T> = std::result::Result<T, CommandError>;

/// What the session should do after a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verb {
    Eof,
    All,
    Count,
    Create,
    Destroy,
    Help,
    Quit,
    Show,
    Update,
}

impl Verb {
    /// Listing order of `help`
    const ALL: [Verb; 9] = [
        Verb::Eof,
        Verb::All,
        Verb::Count,
        Verb::Create,
        Verb::Destroy,
        Verb::Help,
        Verb::Quit,
        Verb::Show,
        Verb::Update,
    ];

    fn name(&self) -> &'static str {
        match self {
            Verb::Eof => "EOF",
            Verb::All => "all",
            Verb::Count => "count",
            Verb::Create => "create",
            Verb::Destroy => "destroy",
            Verb::Help => "help",
            Verb::Quit => "quit",
            Verb::Show => "show",
            Verb::Update => "update",
        }
    }

    fn from_name(name: &str) -> Option<Verb> {
        Verb::ALL.iter().copied().find(|v| v.name() == name)
    }

    /// Verbs reachable through `<Class>.<verb>(...)`
    fn is_dotted(&self) -> bool {
        matches!(
            self,
            Verb::All | Verb::Count | Verb::Create | Verb::Destroy | Verb::Show | Verb::Update
        )
    }

    fn usage(&self) -> &'static str {
        match self {
            Verb::Eof => "End of input. Leaves the console.",
            Verb::All => "Usage: all or all <class> or <class>.all()\n\
                Print the string representations of all instances, or of one class.",
            Verb::Count => "Usage: count <class> or <class>.count()\n\
                Print the number of instances of a class.",
            Verb::Create => "Usage: create <class> or <class>.create()\n\
                Create a new instance, save it and print its id.",
            Verb::Destroy => "Usage: destroy <class> <id> or <class>.destroy(<id>)\n\
                Delete an instance and save the change.",
            Verb::Help => "Usage: help [command]\n\
                List commands, or describe one.",
            Verb::Quit => "Quit command to exit the program.",
            Verb::Show => "Usage: show <class> <id> or <class>.show(<id>)\n\
                Print the string representation of an instance.",
            Verb::Update => "Usage: update <class> <id> <attribute_name> <attribute_value> or\n\
                <class>.update(<id>, <attribute_name>, <attribute_value>) or\n\
                <class>.update(<id>, <dictionary>)\n\
                Set attributes of an instance and save the change.",
        }
    }
}

/// Command interpreter owning an object store
pub struct Console {
    store: Box<dyn Store>,
}

impl Console {
    /// Create a console over the given store
    pub fn new(store: Box<dyn Store>) -> Self {
        Console { store }
    }

    /// Create a console whose objects are never written anywhere
    pub fn in_memory() -> Self {
        Console::new(Box::new(MemoryStore::new()))
    }

    /// Create a console backed by the snapshot at the given path
    pub fn open<P: Into<PathBuf>>(path: P) -> crate::core::Result<Self> {
        let store = PersistentStore::open(path)?;
        Ok(Console::new(Box::new(store)))
    }

    /// The underlying store
    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    /// Execute one command line, writing its output to `out`
    pub fn execute<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Outcome> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Outcome::Continue);
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim_start()),
            None => (line, ""),
        };

        match Verb::from_name(word) {
            Some(verb) => self.run(verb, rest, line, out),
            None => self.run_dotted(line, out),
        }
    }

    /// Rewrite `<Class>.<verb>(<args>)` as `<verb> <Class> <args>`
    fn run_dotted<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Outcome> {
        let unknown = || CommandError::UnrecognizedSyntax(line.to_string());

        let (class, call) = line.split_once('.').ok_or_else(unknown)?;
        let class = class.trim();
        if class.is_empty() || class.contains(char::is_whitespace) {
            return Err(unknown());
        }

        let open = call.find('(').ok_or_else(unknown)?;
        let close = call.rfind(')').ok_or_else(unknown)?;
        if close < open || !call[close + 1..].trim().is_empty() {
            return Err(unknown());
        }

        let verb = Verb::from_name(call[..open].trim())
            .filter(Verb::is_dotted)
            .ok_or_else(unknown)?;

        let rest = format!("{} {}", class, &call[open + 1..close]);
        debug!("Rewrote {:?} as {} {}", line, verb.name(), rest);

        self.run(verb, &rest, line, out)
    }

    fn run<W: Write>(&mut self, verb: Verb, rest: &str, line: &str, out: &mut W) -> Result<Outcome> {
        match verb {
            Verb::Quit => return Ok(Outcome::Quit),
            Verb::Eof => {
                writeln!(out)?;
                return Ok(Outcome::Quit);
            },
            Verb::Help => self.help(rest, out)?,
            Verb::Create => self.create(&tokenize(rest, line)?, out)?,
            Verb::Show => self.show(&tokenize(rest, line)?, out)?,
            Verb::Destroy => self.destroy(&tokenize(rest, line)?)?,
            Verb::All => self.all(&tokenize(rest, line)?, out)?,
            Verb::Count => self.count(&tokenize(rest, line)?, out)?,
            Verb::Update => self.update(&tokenize(rest, line)?)?,
        }

        Ok(Outcome::Continue)
    }

    /// Resolve class and id to the key of an existing entity
    fn locate(&self, tokens: &[String]) -> Result<String> {
        let class = class_of(tokens)?;
        let id = tokens.get(1).ok_or(CommandError::IdentifierMissing)?;

        let key = class.key(id);
        if !self.store.contains(&key) {
            return Err(CommandError::InstanceNotFound);
        }

        Ok(key)
    }

    fn create<W: Write>(&mut self, tokens: &[String], out: &mut W) -> Result<()> {
        let class = class_of(tokens)?;

        let entity = Entity::new(class);
        let id = entity.id().to_string();
        debug!("Creating {}", entity.key());

        self.store.register(entity);
        self.store.save()?;

        writeln!(out, "{}", id)?;
        Ok(())
    }

    fn show<W: Write>(&self, tokens: &[String], out: &mut W) -> Result<()> {
        let key = self.locate(tokens)?;
        let entity = self.store.get(&key).ok_or(CommandError::InstanceNotFound)?;

        writeln!(out, "{}", entity)?;
        Ok(())
    }

    fn destroy(&mut self, tokens: &[String]) -> Result<()> {
        let key = self.locate(tokens)?;

        self.store.remove(&key);
        self.store.save()?;

        debug!("Destroyed {}", key);
        Ok(())
    }

    fn all<W: Write>(&self, tokens: &[String], out: &mut W) -> Result<()> {
        let filter = match tokens.first() {
            Some(_) => Some(class_of(tokens)?),
            None => None,
        };

        let listing: Vec<String> = self.store
            .all()
            .into_iter()
            .filter(|e| filter.map_or(true, |class| e.class() == class))
            .map(|e| quote(&e.to_string()))
            .collect();

        writeln!(out, "[{}]", listing.join(", "))?;
        Ok(())
    }

    fn count<W: Write>(&self, tokens: &[String], out: &mut W) -> Result<()> {
        let name = tokens.first().ok_or(CommandError::ClassNameMissing)?;

        let count = self.store
            .all()
            .into_iter()
            .filter(|e| e.class().name() == name)
            .count();

        writeln!(out, "{}", count)?;
        Ok(())
    }

    fn update(&mut self, tokens: &[String]) -> Result<()> {
        let key = self.locate(tokens)?;

        let assignments = match tokens {
            [_, _] => return Err(CommandError::AttributeNameMissing),
            [_, _, text] => match literal::parse(text) {
                Ok(Literal::Dict(pairs)) => pairs,
                Ok(Literal::Value(value)) => {
                    debug!("Ignoring non-dictionary literal {} for {}", value, key);
                    return Ok(());
                },
                Err(LiteralError::Entry { key, number }) => {
                    debug!("{}: {} is out of range", key, number);
                    return Err(CommandError::InvalidValue(key));
                },
                Err(e) => {
                    debug!("Not a literal: {}", e);
                    return Err(CommandError::ValueMissing);
                },
            },
            [_, _, name, value, ..] => vec![(name.clone(), Value::String(value.clone()))],
            _ => return Err(CommandError::IdentifierMissing),
        };

        let entity = self.store.get_mut(&key).ok_or(CommandError::InstanceNotFound)?;

        // Convert everything before touching the entity
        let mut coerced = Vec::with_capacity(assignments.len());
        for (name, raw) in assignments {
            if RESERVED_ATTRIBUTES.contains(&name.as_str()) {
                debug!("Skipping reserved attribute {}", name);
                continue;
            }
            match entity.coerce(&name, raw) {
                Ok(value) => coerced.push((name, value)),
                Err(e) => {
                    debug!("{}: {}", name, e);
                    return Err(CommandError::InvalidValue(name));
                },
            }
        }

        if coerced.is_empty() {
            return Ok(());
        }

        for (name, value) in coerced {
            entity.set(&name, value);
        }
        entity.touch();

        self.store.save()?;
        debug!("Updated {}", key);
        Ok(())
    }

    fn help<W: Write>(&self, topic: &str, out: &mut W) -> Result<()> {
        let topic = topic.trim();

        if topic.is_empty() {
            let names: Vec<&str> = Verb::ALL.iter().map(|v| v.name()).collect();
            writeln!(out)?;
            writeln!(out, "Documented commands (type help <topic>):")?;
            writeln!(out, "{}", "=".repeat(40))?;
            writeln!(out, "{}", names.join("  "))?;
            writeln!(out)?;
            return Ok(());
        }

        match Verb::from_name(topic) {
            Some(verb) => writeln!(out, "{}", verb.usage())?,
            None => writeln!(out, "*** No help on {}", topic)?,
        }
        Ok(())
    }
}

/// Split the arguments of a command, reporting bad quoting as unknown syntax
fn tokenize(rest: &str, line: &str) -> Result<Vec<String>> {
    args::parse(rest).map_err(|e| {
        debug!("Cannot split {:?}: {}", rest, e);
        CommandError::UnrecognizedSyntax(line.to_string())
    })
}

/// First two validation steps shared by every class-taking command
fn class_of(tokens: &[String]) -> Result<Class> {
    let name = tokens.first().ok_or(CommandError::ClassNameMissing)?;
    name.parse().map_err(|_| CommandError::UnknownClass)
}
