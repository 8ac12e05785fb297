//! Errors reported by the console
//!
//! None of these end the session; the message is shown and the
//! next line is read.

use thiserror::Error;
use crate::core::errors::StoreError;

/// Errors that can occur while executing a command line
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("** class name missing **")]
    ClassNameMissing,

    #[error("** class doesn't exist **")]
    UnknownClass,

    #[error("** instance id missing **")]
    IdentifierMissing,

    #[error("** no instance found **")]
    InstanceNotFound,

    #[error("** attribute name missing **")]
    AttributeNameMissing,

    #[error("** value missing **")]
    ValueMissing,

    #[error("** invalid value for {0} **")]
    InvalidValue(String),

    #[error("*** Unknown syntax: {0}")]
    UnrecognizedSyntax(String),

    #[error("** could not save: {0} **")]
    Store(#[from] StoreError),

    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
}
