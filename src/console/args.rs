//! Argument splitting
//!
//! Turns the text after a verb into a token list. A trailing `{...}` or
//! `[...]` literal is kept whole as the last token; everything before it is
//! split shell-style.

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ArgsError {
    #[error("no closing quotation")]
    UnclosedQuote,

    #[error("unexpected input after literal: {0}")]
    TrailingInput(String),
}

/// Split an argument string into tokens
pub fn parse(arg: &str) -> Result<Vec<String>, ArgsError> {
    let literal = find_enclosed(arg, '{', '}').or_else(|| find_enclosed(arg, '[', ']'));

    let Some((start, end)) = literal else {
        return Ok(strip_commas(split(arg)?));
    };

    let rest = arg[end..].trim();
    if !rest.is_empty() {
        return Err(ArgsError::TrailingInput(rest.to_string()));
    }

    let mut tokens = strip_commas(split(&arg[..start])?);
    tokens.push(arg[start..end].to_string());
    Ok(tokens)
}

/// Byte range of the first `open` and the first `close` after it
fn find_enclosed(arg: &str, open: char, close: char) -> Option<(usize, usize)> {
    let start = arg.find(open)?;
    let end = arg[start..].find(close)? + start + close.len_utf8();
    Some((start, end))
}

fn strip_commas(tokens: Vec<String>) -> Vec<String> {
    tokens
        .into_iter()
        .map(|t| t.trim_matches(',').to_string())
        .collect()
}

/// POSIX shell-style word splitting
pub fn split(line: &str) -> Result<Vec<String>, ArgsError> {
    #[derive(PartialEq)]
    enum Quote {
        None,
        Single,
        Double,
    }

    let mut out: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote = Quote::None;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match quote {
            Quote::Single => match c {
                '\'' => quote = Quote::None,
                _ => current.push(c),
            },
            Quote::Double => match c {
                '"' => quote = Quote::None,
                '\\' if matches!(chars.peek(), Some('"') | Some('\\')) => {
                    if let Some(next) = chars.next() {
                        current.push(next);
                    }
                },
                _ => current.push(c),
            },
            Quote::None => match c {
                '\'' => {
                    quote = Quote::Single;
                    in_token = true;
                },
                '"' => {
                    quote = Quote::Double;
                    in_token = true;
                },
                '\\' => {
                    in_token = true;
                    if let Some(next) = chars.next() {
                        current.push(next);
                    }
                },
                c if c.is_whitespace() => {
                    if in_token {
                        out.push(std::mem::take(&mut current));
                        in_token = false;
                    }
                },
                _ => {
                    current.push(c);
                    in_token = true;
                },
            },
        }
    }

    if quote != Quote::None {
        return Err(ArgsError::UnclosedQuote);
    }

    if in_token {
        out.push(current);
    }

    Ok(out)
}
