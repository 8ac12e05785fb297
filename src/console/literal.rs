//! Literal parser
//!
//! Parses the value literals accepted by `update`: integers, floats,
//! quoted strings, lists of those, and dictionaries with string keys.

use pest::Parser;
use pest_derive::Parser;
use pest::iterators::Pair;
use thiserror::Error;

use crate::core::value::Value;

#[derive(Parser)]
#[grammar = "console/literal.pest"]
struct LiteralParser;

/// A parsed literal
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// A scalar or a list
    Value(Value),
    /// Key/value pairs in source order
    Dict(Vec<(String, Value)>),
}

#[derive(Error, Debug, PartialEq)]
pub enum LiteralError {
    #[error("Parse error: {0}")]
    Syntax(String),

    #[error("Invalid number: {0}")]
    Number(String),

    #[error("Invalid value for {key}: {number}")]
    Entry { key: String, number: String },
}

pub fn parse(input: &str) -> Result<Literal, LiteralError> {
    let main = LiteralParser::parse(Rule::main, input)
        .map_err(|e| LiteralError::Syntax(e.to_string()))?
        .next()
        .ok_or_else(|| LiteralError::Syntax("Empty literal".to_string()))?;

    let inner = main
        .into_inner()
        .next()
        .ok_or_else(|| LiteralError::Syntax("Empty literal".to_string()))?;

    match inner.as_rule() {
        Rule::dict => {
            let mut pairs = Vec::new();
            for pair in inner.into_inner() {
                let mut parts = pair.into_inner();
                let (Some(key), Some(value)) = (parts.next(), parts.next()) else {
                    return Err(LiteralError::Syntax("Incomplete dictionary entry".to_string()));
                };
                let key = unescape(key);
                let value = parse_value(value).map_err(|e| match e {
                    LiteralError::Number(number) => LiteralError::Entry { key: key.clone(), number },
                    other => other,
                })?;
                pairs.push((key, value));
            }
            Ok(Literal::Dict(pairs))
        },
        _ => Ok(Literal::Value(parse_value(inner)?)),
    }
}

fn parse_value(pair: Pair<Rule>) -> Result<Value, LiteralError> {
    match pair.as_rule() {
        Rule::integer => pair.as_str()
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|_| LiteralError::Number(pair.as_str().to_string())),
        Rule::float => pair.as_str()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(Value::Float)
            .ok_or_else(|| LiteralError::Number(pair.as_str().to_string())),
        Rule::string => Ok(Value::String(unescape(pair))),
        Rule::list => pair
            .into_inner()
            .map(parse_value)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List),
        rule => Err(LiteralError::Syntax(format!("Unexpected literal type: {:?}", rule))),
    }
}

/// Contents of a `string` pair with escape sequences resolved
fn unescape(pair: Pair<Rule>) -> String {
    // The only child is the text between the quotes
    let raw = pair.into_inner().next().map(|p| p.as_str()).unwrap_or("");

    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(c @ ('\\' | '\'' | '"')) => out.push(c),
            Some(other) => {
                out.push('\\');
                out.push(other);
            },
            None => out.push('\\'),
        }
    }
    out
}
