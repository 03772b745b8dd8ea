/// Crontab-style document tokenizer.
use crate::{cell::Cell, CronError, Result};
use std::collections::BTreeMap;

/// Well-known shortcuts and their expansions.
const PREDEFINED: [(&str, &str); 5] = [
    ("@yearly", "0 0 1 1 *"),
    ("@monthly", "0 0 1 * *"),
    ("@weekly", "0 0 * * 0"),
    ("@daily", "0 0 * * *"),
    ("@hourly", "0 * * * *"),
];

/// Mnemonic names of days of week and months with their numeric values.
const ALIASES: [(&str, &str); 19] = [
    ("sun", "0"),
    ("mon", "1"),
    ("tue", "2"),
    ("wed", "3"),
    ("thu", "4"),
    ("fri", "5"),
    ("sat", "6"),
    ("jan", "1"),
    ("feb", "2"),
    ("mar", "3"),
    ("apr", "4"),
    ("may", "5"),
    ("jun", "6"),
    ("jul", "7"),
    ("aug", "8"),
    ("sep", "9"),
    ("oct", "10"),
    ("nov", "11"),
    ("dec", "12"),
];

/// Amount of mandatory time fields.
const MIN_FIELDS: usize = 5;
/// Amount of time fields with seconds.
const MAX_FIELDS: usize = 6;

/// Tokenized expression: time cells and optional trailing command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub(crate) cells: Vec<Cell>,
    pub(crate) command: Option<String>,
}

/// Tokenized document: all expressions with shared variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Tokens {
    pub(crate) variables: BTreeMap<String, String>,
    pub(crate) expressions: Vec<Token>,
}

/// Splits the document into expressions, comments and variables assignments.
///
/// Cells may still contain out of range values, validation is up to the schedule builder.
pub(crate) fn tokenize(input: &str) -> Result<Tokens> {
    let lines: Vec<&str> = input.split('\n').map(str::trim).collect();
    let multiline = lines.len() > 1;
    let mut tokens = Tokens::default();

    for line in lines {
        if line.starts_with('#') || (multiline && line.is_empty()) {
            continue;
        }

        if let Some((key, value)) = variable(line) {
            tokens.variables.insert(key.to_owned(), value.to_owned());
        } else {
            tokens.expressions.push(tokenize_line(line, input)?);
        }
    }

    Ok(tokens)
}

/// Recognizes `KEY=VALUE` line, key must be a single word.
fn variable(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    if key.is_empty() || key.contains(char::is_whitespace) {
        None
    } else {
        Some((key, value.trim()))
    }
}

/// Tokenizes single expression line, `original` is used for error reporting only.
fn tokenize_line(line: &str, original: &str) -> Result<Token> {
    let line = replace_aliases(&expand_predefined(line));
    let values: Vec<&str> = line.split_whitespace().collect();

    if values.len() < MIN_FIELDS {
        return Err(CronError::InvalidLength {
            input: original.to_owned(),
            length: values.len(),
        });
    }

    let mut cells = Vec::with_capacity(MAX_FIELDS);
    let mut command = Vec::new();

    for (i, value) in values.into_iter().enumerate() {
        if !command.is_empty() || i >= MAX_FIELDS {
            command.push(value);
            continue;
        }

        match Cell::parse(value) {
            Some(cell) => cells.push(cell),
            None if i < MIN_FIELDS => return Err(CronError::InvalidToken(value.to_owned())),
            // the 6th token starts the command
            None => command.push(value),
        }
    }

    Ok(Token {
        cells,
        command: (!command.is_empty()).then(|| command.join(" ")),
    })
}

/// Replaces leading shortcut (like `@daily`) with its expansion, the rest of the line is kept.
fn expand_predefined(line: &str) -> String {
    PREDEFINED
        .iter()
        .find(|(name, _)| {
            line.get(..name.len())
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case(name))
        })
        .map(|(name, expansion)| format!("{expansion}{}", &line[name.len()..]))
        .unwrap_or_else(|| line.to_owned())
}

/// Replaces every case-insensitive occurrence of the day and month names with its number.
///
/// This is a plain substring replacement, so names are replaced inside longer words as well.
fn replace_aliases(line: &str) -> String {
    let mut result = String::with_capacity(line.len());
    let mut rest = line;

    'outer: while let Some(c) = rest.chars().next() {
        for (name, value) in ALIASES {
            if rest
                .get(..name.len())
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case(name))
            {
                result.push_str(value);
                rest = &rest[name.len()..];
                continue 'outer;
            }
        }
        result.push(c);
        rest = &rest[c.len_utf8()..];
    }

    result
}
