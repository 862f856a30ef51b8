//! Raw argument tokenizer.
//!
//! A single left-to-right pass turns an argument vector into positional
//! arguments and a multi-valued option map. Recognised forms:
//!
//! - `--name=value` and `--name value` (the next token is consumed unless it
//!   starts with `-`); a bare `--name` is recorded as [`OptionValue::Flag`]
//! - the short forms listed in [`SHORT_OPTIONS`]; other short tokens are ignored
//! - `--` stops option parsing, everything after it is positional

use crate::cli::options::{normalize, option_group, OptionSpec, HELP};

/// A single recorded option value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    /// The option was given without a value.
    Flag,
    /// The option carried a value, even one spelled `"true"`.
    Value(String),
}

impl OptionValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::Flag => None,
            OptionValue::Value(value) => Some(value),
        }
    }
}

/// Short tokens the parser understands: token, long name, takes a value.
pub const SHORT_OPTIONS: &[(&str, &str, bool)] = &[
    ("-h", "help", false),
    ("-f", "field", true),
    ("-o", "output", true),
];

/// Values recorded under one spelling, each tagged with its occurrence number.
#[derive(Debug, Clone, PartialEq, Eq)]
struct OptionEntry {
    name: String,
    values: Vec<OptionValue>,
    sequence: Vec<usize>,
}

/// Positional arguments plus options keyed by the spelling first typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArguments {
    positional: Vec<String>,
    options: Vec<OptionEntry>,
    recorded: usize,
}

impl ParsedArguments {
    /// Parse a full argument vector.
    pub fn parse<S: AsRef<str>>(argv: &[S]) -> Self {
        let mut parsed = Self::default();
        for token in Tokens::new(argv) {
            match token {
                Token::Positional(value) => parsed.positional.push(value),
                Token::Option(name, value) => parsed.push_option(name, value),
            }
        }
        parsed
    }

    pub fn positional(&self) -> &[String] {
        &self.positional
    }

    /// Positional argument at `index`, or a missing-argument error naming `label`.
    pub fn required_positional(&self, index: usize, label: &str) -> crate::MemCliResult<&str> {
        self.positional
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| crate::MemCliError::MissingArgument(label.to_string()))
    }

    /// Recorded options in first-seen order.
    pub fn options(&self) -> impl Iterator<Item = (&str, &[OptionValue])> {
        self.options
            .iter()
            .map(|entry| (entry.name.as_str(), entry.values.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.options.is_empty()
    }

    fn push_option(&mut self, name: String, value: OptionValue) {
        let sequence = self.recorded;
        self.recorded += 1;
        match self.options.iter_mut().find(|entry| entry.name == name) {
            Some(entry) => {
                entry.values.push(value);
                entry.sequence.push(sequence);
            }
            None => self.options.push(OptionEntry {
                name,
                values: vec![value],
                sequence: vec![sequence],
            }),
        }
    }

    /// Values recorded under any spelling of `aliases`, in the order typed.
    fn occurrences(&self, aliases: &[&str]) -> Vec<&OptionValue> {
        let wanted: Vec<String> = aliases.iter().map(|alias| normalize(alias)).collect();
        let mut found: Vec<(usize, &OptionValue)> = self
            .options
            .iter()
            .filter(|entry| wanted.contains(&normalize(&entry.name)))
            .flat_map(|entry| entry.sequence.iter().copied().zip(&entry.values))
            .collect();
        found.sort_by_key(|(sequence, _)| *sequence);
        found.into_iter().map(|(_, value)| value).collect()
    }

    /// True if any spelling of any alias was recorded.
    pub fn has_option(&self, aliases: &[&str]) -> bool {
        !self.occurrences(aliases).is_empty()
    }

    /// Most recent value typed under any of the aliases.
    ///
    /// A bare flag carries no scalar, so it yields `None`.
    pub fn get_option(&self, aliases: &[&str]) -> Option<&str> {
        self.occurrences(aliases)
            .last()
            .copied()
            .and_then(OptionValue::as_str)
    }

    /// Every real value recorded under any alias, flags excluded.
    pub fn get_all_option_values(&self, aliases: &[&str]) -> Vec<String> {
        self.occurrences(aliases)
            .into_iter()
            .filter_map(OptionValue::as_str)
            .map(str::to_string)
            .collect()
    }

    pub fn has(&self, spec: &OptionSpec) -> bool {
        self.has_option(spec.aliases)
    }

    pub fn get(&self, spec: &OptionSpec) -> Option<&str> {
        self.get_option(spec.aliases)
    }

    pub fn get_all(&self, spec: &OptionSpec) -> Vec<String> {
        self.get_all_option_values(spec.aliases)
    }
}

/// An argument vector split at the command token.
///
/// Options before the command are global, options after it are scoped to
/// the command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    pub command: Option<String>,
    pub global: ParsedArguments,
    pub scoped: ParsedArguments,
}

impl Invocation {
    pub fn parse<S: AsRef<str>>(argv: &[S]) -> Self {
        let mut invocation = Self::default();
        for token in Tokens::new(argv) {
            match (token, invocation.command.is_some()) {
                (Token::Positional(value), false) => invocation.command = Some(value),
                (Token::Positional(value), true) => invocation.scoped.positional.push(value),
                (Token::Option(name, value), false) => invocation.global.push_option(name, value),
                (Token::Option(name, value), true) => invocation.scoped.push_option(name, value),
            }
        }
        invocation
    }

    /// Arguments handed to a command: the shifted positionals and the union
    /// of global and scoped options. A scoped option replaces every global
    /// spelling of the same logical option.
    pub fn arguments(&self) -> ParsedArguments {
        let scoped_groups: Vec<String> = self
            .scoped
            .options
            .iter()
            .map(|entry| option_group(&entry.name))
            .collect();

        let mut merged = ParsedArguments {
            positional: self.scoped.positional.clone(),
            ..ParsedArguments::default()
        };
        for entry in &self.global.options {
            if !scoped_groups.contains(&option_group(&entry.name)) {
                merged.options.push(entry.clone());
            }
        }
        // scoped values were typed after every global one
        let offset = self.global.recorded;
        for entry in &self.scoped.options {
            merged.options.push(OptionEntry {
                sequence: entry.sequence.iter().map(|s| s + offset).collect(),
                ..entry.clone()
            });
        }
        merged.recorded = offset + self.scoped.recorded;
        merged
    }

    /// `help` as the command or the help flag anywhere.
    pub fn help_requested(&self) -> bool {
        self.command.as_deref() == Some("help") || self.global.has(&HELP) || self.scoped.has(&HELP)
    }
}

enum Token {
    Positional(String),
    Option(String, OptionValue),
}

struct Tokens<'a, S> {
    argv: &'a [S],
    cursor: usize,
    terminated: bool,
}

impl<'a, S: AsRef<str>> Tokens<'a, S> {
    fn new(argv: &'a [S]) -> Self {
        Self {
            argv,
            cursor: 0,
            terminated: false,
        }
    }

    /// Consume the next token as a value if it does not look like an option.
    fn take_value(&mut self) -> OptionValue {
        let argv = self.argv;
        match argv.get(self.cursor).map(|s| s.as_ref()) {
            Some(next) if !next.starts_with('-') => {
                self.cursor += 1;
                OptionValue::Value(next.to_string())
            }
            _ => OptionValue::Flag,
        }
    }
}

impl<S: AsRef<str>> Iterator for Tokens<'_, S> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let argv = self.argv;
        loop {
            let token = argv.get(self.cursor)?.as_ref();
            self.cursor += 1;

            if self.terminated || !token.starts_with('-') {
                return Some(Token::Positional(token.to_string()));
            }
            if token == "--" {
                self.terminated = true;
                continue;
            }
            if let Some(body) = token.strip_prefix("--") {
                let (name, value) = match body.split_once('=') {
                    Some((name, inline)) => (name, OptionValue::Value(inline.to_string())),
                    None => (body, self.take_value()),
                };
                return Some(Token::Option(name.to_string(), value));
            }
            if let Some(&(_, name, takes_value)) =
                SHORT_OPTIONS.iter().find(|(short, _, _)| *short == token)
            {
                let value = if takes_value {
                    self.take_value()
                } else {
                    OptionValue::Flag
                };
                return Some(Token::Option(name.to_string(), value));
            }
            tracing::debug!(token, "ignoring unrecognised short option");
        }
    }
}
