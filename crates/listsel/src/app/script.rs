//! Selection scripts: line-oriented gesture sequences with state expectations.
//!
//! ```text
//! # comments and blank lines are ignored
//! set 0 max
//! remove 0 max
//! expect min=0 max=0 anchor=0 lead=none selected=0 unselected=1..=max
//! ```

use std::fmt;

use thiserror::Error;

use crate::app::selection::IntervalSelectionModel;
use crate::domain::errors::DomainError;
use crate::domain::model::{ModelOptions, SelectionMode, SelectionSnapshot};

/// Error produced while parsing a script.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScriptError {
    #[error("line {line}: unknown command '{command}'")]
    UnknownCommand { line: usize, command: String },
    #[error("line {line}: '{command}' takes {expected} argument(s), found {found}")]
    Arity {
        line: usize,
        command: String,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: invalid index '{token}'")]
    InvalidIndex { line: usize, token: String },
    #[error("line {line}: invalid expectation '{token}'")]
    InvalidExpectation { line: usize, token: String },
    #[error("line {line}: {message}")]
    InvalidArgument { line: usize, message: String },
}

/// Index written either literally or relative to the model's max index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexExpr {
    Literal(usize),
    FromMax(usize),
}

impl IndexExpr {
    pub fn resolve(self, max_index: usize) -> usize {
        match self {
            IndexExpr::Literal(value) => value,
            IndexExpr::FromMax(offset) => max_index.saturating_sub(offset),
        }
    }

    fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        if let Some(rest) = token.strip_prefix("max") {
            if rest.is_empty() {
                return Some(IndexExpr::FromMax(0));
            }
            return rest
                .strip_prefix('-')
                .and_then(|offset| offset.parse().ok())
                .map(IndexExpr::FromMax);
        }
        token.parse().ok().map(IndexExpr::Literal)
    }
}

/// One state check on an `expect` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expectation {
    Min(Option<IndexExpr>),
    Max(Option<IndexExpr>),
    Anchor(Option<IndexExpr>),
    Lead(Option<IndexExpr>),
    Empty(bool),
    Count(usize),
    Selected(IndexExpr, IndexExpr),
    Unselected(IndexExpr, IndexExpr),
}

/// A single script instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Mode(SelectionMode),
    Set(IndexExpr, IndexExpr),
    Add(IndexExpr, IndexExpr),
    Deselect(IndexExpr, IndexExpr),
    Clear,
    Remove(IndexExpr, IndexExpr),
    Insert {
        index: IndexExpr,
        length: IndexExpr,
        before: bool,
    },
    Anchor(Option<IndexExpr>),
    Lead(Option<IndexExpr>),
    Expect(Vec<Expectation>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub line: usize,
    pub command: Command,
}

/// Parsed script ready to run against a fresh model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    steps: Vec<Step>,
}

/// Expectation that did not hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectationFailure {
    pub line: usize,
    pub message: String,
}

impl fmt::Display for ExpectationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

/// Result of running a script to completion or to its first failed expectation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub steps_run: usize,
    pub failure: Option<ExpectationFailure>,
    pub snapshot: SelectionSnapshot,
}

impl RunOutcome {
    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }
}

impl Script {
    /// Parse script source.
    pub fn parse(source: &str) -> Result<Self, ScriptError> {
        let mut steps = Vec::new();
        for (offset, raw) in source.lines().enumerate() {
            let line = offset + 1;
            let content = raw.split('#').next().unwrap_or_default().trim();
            if content.is_empty() {
                continue;
            }
            let tokens: Vec<&str> = content.split_whitespace().collect();
            let command = parse_command(line, &tokens)?;
            steps.push(Step { line, command });
        }
        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Run every step against a new model built from `options`.
    pub fn run(&self, options: ModelOptions) -> RunOutcome {
        let mut model = IntervalSelectionModel::with_options(options);
        let mut steps_run = 0;
        for step in &self.steps {
            steps_run += 1;
            if let Err(message) = apply(&mut model, &step.command) {
                return RunOutcome {
                    steps_run,
                    failure: Some(ExpectationFailure {
                        line: step.line,
                        message,
                    }),
                    snapshot: model.snapshot(),
                };
            }
        }
        RunOutcome {
            steps_run,
            failure: None,
            snapshot: model.snapshot(),
        }
    }
}

fn parse_command(line: usize, tokens: &[&str]) -> Result<Command, ScriptError> {
    let (name, args) = tokens
        .split_first()
        .map(|(name, args)| (*name, args))
        .unwrap_or_default();

    let arity = |expected: usize| -> Result<(), ScriptError> {
        if args.len() == expected {
            Ok(())
        } else {
            Err(ScriptError::Arity {
                line,
                command: name.to_string(),
                expected,
                found: args.len(),
            })
        }
    };
    let index = |token: &str| {
        IndexExpr::parse(token).ok_or_else(|| ScriptError::InvalidIndex {
            line,
            token: token.to_string(),
        })
    };

    let command = match name {
        "mode" => {
            arity(1)?;
            let mode = args[0]
                .parse()
                .map_err(|err: DomainError| ScriptError::InvalidArgument {
                    line,
                    message: err.to_string(),
                })?;
            Command::Mode(mode)
        }
        "set" | "add" | "deselect" | "remove" => {
            arity(2)?;
            let (a, b) = (index(args[0])?, index(args[1])?);
            match name {
                "set" => Command::Set(a, b),
                "add" => Command::Add(a, b),
                "deselect" => Command::Deselect(a, b),
                _ => Command::Remove(a, b),
            }
        }
        "clear" => {
            arity(0)?;
            Command::Clear
        }
        "insert" => {
            arity(3)?;
            let before = match args[2] {
                "before" => true,
                "after" => false,
                other => {
                    return Err(ScriptError::InvalidArgument {
                        line,
                        message: format!("expected 'before' or 'after', found '{other}'"),
                    });
                }
            };
            Command::Insert {
                index: index(args[0])?,
                length: index(args[1])?,
                before,
            }
        }
        "anchor" | "lead" => {
            arity(1)?;
            let cursor = parse_cursor(args[0]).ok_or_else(|| ScriptError::InvalidIndex {
                line,
                token: args[0].to_string(),
            })?;
            if name == "anchor" {
                Command::Anchor(cursor)
            } else {
                Command::Lead(cursor)
            }
        }
        "expect" => {
            if args.is_empty() {
                return Err(ScriptError::Arity {
                    line,
                    command: name.to_string(),
                    expected: 1,
                    found: 0,
                });
            }
            let expectations = args
                .iter()
                .map(|token| parse_expectation(line, token))
                .collect::<Result<Vec<_>, _>>()?;
            Command::Expect(expectations)
        }
        other => {
            return Err(ScriptError::UnknownCommand {
                line,
                command: other.to_string(),
            });
        }
    };
    Ok(command)
}

fn parse_cursor(token: &str) -> Option<Option<IndexExpr>> {
    match token {
        "none" | "-1" => Some(None),
        other => IndexExpr::parse(other).map(Some),
    }
}

fn parse_range(token: &str) -> Option<(IndexExpr, IndexExpr)> {
    match token.split_once("..=") {
        Some((start, end)) => Some((IndexExpr::parse(start)?, IndexExpr::parse(end)?)),
        None => IndexExpr::parse(token).map(|index| (index, index)),
    }
}

fn parse_expectation(line: usize, token: &str) -> Result<Expectation, ScriptError> {
    let invalid = || ScriptError::InvalidExpectation {
        line,
        token: token.to_string(),
    };
    let (key, value) = token.split_once('=').ok_or_else(invalid)?;
    let expectation = match key {
        "min" => Expectation::Min(parse_cursor(value).ok_or_else(invalid)?),
        "max" => Expectation::Max(parse_cursor(value).ok_or_else(invalid)?),
        "anchor" => Expectation::Anchor(parse_cursor(value).ok_or_else(invalid)?),
        "lead" => Expectation::Lead(parse_cursor(value).ok_or_else(invalid)?),
        "empty" => Expectation::Empty(value.parse().map_err(|_| invalid())?),
        "count" => Expectation::Count(value.parse().map_err(|_| invalid())?),
        "selected" => {
            let (start, end) = parse_range(value).ok_or_else(invalid)?;
            Expectation::Selected(start, end)
        }
        "unselected" => {
            let (start, end) = parse_range(value).ok_or_else(invalid)?;
            Expectation::Unselected(start, end)
        }
        _ => return Err(invalid()),
    };
    Ok(expectation)
}

fn apply(model: &mut IntervalSelectionModel, command: &Command) -> Result<(), String> {
    let max = model.max_index();
    let resolve = |index: &IndexExpr| index.resolve(max);
    match command {
        Command::Mode(mode) => model.set_mode(*mode),
        Command::Set(a, b) => model.set_selection_interval(resolve(a), resolve(b)),
        Command::Add(a, b) => model.add_selection_interval(resolve(a), resolve(b)),
        Command::Deselect(a, b) => model.remove_selection_interval(resolve(a), resolve(b)),
        Command::Clear => model.clear_selection(),
        Command::Remove(a, b) => model.remove_index_interval(resolve(a), resolve(b)),
        Command::Insert {
            index,
            length,
            before,
        } => model.insert_index_interval(resolve(index), resolve(length), *before),
        Command::Anchor(cursor) => model.set_anchor_selection_index(cursor.map(|c| c.resolve(max))),
        Command::Lead(cursor) => model.move_lead_selection_index(cursor.map(|c| c.resolve(max))),
        Command::Expect(expectations) => {
            for expectation in expectations {
                check(model, expectation)?;
            }
        }
    }
    Ok(())
}

fn check(model: &IntervalSelectionModel, expectation: &Expectation) -> Result<(), String> {
    let max = model.max_index();
    let cursor = |label: &str, expected: &Option<IndexExpr>, found: Option<usize>| {
        let expected = expected.map(|index| index.resolve(max));
        if expected == found {
            Ok(())
        } else {
            Err(format!(
                "{label} expected {}, found {}",
                render_cursor(expected),
                render_cursor(found)
            ))
        }
    };

    match expectation {
        Expectation::Min(expected) => cursor("min", expected, model.min_selection_index()),
        Expectation::Max(expected) => cursor("max", expected, model.max_selection_index()),
        Expectation::Anchor(expected) => cursor("anchor", expected, model.anchor_selection_index()),
        Expectation::Lead(expected) => cursor("lead", expected, model.lead_selection_index()),
        Expectation::Empty(expected) => {
            let found = model.is_selection_empty();
            if *expected == found {
                Ok(())
            } else {
                Err(format!("empty expected {expected}, found {found}"))
            }
        }
        Expectation::Count(expected) => {
            let found = model.selected_count();
            if *expected == found {
                Ok(())
            } else {
                Err(format!("count expected {expected}, found {found}"))
            }
        }
        Expectation::Selected(start, end) => {
            let (start, end) = (start.resolve(max), end.resolve(max));
            if model.is_interval_selected(start, end) {
                Ok(())
            } else {
                Err(format!("expected {start}..={end} to be selected"))
            }
        }
        Expectation::Unselected(start, end) => {
            let (start, end) = (start.resolve(max), end.resolve(max));
            if model.intersects_interval(start, end) {
                Err(format!("expected {start}..={end} to be unselected"))
            } else {
                Ok(())
            }
        }
    }
}

fn render_cursor(cursor: Option<usize>) -> String {
    cursor.map_or_else(|| "none".to_string(), |index| index.to_string())
}
