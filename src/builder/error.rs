//! Configuration errors found while assembling a state graph.

use std::fmt;
use thiserror::Error;

/// Which branch of a transition a problem concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    True,
    False,
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::True => f.write_str("true"),
            Self::False => f.write_str("false"),
        }
    }
}

/// A single configuration problem.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("State graph has no states")]
    EmptyGraph,

    #[error("State name '{name}' is used more than once")]
    DuplicateState { name: String },

    #[error("State '{state}': action {index} is null")]
    NullAction { state: String, index: usize },

    #[error("State '{state}': transition {index} is null")]
    NullTransition { state: String, index: usize },

    #[error("State '{state}': transition {index} has no decision")]
    MissingDecision { state: String, index: usize },

    #[error("State '{state}': transition {index} has no {branch} target")]
    MissingTarget {
        state: String,
        index: usize,
        branch: Branch,
    },

    #[error("State '{state}': transition {index} {branch} target '{target}' does not exist")]
    UnresolvedTarget {
        state: String,
        index: usize,
        branch: Branch,
        target: String,
    },

    #[error("State '{state}': action {index} has unknown kind '{kind}'")]
    UnknownAction {
        state: String,
        index: usize,
        kind: String,
    },

    #[error("State '{state}': transition {index} has unknown decision kind '{kind}'")]
    UnknownDecision {
        state: String,
        index: usize,
        kind: String,
    },

    #[error("State '{state}': action {index} ('{kind}') is marked negate, which only applies to decisions")]
    NegatedAction {
        state: String,
        index: usize,
        kind: String,
    },

    #[error("State '{state}': {kind} at index {index} rejected its parameters: {message}")]
    InvalidParams {
        state: String,
        index: usize,
        kind: String,
        message: String,
    },
}

/// Every problem found in a graph definition.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Invalid state graph: {}", summarize(.problems))]
pub struct GraphBuildError {
    problems: Vec<ConfigError>,
}

impl GraphBuildError {
    pub fn new(problems: Vec<ConfigError>) -> Self {
        Self { problems }
    }

    pub fn problems(&self) -> &[ConfigError] {
        &self.problems
    }
}

impl From<ConfigError> for GraphBuildError {
    fn from(problem: ConfigError) -> Self {
        Self::new(vec![problem])
    }
}

fn summarize(problems: &[ConfigError]) -> String {
    problems
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
