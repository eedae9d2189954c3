//! Identifier rename tracking and application.
//!
//! Transformers record every left-hand-side rename they perform (for example
//! `s3_client -> storage_client`); the map rides along with the transformed
//! text so downstream tools can apply the same renames in files this engine
//! never touched.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ordered map of original identifier -> rewritten identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RenameMap {
    entries: BTreeMap<String, String>,
}

impl RenameMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// First mapping wins: a variable renamed by an earlier step keeps that
    /// name even if a later step would pick a different one.
    pub fn record(&mut self, from: impl Into<String>, to: impl Into<String>) {
        let from = from.into();
        let to = to.into();
        if from == to {
            return;
        }
        self.entries.entry(from).or_insert(to);
    }

    pub fn merge(&mut self, other: &RenameMap) {
        for (from, to) in other.iter() {
            self.record(from.clone(), to.clone());
        }
    }

    pub fn get(&self, from: &str) -> Option<&str> {
        self.entries.get(from).map(|s| s.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops entries whose original identifier still appears in a code
    /// position of `code`: the map only ever describes substitutions that
    /// actually took effect in the emitted text.
    pub fn retain_applied(&mut self, code: &str) {
        self.entries.retain(|from, _| {
            let re = match Regex::new(&format!(r"\b{}\b", regex::escape(from))) {
                Ok(re) => re,
                Err(_) => return false,
            };
            !code.lines().any(|line| {
                let trimmed = line.trim_start();
                !trimmed.starts_with('#')
                    && !trimmed.starts_with("//")
                    && !inside_string_heuristic(line)
                    && re.is_match(line)
            })
        });
    }

    /// Applies every rename as a whole-word substitution, skipping comment
    /// lines and lines that look like they sit inside a string literal
    /// (odd quote count heuristic).
    pub fn apply(&self, code: &str, comment_marker: &str) -> String {
        let mut result = code.to_string();
        for (from, to) in self.entries.iter() {
            result = rename_identifier(&result, from, to, comment_marker);
        }
        result
    }
}

/// Whole-word rename of one identifier, line by line.
///
/// Comment lines are left alone, as are lines with an unbalanced quote count
/// (the per-line heuristic for "inside a string"; multi-line strings are a
/// known blind spot).
pub fn rename_identifier(code: &str, from: &str, to: &str, comment_marker: &str) -> String {
    let pattern = match Regex::new(&format!(r"\b{}\b", regex::escape(from))) {
        Ok(re) => re,
        Err(_) => return code.to_string(),
    };
    let mut out = Vec::new();
    for line in code.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with(comment_marker) || inside_string_heuristic(line) {
            out.push(line.to_string());
        } else {
            out.push(pattern.replace_all(line, to).into_owned());
        }
    }
    let mut joined = out.join("\n");
    if code.ends_with('\n') {
        joined.push('\n');
    }
    joined
}

/// Odd number of single or double quotes on the line: assume the line opens
/// or closes a string literal and leave it untouched.
pub fn inside_string_heuristic(line: &str) -> bool {
    let doubles = line.matches('"').count();
    let singles = line.matches('\'').count();
    doubles % 2 == 1 || singles % 2 == 1
}
