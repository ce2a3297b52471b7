//! Log marker matching
//!
//! Every log-driven verdict in this crate is expressed as an ordered list of
//! named rules applied line by line. The result is a [`MarkerCounts`] record
//! mapping each rule name to the number of lines it matched.

use regex::Regex;
use std::collections::BTreeMap;

/// Pattern for matching a log line
#[derive(Debug, Clone)]
pub enum MarkerPattern {
    /// Simple substring match
    Simple(String),
    /// Regular expression match
    Regex(Regex),
}

impl MarkerPattern {
    /// Substring pattern
    pub fn simple(pattern: &str) -> Self {
        MarkerPattern::Simple(pattern.to_string())
    }

    /// Regex pattern. Patterns are compiled from literals in this crate, so an
    /// invalid expression falls back to a plain substring match.
    pub fn regex(pattern: &str) -> Self {
        match Regex::new(pattern) {
            Ok(regex) => MarkerPattern::Regex(regex),
            Err(_) => MarkerPattern::Simple(pattern.to_string()),
        }
    }

    /// Check if the pattern matches the given line
    pub fn matches(&self, line: &str) -> bool {
        match self {
            MarkerPattern::Simple(pattern) => line.contains(pattern.as_str()),
            MarkerPattern::Regex(regex) => regex.is_match(line),
        }
    }

    /// First capture group of a regex pattern, if any
    pub fn capture<'a>(&self, line: &'a str) -> Option<&'a str> {
        match self {
            MarkerPattern::Simple(_) => None,
            MarkerPattern::Regex(regex) => regex
                .captures(line)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str()),
        }
    }
}

/// A named marker
#[derive(Debug, Clone)]
pub struct MarkerRule {
    pub name: &'static str,
    pub pattern: MarkerPattern,
}

impl MarkerRule {
    pub fn simple(name: &'static str, pattern: &str) -> Self {
        Self { name, pattern: MarkerPattern::simple(pattern) }
    }

    pub fn regex(name: &'static str, pattern: &str) -> Self {
        Self { name, pattern: MarkerPattern::regex(pattern) }
    }
}

/// Number of matching lines per marker name
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct MarkerCounts(BTreeMap<&'static str, usize>);

impl MarkerCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count for a marker (0 if never seen)
    pub fn count(&self, name: &str) -> usize {
        self.0.get(name).copied().unwrap_or(0)
    }

    /// Whether the marker matched at least once
    pub fn seen(&self, name: &str) -> bool {
        self.count(name) > 0
    }

    /// Markers seen, in name order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, usize)> + '_ {
        self.0.iter().map(|(name, count)| (*name, *count))
    }

    pub fn bump(&mut self, name: &'static str) {
        *self.0.entry(name).or_insert(0) += 1;
    }

    /// Apply every rule to a line
    pub fn observe(&mut self, rules: &[MarkerRule], line: &str) {
        for rule in rules {
            if rule.pattern.matches(line) {
                self.bump(rule.name);
            }
        }
    }

    /// Apply only the first matching rule to a line. Returns the matched name.
    pub fn classify(&mut self, rules: &[MarkerRule], line: &str) -> Option<&'static str> {
        let hit = rules.iter().find(|r| r.pattern.matches(line))?;
        self.bump(hit.name);
        Some(hit.name)
    }
}

/// Scan lines with a rule set
pub fn scan<'a, I>(rules: &[MarkerRule], lines: I) -> MarkerCounts
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts = MarkerCounts::new();
    for line in lines {
        counts.observe(rules, line);
    }
    counts
}

/// Tracks a log section delimited by a start and an end marker.
///
/// The start marker is evaluated before the end marker on every line, so a
/// line carrying both leaves the section closed.
#[derive(Debug, Clone)]
pub struct Section {
    start: MarkerPattern,
    end: MarkerPattern,
    inside: bool,
    end_seen: bool,
}

impl Section {
    pub fn new(start: MarkerPattern, end: MarkerPattern) -> Self {
        Self { start, end, inside: false, end_seen: false }
    }

    /// Feed a line; returns whether the line belongs to the section
    pub fn advance(&mut self, line: &str) -> bool {
        if self.start.matches(line) {
            self.inside = true;
        }
        if self.end.matches(line) {
            self.inside = false;
            self.end_seen = true;
        }
        self.inside
    }

    /// Whether the end marker has been seen at least once
    pub fn end_seen(&self) -> bool {
        self.end_seen
    }
}

/// A sub-build that is complete once `done` is seen after `begin`
#[derive(Debug, Clone)]
pub struct Span {
    pub name: &'static str,
    begin: MarkerPattern,
    done: MarkerPattern,
    open: bool,
    completed: bool,
}

impl Span {
    pub fn new(name: &'static str, begin: &str, done: &str) -> Self {
        Self {
            name,
            begin: MarkerPattern::simple(begin),
            done: MarkerPattern::simple(done),
            open: false,
            completed: false,
        }
    }

    pub fn advance(&mut self, line: &str) {
        if self.begin.matches(line) {
            self.open = true;
        }
        if self.open && self.done.matches(line) {
            self.open = false;
            self.completed = true;
        }
    }

    pub fn completed(&self) -> bool {
        self.completed
    }
}
