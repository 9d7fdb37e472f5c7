//! Textbook item locator and label parser.
//!
//! # Responsibility
//! - Parse raw item labels (`15.1`, `15.1.5`) into structured locators.
//! - Classify locators as Problem (two levels) or Exercise (three levels).
//!
//! # Invariants
//! - Parsing is total: malformed input yields `None`, never a panic.
//! - The whole trimmed label must match; partial matches are rejected.
//! - `Display` output re-parses to an equal locator.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

static PROBLEM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]+)\.([0-9]+)$").expect("valid problem regex"));
static EXERCISE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]+)\.([0-9]+)\.([0-9]+)$").expect("valid exercise regex"));

/// Item category derived from locator depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// `chapter.section`
    Problem,
    /// `chapter.section.sub_index`
    Exercise,
}

impl ItemKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Problem => "Problem",
            Self::Exercise => "Exercise",
        }
    }
}

impl Display for ItemKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Structured position of one item inside the book.
///
/// Only constructed by [`ItemLocator::parse`], so every instance corresponds
/// to a well-formed label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemLocator {
    chapter: u32,
    section: u32,
    sub_index: Option<u32>,
}

/// Error returned by `ItemLocator::from_str`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid item label `{0}`; expected X.Y (problem) or X.Y.Z (exercise)")]
pub struct ItemParseError(pub String);

impl ItemLocator {
    /// Parses a trimmed label into a locator.
    ///
    /// Returns `None` for any other shape, including components that do not
    /// fit in `u32`.
    pub fn parse(label: &str) -> Option<Self> {
        let trimmed = label.trim();

        if let Some(caps) = PROBLEM_RE.captures(trimmed) {
            return Some(Self {
                chapter: caps[1].parse().ok()?,
                section: caps[2].parse().ok()?,
                sub_index: None,
            });
        }

        let caps = EXERCISE_RE.captures(trimmed)?;
        Some(Self {
            chapter: caps[1].parse().ok()?,
            section: caps[2].parse().ok()?,
            sub_index: Some(caps[3].parse().ok()?),
        })
    }

    pub fn chapter(&self) -> u32 {
        self.chapter
    }

    pub fn section(&self) -> u32 {
        self.section
    }

    pub fn sub_index(&self) -> Option<u32> {
        self.sub_index
    }

    pub fn kind(&self) -> ItemKind {
        match self.sub_index {
            None => ItemKind::Problem,
            Some(_) => ItemKind::Exercise,
        }
    }
}

impl Display for ItemLocator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.sub_index {
            None => write!(f, "{}.{}", self.chapter, self.section),
            Some(sub) => write!(f, "{}.{}.{}", self.chapter, self.section, sub),
        }
    }
}

impl FromStr for ItemLocator {
    type Err = ItemParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value).ok_or_else(|| ItemParseError(value.trim().to_string()))
    }
}
