//! Question bank parsing.
//!
//! A bank is a UTF-8 text file of blocks separated by a blank line:
//!
//! ```text
//! 1. What is the capital of France?
//! a) Berlin
//! b) Madrid
//! c) Paris
//! d) Rome
//! Answer: c
//! ```
//!
//! Blocks with fewer than six lines are skipped without error.

use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

use crate::error::QuizError;

/// Question line + at least four options + answer line.
pub const MIN_BLOCK_LINES: usize = 6;

/// One multiple-choice quiz question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    /// First line of the block, verbatim (ordinal prefix kept).
    pub prompt: String,
    /// Option texts in source order, `a) ` style markers removed.
    pub options: Vec<String>,
    /// Index into `options` of the correct choice, if the answer letter matched.
    pub correct_index: Option<usize>,
}

impl QuestionRecord {
    /// Whether this record can be delivered as a scored quiz.
    pub fn is_scored(&self) -> bool {
        self.correct_index.is_some()
    }
}

fn option_marker() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| Regex::new(r"^[a-d]\)\s+").expect("static regex"))
}

/// Parse raw bank text into an ordered list of questions.
///
/// Never fails: malformed blocks are dropped and empty input yields an
/// empty bank.
pub fn parse(raw: &str) -> Vec<QuestionRecord> {
    let normalized = raw.replace("\r\n", "\n");
    let mut questions = Vec::new();

    for (n, block) in normalized.trim().split("\n\n").enumerate() {
        let lines: Vec<&str> = block.trim().split('\n').collect();
        if lines.len() < MIN_BLOCK_LINES {
            debug!("skipping block {n}: {} lines", lines.len());
            continue;
        }
        questions.push(parse_block(&lines));
    }

    questions
}

fn parse_block(lines: &[&str]) -> QuestionRecord {
    let prompt = lines[0].to_string();
    let last = lines[lines.len() - 1];
    let answer_letter = last.strip_prefix("Answer: ").unwrap_or(last).trim();
    let answer_prefix = format!("{answer_letter})");

    let mut options = Vec::with_capacity(lines.len() - 2);
    let mut correct_index = None;

    for (i, line) in lines[1..lines.len() - 1].iter().enumerate() {
        options.push(option_marker().replace(line, "").into_owned());
        // Later matches overwrite earlier ones.
        if line.starts_with(&answer_prefix) {
            correct_index = Some(i);
        }
    }

    QuestionRecord {
        prompt,
        options,
        correct_index,
    }
}

/// Read and parse a bank file.
pub fn load_bank(path: impl AsRef<Path>) -> Result<Vec<QuestionRecord>, QuizError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .map_err(|e| QuizError::Bank(format!("failed to read {}: {e}", path.display())))?;
    Ok(parse(&content))
}

/// Structural summary of a parsed bank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankReport {
    pub total: usize,
    /// Zero-based indices of records whose answer letter matched no option.
    pub unscored: Vec<usize>,
}

impl BankReport {
    pub fn from_bank(bank: &[QuestionRecord]) -> Self {
        let unscored = bank
            .iter()
            .enumerate()
            .filter(|(_, q)| !q.is_scored())
            .map(|(i, _)| i)
            .collect();
        Self {
            total: bank.len(),
            unscored,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.unscored.is_empty()
    }
}
