//! Coding guidelines (clang-format) check result

use crate::analysis::AnalysisError;
use serde::Serialize;

const FAILING_KEY: &str = "NB_FILES_FAILING_CHECK";
const CHECKED_KEY: &str = "NB_FILES_CHECKED";

/// Content of `oai_rules_result.txt`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattingCheck {
    pub failing: u32,
    pub checked: u32,
}

impl FormattingCheck {
    pub fn passed(&self) -> bool {
        self.failing == 0
    }
}

fn value_of(text: &str, key: &'static str) -> Result<u32, AnalysisError> {
    let prefix = format!("{}=", key);
    let raw = text
        .lines()
        .find_map(|line| line.find(&prefix).map(|at| &line[at + prefix.len()..]))
        .ok_or(AnalysisError::MissingKey(key))?;

    raw.trim().parse().map_err(|_| AnalysisError::InvalidValue {
        key,
        value: raw.trim().to_string(),
    })
}

/// Parse the `KEY=value` lines written by the formatting check
pub fn parse_formatting_result(text: &str) -> Result<FormattingCheck, AnalysisError> {
    Ok(FormattingCheck {
        failing: value_of(text, FAILING_KEY)?,
        checked: value_of(text, CHECKED_KEY)?,
    })
}

/// Non-empty, trimmed lines of `oai_rules_result_list.txt`
pub fn failing_files(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}
