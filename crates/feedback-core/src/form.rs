//! Submission form model: the fields a user fills before a payload is built.
//!
//! Holds raw, untrimmed input exactly as typed. [`SubmissionForm::validate`]
//! is the only gate between the form and the payload builder.

use thiserror::Error;

use crate::config::SCORE_SCALE;
use crate::record::Attributes;

/// Source label used when the source field is left blank.
pub const DEFAULT_SOURCE: &str = "Demo Data";

/// Default score offered by the score prompt.
pub const DEFAULT_SCORE: u8 = 3;

/// Number of blank attribute rows a fresh form starts with.
pub const INITIAL_ATTRIBUTE_ROWS: usize = 3;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Message is required.")]
    MessageRequired,
    #[error("score {0} is outside 1..=5")]
    ScoreOutOfRange(u8),
    #[error("attribute row {index} does not exist ({len} rows)")]
    NoSuchRow { index: usize, len: usize },
    #[error("attribute {0:?} must be written as key=value")]
    MalformedAttribute(String),
}

/// One key/value row of the attribute editor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeRow {
    pub key: String,
    pub value: String,
}

impl AttributeRow {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Parse `key=value`. Splits on the first `=`; the value may be empty.
    pub fn parse(s: &str) -> Result<Self, FormError> {
        let (key, value) = s
            .split_once('=')
            .ok_or_else(|| FormError::MalformedAttribute(s.to_string()))?;
        Ok(Self::new(key, value))
    }

    pub fn is_blank(&self) -> bool {
        self.key.trim().is_empty()
    }
}

/// A submission that passed validation and is ready for the payload builder.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidSubmission {
    /// Trimmed, non-empty.
    pub message: String,
    /// Trimmed, or [`DEFAULT_SOURCE`].
    pub source: String,
    pub attributes: Attributes,
    pub score: Option<u8>,
}

/// The submission form.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionForm {
    message: String,
    source: String,
    score: Option<u8>,
    rows: Vec<AttributeRow>,
}

impl Default for SubmissionForm {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmissionForm {
    /// Empty form with [`INITIAL_ATTRIBUTE_ROWS`] blank attribute rows.
    pub fn new() -> Self {
        Self {
            message: String::new(),
            source: String::new(),
            score: None,
            rows: vec![AttributeRow::default(); INITIAL_ATTRIBUTE_ROWS],
        }
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }

    pub fn set_source(&mut self, source: impl Into<String>) {
        self.source = source.into();
    }

    pub fn set_score(&mut self, score: Option<u8>) {
        self.score = score;
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn score(&self) -> Option<u8> {
        self.score
    }

    pub fn rows(&self) -> &[AttributeRow] {
        &self.rows
    }

    /// Append a blank row and return its index.
    pub fn add_row(&mut self) -> usize {
        self.rows.push(AttributeRow::default());
        self.rows.len() - 1
    }

    /// Fill the first blank row, or append one if none is left.
    pub fn push_row(&mut self, row: AttributeRow) {
        match self
            .rows
            .iter_mut()
            .find(|r| r.key.is_empty() && r.value.is_empty())
        {
            Some(slot) => *slot = row,
            None => self.rows.push(row),
        }
    }

    pub fn set_row(&mut self, index: usize, row: AttributeRow) -> Result<(), FormError> {
        let len = self.rows.len();
        let slot = self
            .rows
            .get_mut(index)
            .ok_or(FormError::NoSuchRow { index, len })?;
        *slot = row;
        Ok(())
    }

    pub fn remove_row(&mut self, index: usize) -> Result<AttributeRow, FormError> {
        if index >= self.rows.len() {
            return Err(FormError::NoSuchRow {
                index,
                len: self.rows.len(),
            });
        }
        Ok(self.rows.remove(index))
    }

    /// Trimmed source, falling back to [`DEFAULT_SOURCE`] when blank.
    pub fn source_or_default(&self) -> String {
        let trimmed = self.source.trim();
        if trimmed.is_empty() {
            DEFAULT_SOURCE.to_string()
        } else {
            trimmed.to_string()
        }
    }

    /// Collect attribute rows: keys trimmed, blank keys dropped, values kept
    /// as typed. A repeated key overwrites the earlier value in place.
    pub fn attributes(&self) -> Attributes {
        let mut attributes = Attributes::new();
        for row in self.rows.iter().filter(|r| !r.is_blank()) {
            attributes.insert(row.key.trim().to_string(), row.value.clone());
        }
        attributes
    }

    pub fn validate(&self) -> Result<ValidSubmission, FormError> {
        let message = self.message.trim();
        if message.is_empty() {
            return Err(FormError::MessageRequired);
        }
        if let Some(score) = self.score {
            if !(1..=SCORE_SCALE).contains(&score) {
                return Err(FormError::ScoreOutOfRange(score));
            }
        }
        Ok(ValidSubmission {
            message: message.to_string(),
            source: self.source_or_default(),
            attributes: self.attributes(),
            score: self.score,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_form_has_three_blank_rows() {
        let form = SubmissionForm::new();
        assert_eq!(form.rows().len(), 3);
        assert!(form.rows().iter().all(AttributeRow::is_blank));
        assert!(form.attributes().is_empty());
    }

    #[test]
    fn empty_message_is_rejected() {
        let mut form = SubmissionForm::new();
        assert_eq!(form.validate(), Err(FormError::MessageRequired));
        form.set_message("   \n\t ");
        assert_eq!(form.validate(), Err(FormError::MessageRequired));
        assert_eq!(FormError::MessageRequired.to_string(), "Message is required.");
    }

    #[test]
    fn message_is_trimmed() {
        let mut form = SubmissionForm::new();
        form.set_message("  Great service \n");
        assert_eq!(form.validate().unwrap().message, "Great service");
    }

    #[test]
    fn blank_source_defaults() {
        let mut form = SubmissionForm::new();
        form.set_message("hi");
        assert_eq!(form.validate().unwrap().source, "Demo Data");
        form.set_source("    ");
        assert_eq!(form.validate().unwrap().source, "Demo Data");
        form.set_source("  Play Store ");
        assert_eq!(form.validate().unwrap().source, "Play Store");
    }

    #[test]
    fn blank_keys_never_reach_attributes() {
        let mut form = SubmissionForm::new();
        form.set_message("hi");
        form.set_row(0, AttributeRow::new("   ", "ignored")).unwrap();
        form.set_row(1, AttributeRow::new(" platform ", " iOS")).unwrap();
        form.add_row();
        form.add_row();
        form.set_row(4, AttributeRow::new("", "also ignored")).unwrap();

        let attrs = form.validate().unwrap().attributes;
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs.get("platform").map(String::as_str), Some(" iOS"));
    }

    #[test]
    fn repeated_key_keeps_first_position_last_value() {
        let mut form = SubmissionForm::new();
        form.push_row(AttributeRow::new("a", "1"));
        form.push_row(AttributeRow::new("b", "2"));
        form.push_row(AttributeRow::new("a", "3"));
        let attrs = form.attributes();
        let pairs: Vec<(&str, &str)> = attrs.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        assert_eq!(pairs, vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn push_row_fills_blanks_then_appends() {
        let mut form = SubmissionForm::new();
        for i in 0..5 {
            form.push_row(AttributeRow::new(format!("k{i}"), "v"));
        }
        assert_eq!(form.rows().len(), 5);
        assert_eq!(form.attributes().len(), 5);
    }

    #[test]
    fn remove_row_bounds() {
        let mut form = SubmissionForm::new();
        form.set_row(2, AttributeRow::new("x", "y")).unwrap();
        assert_eq!(form.remove_row(2).unwrap(), AttributeRow::new("x", "y"));
        assert_eq!(form.rows().len(), 2);
        assert_eq!(
            form.remove_row(7),
            Err(FormError::NoSuchRow { index: 7, len: 2 })
        );
    }

    #[test]
    fn score_range_enforced() {
        let mut form = SubmissionForm::new();
        form.set_message("hi");
        form.set_score(Some(0));
        assert_eq!(form.validate(), Err(FormError::ScoreOutOfRange(0)));
        form.set_score(Some(6));
        assert_eq!(form.validate(), Err(FormError::ScoreOutOfRange(6)));
        form.set_score(Some(5));
        assert_eq!(form.validate().unwrap().score, Some(5));
        form.set_score(None);
        assert_eq!(form.validate().unwrap().score, None);
    }

    #[test]
    fn parse_attribute_rows() {
        assert_eq!(
            AttributeRow::parse("platform=iOS").unwrap(),
            AttributeRow::new("platform", "iOS")
        );
        assert_eq!(
            AttributeRow::parse("query=a=b").unwrap(),
            AttributeRow::new("query", "a=b")
        );
        assert_eq!(AttributeRow::parse("empty=").unwrap(), AttributeRow::new("empty", ""));
        assert!(matches!(
            AttributeRow::parse("no-separator"),
            Err(FormError::MalformedAttribute(_))
        ));
    }
}
