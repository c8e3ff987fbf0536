//! Validator thresholds and deductions.

use serde::{Deserialize, Serialize};

/// Tunable rubric for [`ProseValidator`](crate::ProseValidator).
///
/// Every field has a default, so a partial `[validator]` table is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Minimum score for prose to be valid
    pub pass_score: u32,
    /// More issues than this forces regeneration
    pub max_issues: usize,
    /// Deduction for a clichéd opening
    pub opening_penalty: u32,
    /// Highest acceptable average sentences per paragraph
    pub max_average_sentences: f64,
    /// Deduction when the average is exceeded
    pub average_sentences_penalty: u32,
    /// Largest acceptable paragraph, in sentences
    pub max_paragraph_sentences: usize,
    /// Deduction when any paragraph is larger
    pub oversized_paragraph_penalty: u32,
    /// Characters of text expected per paragraph break
    pub chars_per_break: usize,
    /// Deduction for too few paragraph breaks
    pub density_penalty: u32,
    /// Synopsis sub-score above which the text is rejected
    pub synopsis_issue_threshold: u32,
    /// Deduction above the issue threshold
    pub synopsis_issue_penalty: u32,
    /// Synopsis sub-score above which a warning is raised
    pub synopsis_warning_threshold: u32,
    /// Deduction above the warning threshold
    pub synopsis_warning_penalty: u32,
    /// Paragraphs longer than this read as summary
    pub long_paragraph_chars: usize,
    /// Sensory hits per 100 words the text must exceed
    pub sensory_threshold: f64,
    /// Deduction for missing sensory detail
    pub sensory_penalty: u32,
    /// Interiority hits per 100 words the text must exceed
    pub interiority_threshold: f64,
    /// Deduction for missing interiority
    pub interiority_penalty: u32,
    /// Movement hits per 100 words the text must exceed
    pub movement_threshold: f64,
    /// Deduction for missing movement
    pub movement_penalty: u32,
    /// Exposition matches tolerated
    pub max_exposition_matches: usize,
    /// Deduction above that
    pub exposition_penalty: u32,
    /// Additional leakage regexes, case-insensitive
    pub extra_leakage_patterns: Vec<String>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            pass_score: 60,
            max_issues: 3,
            opening_penalty: 30,
            max_average_sentences: 4.0,
            average_sentences_penalty: 20,
            max_paragraph_sentences: 8,
            oversized_paragraph_penalty: 15,
            chars_per_break: 500,
            density_penalty: 10,
            synopsis_issue_threshold: 30,
            synopsis_issue_penalty: 20,
            synopsis_warning_threshold: 15,
            synopsis_warning_penalty: 10,
            long_paragraph_chars: 800,
            sensory_threshold: 1.0,
            sensory_penalty: 15,
            interiority_threshold: 0.5,
            interiority_penalty: 5,
            movement_threshold: 1.0,
            movement_penalty: 10,
            max_exposition_matches: 10,
            exposition_penalty: 15,
            extra_leakage_patterns: Vec::new(),
        }
    }
}
