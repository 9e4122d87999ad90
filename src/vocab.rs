//! Text preprocessing: word tokenization, vocabulary lookup and label decoding

use crate::error::{ResponderError, Result};
use crate::models::Label;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Punctuation stripped before splitting into words (apostrophes are kept)
static FILTERED_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r##"[!"#$%&()*+,\-./:;<=>?@\[\\\]^_`{|}~\t\n\r]"##).unwrap());

/// Split text into words the way the trained tokenizers expect
pub fn words(text: &str, lower: bool) -> Vec<String> {
    let text = if lower {
        text.to_lowercase()
    } else {
        text.to_string()
    };

    FILTERED_CHARS
        .replace_all(&text, " ")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Word-index tokenizer shipped with each pretrained model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tokenizer {
    word_index: HashMap<String, usize>,
    /// Only words ranked below this index are kept (others become OOV)
    #[serde(default)]
    num_words: Option<usize>,
    #[serde(default)]
    oov_token: Option<String>,
    #[serde(default = "default_max_len")]
    max_len: usize,
    #[serde(default = "default_lower")]
    lower: bool,
}

fn default_max_len() -> usize {
    100
}

fn default_lower() -> bool {
    true
}

impl Tokenizer {
    /// Convert text into a sequence of word indices.
    ///
    /// Unknown words map to the OOV index when the tokenizer has one and are
    /// dropped otherwise. Long sequences keep their last `max_len` tokens.
    pub fn encode(&self, text: &str) -> Vec<usize> {
        let oov_index = self.oov_index();

        let mut sequence: Vec<usize> = words(text, self.lower)
            .iter()
            .filter_map(|word| match self.word_index.get(word) {
                Some(&idx) if self.num_words.map_or(true, |n| idx < n) => Some(idx),
                _ => oov_index,
            })
            .collect();

        if sequence.len() > self.max_len {
            sequence.drain(..sequence.len() - self.max_len);
        }

        sequence
    }

    fn oov_index(&self) -> Option<usize> {
        self.oov_token
            .as_ref()
            .and_then(|token| self.word_index.get(token))
            .copied()
    }

    /// Largest index this tokenizer can emit
    pub fn max_index(&self) -> usize {
        let max = self.word_index.values().copied().max().unwrap_or(0);
        match self.num_words {
            Some(n) => max.min(n.saturating_sub(1)).max(self.oov_index().unwrap_or(0)),
            None => max,
        }
    }

    pub fn vocab_size(&self) -> usize {
        self.word_index.len()
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }
}

/// Plain word-to-index mapping used by the custom model family
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordIndex(HashMap<String, usize>);

impl WordIndex {
    /// Lowercase, split and look up every word; unknown words are dropped
    pub fn encode(&self, text: &str) -> Vec<usize> {
        words(text, true)
            .iter()
            .filter_map(|word| self.0.get(word).copied())
            .collect()
    }

    pub fn max_index(&self) -> usize {
        self.0.values().copied().max().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Maps a model output index back to its label string
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn new(classes: Vec<String>) -> Self {
        Self { classes }
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Decode an output index into a typed label
    pub fn decode<L: Label>(&self, index: usize) -> Result<L> {
        let label = self.classes.get(index).ok_or_else(|| {
            ResponderError::InferenceError(format!(
                "{} index {} out of range for {} classes",
                L::KIND,
                index,
                self.classes.len()
            ))
        })?;
        L::parse(label)
    }

    /// Check that every class string belongs to the label set
    pub fn check<L: Label>(&self) -> Result<()> {
        for class in &self.classes {
            L::parse(class)?;
        }
        Ok(())
    }
}
