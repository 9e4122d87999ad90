//! Email classification with the bundled text models
//!
//! Two model families implement the same [`Classifier`] contract:
//! - **pretrained**: one single-head model per task, each with its own
//!   tokenizer and label encoder
//! - **custom**: one shared encoder and vocabulary with a category head and a
//!   sensitivity head

use crate::error::{ResponderError, Result};
use crate::models::{
    join_text, Category, Classification, Email, Label, ModelFamily, Prediction, Sensitivity,
};
use crate::nn::{self, Dense, Embedding};
use crate::vocab::{LabelEncoder, Tokenizer, WordIndex};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Anything that can turn an email into a category and a sensitivity label
#[cfg_attr(test, mockall::automock)]
pub trait Classifier: Send + Sync {
    fn family(&self) -> ModelFamily;

    fn classify(&self, email: &Email) -> Result<Classification>;
}

/// Single-head text classifier: mean-pooled embeddings into a dense layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextModel {
    pub embedding: Embedding,
    pub dense: Dense,
}

impl TextModel {
    pub fn logits(&self, ids: &[usize]) -> Result<Vec<f32>> {
        let pooled = pool(&self.embedding, ids)?;
        Ok(self.dense.forward(&pooled))
    }
}

/// Shared encoder with one output head per task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiHeadModel {
    pub embedding: Embedding,
    pub hidden: Dense,
    pub category_head: Dense,
    pub email_type_head: Dense,
}

impl MultiHeadModel {
    /// Returns the category and email-type logits
    pub fn logits(&self, ids: &[usize]) -> Result<(Vec<f32>, Vec<f32>)> {
        let pooled = pool(&self.embedding, ids)?;
        let mut hidden = self.hidden.forward(&pooled);
        nn::relu(&mut hidden);
        Ok((
            self.category_head.forward(&hidden),
            self.email_type_head.forward(&hidden),
        ))
    }
}

fn pool(embedding: &Embedding, ids: &[usize]) -> Result<Vec<f32>> {
    if ids.is_empty() {
        return Err(ResponderError::InferenceError(
            "text contains no words known to the model".to_string(),
        ));
    }
    embedding.mean_pool(ids).ok_or_else(|| {
        ResponderError::InferenceError(format!(
            "token id outside embedding table of {} rows",
            embedding.rows()
        ))
    })
}

/// Softmax the logits, pick the best index and decode it into a typed label
fn decode_head<L: Label>(logits: &[f32], labels: &LabelEncoder) -> Result<Prediction<L>> {
    let probs = nn::softmax(logits);
    if probs.iter().any(|p| !p.is_finite()) {
        return Err(ResponderError::InferenceError(format!(
            "{} head produced non-finite probabilities",
            L::KIND
        )));
    }

    let (index, confidence) = nn::argmax(&probs).ok_or_else(|| {
        ResponderError::InferenceError(format!("{} head produced no outputs", L::KIND))
    })?;

    let label = labels.decode::<L>(index)?;
    Ok(Prediction { label, confidence })
}

/// One pretrained task: model, tokenizer and label encoder
#[derive(Debug, Clone)]
pub struct PretrainedTask {
    pub model: TextModel,
    pub tokenizer: Tokenizer,
    pub labels: LabelEncoder,
}

/// Classify subject and body into a single label with one pretrained task
pub fn classify_label<L: Label>(
    subject: &str,
    body: &str,
    task: &PretrainedTask,
) -> Result<Prediction<L>> {
    let ids = task.tokenizer.encode(&join_text(subject, body));
    let logits = task.model.logits(&ids)?;
    let prediction = decode_head::<L>(&logits, &task.labels)?;

    debug!(
        "{} prediction: {:?} ({:.3}) from {} tokens",
        L::KIND,
        prediction.label,
        prediction.confidence,
        ids.len()
    );
    Ok(prediction)
}

/// Pretrained family: separate models for category and sensitivity
#[derive(Debug, Clone)]
pub struct PretrainedClassifier {
    pub category: PretrainedTask,
    pub sensitivity: PretrainedTask,
}

impl Classifier for PretrainedClassifier {
    fn family(&self) -> ModelFamily {
        ModelFamily::Pretrained
    }

    fn classify(&self, email: &Email) -> Result<Classification> {
        let category = classify_label::<Category>(email.subject(), email.body(), &self.category)?;
        let sensitivity =
            classify_label::<Sensitivity>(email.subject(), email.body(), &self.sensitivity)?;

        Ok(Classification::from_predictions(
            ModelFamily::Pretrained,
            category,
            sensitivity,
        ))
    }
}

/// Custom family: one vocabulary and encoder shared by both heads
#[derive(Debug, Clone)]
pub struct CustomClassifier {
    pub model: MultiHeadModel,
    pub word_to_idx: WordIndex,
    pub category_labels: LabelEncoder,
    pub email_type_labels: LabelEncoder,
}

impl Classifier for CustomClassifier {
    fn family(&self) -> ModelFamily {
        ModelFamily::Custom
    }

    fn classify(&self, email: &Email) -> Result<Classification> {
        let ids = self.word_to_idx.encode(&email.text());
        let (category_logits, email_type_logits) = self.model.logits(&ids)?;

        let category = decode_head::<Category>(&category_logits, &self.category_labels)?;
        let sensitivity = decode_head::<Sensitivity>(&email_type_logits, &self.email_type_labels)?;

        debug!(
            "custom prediction: {:?} ({:.3}), {:?} ({:.3}) from {} tokens",
            category.label,
            category.confidence,
            sensitivity.label,
            sensitivity.confidence,
            ids.len()
        );

        Ok(Classification::from_predictions(
            ModelFamily::Custom,
            category,
            sensitivity,
        ))
    }
}
