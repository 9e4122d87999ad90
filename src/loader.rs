//! Startup loading of the persisted model artifacts
//!
//! Expected layout under the model directory:
//!
//! ```text
//! pretrained/category/{model,tokenizer,labels}.json
//! pretrained/sensitivity/{model,tokenizer,labels}.json
//! custom/{model,word_to_idx,category_labels,email_type_labels}.json
//! ```

use crate::classifier::{
    Classifier, CustomClassifier, MultiHeadModel, PretrainedClassifier, PretrainedTask, TextModel,
};
use crate::error::{ResponderError, Result};
use crate::models::{Category, Label, ModelFamily, Sensitivity};
use crate::nn::{Dense, Embedding};
use crate::vocab::{LabelEncoder, Tokenizer, WordIndex};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Both model families, loaded once and shared read-only afterwards
#[derive(Debug, Clone)]
pub struct ModelBundle {
    pub pretrained: PretrainedClassifier,
    pub custom: CustomClassifier,
}

impl ModelBundle {
    /// Select the classifier implementation for a model family
    pub fn classifier(&self, family: ModelFamily) -> &dyn Classifier {
        match family {
            ModelFamily::Pretrained => &self.pretrained,
            ModelFamily::Custom => &self.custom,
        }
    }

    pub fn summary(&self) -> Vec<ModelSummary> {
        let pretrained = &self.pretrained;
        let custom = &self.custom;
        vec![
            ModelSummary {
                family: ModelFamily::Pretrained,
                task: Category::KIND,
                vocab_size: pretrained.category.tokenizer.vocab_size(),
                embedding_dim: pretrained.category.model.embedding.dim(),
                labels: pretrained.category.labels.classes().to_vec(),
            },
            ModelSummary {
                family: ModelFamily::Pretrained,
                task: Sensitivity::KIND,
                vocab_size: pretrained.sensitivity.tokenizer.vocab_size(),
                embedding_dim: pretrained.sensitivity.model.embedding.dim(),
                labels: pretrained.sensitivity.labels.classes().to_vec(),
            },
            ModelSummary {
                family: ModelFamily::Custom,
                task: Category::KIND,
                vocab_size: custom.word_to_idx.len(),
                embedding_dim: custom.model.embedding.dim(),
                labels: custom.category_labels.classes().to_vec(),
            },
            ModelSummary {
                family: ModelFamily::Custom,
                task: Sensitivity::KIND,
                vocab_size: custom.word_to_idx.len(),
                embedding_dim: custom.model.embedding.dim(),
                labels: custom.email_type_labels.classes().to_vec(),
            },
        ]
    }
}

/// Short description of one loaded classifier head
#[derive(Debug, Clone)]
pub struct ModelSummary {
    pub family: ModelFamily,
    pub task: &'static str,
    pub vocab_size: usize,
    pub embedding_dim: usize,
    pub labels: Vec<String>,
}

/// Load every model family from `dir`
pub async fn load_models(dir: &Path) -> Result<ModelBundle> {
    let started = Instant::now();
    info!("Loading models from {:?}", dir);

    let (pretrained, custom) = tokio::try_join!(load_pretrained(dir), load_custom(dir))?;

    info!("Loaded models in {:?}", started.elapsed());
    Ok(ModelBundle { pretrained, custom })
}

/// Load the pretrained family (one model per task)
pub async fn load_pretrained(dir: &Path) -> Result<PretrainedClassifier> {
    let root = dir.join("pretrained");
    let (category, sensitivity) = tokio::try_join!(
        load_task::<Category>(root.join("category")),
        load_task::<Sensitivity>(root.join("sensitivity")),
    )?;

    info!(
        "Loaded pretrained models (vocabularies: {} / {})",
        category.tokenizer.vocab_size(),
        sensitivity.tokenizer.vocab_size()
    );
    Ok(PretrainedClassifier {
        category,
        sensitivity,
    })
}

async fn load_task<L: Label>(dir: PathBuf) -> Result<PretrainedTask> {
    let model_path = dir.join("model.json");
    let tokenizer_path = dir.join("tokenizer.json");
    let labels_path = dir.join("labels.json");

    let (model, tokenizer, labels) = tokio::try_join!(
        read_json::<TextModel>(&model_path),
        read_json::<Tokenizer>(&tokenizer_path),
        read_json::<LabelEncoder>(&labels_path),
    )?;

    check_labels::<L>(&labels, &labels_path)?;
    check_embedding(&model.embedding, tokenizer.max_index(), &model_path)?;
    check_head(&model.dense, model.embedding.dim(), &labels, &model_path)?;

    debug!("Loaded {} task from {:?}", L::KIND, dir);
    Ok(PretrainedTask {
        model,
        tokenizer,
        labels,
    })
}

/// Load the custom family (shared encoder, two heads)
pub async fn load_custom(dir: &Path) -> Result<CustomClassifier> {
    let root = dir.join("custom");
    let model_path = root.join("model.json");
    let vocab_path = root.join("word_to_idx.json");
    let category_path = root.join("category_labels.json");
    let email_type_path = root.join("email_type_labels.json");

    let (model, word_to_idx, category_labels, email_type_labels) = tokio::try_join!(
        read_json::<MultiHeadModel>(&model_path),
        read_json::<WordIndex>(&vocab_path),
        read_json::<LabelEncoder>(&category_path),
        read_json::<LabelEncoder>(&email_type_path),
    )?;

    if word_to_idx.is_empty() {
        return Err(ResponderError::load(&vocab_path, "vocabulary is empty"));
    }
    check_labels::<Category>(&category_labels, &category_path)?;
    check_labels::<Sensitivity>(&email_type_labels, &email_type_path)?;
    check_embedding(&model.embedding, word_to_idx.max_index(), &model_path)?;

    model
        .hidden
        .check(model.embedding.dim())
        .map_err(|e| ResponderError::load(&model_path, format!("hidden layer: {}", e)))?;
    let hidden_dim = model.hidden.output_dim();
    check_head(&model.category_head, hidden_dim, &category_labels, &model_path)?;
    check_head(&model.email_type_head, hidden_dim, &email_type_labels, &model_path)?;

    info!(
        "Loaded custom model (vocabulary: {}, hidden units: {})",
        word_to_idx.len(),
        hidden_dim
    );
    Ok(CustomClassifier {
        model,
        word_to_idx,
        category_labels,
        email_type_labels,
    })
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ResponderError::load(path, e))?;
    serde_json::from_str(&content).map_err(|e| ResponderError::load(path, e))
}

fn check_labels<L: Label>(labels: &LabelEncoder, path: &Path) -> Result<()> {
    if labels.is_empty() {
        return Err(ResponderError::load(path, "label encoder has no classes"));
    }
    labels
        .check::<L>()
        .map_err(|e| ResponderError::load(path, format!("{} labels: {}", L::KIND, e)))
}

fn check_embedding(embedding: &Embedding, max_index: usize, path: &Path) -> Result<()> {
    embedding
        .check()
        .map_err(|e| ResponderError::load(path, e))?;
    if embedding.rows() <= max_index {
        return Err(ResponderError::load(
            path,
            format!(
                "embedding has {} rows but vocabulary uses index {}",
                embedding.rows(),
                max_index
            ),
        ));
    }
    Ok(())
}

fn check_head(head: &Dense, input_dim: usize, labels: &LabelEncoder, path: &Path) -> Result<()> {
    head.check(input_dim)
        .map_err(|e| ResponderError::load(path, format!("output layer: {}", e)))?;
    if head.output_dim() != labels.len() {
        return Err(ResponderError::load(
            path,
            format!(
                "output layer has {} units but label encoder has {} classes",
                head.output_dim(),
                labels.len()
            ),
        ));
    }
    Ok(())
}
