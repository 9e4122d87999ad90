//! Common test utilities and fixtures
//!
//! Writes a tiny but complete model directory for both families. Every word
//! embedding has six dimensions: three category topics (student, academic,
//! corporate) followed by three sensitivity topics (sensitive, general,
//! research). The output heads read those axes directly, so predictions
//! follow from the words used.

#![allow(dead_code)]

use email_responder::loader::{self, ModelBundle};
use serde_json::{json, Value};
use std::path::Path;
use tempfile::TempDir;

pub const DIM: usize = 6;

/// Known vocabulary with its topic embedding
pub const WORDS: &[(&str, [f32; DIM])] = &[
    ("admission", [1.0, 0.0, 0.0, 0.0, 1.0, 0.0]),
    ("question", [0.5, 0.0, 0.0, 0.0, 1.0, 0.0]),
    ("deadlines", [1.0, 0.0, 0.0, 0.0, 1.0, 0.0]),
    ("internship", [1.0, 0.0, 0.0, 0.0, 1.0, 0.0]),
    ("research", [0.0, 1.0, 0.0, 0.0, 0.0, 1.0]),
    ("collaboration", [0.0, 1.0, 0.0, 0.0, 0.0, 1.0]),
    ("partnership", [0.0, 0.0, 1.0, 0.0, 1.0, 0.0]),
    ("confidential", [0.0, 0.0, 1.0, 2.0, 0.0, 0.0]),
    ("salary", [0.0, 0.0, 1.0, 2.0, 0.0, 0.0]),
    ("payroll", [0.0, 0.0, 1.0, 2.0, 0.0, 0.0]),
];

fn one_hot_head(axes: &[usize]) -> Value {
    let weights: Vec<Vec<f32>> = axes
        .iter()
        .map(|&axis| {
            let mut row = vec![0.0f32; DIM];
            row[axis] = 5.0;
            row
        })
        .collect();
    json!({ "weights": weights, "bias": vec![0.0f32; axes.len()] })
}

fn write(dir: &Path, name: &str, value: &Value) {
    std::fs::create_dir_all(dir).unwrap();
    std::fs::write(dir.join(name), serde_json::to_string_pretty(value).unwrap()).unwrap();
}

/// Pretrained family: tokenizer with an OOV token and alphabetically
/// ordered label encoders
fn write_pretrained(root: &Path) {
    let mut word_index = serde_json::Map::new();
    word_index.insert("<OOV>".to_string(), json!(1));
    let mut embedding = vec![vec![0.0f32; DIM], vec![0.0f32; DIM]];
    for (i, (word, vector)) in WORDS.iter().enumerate() {
        word_index.insert(word.to_string(), json!(i + 2));
        embedding.push(vector.to_vec());
    }
    let tokenizer = json!({
        "word_index": word_index,
        "oov_token": "<OOV>",
        "max_len": 100,
        "lower": true
    });

    let category = root.join("pretrained/category");
    write(
        &category,
        "model.json",
        &json!({ "embedding": embedding, "dense": one_hot_head(&[1, 2, 0]) }),
    );
    write(&category, "tokenizer.json", &tokenizer);
    write(
        &category,
        "labels.json",
        &json!({ "classes": ["Academic collaboration inquiries", "Corporate inquiries", "Student inquiries"] }),
    );

    let sensitivity = root.join("pretrained/sensitivity");
    write(
        &sensitivity,
        "model.json",
        &json!({ "embedding": embedding, "dense": one_hot_head(&[4, 5, 3]) }),
    );
    write(&sensitivity, "tokenizer.json", &tokenizer);
    write(
        &sensitivity,
        "labels.json",
        &json!({ "classes": ["General Information", "Research Query", "Sensitive Email"] }),
    );
}

/// Custom family: plain word index without OOV and a shared hidden layer
fn write_custom(root: &Path) {
    let mut word_to_idx = serde_json::Map::new();
    let mut embedding = vec![vec![0.0f32; DIM]];
    for (i, (word, vector)) in WORDS.iter().enumerate() {
        word_to_idx.insert(word.to_string(), json!(i + 1));
        embedding.push(vector.to_vec());
    }

    let custom = root.join("custom");
    write(
        &custom,
        "model.json",
        &json!({
            "embedding": embedding,
            "hidden": one_hot_head(&[0, 1, 2, 3, 4, 5]),
            "category_head": one_hot_head(&[0, 1, 2]),
            "email_type_head": one_hot_head(&[3, 4, 5])
        }),
    );
    write(&custom, "word_to_idx.json", &Value::Object(word_to_idx));
    write(
        &custom,
        "category_labels.json",
        &json!({ "classes": ["Student inquiries", "Academic collaboration inquiries", "Corporate inquiries"] }),
    );
    write(
        &custom,
        "email_type_labels.json",
        &json!({ "classes": ["Sensitive Email", "General Information", "Research Query"] }),
    );
}

/// Create a temporary model directory holding both families
pub fn model_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_pretrained(dir.path());
    write_custom(dir.path());
    dir
}

/// Load the fixture models outside of an async context
pub fn load_fixture_models(dir: &Path) -> ModelBundle {
    tokio::runtime::Runtime::new()
        .unwrap()
        .block_on(loader::load_models(dir))
        .unwrap()
}
