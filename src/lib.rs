//! Email Classification Responder
//!
//! Classifies an incoming email into a category and a sensitivity class with
//! locally stored text models, then drafts a templated reply or escalates the
//! email to a human reviewer.
//!
//! # Example Usage
//!
//! ```no_run
//! use email_responder::{config::Config, loader, responder::Responder, ModelFamily, Outcome};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml".as_ref()).await?;
//!     let models = loader::load_models(&config.models.dir).await?;
//!     let responder = Responder::new(&config);
//!
//!     let outcome = responder.respond(
//!         models.classifier(ModelFamily::Pretrained),
//!         "Admission question",
//!         "What are the deadlines?",
//!     )?;
//!
//!     if let Outcome::Replied { reply, .. } = outcome {
//!         println!("{}", reply);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`classifier`] - Classifier trait and the pretrained/custom implementations
//! - [`cli`] - Command-line interface and terminal rendering
//! - [`config`] - Configuration management
//! - [`error`] - Error types and result aliases
//! - [`interactive`] - Prompt loop for one email at a time
//! - [`loader`] - Startup loading of model artifacts
//! - [`models`] - Core data structures and label sets
//! - [`nn`] - Forward-pass layers
//! - [`reply`] - Templated reply generation
//! - [`responder`] - Validate, classify, escalate or reply
//! - [`vocab`] - Tokenizers and label encoders

pub mod classifier;
pub mod cli;
pub mod config;
pub mod error;
pub mod interactive;
pub mod loader;
pub mod models;
pub mod nn;
pub mod reply;
pub mod responder;
pub mod vocab;

// Re-export commonly used types for convenience
pub use error::{ResponderError, Result};

// Core data models
pub use models::{
    Category, Classification, Email, EscalationNotice, Label, ModelFamily, Outcome, Prediction,
    Sensitivity,
};

// Classifier types
pub use classifier::{classify_label, Classifier, CustomClassifier, PretrainedClassifier};

// Loader types
pub use loader::{load_models, ModelBundle};

// Config types
pub use config::{Config, EscalationConfig, ModelConfig, ReplyConfig};

// Response flow
pub use reply::ReplyGenerator;
pub use responder::Responder;

// CLI types (for binary usage)
pub use cli::{Cli, Commands};
pub use interactive::ChatSession;
