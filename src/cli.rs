//! Command-line interface and terminal rendering

use crate::error::Result;
use crate::loader::{self, ModelBundle};
use crate::models::{Category, Label, ModelFamily, Outcome, Sensitivity};
use clap::{Parser, Subcommand};
use crossterm::style::{Color, Stylize};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "email-responder")]
#[command(version)]
#[command(about = "Classify incoming emails and draft a reply or escalate", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Directory holding the model artifacts (overrides models.dir)
    #[arg(long)]
    pub model_dir: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Prompt for emails one at a time and respond to each
    Interactive {
        /// Model family to use (asked for when omitted)
        #[arg(short, long, value_enum)]
        model: Option<ModelFamily>,
    },

    /// Classify a single email and print the outcome
    Classify {
        /// Email subject
        #[arg(short, long)]
        subject: String,

        /// Email body
        #[arg(short, long)]
        body: String,

        /// Model family to use (defaults to models.default_family)
        #[arg(short, long, value_enum)]
        model: Option<ModelFamily>,

        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the loaded models and their label sets
    Models,

    /// Generate example configuration file
    InitConfig {
        /// Path to create config file
        #[arg(short, long, default_value = "config.toml")]
        output: PathBuf,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },
}

/// Load all models behind a spinner; failure here is fatal
pub async fn load_bundle(dir: &Path) -> Result<Arc<ModelBundle>> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed:>6}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "),
    );
    spinner.set_message(format!("Loading models from {}", dir.display()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = loader::load_models(dir).await;
    spinner.finish_and_clear();

    let bundle = result?;
    eprintln!("  ✓ Models loaded from {}", dir.display());
    Ok(Arc::new(bundle))
}

/// Tag colors for category labels
pub fn category_color(category: Category) -> Color {
    match category {
        Category::StudentInquiries => Color::Rgb { r: 76, g: 175, b: 80 },
        Category::AcademicCollaboration => Color::Rgb { r: 33, g: 150, b: 243 },
        Category::CorporateInquiries => Color::Rgb { r: 255, g: 152, b: 0 },
    }
}

/// Tag colors for sensitivity labels
pub fn sensitivity_color(sensitivity: Sensitivity) -> Color {
    match sensitivity {
        Sensitivity::SensitiveEmail => Color::Rgb { r: 244, g: 67, b: 54 },
        Sensitivity::GeneralInformation => Color::Rgb { r: 156, g: 39, b: 176 },
        Sensitivity::ResearchQuery => Color::Rgb { r: 63, g: 81, b: 181 },
    }
}

fn tag(label: &str, color: Color) -> String {
    format!(" {} ", label)
        .with(Color::White)
        .on(color)
        .bold()
        .to_string()
}

/// Print the classification tags followed by the reply or escalation notice
pub fn print_outcome(outcome: &Outcome) {
    let classification = outcome.classification();

    println!();
    println!("{}", "Email Category (Type)".bold());
    println!(
        "  {}  {:.0}%",
        tag(
            classification.category.as_str(),
            category_color(classification.category)
        ),
        classification.category_confidence * 100.0
    );
    println!("{}", "Email Class (Sensitivity)".bold());
    println!(
        "  {}  {:.0}%",
        tag(
            classification.sensitivity.as_str(),
            sensitivity_color(classification.sensitivity)
        ),
        classification.sensitivity_confidence * 100.0
    );
    println!();

    match outcome {
        Outcome::Escalated { notice, .. } => {
            println!("{}", notice.message.as_str().red().bold());
            println!("  Ticket:    {}", notice.ticket_id);
            println!("  Recipient: {}", notice.recipient);
            println!("  Raised at: {}", notice.created_at.format("%Y-%m-%d %H:%M:%S UTC"));
        }
        Outcome::Replied { reply, .. } => {
            println!("{}", "Response Email".bold().underlined());
            println!();
            println!("{}", reply);
        }
    }
    println!();
}

/// Print a short table of the loaded models
pub fn print_models(bundle: &ModelBundle) {
    println!("{}", "Loaded models".bold());
    for summary in bundle.summary() {
        println!(
            "  {:<11} {:<12} vocab={:<6} dim={:<4} labels=[{}]",
            summary.family.as_str(),
            summary.task,
            summary.vocab_size,
            summary.embedding_dim,
            summary.labels.join(", ")
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_classify() {
        let cli = Cli::try_parse_from([
            "email-responder",
            "--model-dir",
            "/srv/models",
            "classify",
            "--subject",
            "Admission question",
            "--body",
            "What are the deadlines?",
            "--model",
            "custom",
            "--json",
        ])
        .unwrap();

        assert_eq!(cli.model_dir, Some(PathBuf::from("/srv/models")));
        match cli.command {
            Commands::Classify {
                subject,
                model,
                json,
                ..
            } => {
                assert_eq!(subject, "Admission question");
                assert_eq!(model, Some(ModelFamily::Custom));
                assert!(json);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_family() {
        let result = Cli::try_parse_from(["email-responder", "interactive", "--model", "bert"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["email-responder", "models"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("config.toml"));
        assert!(cli.model_dir.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_every_label_has_a_distinct_color() {
        let mut colors: Vec<Color> = Category::ALL.iter().map(|c| category_color(*c)).collect();
        colors.extend(Sensitivity::ALL.iter().map(|s| sensitivity_color(*s)));

        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
