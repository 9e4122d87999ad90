//! Interactive prompt loop for handling emails one at a time
//!
//! Each round collects a subject and a body, runs the selected classifier and
//! shows either the drafted reply or the escalation notice.

use crate::cli;
use crate::error::Result;
use crate::loader::ModelBundle;
use crate::models::ModelFamily;
use crate::responder::Responder;
use crossterm::style::Stylize;
use inquire::validator::Validation;
use inquire::{Confirm, CustomUserError, InquireError, Select, Text};
use std::sync::Arc;
use tracing::info;

/// Reject blank answers before they ever reach the classifier
fn non_empty(
    field: &'static str,
) -> impl Fn(&str) -> std::result::Result<Validation, CustomUserError> + Clone {
    move |input: &str| {
        if input.trim().is_empty() {
            Ok(Validation::Invalid(
                format!("The {} cannot be empty", field).into(),
            ))
        } else {
            Ok(Validation::Valid)
        }
    }
}

/// Prompt-driven session over the loaded models
pub struct ChatSession {
    models: Arc<ModelBundle>,
    responder: Responder,
    family: Option<ModelFamily>,
    handled: usize,
    escalated: usize,
}

impl ChatSession {
    pub fn new(models: Arc<ModelBundle>, responder: Responder, family: Option<ModelFamily>) -> Self {
        Self {
            models,
            responder,
            family,
            handled: 0,
            escalated: 0,
        }
    }

    /// Run until the operator declines a new email or cancels a prompt
    pub fn run(&mut self) -> Result<()> {
        println!("{}", "Email Classifier".bold());
        println!("Press Esc or Ctrl+C at any prompt to quit.\n");

        let family = match self.family {
            Some(family) => family,
            None => match prompt_family()? {
                Some(family) => family,
                None => return Ok(()),
            },
        };
        info!("Interactive session using {} model", family);

        while self.round(family)? {}

        println!(
            "Handled {} email(s), {} escalated.",
            self.handled, self.escalated
        );
        Ok(())
    }

    /// One email; returns whether to continue with another
    fn round(&mut self, family: ModelFamily) -> Result<bool> {
        let subject = match ask(Text::new("Subject:").with_validator(non_empty("subject")))? {
            Some(subject) => subject,
            None => return Ok(false),
        };
        let body = match ask(Text::new("Body:").with_validator(non_empty("body")))? {
            Some(body) => body,
            None => return Ok(false),
        };

        let classifier = self.models.classifier(family);
        match self.responder.respond(classifier, &subject, &body) {
            Ok(outcome) => {
                self.handled += 1;
                if outcome.is_escalated() {
                    self.escalated += 1;
                }
                cli::print_outcome(&outcome);
            }
            // The failed email is dropped; the operator decides whether to go on
            Err(e) if !e.is_fatal() => {
                println!("{} {}\n", "Could not handle this email:".red().bold(), e);
            }
            Err(e) => return Err(e),
        }

        match Confirm::new("Start a new email?").with_default(true).prompt() {
            Ok(again) => Ok(again),
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

fn prompt_family() -> Result<Option<ModelFamily>> {
    let options = vec![ModelFamily::Custom, ModelFamily::Pretrained];
    match Select::new("Model family:", options).prompt() {
        Ok(family) => Ok(Some(family)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Run a text prompt; `None` means the operator cancelled
fn ask(prompt: Text<'_>) -> Result<Option<String>> {
    match prompt.prompt() {
        Ok(answer) => Ok(Some(answer)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
