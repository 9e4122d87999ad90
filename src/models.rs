use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ResponderError, Result};

/// An incoming email as submitted by the operator
///
/// Only constructed through [`Email::new`], so subject and body are never blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawEmail")]
pub struct Email {
    subject: String,
    body: String,
}

#[derive(Deserialize)]
struct RawEmail {
    subject: String,
    body: String,
}

impl TryFrom<RawEmail> for Email {
    type Error = ResponderError;

    fn try_from(raw: RawEmail) -> Result<Self> {
        Email::new(raw.subject, raw.body)
    }
}

impl Email {
    /// Build an email, rejecting an empty subject or body
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Result<Self> {
        let subject = subject.into();
        let body = body.into();

        if subject.trim().is_empty() {
            return Err(ResponderError::InvalidInput(
                "email subject cannot be empty".to_string(),
            ));
        }
        if body.trim().is_empty() {
            return Err(ResponderError::InvalidInput(
                "email body cannot be empty".to_string(),
            ));
        }

        Ok(Self { subject, body })
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Subject and body combined for inference and reply generation
    pub fn text(&self) -> String {
        join_text(&self.subject, &self.body)
    }
}

/// The single place subject and body are joined into model input
pub fn join_text(subject: &str, body: &str) -> String {
    format!("{} {}", subject, body)
}

/// A closed set of labels a classifier head can predict
pub trait Label: Sized + Copy + fmt::Debug + PartialEq + 'static {
    /// Every member of the set, in declaration order
    const ALL: &'static [Self];

    /// Name of the label set, used in log and error messages
    const KIND: &'static str;

    /// Canonical label string as stored in the label encoders
    fn as_str(&self) -> &'static str;

    /// Strict, exact-match parse of a label string
    fn parse(label: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|l| l.as_str() == label)
            .ok_or_else(|| ResponderError::UnknownLabel(label.to_string()))
    }
}

/// Predicted purpose/audience of an email
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Category {
    #[serde(rename = "Student inquiries")]
    StudentInquiries,
    #[serde(rename = "Academic collaboration inquiries")]
    AcademicCollaboration,
    #[serde(rename = "Corporate inquiries")]
    CorporateInquiries,
}

impl Label for Category {
    const ALL: &'static [Self] = &[
        Category::StudentInquiries,
        Category::AcademicCollaboration,
        Category::CorporateInquiries,
    ];

    const KIND: &'static str = "category";

    fn as_str(&self) -> &'static str {
        match self {
            Category::StudentInquiries => "Student inquiries",
            Category::AcademicCollaboration => "Academic collaboration inquiries",
            Category::CorporateInquiries => "Corporate inquiries",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Predicted confidentiality class of an email
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Sensitivity {
    #[serde(rename = "Sensitive Email")]
    SensitiveEmail,
    #[serde(rename = "General Information")]
    GeneralInformation,
    #[serde(rename = "Research Query")]
    ResearchQuery,
}

impl Sensitivity {
    /// Sensitive emails are escalated to a human instead of answered
    pub fn is_sensitive(&self) -> bool {
        matches!(self, Sensitivity::SensitiveEmail)
    }
}

impl Label for Sensitivity {
    const ALL: &'static [Self] = &[
        Sensitivity::SensitiveEmail,
        Sensitivity::GeneralInformation,
        Sensitivity::ResearchQuery,
    ];

    const KIND: &'static str = "sensitivity";

    fn as_str(&self) -> &'static str {
        match self {
            Sensitivity::SensitiveEmail => "Sensitive Email",
            Sensitivity::GeneralInformation => "General Information",
            Sensitivity::ResearchQuery => "Research Query",
        }
    }
}

impl fmt::Display for Sensitivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which trained model family handles classification
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ModelFamily {
    #[default]
    Pretrained,
    Custom,
}

impl ModelFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelFamily::Pretrained => "pretrained",
            ModelFamily::Custom => "custom",
        }
    }
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single typed prediction with its softmax probability
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Prediction<L> {
    pub label: L,
    pub confidence: f32,
}

/// Category and sensitivity predicted for one email
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Classification {
    pub family: ModelFamily,
    pub category: Category,
    pub category_confidence: f32,
    pub sensitivity: Sensitivity,
    pub sensitivity_confidence: f32,
}

impl Classification {
    pub fn from_predictions(
        family: ModelFamily,
        category: Prediction<Category>,
        sensitivity: Prediction<Sensitivity>,
    ) -> Self {
        Self {
            family,
            category: category.label,
            category_confidence: category.confidence,
            sensitivity: sensitivity.label,
            sensitivity_confidence: sensitivity.confidence,
        }
    }
}

/// Notice raised when a sensitive email is routed to a human reviewer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscalationNotice {
    pub ticket_id: String,
    pub created_at: DateTime<Utc>,
    pub recipient: String,
    pub message: String,
    pub subject: String,
}

impl EscalationNotice {
    pub fn new(email: &Email, recipient: &str, message: &str) -> Self {
        Self {
            ticket_id: uuid::Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            recipient: recipient.to_string(),
            message: message.to_string(),
            subject: email.subject().to_string(),
        }
    }
}

/// Terminal state of handling one email
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Outcome {
    Replied {
        classification: Classification,
        reply: String,
    },
    Escalated {
        classification: Classification,
        notice: EscalationNotice,
    },
}

impl Outcome {
    pub fn classification(&self) -> &Classification {
        match self {
            Outcome::Replied { classification, .. } => classification,
            Outcome::Escalated { classification, .. } => classification,
        }
    }

    pub fn is_escalated(&self) -> bool {
        matches!(self, Outcome::Escalated { .. })
    }
}
