//! Templated replies keyed by email category

use crate::config::ReplyConfig;
use crate::error::{ResponderError, Result};
use crate::models::{Category, Label};

/// Builds deterministic replies from fixed per-category templates
#[derive(Debug, Clone)]
pub struct ReplyGenerator {
    signature: String,
    excerpt_words: usize,
}

impl ReplyGenerator {
    pub fn new(config: &ReplyConfig) -> Self {
        Self {
            signature: config.signature.clone(),
            excerpt_words: config.excerpt_words,
        }
    }

    /// Reply for a category given by its label string
    pub fn generate_reply(&self, email_text: &str, category: &str) -> Result<String> {
        let category = Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == category)
            .ok_or_else(|| ResponderError::UnknownCategory(category.to_string()))?;
        Ok(self.reply(email_text, category))
    }

    /// Reply for a typed category
    pub fn reply(&self, email_text: &str, category: Category) -> String {
        let excerpt = self.excerpt(email_text);

        let (greeting, opening, body) = match category {
            Category::StudentInquiries => (
                "Dear Student,",
                format!("Thank you for reaching out to us about \"{}\".", excerpt),
                "Your question has been logged with the student services office. \
                 Information on admissions, deadlines and course requirements is \
                 available in the prospectus, and an advisor will get back to you \
                 within three working days if anything is left unanswered.",
            ),
            Category::AcademicCollaboration => (
                "Dear Colleague,",
                format!(
                    "Thank you for your interest in collaborating with us on \"{}\".",
                    excerpt
                ),
                "We have shared your message with the relevant research group. \
                 A faculty member will contact you to discuss the scope of the \
                 collaboration and possible next steps.",
            ),
            Category::CorporateInquiries => (
                "Dear Partner,",
                format!("Thank you for contacting us regarding \"{}\".", excerpt),
                "Your inquiry has been forwarded to our corporate relations team, \
                 who handle partnerships, sponsorships and industry engagement. \
                 They will be in touch shortly to arrange a follow-up.",
            ),
        };

        format!(
            "{}\n\n{}\n\n{}\n\nBest regards,\n{}",
            greeting, opening, body, self.signature
        )
    }

    /// First words of the email, whitespace collapsed
    fn excerpt(&self, email_text: &str) -> String {
        let words: Vec<&str> = email_text.split_whitespace().collect();
        if words.is_empty() {
            return "your message".to_string();
        }

        let mut excerpt = words
            .iter()
            .take(self.excerpt_words)
            .copied()
            .collect::<Vec<_>>()
            .join(" ");
        if words.len() > self.excerpt_words {
            excerpt.push_str("...");
        }
        excerpt
    }
}

impl Default for ReplyGenerator {
    fn default() -> Self {
        Self::new(&ReplyConfig::default())
    }
}
