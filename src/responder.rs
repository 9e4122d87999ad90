//! Per-email flow: validate, classify, then escalate or reply

use crate::classifier::Classifier;
use crate::config::{Config, EscalationConfig};
use crate::error::Result;
use crate::models::{Email, EscalationNotice, Outcome};
use crate::reply::ReplyGenerator;
use tracing::{debug, info, warn};

/// Routes a classified email to an auto-reply or a human reviewer
#[derive(Debug, Clone)]
pub struct Responder {
    replies: ReplyGenerator,
    escalation: EscalationConfig,
}

impl Responder {
    pub fn new(config: &Config) -> Self {
        Self {
            replies: ReplyGenerator::new(&config.reply),
            escalation: config.escalation.clone(),
        }
    }

    /// Handle one email start to finish.
    ///
    /// Empty input is rejected before the classifier runs. Sensitive emails
    /// stop at escalation and never reach the reply generator.
    pub fn respond(
        &self,
        classifier: &dyn Classifier,
        subject: &str,
        body: &str,
    ) -> Result<Outcome> {
        let email = Email::new(subject, body)?;
        let classification = classifier.classify(&email)?;

        info!(
            "Classified with {} model: category={}, sensitivity={}",
            classification.family, classification.category, classification.sensitivity
        );

        if classification.sensitivity.is_sensitive() {
            let notice =
                EscalationNotice::new(&email, &self.escalation.recipient, &self.escalation.message);
            warn!(
                "Escalating sensitive email to {} (ticket {})",
                notice.recipient, notice.ticket_id
            );
            return Ok(Outcome::Escalated {
                classification,
                notice,
            });
        }

        let reply = self.replies.reply(&email.text(), classification.category);
        debug!("Generated {} character reply", reply.len());

        Ok(Outcome::Replied {
            classification,
            reply,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::MockClassifier;
    use crate::error::ResponderError;
    use crate::models::{Category, Classification, ModelFamily, Sensitivity};

    fn classification(category: Category, sensitivity: Sensitivity) -> Classification {
        Classification {
            family: ModelFamily::Pretrained,
            category,
            category_confidence: 0.9,
            sensitivity,
            sensitivity_confidence: 0.9,
        }
    }

    fn responder() -> Responder {
        Responder::new(&Config::default())
    }

    #[test]
    fn test_general_email_gets_reply() {
        let mut mock = MockClassifier::new();
        mock.expect_classify().times(1).returning(|_| {
            Ok(classification(
                Category::StudentInquiries,
                Sensitivity::GeneralInformation,
            ))
        });

        let outcome = responder()
            .respond(&mock, "Admission question", "What are the deadlines?")
            .unwrap();

        match outcome {
            Outcome::Replied {
                classification,
                reply,
            } => {
                assert_eq!(classification.category, Category::StudentInquiries);
                assert!(reply.starts_with("Dear Student,"));
                assert!(reply.contains("Admission question What are the deadlines?"));
            }
            other => panic!("expected reply, got {:?}", other),
        }
    }

    #[test]
    fn test_sensitive_email_is_escalated() {
        let mut mock = MockClassifier::new();
        mock.expect_classify().times(1).returning(|_| {
            Ok(classification(
                Category::CorporateInquiries,
                Sensitivity::SensitiveEmail,
            ))
        });

        let outcome = responder()
            .respond(
                &mock,
                "Confidential salary data",
                "Please review attached payroll.",
            )
            .unwrap();

        assert!(outcome.is_escalated());
        match outcome {
            Outcome::Escalated { notice, .. } => {
                assert_eq!(notice.recipient, "Head of Department (HOD)");
                assert_eq!(notice.subject, "Confidential salary data");
                assert!(!notice.ticket_id.is_empty());
            }
            other => panic!("expected escalation, got {:?}", other),
        }
    }

    #[test]
    fn test_research_query_is_answered() {
        let mut mock = MockClassifier::new();
        mock.expect_classify().returning(|_| {
            Ok(classification(
                Category::AcademicCollaboration,
                Sensitivity::ResearchQuery,
            ))
        });

        let outcome = responder()
            .respond(&mock, "Joint paper", "Would you co-author?")
            .unwrap();
        assert!(!outcome.is_escalated());
    }

    #[test]
    fn test_empty_input_never_reaches_classifier() {
        let mut mock = MockClassifier::new();
        mock.expect_classify().times(0);

        let err = responder().respond(&mock, "", "body").unwrap_err();
        assert!(matches!(err, ResponderError::InvalidInput(_)));

        let err = responder().respond(&mock, "subject", "").unwrap_err();
        assert!(matches!(err, ResponderError::InvalidInput(_)));
    }

    #[test]
    fn test_classifier_errors_are_surfaced() {
        let mut mock = MockClassifier::new();
        mock.expect_classify()
            .times(1)
            .returning(|_| Err(ResponderError::InferenceError("no known words".to_string())));

        let err = responder().respond(&mock, "Hi", "zzz").unwrap_err();
        assert!(matches!(err, ResponderError::InferenceError(_)));
    }
}
