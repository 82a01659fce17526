use serde::{Deserialize, Serialize};

use crate::api::AdminError;

/// Body of `POST /notify`
#[derive(Debug, Serialize)]
pub struct NotifyRequest<'a> {
    pub email: &'a str,
}

impl<'a> NotifyRequest<'a> {
    pub fn new(email: &'a str) -> Result<Self, AdminError> {
        if email.trim().is_empty() {
            return Err(AdminError::Validation("Email is required".to_string()));
        }
        Ok(Self { email })
    }
}

/// Body of `POST /contact`. The name is optional, email and message are not.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactForm {
    pub fn new(name: impl Into<String>, email: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            message: message.into(),
        }
    }

    pub fn validate(&self) -> Result<(), AdminError> {
        if self.email.trim().is_empty() {
            return Err(AdminError::Validation("Email is required".to_string()));
        }
        if self.message.trim().is_empty() {
            return Err(AdminError::Validation("Message is required".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notify_requires_email() {
        assert!(NotifyRequest::new("").is_err());
        assert!(NotifyRequest::new("   ").is_err());
        assert_eq!(NotifyRequest::new("a@b.co").unwrap().email, "a@b.co");
    }

    #[test]
    fn test_contact_validation() {
        assert!(ContactForm::new("", "a@b.co", "hello").validate().is_ok());
        assert_eq!(
            ContactForm::new("Asha", "", "hello").validate(),
            Err(AdminError::Validation("Email is required".into()))
        );
        assert_eq!(
            ContactForm::new("Asha", "a@b.co", " ").validate(),
            Err(AdminError::Validation("Message is required".into()))
        );
    }

    #[test]
    fn test_contact_serializes_all_fields() {
        let json = serde_json::to_value(ContactForm::new("Asha", "a@b.co", "hi")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "Asha", "email": "a@b.co", "message": "hi"})
        );
    }
}
