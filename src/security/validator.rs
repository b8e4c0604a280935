use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{
    CareerApplication, ContactForm, ValidationResult, RESUME_ALLOWED_TYPES, RESUME_MAX_BYTES,
};
use crate::security::spam::SpamDetector;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .unwrap()
});

static NAME_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z\s'-]+$").unwrap());

const NAME_MIN: usize = 2;
const NAME_MAX: usize = 100;
const COMPANY_MAX: usize = 100;
const MESSAGE_MIN: usize = 20;
const MESSAGE_MAX: usize = 1000;
const EXPERIENCE_MIN: usize = 50;
const LOCAL_PART_MAX: usize = 64;
const DOMAIN_MAX: usize = 255;
const TLD_MIN: usize = 2;

/// Structural email validation.
///
/// A pattern match plus the checks the pattern cannot express: exactly one
/// `@`, bounded local part and domain, no consecutive dots, and a TLD of
/// at least two characters.
pub fn validate_email(email: &str) -> bool {
    if !EMAIL_REGEX.is_match(email) {
        return false;
    }

    let mut parts = email.splitn(3, '@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return false,
    };

    if local.len() > LOCAL_PART_MAX || domain.len() > DOMAIN_MAX {
        return false;
    }
    if email.contains("..") {
        return false;
    }

    match domain.rsplit('.').next() {
        Some(tld) => tld.len() >= TLD_MIN,
        None => false,
    }
}

/// Phone numbers may carry formatting, but must contain 10 to 15 digits.
/// Empty input is acceptable; the field is optional everywhere it appears.
pub fn validate_phone(phone: &str) -> bool {
    if phone.trim().is_empty() {
        return true;
    }
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    (10..=15).contains(&digits)
}

/// Validate a contact form, aggregating every failure rather than stopping
/// at the first. The message field additionally runs the spam heuristics.
pub fn validate_contact(form: &ContactForm) -> ValidationResult {
    let mut errors = HashMap::new();

    let name = form.name.trim();
    if name.is_empty() {
        errors.insert("name".to_string(), "Name is required".to_string());
    } else if name.chars().count() < NAME_MIN {
        errors.insert(
            "name".to_string(),
            format!("Name must be at least {NAME_MIN} characters"),
        );
    } else if name.chars().count() > NAME_MAX {
        errors.insert(
            "name".to_string(),
            format!("Name must be less than {NAME_MAX} characters"),
        );
    } else if !NAME_REGEX.is_match(name) {
        errors.insert(
            "name".to_string(),
            "Name contains invalid characters".to_string(),
        );
    }

    let email = form.email.trim();
    if email.is_empty() {
        errors.insert("email".to_string(), "Email is required".to_string());
    } else if !validate_email(email) {
        errors.insert(
            "email".to_string(),
            "Please enter a valid email address".to_string(),
        );
    }

    if form.company.trim().chars().count() > COMPANY_MAX {
        errors.insert(
            "company".to_string(),
            format!("Company name must be less than {COMPANY_MAX} characters"),
        );
    }

    if form.project_type.trim().is_empty() {
        errors.insert(
            "projectType".to_string(),
            "Please select a project type".to_string(),
        );
    }

    let message = form.message.trim();
    if message.is_empty() {
        errors.insert("message".to_string(), "Message is required".to_string());
    } else if message.chars().count() < MESSAGE_MIN {
        errors.insert(
            "message".to_string(),
            format!("Message must be at least {MESSAGE_MIN} characters"),
        );
    } else if message.chars().count() > MESSAGE_MAX {
        errors.insert(
            "message".to_string(),
            format!("Message must be less than {MESSAGE_MAX} characters"),
        );
    } else if SpamDetector::new().analyze(message).is_suspicious {
        errors.insert(
            "message".to_string(),
            "Message contains suspicious content. Please revise and try again.".to_string(),
        );
    }

    ValidationResult::from_errors(errors)
}

/// Validate a careers application, including the resume attachment rules.
pub fn validate_career(application: &CareerApplication) -> ValidationResult {
    let mut errors = HashMap::new();

    if application.name.trim().is_empty() {
        errors.insert("name".to_string(), "Name is required".to_string());
    }

    let email = application.email.trim();
    if email.is_empty() {
        errors.insert("email".to_string(), "Email is required".to_string());
    } else if !validate_email(email) {
        errors.insert(
            "email".to_string(),
            "Please enter a valid email address".to_string(),
        );
    }

    if !validate_phone(&application.phone) {
        errors.insert(
            "phone".to_string(),
            "Invalid phone number format".to_string(),
        );
    }

    if application.expertise.trim().is_empty() {
        errors.insert(
            "expertise".to_string(),
            "Please select your area of expertise".to_string(),
        );
    }

    let experience = application.experience.trim();
    if experience.is_empty() {
        errors.insert(
            "experience".to_string(),
            "Please describe your experience".to_string(),
        );
    } else if experience.chars().count() < EXPERIENCE_MIN {
        errors.insert(
            "experience".to_string(),
            format!("Please provide at least {EXPERIENCE_MIN} characters"),
        );
    }

    match &application.resume {
        None => {
            errors.insert(
                "resume".to_string(),
                "Please upload your resume".to_string(),
            );
        }
        Some(resume) => {
            if !RESUME_ALLOWED_TYPES.contains(&resume.content_type.as_str()) {
                errors.insert(
                    "resume".to_string(),
                    "Please upload a PDF or Word document".to_string(),
                );
            } else if resume.size() > RESUME_MAX_BYTES {
                errors.insert(
                    "resume".to_string(),
                    "File size must be less than 5MB".to_string(),
                );
            }
        }
    }

    ValidationResult::from_errors(errors)
}
