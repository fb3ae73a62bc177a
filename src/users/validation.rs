//! Turns loose request shapes into typed values.
//!
//! Every rule that fails contributes one message, in the order the fields are
//! declared, so a client sees all of its mistakes at once. Nothing here does
//! I/O and every input maps to either a typed value or a non-empty error list.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use uuid::Uuid;

use crate::users::dto::{SignInQuery, SignUpBody, UpdateUserBody};

pub const NAME_MIN: usize = 1;
pub const NAME_MAX: usize = 255;
pub const PASSWORD_MIN: usize = 8;

pub const NAME_TOO_SHORT: &str = "Name must be at least 1 character long";
pub const NAME_TOO_LONG: &str = "Name must be at most 255 characters long";
pub const INVALID_EMAIL: &str = "Invalid email";
pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 8 characters long";
pub const INVALID_USER_ID: &str = "Invalid user ID";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: String,
    pub image: Option<String>,
}

pub type Validated<T> = Result<T, Vec<String>>;

/// Local part of word characters, `'`, `+`, `-` and dots (never leading,
/// never doubled, never last); domain labels may not start with a hyphen and
/// the top-level label is at least two letters.
pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(
            r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+-]@([A-Za-z0-9][A-Za-z0-9-]*\.)+[A-Za-z]{2,}$"
        )
        .unwrap();
    }
    !email.starts_with('.') && !email.contains("..") && EMAIL_RE.is_match(email)
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn sign_up(body: SignUpBody) -> Validated<NewUser> {
    let mut errors = Vec::new();
    let name =
        required_string(&mut errors, body.name, "Name").and_then(|v| name_rules(&mut errors, v));
    let email =
        required_string(&mut errors, body.email, "Email").and_then(|v| email_rules(&mut errors, &v));
    let password = required_string(&mut errors, body.password, "Password")
        .and_then(|v| password_rules(&mut errors, v));

    match (name, email, password) {
        (Some(name), Some(email), Some(password)) => Ok(NewUser { name, email, password }),
        _ => Err(errors),
    }
}

pub fn sign_in(query: SignInQuery) -> Validated<Credentials> {
    let mut errors = Vec::new();
    let email =
        present(&mut errors, query.email, "Email").and_then(|v| email_rules(&mut errors, &v));
    let password = present(&mut errors, query.password, "Password")
        .and_then(|v| password_rules(&mut errors, v));

    match (email, password) {
        (Some(email), Some(password)) => Ok(Credentials { email, password }),
        _ => Err(errors),
    }
}

pub fn update_body(body: UpdateUserBody) -> Validated<ProfileUpdate> {
    let mut errors = Vec::new();
    let name =
        required_string(&mut errors, body.name, "Name").and_then(|v| name_rules(&mut errors, v));
    let image = match body.image {
        None => Some(None),
        Some(Value::String(image)) => Some(Some(image)),
        Some(_) => {
            errors.push("Image must be a string".to_string());
            None
        }
    };

    match (name, image) {
        (Some(name), Some(image)) => Ok(ProfileUpdate { name, image }),
        _ => Err(errors),
    }
}

/// Only the canonical hyphenated form is accepted.
pub fn user_id(raw: &str) -> Validated<Uuid> {
    if raw.len() == 36 {
        if let Ok(id) = Uuid::parse_str(raw) {
            return Ok(id);
        }
    }
    Err(vec![INVALID_USER_ID.to_string()])
}

fn required_string(errors: &mut Vec<String>, value: Option<Value>, field: &str) -> Option<String> {
    match value {
        None | Some(Value::Null) => {
            errors.push(format!("{field} is required"));
            None
        }
        Some(Value::String(s)) => Some(s),
        Some(_) => {
            errors.push(format!("{field} must be a string"));
            None
        }
    }
}

fn present(errors: &mut Vec<String>, value: Option<String>, field: &str) -> Option<String> {
    if value.is_none() {
        errors.push(format!("{field} is required"));
    }
    value
}

fn name_rules(errors: &mut Vec<String>, name: String) -> Option<String> {
    let len = name.chars().count();
    if len < NAME_MIN {
        errors.push(NAME_TOO_SHORT.to_string());
        return None;
    }
    if len > NAME_MAX {
        errors.push(NAME_TOO_LONG.to_string());
        return None;
    }
    Some(name)
}

fn email_rules(errors: &mut Vec<String>, email: &str) -> Option<String> {
    let email = normalize_email(email);
    if !is_valid_email(&email) {
        errors.push(INVALID_EMAIL.to_string());
        return None;
    }
    Some(email)
}

fn password_rules(errors: &mut Vec<String>, password: String) -> Option<String> {
    if password.chars().count() < PASSWORD_MIN {
        errors.push(PASSWORD_TOO_SHORT.to_string());
        return None;
    }
    Some(password)
}
