use crate::errors::internal::{FieldError, ValidationError};

const REQUIRED: &str = "This field is required.";
const INVALID_EMAIL: &str = "Invalid email address.";
const PASSWORDS_MUST_MATCH: &str = "Passwords must match";

/// Account fields shared by self-registration and super-admin user creation
#[derive(Debug, Clone, Copy)]
pub struct AccountForm<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub department: Option<&'a str>,
    pub password: &'a str,
    pub password2: &'a str,
}

#[derive(Debug, Clone, Copy)]
pub struct ProfileForm<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub department: Option<&'a str>,
    pub system_name: Option<&'a str>,
}

/// Collects field errors for one submitted form
///
/// Every field is checked so the caller gets the full list in one round trip.
/// A missing required field short-circuits only that field's remaining rules.
#[derive(Debug, Default)]
pub struct FormValidator {
    errors: Vec<FieldError>,
}

impl FormValidator {
    pub fn new() -> Self {
        Self::default()
    }

    fn reject(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    /// Returns false (and records an error) when the value is blank
    pub fn required(&mut self, field: &str, value: &str) -> bool {
        if value.trim().is_empty() {
            self.reject(field, REQUIRED);
            false
        } else {
            true
        }
    }

    pub fn length(&mut self, field: &str, value: &str, min: Option<usize>, max: Option<usize>) {
        let len = value.chars().count();
        let too_short = min.is_some_and(|min| len < min);
        let too_long = max.is_some_and(|max| len > max);
        if !too_short && !too_long {
            return;
        }

        let message = match (min, max) {
            (Some(min), Some(max)) => {
                format!("Field must be between {} and {} characters long.", min, max)
            }
            (Some(min), None) => format!("Field must be at least {} characters long.", min),
            (None, Some(max)) => format!("Field cannot be longer than {} characters.", max),
            (None, None) => return,
        };
        self.reject(field, message);
    }

    pub fn email(&mut self, field: &str, value: &str) {
        if !is_plausible_email(value.trim()) {
            self.reject(field, INVALID_EMAIL);
        }
    }

    pub fn equal_to(&mut self, field: &str, value: &str, other: &str) {
        if value != other {
            self.reject(field, PASSWORDS_MUST_MATCH);
        }
    }

    /// Length-limited optional field
    pub fn optional_max(&mut self, field: &str, value: Option<&str>, max: usize) {
        if let Some(value) = value {
            self.length(field, value, None, Some(max));
        }
    }

    pub fn finish(self) -> Result<(), ValidationError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                fields: self.errors,
            })
        }
    }
}

/// One '@', a non-empty local part and a dotted domain, no whitespace
fn is_plausible_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}

pub fn validate_login(username: &str, password: &str) -> Result<(), ValidationError> {
    let mut v = FormValidator::new();
    if v.required("username", username) {
        v.length("username", username.trim(), Some(3), Some(80));
    }
    v.required("password", password);
    v.finish()
}

pub fn validate_ticket(
    title: &str,
    description: &str,
    system_name: Option<&str>,
) -> Result<(), ValidationError> {
    let mut v = FormValidator::new();
    if v.required("title", title) {
        v.length("title", title.trim(), Some(5), Some(200));
    }
    if v.required("description", description) {
        v.length("description", description.trim(), Some(10), None);
    }
    v.optional_max("system_name", system_name, 100);
    v.finish()
}

pub fn validate_comment(comment: &str) -> Result<(), ValidationError> {
    let mut v = FormValidator::new();
    if v.required("comment", comment) {
        v.length("comment", comment.trim(), Some(5), None);
    }
    v.finish()
}

pub fn validate_account(form: &AccountForm<'_>) -> Result<(), ValidationError> {
    let mut v = FormValidator::new();
    if v.required("username", form.username) {
        v.length("username", form.username.trim(), Some(3), Some(80));
    }
    if v.required("email", form.email) {
        v.email("email", form.email);
    }
    name_fields(&mut v, form.first_name, form.last_name);
    v.optional_max("department", form.department, 100);
    if v.required("password", form.password) {
        v.length("password", form.password, Some(6), None);
    }
    if v.required("password2", form.password2) {
        v.equal_to("password2", form.password2, form.password);
    }
    v.finish()
}

pub fn validate_profile(form: &ProfileForm<'_>) -> Result<(), ValidationError> {
    let mut v = FormValidator::new();
    name_fields(&mut v, form.first_name, form.last_name);
    if v.required("email", form.email) {
        v.email("email", form.email);
    }
    v.optional_max("department", form.department, 100);
    v.optional_max("system_name", form.system_name, 100);
    v.finish()
}

fn name_fields(v: &mut FormValidator, first_name: &str, last_name: &str) {
    if v.required("first_name", first_name) {
        v.length("first_name", first_name.trim(), Some(2), Some(50));
    }
    if v.required("last_name", last_name) {
        v.length("last_name", last_name.trim(), Some(2), Some(50));
    }
}
