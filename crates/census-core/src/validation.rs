//! Declarative field constraints applied to incoming requests before anything
//! reaches a store.

use crate::{
  Error, Result,
  person::{PersonAddRequest, PersonUpdateRequest},
};

pub const PERSON_NAME_MAX_LEN: usize = 50;
pub const EMAIL_MAX_LEN: usize = 50;
pub const ADDRESS_MAX_LEN: usize = 200;

/// A single failed constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
  pub field:   &'static str,
  pub message: String,
}

/// Implemented by request types that carry field constraints.
pub trait Validate {
  /// Every violated constraint, in field declaration order.
  fn violations(&self) -> Vec<Violation>;
}

/// Fail with the first violation's message, if any.
pub fn validate_model<T: Validate + ?Sized>(model: &T) -> Result<()> {
  match model.violations().into_iter().next() {
    Some(v) => Err(Error::Validation(v.message)),
    None => Ok(()),
  }
}

// ─── Constraint builders ─────────────────────────────────────────────────────

/// Collects violations for one request.
#[derive(Default)]
struct Checker {
  out: Vec<Violation>,
}

impl Checker {
  fn fail(&mut self, field: &'static str, message: impl Into<String>) {
    self.out.push(Violation { field, message: message.into() });
  }

  /// Missing, empty, and whitespace-only values all count as absent.
  fn required(&mut self, field: &'static str, value: Option<&str>, message: &str) -> bool {
    match value {
      Some(v) if !v.trim().is_empty() => true,
      _ => {
        self.fail(field, message);
        false
      }
    }
  }

  fn max_len(&mut self, field: &'static str, value: Option<&str>, max: usize) {
    if let Some(v) = value
      && v.chars().count() > max
    {
      self.fail(field, format!("{field} can't exceed {max} characters."));
    }
  }

  fn email(&mut self, field: &'static str, value: Option<&str>, message: &str) {
    if let Some(v) = value
      && !is_email(v)
    {
      self.fail(field, message);
    }
  }
}

/// Exactly one `@`, with something on either side of it.
pub fn is_email(value: &str) -> bool {
  let mut parts = value.split('@');
  match (parts.next(), parts.next(), parts.next()) {
    (Some(local), Some(domain), None) => !local.is_empty() && !domain.is_empty(),
    _ => false,
  }
}

fn person_violations(
  person_name: Option<&str>,
  email: Option<&str>,
  address: Option<&str>,
) -> Vec<Violation> {
  let mut c = Checker::default();

  if c.required("person_name", person_name, "Person name can't be empty.") {
    c.max_len("person_name", person_name, PERSON_NAME_MAX_LEN);
  }

  if c.required("email", email, "Email can't be empty.") {
    c.email("email", email, "Email value should be a valid email.");
    c.max_len("email", email, EMAIL_MAX_LEN);
  }

  c.max_len("address", address, ADDRESS_MAX_LEN);
  c.out
}

impl Validate for PersonAddRequest {
  fn violations(&self) -> Vec<Violation> {
    person_violations(
      self.person_name.as_deref(),
      self.email.as_deref(),
      self.address.as_deref(),
    )
  }
}

impl Validate for PersonUpdateRequest {
  fn violations(&self) -> Vec<Violation> {
    person_violations(
      self.person_name.as_deref(),
      self.email.as_deref(),
      self.address.as_deref(),
    )
  }
}
