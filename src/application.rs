use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    job::normalized,
};

/// A candidate's application to a single job.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Default, Debug)]
pub struct Application {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub cover_letter: String,
}

impl Application {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            ..Default::default()
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    pub fn with_cover_letter(mut self, cover_letter: impl Into<String>) -> Self {
        self.cover_letter = cover_letter.into();
        self
    }

    /// Sets a field from a `name=value` pair. Unknown names are ignored.
    pub fn field(mut self, name: &str, value: &str) -> Self {
        let value = value.to_string();
        match normalized(name).as_str() {
            "first" | "first name" => self.first_name = value,
            "last" | "last name" => self.last_name = value,
            "email" => self.email = value,
            "phone" => self.phone = value,
            "cover" | "cover letter" => self.cover_letter = value,
            _ => log::warn!("Ignoring unknown application field: {}", name),
        }
        self
    }

    /// Checks the fields the backend requires before anything is sent.
    pub fn validate(&self) -> Result<()> {
        required([
            ("first name", &self.first_name),
            ("last name", &self.last_name),
            ("email", &self.email),
        ])?;
        check_email(&self.email)
    }
}

/// A company asking for fractional talent.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Default, Debug)]
pub struct EmployerRequest {
    pub company_name: String,
    pub contact_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    /// The kind of executive wanted, e.g. `cto`.
    pub role_type: String,
    #[serde(default)]
    pub role_title: String,
    #[serde(default)]
    pub time_commitment: String,
    #[serde(default)]
    pub timeline: String,
    pub requirements: String,
    #[serde(default)]
    pub budget_range: String,
}

impl EmployerRequest {
    /// Sets a field from a `name=value` pair. Unknown names are ignored.
    pub fn field(mut self, name: &str, value: &str) -> Self {
        let value = value.to_string();
        match normalized(name).as_str() {
            "company" | "company name" => self.company_name = value,
            "contact" | "contact name" => self.contact_name = value,
            "email" => self.email = value,
            "phone" => self.phone = value,
            "role" | "role type" => self.role_type = value,
            "title" | "role title" => self.role_title = value,
            "time commitment" | "commitment" => self.time_commitment = value,
            "timeline" => self.timeline = value,
            "requirements" => self.requirements = value,
            "budget" | "budget range" => self.budget_range = value,
            _ => log::warn!("Ignoring unknown request field: {}", name),
        }
        self
    }

    /// Checks the fields the backend requires before anything is sent.
    pub fn validate(&self) -> Result<()> {
        required([
            ("company name", &self.company_name),
            ("contact name", &self.contact_name),
            ("email", &self.email),
            ("role type", &self.role_type),
            ("requirements", &self.requirements),
        ])?;
        check_email(&self.email)
    }
}

fn required<'a>(fields: impl IntoIterator<Item = (&'a str, &'a String)>) -> Result<()> {
    for (name, value) in fields {
        if value.trim().is_empty() {
            return Err(Error::InvalidForm(format!("{name} is required")));
        }
    }
    Ok(())
}

fn check_email(email: &str) -> Result<()> {
    let email = email.trim();
    let valid = email
        .split_once('@')
        .is_some_and(|(user, domain)| !user.is_empty() && domain.contains('.'));
    if !valid {
        return Err(Error::InvalidForm(format!(
            "{email:?} is not an email address"
        )));
    }
    Ok(())
}
