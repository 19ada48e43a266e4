//! Typed payloads for the sign-in, registration, application and card forms.
//!
//! Only presence is checked. Formats (phone numbers, passport data, card
//! numbers) are accepted as typed.

use super::errors::{present, require, DomainError, DomainResult};
use super::models::LoanPurpose;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub phone: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> DomainResult<()> {
        require(&[
            ("phone", present(&self.phone)),
            ("password", present(&self.password)),
        ])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub password: String,
    pub accepted_terms: bool,
}

impl RegistrationForm {
    pub fn validate(&self) -> DomainResult<()> {
        require(&[
            ("first name", present(&self.first_name)),
            ("phone", present(&self.phone)),
            ("password", present(&self.password)),
        ])?;

        if !self.accepted_terms {
            return Err(DomainError::TermsNotAccepted);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationForm {
    pub amount: Option<u64>,
    pub term_months: Option<u32>,
    pub purpose: Option<LoanPurpose>,
    pub income: Option<u64>,
    pub workplace: String,
    pub experience_years: Option<u32>,
    pub passport_series: String,
    pub passport_number: String,
    pub passport_issued_on: String,
    pub address: String,
    pub payout_card: Option<u64>,
    pub premium_service: bool,
}

impl ApplicationForm {
    pub fn validate(&self) -> DomainResult<()> {
        require(&[
            ("amount", self.amount.is_some()),
            ("term", self.term_months.is_some()),
            ("monthly income", self.income.is_some()),
            ("passport series", present(&self.passport_series)),
        ])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardForm {
    pub number: String,
    pub holder: String,
    pub expiry: String,
    pub cvv: String,
}

impl CardForm {
    pub fn validate(&self) -> DomainResult<()> {
        require(&[
            ("card number", present(&self.number)),
            ("expiry", present(&self.expiry)),
            ("CVV", present(&self.cvv)),
        ])
    }
}
