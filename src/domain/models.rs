use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const AMOUNT_MIN: u64 = 10_000;
pub const AMOUNT_MAX: u64 = 500_000;
pub const AMOUNT_STEP: u64 = 5_000;
pub const DEFAULT_AMOUNT: u64 = 50_000;

pub const TERM_MIN: u32 = 3;
pub const TERM_MAX: u32 = 36;
pub const DEFAULT_TERM: u32 = 12;

/// Terms offered by the application form.
pub const TERM_OPTIONS: [u32; 5] = [3, 6, 12, 24, 36];

pub const DEFAULT_ANNUAL_RATE: f64 = 15.9;
pub const DEFAULT_PREMIUM_FEE: u64 = 499;

/// Inputs to a single payment calculation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoanTerms {
    pub principal: u64,
    pub term_months: u32,
    /// Annual rate in percent, e.g. `15.9`.
    pub annual_rate: f64,
}

impl LoanTerms {
    pub fn new(principal: u64, term_months: u32, annual_rate: f64) -> Self {
        Self {
            principal,
            term_months,
            annual_rate,
        }
    }

    pub fn monthly_rate(&self) -> f64 {
        self.annual_rate / 100.0 / 12.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PaymentResult {
    pub monthly_payment: u64,
    pub total_repayment: u64,
    pub overpayment: u64,
}

/// Rate and fee settings shared by the calculator and the application form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoanPolicy {
    pub annual_rate: f64,
    pub premium_fee: u64,
}

impl Default for LoanPolicy {
    fn default() -> Self {
        Self {
            annual_rate: DEFAULT_ANNUAL_RATE,
            premium_fee: DEFAULT_PREMIUM_FEE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, ApplicationStatus::Pending)
    }

    /// Only a pending application can be resolved, and only to a terminal
    /// status.
    pub fn can_transition_to(self, next: ApplicationStatus) -> bool {
        !self.is_terminal() && next.is_terminal()
    }

    pub fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "Under review",
            ApplicationStatus::Approved => "Approved",
            ApplicationStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanPurpose {
    Personal,
    Business,
    Education,
    Medical,
    Repair,
    Other,
}

impl LoanPurpose {
    pub const ALL: [LoanPurpose; 6] = [
        LoanPurpose::Personal,
        LoanPurpose::Business,
        LoanPurpose::Education,
        LoanPurpose::Medical,
        LoanPurpose::Repair,
        LoanPurpose::Other,
    ];

    pub fn key(self) -> &'static str {
        match self {
            LoanPurpose::Personal => "personal",
            LoanPurpose::Business => "business",
            LoanPurpose::Education => "education",
            LoanPurpose::Medical => "medical",
            LoanPurpose::Repair => "repair",
            LoanPurpose::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LoanPurpose::Personal => "Personal needs",
            LoanPurpose::Business => "Business development",
            LoanPurpose::Education => "Education",
            LoanPurpose::Medical => "Medical services",
            LoanPurpose::Repair => "Home repair",
            LoanPurpose::Other => "Other",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|purpose| purpose.key() == key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: u64,
    pub masked_number: String,
    pub bank_name: String,
    pub expiry: String,
    pub verified: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub cards: Vec<Card>,
}

impl User {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passport {
    pub series: String,
    pub number: String,
    pub issued_on: String,
    pub address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employment {
    pub workplace: String,
    pub experience_years: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: u64,
    /// Phone number of the owning user.
    pub user_id: String,
    pub amount: u64,
    pub term_months: u32,
    pub purpose: Option<LoanPurpose>,
    pub income: u64,
    pub employment: Employment,
    pub passport: Passport,
    pub payout_card: Option<u64>,
    pub status: ApplicationStatus,
    pub monthly_payment: u64,
    pub premium_service: bool,
    pub premium_service_cost: u64,
    pub created_at: DateTime<Utc>,
}

impl Application {
    pub fn has_premium_service(&self) -> bool {
        self.premium_service_cost > 0
    }
}
