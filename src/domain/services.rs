//! Simulated account, card and application services.
//!
//! Every success path is a mock: sign-in accepts any non-empty credentials,
//! cards are "verified" without contacting a bank, and applications are
//! recorded as pending with nobody to review them.

use super::calculator::PaymentCalculator;
use super::errors::DomainResult;
use super::forms::{ApplicationForm, CardForm, LoginForm, RegistrationForm};
use super::models::{
    Application, ApplicationStatus, Card, Employment, LoanPolicy, LoanTerms, Passport, User,
};
use chrono::{DateTime, Utc};

pub const MOCK_FIRST_NAME: &str = "Ivan";
pub const MOCK_LAST_NAME: &str = "Petrov";
pub const MOCK_EMAIL: &str = "ivan@example.com";
pub const MOCK_BANK_NAME: &str = "Sberbank";

/// Signs in with any non-empty phone and password.
///
/// Profile details are not looked up anywhere, so the mock name and email
/// are substituted. Cards bound before signing in are carried over.
pub fn login(form: &LoginForm, cards: Vec<Card>) -> DomainResult<User> {
    form.validate()?;
    Ok(User {
        first_name: MOCK_FIRST_NAME.to_string(),
        last_name: MOCK_LAST_NAME.to_string(),
        phone: form.phone.trim().to_string(),
        email: MOCK_EMAIL.to_string(),
        cards,
    })
}

pub fn register(form: &RegistrationForm, cards: Vec<Card>) -> DomainResult<User> {
    form.validate()?;
    Ok(User {
        first_name: form.first_name.trim().to_string(),
        last_name: form.last_name.trim().to_string(),
        phone: form.phone.trim().to_string(),
        email: form.email.trim().to_string(),
        cards,
    })
}

/// Binds a card. Only the masked number survives; the CVV is dropped here.
pub fn bind_card(form: &CardForm, id: u64) -> DomainResult<Card> {
    form.validate()?;
    Ok(Card {
        id,
        masked_number: mask_card_number(&form.number),
        bank_name: MOCK_BANK_NAME.to_string(),
        expiry: form.expiry.trim().to_string(),
        verified: true,
    })
}

/// Masks everything but the last four digits: `**** **** **** 9012`.
///
/// ```
/// use microloan::domain::mask_card_number;
///
/// assert_eq!(mask_card_number("4276 1234 5678 9012"), "**** **** **** 9012");
/// ```
pub fn mask_card_number(number: &str) -> String {
    let digits: Vec<char> = number.chars().filter(|c| c.is_ascii_digit()).collect();
    let tail: String = digits[digits.len().saturating_sub(4)..].iter().collect();
    format!("**** **** **** {}", tail)
}

/// Builds a pending application owned by `user`.
///
/// The monthly payment is the quick estimate, not the amortized figure
/// shown by the calculator.
pub fn submit_application(
    form: &ApplicationForm,
    user: &User,
    policy: &LoanPolicy,
    id: u64,
    now: DateTime<Utc>,
) -> DomainResult<Application> {
    form.validate()?;

    // validate() guarantees these are present
    let amount = form.amount.unwrap_or_default();
    let term_months = form.term_months.unwrap_or_default();
    let income = form.income.unwrap_or_default();

    Ok(Application {
        id,
        user_id: user.phone.clone(),
        amount,
        term_months,
        purpose: form.purpose,
        income,
        employment: Employment {
            workplace: form.workplace.trim().to_string(),
            experience_years: form.experience_years,
        },
        passport: Passport {
            series: form.passport_series.trim().to_string(),
            number: form.passport_number.trim().to_string(),
            issued_on: form.passport_issued_on.trim().to_string(),
            address: form.address.trim().to_string(),
        },
        payout_card: form.payout_card,
        status: ApplicationStatus::Pending,
        monthly_payment: PaymentCalculator::quick_estimate(amount, policy.annual_rate),
        premium_service: form.premium_service,
        premium_service_cost: if form.premium_service { policy.premium_fee } else { 0 },
        created_at: now,
    })
}

/// Aggregates shown at the top of the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DashboardStats {
    pub total: usize,
    pub approved: usize,
    /// Sum of amounts of approved applications.
    pub total_loaned: u64,
    /// Ids of applications with the premium service, in submission order.
    pub premium: Vec<u64>,
}

impl DashboardStats {
    pub fn from_applications(applications: &[Application]) -> Self {
        let approved: Vec<&Application> = applications
            .iter()
            .filter(|app| app.status == ApplicationStatus::Approved)
            .collect();

        Self {
            total: applications.len(),
            approved: approved.len(),
            total_loaned: approved.iter().map(|app| app.amount).sum(),
            premium: applications
                .iter()
                .filter(|app| app.has_premium_service())
                .map(|app| app.id)
                .collect(),
        }
    }
}

/// Plain-text summary of a calculation, suitable for the clipboard.
pub fn payment_summary(terms: &LoanTerms) -> String {
    let result = PaymentCalculator::calculate(terms);
    format!(
        "Loan {} for {} months at {}% p.a.: monthly payment {}, total {}, overpayment {}",
        terms.principal,
        terms.term_months,
        terms.annual_rate,
        result.monthly_payment,
        result.total_repayment,
        result.overpayment
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::DomainError;
    use crate::domain::models::LoanPurpose;
    use chrono::TimeZone;

    fn user() -> User {
        login(
            &LoginForm {
                phone: "+7 999 123-45-67".to_string(),
                password: "pw".to_string(),
            },
            Vec::new(),
        )
        .unwrap()
    }

    fn form() -> ApplicationForm {
        ApplicationForm {
            amount: Some(50_000),
            term_months: Some(12),
            purpose: Some(LoanPurpose::Repair),
            income: Some(80_000),
            passport_series: "1234".to_string(),
            passport_number: "567890".to_string(),
            ..ApplicationForm::default()
        }
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_login_substitutes_mock_profile() {
        let user = user();
        assert_eq!(user.display_name(), "Ivan Petrov");
        assert_eq!(user.email, MOCK_EMAIL);
        assert_eq!(user.phone, "+7 999 123-45-67");
        assert!(user.cards.is_empty());
    }

    #[test]
    fn test_login_rejects_blank_credentials() {
        let result = login(&LoginForm::default(), Vec::new());
        assert!(matches!(result, Err(DomainError::MissingRequiredFields { .. })));
    }

    #[test]
    fn test_register_keeps_entered_profile_and_cards() {
        let card = bind_card(
            &CardForm {
                number: "2200 0000 0000 1111".to_string(),
                holder: "ANNA".to_string(),
                expiry: "01/29".to_string(),
                cvv: "999".to_string(),
            },
            7,
        )
        .unwrap();
        let user = register(
            &RegistrationForm {
                first_name: "Anna".to_string(),
                last_name: String::new(),
                phone: "+7 900".to_string(),
                email: "anna@example.com".to_string(),
                password: "pw".to_string(),
                accepted_terms: true,
            },
            vec![card.clone()],
        )
        .unwrap();

        assert_eq!(user.display_name(), "Anna");
        assert_eq!(user.email, "anna@example.com");
        assert_eq!(user.cards, vec![card]);
    }

    #[test]
    fn test_bind_card_masks_number() {
        let card = bind_card(
            &CardForm {
                number: "4276123456789012".to_string(),
                holder: String::new(),
                expiry: "12/27".to_string(),
                cvv: "123".to_string(),
            },
            1,
        )
        .unwrap();
        assert_eq!(card.masked_number, "**** **** **** 9012");
        assert_eq!(card.bank_name, MOCK_BANK_NAME);
        assert!(card.verified);
    }

    #[test]
    fn test_mask_short_number() {
        assert_eq!(mask_card_number("12"), "**** **** **** 12");
    }

    #[test]
    fn test_submit_application_uses_quick_estimate() {
        let application = submit_application(&form(), &user(), &LoanPolicy::default(), 42, at()).unwrap();

        assert_eq!(application.id, 42);
        assert_eq!(application.user_id, "+7 999 123-45-67");
        assert_eq!(application.status, ApplicationStatus::Pending);
        assert_eq!(application.monthly_payment, 994);
        assert_eq!(application.premium_service_cost, 0);
        assert_eq!(application.created_at, at());
        assert_eq!(application.passport.number, "567890");
    }

    #[test]
    fn test_submit_application_premium_fee() {
        let mut form = form();
        form.premium_service = true;
        let application = submit_application(&form, &user(), &LoanPolicy::default(), 1, at()).unwrap();
        assert!(application.has_premium_service());
        assert_eq!(application.premium_service_cost, 499);
    }

    #[test]
    fn test_submit_application_rejects_missing_income() {
        let mut form = form();
        form.income = None;
        let err = submit_application(&form, &user(), &LoanPolicy::default(), 1, at()).unwrap_err();
        assert_eq!(
            err,
            DomainError::MissingRequiredFields { fields: vec!["monthly income"] }
        );
    }

    #[test]
    fn test_dashboard_stats() {
        let policy = LoanPolicy::default();
        let mut first = submit_application(&form(), &user(), &policy, 1, at()).unwrap();
        first.status = ApplicationStatus::Approved;
        let mut second_form = form();
        second_form.amount = Some(20_000);
        second_form.premium_service = true;
        let second = submit_application(&second_form, &user(), &policy, 2, at()).unwrap();
        let mut third = submit_application(&form(), &user(), &policy, 3, at()).unwrap();
        third.status = ApplicationStatus::Rejected;

        let stats = DashboardStats::from_applications(&[first, second, third]);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.approved, 1);
        assert_eq!(stats.total_loaned, 50_000);
        assert_eq!(stats.premium, vec![2]);
    }

    #[test]
    fn test_payment_summary() {
        let summary = payment_summary(&LoanTerms::new(50_000, 12, 15.9));
        assert_eq!(
            summary,
            "Loan 50000 for 12 months at 15.9% p.a.: monthly payment 4534, total 54410, overpayment 4410"
        );
    }
}
