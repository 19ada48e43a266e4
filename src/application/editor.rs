//! Editable form buffers for the terminal UI.
//!
//! A [`FormEditor`] holds raw field text, choices and checkboxes, tracks the
//! focused field, and converts itself into the typed domain forms.

use crate::domain::{
    ApplicationForm, Card, CardForm, LoanPurpose, LoginForm, RegistrationForm, TERM_OPTIONS,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

impl Choice {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Digits only.
    Numeric,
    /// Rendered masked.
    Secret,
    /// One of a fixed list, `None` until picked.
    Select(Vec<Choice>),
    Checkbox,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub key: &'static str,
    pub label: &'static str,
    pub required: bool,
    pub kind: FieldKind,
    pub max_len: Option<usize>,
    pub value: String,
    pub selected: Option<usize>,
    pub checked: bool,
}

impl Field {
    fn new(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            label,
            required: false,
            kind,
            max_len: None,
            value: String::new(),
            selected: None,
            checked: false,
        }
    }

    fn required(mut self) -> Self {
        self.required = true;
        self
    }

    fn max_len(mut self, len: usize) -> Self {
        self.max_len = Some(len);
        self
    }

    /// The text shown for this field's current value.
    pub fn display_value(&self) -> String {
        match &self.kind {
            FieldKind::Secret => "*".repeat(self.value.chars().count()),
            FieldKind::Select(choices) => self
                .selected
                .and_then(|index| choices.get(index))
                .map(|choice| choice.label.clone())
                .unwrap_or_else(|| "< choose >".to_string()),
            FieldKind::Checkbox => {
                if self.checked { "[x]".to_string() } else { "[ ]".to_string() }
            }
            FieldKind::Text | FieldKind::Numeric => self.value.clone(),
        }
    }

    fn selected_value(&self) -> Option<&str> {
        match &self.kind {
            FieldKind::Select(choices) => self
                .selected
                .and_then(|index| choices.get(index))
                .map(|choice| choice.value.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormEditor {
    pub title: &'static str,
    pub fields: Vec<Field>,
    pub focus: usize,
}

impl FormEditor {
    pub fn login() -> Self {
        Self {
            title: "Sign in",
            fields: vec![
                Field::new("phone", "Phone number", FieldKind::Text).required(),
                Field::new("password", "Password", FieldKind::Secret).required(),
            ],
            focus: 0,
        }
    }

    pub fn registration() -> Self {
        Self {
            title: "Register",
            fields: vec![
                Field::new("first_name", "First name", FieldKind::Text).required(),
                Field::new("last_name", "Last name", FieldKind::Text),
                Field::new("phone", "Phone number", FieldKind::Text).required(),
                Field::new("email", "Email", FieldKind::Text),
                Field::new("password", "Password", FieldKind::Secret).required(),
                Field::new("agreement", "I accept the terms of service", FieldKind::Checkbox).required(),
            ],
            focus: 0,
        }
    }

    /// The loan application form. The payout card field only appears when
    /// the user has bound cards.
    pub fn application(cards: &[Card]) -> Self {
        let terms = TERM_OPTIONS
            .iter()
            .map(|term| Choice::new(term.to_string(), format!("{term} months")))
            .collect();
        let purposes = LoanPurpose::ALL
            .iter()
            .map(|purpose| Choice::new(purpose.key(), purpose.label()))
            .collect();

        let mut fields = vec![
            Field::new("amount", "Loan amount, ₽", FieldKind::Numeric).required(),
            Field::new("term", "Term", FieldKind::Select(terms)).required(),
            Field::new("purpose", "Purpose", FieldKind::Select(purposes)),
        ];
        if !cards.is_empty() {
            let choices = cards
                .iter()
                .map(|card| {
                    Choice::new(card.id.to_string(), format!("{} • {}", card.masked_number, card.bank_name))
                })
                .collect();
            fields.push(Field::new("card", "Payout card", FieldKind::Select(choices)));
        }
        fields.extend([
            Field::new("income", "Monthly income, ₽", FieldKind::Numeric).required(),
            Field::new("experience", "Work experience, years", FieldKind::Numeric),
            Field::new("workplace", "Workplace", FieldKind::Text),
            Field::new("passport_series", "Passport series", FieldKind::Text).required().max_len(4),
            Field::new("passport_number", "Passport number", FieldKind::Text).max_len(6),
            Field::new("passport_date", "Passport issue date", FieldKind::Text),
            Field::new("address", "Registration address", FieldKind::Text),
        ]);
        fields.push(Field::new("premium", "Priority review (+85% approval odds)", FieldKind::Checkbox));

        Self {
            title: "Loan application",
            fields,
            focus: 0,
        }
    }

    pub fn card() -> Self {
        Self {
            title: "Bind a card",
            fields: vec![
                Field::new("number", "Card number", FieldKind::Numeric).required().max_len(19),
                Field::new("holder", "Cardholder", FieldKind::Text),
                Field::new("expiry", "Expiry (MM/YY)", FieldKind::Text).required().max_len(5),
                Field::new("cvv", "CVV", FieldKind::Secret).required().max_len(3),
            ],
            focus: 0,
        }
    }

    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    pub fn focus_previous(&mut self) {
        if !self.fields.is_empty() {
            self.focus = self.focus.checked_sub(1).unwrap_or(self.fields.len() - 1);
        }
    }

    /// Types a character into the focused field. Space toggles a checkbox.
    pub fn insert_char(&mut self, c: char) {
        let Some(field) = self.fields.get_mut(self.focus) else {
            return;
        };
        match field.kind {
            FieldKind::Checkbox => {
                if c == ' ' {
                    field.checked = !field.checked;
                }
            }
            FieldKind::Select(_) => {}
            FieldKind::Numeric if !c.is_ascii_digit() => {}
            FieldKind::Text | FieldKind::Numeric | FieldKind::Secret => {
                if field.max_len.is_none_or(|max| field.value.chars().count() < max) {
                    field.value.push(c);
                }
            }
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.value.pop();
        }
    }

    /// Moves a select field to the next (or previous) option.
    pub fn cycle_choice(&mut self, forward: bool) {
        let Some(field) = self.fields.get_mut(self.focus) else {
            return;
        };
        if let FieldKind::Select(choices) = &field.kind {
            if choices.is_empty() {
                return;
            }
            let last = choices.len() - 1;
            field.selected = Some(match (field.selected, forward) {
                (None, true) => 0,
                (None, false) => last,
                (Some(index), true) => if index >= last { 0 } else { index + 1 },
                (Some(index), false) => if index == 0 { last } else { index - 1 },
            });
        }
    }

    fn field(&self, key: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.key == key)
    }

    fn field_mut(&mut self, key: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|field| field.key == key)
    }

    pub fn text(&self, key: &str) -> String {
        self.field(key).map(|field| field.value.clone()).unwrap_or_default()
    }

    pub fn set_text(&mut self, key: &str, value: &str) {
        if let Some(field) = self.field_mut(key) {
            field.value = value.to_string();
        }
    }

    fn number<T: std::str::FromStr>(&self, key: &str) -> Option<T> {
        self.field(key).and_then(|field| field.value.trim().parse().ok())
    }

    pub fn choice(&self, key: &str) -> Option<&str> {
        self.field(key).and_then(Field::selected_value)
    }

    /// Selects the option whose value equals `value`, if there is one.
    pub fn select_value(&mut self, key: &str, value: &str) -> bool {
        let Some(field) = self.field_mut(key) else {
            return false;
        };
        let position = match &field.kind {
            FieldKind::Select(choices) => choices.iter().position(|choice| choice.value == value),
            _ => None,
        };
        if position.is_some() {
            field.selected = position;
        }
        position.is_some()
    }

    pub fn checked(&self, key: &str) -> bool {
        self.field(key).is_some_and(|field| field.checked)
    }

    pub fn set_checked(&mut self, key: &str, checked: bool) {
        if let Some(field) = self.field_mut(key) {
            field.checked = checked;
        }
    }

    pub fn to_login(&self) -> LoginForm {
        LoginForm {
            phone: self.text("phone"),
            password: self.text("password"),
        }
    }

    pub fn to_registration(&self) -> RegistrationForm {
        RegistrationForm {
            first_name: self.text("first_name"),
            last_name: self.text("last_name"),
            phone: self.text("phone"),
            email: self.text("email"),
            password: self.text("password"),
            accepted_terms: self.checked("agreement"),
        }
    }

    pub fn to_application(&self) -> ApplicationForm {
        ApplicationForm {
            amount: self.number("amount"),
            term_months: self.choice("term").and_then(|term| term.parse().ok()),
            purpose: self.choice("purpose").and_then(LoanPurpose::from_key),
            income: self.number("income"),
            workplace: self.text("workplace"),
            experience_years: self.number("experience"),
            passport_series: self.text("passport_series"),
            passport_number: self.text("passport_number"),
            passport_issued_on: self.text("passport_date"),
            address: self.text("address"),
            payout_card: self.choice("card").and_then(|id| id.parse().ok()),
            premium_service: self.checked("premium"),
        }
    }

    pub fn to_card(&self) -> CardForm {
        CardForm {
            number: self.text("number"),
            holder: self.text("holder"),
            expiry: self.text("expiry"),
            cvv: self.text("cvv"),
        }
    }
}
