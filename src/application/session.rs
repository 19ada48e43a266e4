//! Session state and its transitions.
//!
//! A [`Session`] is a plain value. Every user action is expressed as an
//! [`Action`] and applied with [`transition`], which returns the next session
//! or an error. A failed transition never produces a partially updated
//! session.

use crate::domain::{
    self, ApplicationForm, ApplicationStatus, Application, Card, CardForm, DomainError,
    DomainResult, LoanPolicy, LoginForm, RegistrationForm, User,
};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

/// The screen the user is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Calculator,
    Auth,
    Application,
    Dashboard,
}

impl View {
    pub fn requires_user(self) -> bool {
        matches!(self, View::Application | View::Dashboard)
    }

    pub fn name(self) -> &'static str {
        match self {
            View::Calculator => "calculator",
            View::Auth => "sign-in",
            View::Application => "application",
            View::Dashboard => "dashboard",
        }
    }
}

/// Everything a user action can change.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub view: View,
    pub user: Option<User>,
    pub applications: Vec<Application>,
    /// Cards bound on the sign-in screen, attached to the user at sign-in.
    pub pending_cards: Vec<Card>,
    pub policy: LoanPolicy,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(LoanPolicy::default())
    }
}

impl Session {
    pub fn new(policy: LoanPolicy) -> Self {
        Self {
            view: View::Calculator,
            user: None,
            applications: Vec::new(),
            pending_cards: Vec::new(),
            policy,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    /// Cards visible to the current user, or the pending ones before sign-in.
    pub fn cards(&self) -> &[Card] {
        match &self.user {
            Some(user) => &user.cards,
            None => &self.pending_cards,
        }
    }

    pub fn application(&self, id: u64) -> Option<&Application> {
        self.applications.iter().find(|app| app.id == id)
    }

    /// Where a request for `view` actually lands given the sign-in state.
    pub fn resolve_view(&self, view: View) -> View {
        match (view, self.is_signed_in()) {
            (View::Auth, true) => View::Dashboard,
            (requested, false) if requested.requires_user() => View::Auth,
            (requested, _) => requested,
        }
    }

    /// Ids are creation timestamps in milliseconds, bumped past the newest
    /// existing id so two submissions in the same millisecond stay distinct.
    fn next_application_id(&self, now: DateTime<Utc>) -> u64 {
        let stamp = now.timestamp_millis().max(0) as u64;
        match self.applications.iter().map(|app| app.id).max() {
            Some(last) if last >= stamp => last + 1,
            _ => stamp,
        }
    }

    fn next_card_id(&self, now: DateTime<Utc>) -> u64 {
        let stamp = now.timestamp_millis().max(0) as u64;
        match self.cards().iter().map(|card| card.id).max() {
            Some(last) if last >= stamp => last + 1,
            _ => stamp,
        }
    }
}

/// A user action against the session.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Navigate(View),
    Login(LoginForm),
    Register(RegistrationForm),
    Logout,
    SubmitApplication(ApplicationForm),
    NewApplication,
    BindCard(CardForm),
    /// Resolves a pending application. Nothing in the UI sends this; it is
    /// the hook for whoever reviews applications.
    SetApplicationStatus { id: u64, status: ApplicationStatus },
}

/// Applies `action` to `session` and returns the resulting session.
///
/// # Errors
///
/// Returns a [`DomainError`] when a form is incomplete, when the action needs
/// a signed-in user (or must not have one), when it is sent from a screen
/// that does not offer it, or when a status change is not allowed. The input session is never modified.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use microloan::application::{transition, Action, Session, View};
/// use microloan::domain::LoginForm;
///
/// let session = Session::default();
/// let form = LoginForm { phone: "+7 999 000-00-00".into(), password: "pw".into() };
/// let next = transition(&session, Action::Login(form), Utc::now()).unwrap();
///
/// assert_eq!(next.view, View::Dashboard);
/// assert!(next.is_signed_in());
/// ```
pub fn transition(session: &Session, action: Action, now: DateTime<Utc>) -> DomainResult<Session> {
    let mut next = session.clone();

    match action {
        Action::Navigate(view) => {
            next.view = session.resolve_view(view);
            debug!(requested = ?view, landed = ?next.view, "navigate");
        }
        Action::Login(form) => {
            ensure_signed_out(session)?;
            let user = domain::login(&form, std::mem::take(&mut next.pending_cards))?;
            info!(phone = %user.phone, "signed in");
            next.user = Some(user);
            next.view = View::Dashboard;
        }
        Action::Register(form) => {
            ensure_signed_out(session)?;
            let user = domain::register(&form, std::mem::take(&mut next.pending_cards))?;
            info!(phone = %user.phone, "registered");
            next.user = Some(user);
            next.view = View::Dashboard;
        }
        Action::Logout => {
            if let Some(user) = &session.user {
                info!(phone = %user.phone, applications = session.applications.len(), "signed out");
            }
            next.user = None;
            next.applications.clear();
            next.pending_cards.clear();
            next.view = View::Calculator;
        }
        Action::SubmitApplication(form) => {
            let user = session.user.as_ref().ok_or(DomainError::NotSignedIn)?;
            ensure_view(session, View::Application, "Submitting an application")?;
            let id = session.next_application_id(now);
            let application = domain::submit_application(&form, user, &session.policy, id, now)?;
            info!(
                id = application.id,
                amount = application.amount,
                term = application.term_months,
                premium = application.premium_service,
                "application submitted"
            );
            next.applications.push(application);
            next.view = View::Dashboard;
        }
        Action::NewApplication => {
            ensure_view(session, View::Dashboard, "A new application")?;
            next.view = session.resolve_view(View::Application);
        }
        Action::BindCard(form) => {
            let card = domain::bind_card(&form, session.next_card_id(now))?;
            info!(card = %card.masked_number, signed_in = session.is_signed_in(), "card bound");
            match next.user.as_mut() {
                Some(user) => user.cards.push(card),
                None => next.pending_cards.push(card),
            }
        }
        Action::SetApplicationStatus { id, status } => {
            let application = next
                .applications
                .iter_mut()
                .find(|app| app.id == id)
                .ok_or(DomainError::ApplicationNotFound(id))?;
            if !application.status.can_transition_to(status) {
                return Err(DomainError::InvalidStatusTransition {
                    from: application.status,
                    to: status,
                });
            }
            info!(id, from = %application.status, to = %status, "application status changed");
            application.status = status;
        }
    }

    Ok(next)
}

fn ensure_view(session: &Session, expected: View, action: &'static str) -> DomainResult<()> {
    if session.view == expected {
        Ok(())
    } else {
        Err(DomainError::ActionUnavailable {
            action,
            view: session.view.name(),
        })
    }
}

fn ensure_signed_out(session: &Session) -> DomainResult<()> {
    match &session.user {
        Some(user) => Err(DomainError::AlreadySignedIn(user.phone.clone())),
        None => Ok(()),
    }
}
