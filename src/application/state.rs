//! Interactive application state for the terminal front-end.
//!
//! [`App`] owns the current [`Session`] together with everything that only
//! matters while a person is typing: form buffers, calculator sliders, the
//! active popup and the last notice.

use super::editor::FormEditor;
use super::session::{transition, Action, Session, View};
use crate::domain::{
    payment_summary, LoanPolicy, LoanTerms, PaymentCalculator, PaymentResult, AMOUNT_MAX,
    AMOUNT_MIN, AMOUNT_STEP, DEFAULT_AMOUNT, DEFAULT_TERM, TERM_MAX, TERM_MIN,
};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use tracing::warn;

/// Represents the current mode of the application.
///
/// Modes layer on top of the session's [`View`]: they decide how key presses
/// are interpreted and which popup, if any, is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Keys go to the current view
    Normal,
    /// Help screen is displayed
    Help,
    /// Card binding form is open over the auth screen or the dashboard
    BindingCard,
    /// Export dialog is open
    Export,
}

/// Tabs of the sign-in screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthTab {
    Login,
    Register,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A transient message shown in the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Slider positions of the loan calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalculatorState {
    pub amount: u64,
    pub term_months: u32,
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self {
            amount: DEFAULT_AMOUNT,
            term_months: DEFAULT_TERM,
        }
    }
}

impl CalculatorState {
    pub fn increase_amount(&mut self) {
        self.amount = (self.amount + AMOUNT_STEP).min(AMOUNT_MAX);
    }

    pub fn decrease_amount(&mut self) {
        self.amount = self.amount.saturating_sub(AMOUNT_STEP).max(AMOUNT_MIN);
    }

    pub fn increase_term(&mut self) {
        self.term_months = (self.term_months + 1).min(TERM_MAX);
    }

    pub fn decrease_term(&mut self) {
        self.term_months = self.term_months.saturating_sub(1).max(TERM_MIN);
    }
}

/// Main application state.
///
/// # Examples
///
/// ```
/// use microloan::application::{App, View};
///
/// let app = App::default();
/// assert_eq!(app.session.view, View::Calculator);
/// assert_eq!(app.payment().monthly_payment, 4_534);
/// ```
#[derive(Debug)]
pub struct App {
    /// Signed-in user, applications and the current view
    pub session: Session,
    /// Current application mode
    pub mode: AppMode,
    /// Calculator slider positions
    pub calculator: CalculatorState,
    /// Selected tab of the sign-in screen
    pub auth_tab: AuthTab,
    pub login_form: FormEditor,
    pub registration_form: FormEditor,
    pub application_form: FormEditor,
    pub card_form: FormEditor,
    /// Last notice to display in the status bar
    pub notice: Option<Notice>,
    /// Scroll position in help text
    pub help_scroll: usize,
    /// Scroll position of the dashboard's application list
    pub dashboard_scroll: usize,
    /// Input buffer for the export filename
    pub filename_input: String,
    /// Directory used for the default export filename
    pub export_dir: PathBuf,
}

impl Default for App {
    fn default() -> Self {
        Self::new(LoanPolicy::default(), PathBuf::from("."))
    }
}

impl App {
    /// Creates an application on the calculator screen.
    ///
    /// # Arguments
    ///
    /// * `policy` - Rate and fees used for calculations and submissions
    /// * `export_dir` - Directory offered by default when exporting
    pub fn new(policy: LoanPolicy, export_dir: PathBuf) -> Self {
        Self {
            session: Session::new(policy),
            mode: AppMode::Normal,
            calculator: CalculatorState::default(),
            auth_tab: AuthTab::Login,
            login_form: FormEditor::login(),
            registration_form: FormEditor::registration(),
            application_form: FormEditor::application(&[]),
            card_form: FormEditor::card(),
            notice: None,
            help_scroll: 0,
            dashboard_scroll: 0,
            filename_input: String::new(),
            export_dir,
        }
    }

    /// Applies an action to the session at the current time.
    ///
    /// See [`App::dispatch_at`].
    pub fn dispatch(&mut self, action: Action, failure_title: &str) -> bool {
        self.dispatch_at(action, failure_title, Utc::now())
    }

    /// Applies an action to the session as of `now`.
    ///
    /// On success the session is replaced by the transition's result. On
    /// failure the session is kept and an error notice titled
    /// `failure_title` is shown.
    ///
    /// # Returns
    ///
    /// `true` if the transition succeeded
    pub fn dispatch_at(&mut self, action: Action, failure_title: &str, now: DateTime<Utc>) -> bool {
        match transition(&self.session, action, now) {
            Ok(session) => {
                self.session = session;
                true
            }
            Err(error) => {
                warn!(%error, "{}", failure_title);
                self.notice = Some(Notice::error(failure_title, error.to_string()));
                false
            }
        }
    }

    /// Switches to `view`, or to wherever the session redirects it.
    pub fn navigate(&mut self, view: View) {
        let before = self.session.view;
        self.dispatch(Action::Navigate(view), "Navigation failed");
        self.after_view_change(before);
    }

    /// Resets per-screen state when the view actually changed.
    fn after_view_change(&mut self, before: View) {
        if self.session.view == before {
            return;
        }
        match self.session.view {
            View::Application => {
                self.application_form = FormEditor::application(self.session.cards());
            }
            View::Dashboard => self.dashboard_scroll = 0,
            View::Calculator | View::Auth => {}
        }
    }

    /// Current calculator inputs as loan terms.
    pub fn terms(&self) -> LoanTerms {
        LoanTerms::new(
            self.calculator.amount,
            self.calculator.term_months,
            self.session.policy.annual_rate,
        )
    }

    /// Recomputes the calculator result from the current sliders.
    pub fn payment(&self) -> PaymentResult {
        PaymentCalculator::calculate(&self.terms())
    }

    /// Text copied to the clipboard from the calculator screen.
    pub fn payment_summary(&self) -> String {
        payment_summary(&self.terms())
    }

    /// Processes the result of a clipboard copy.
    pub fn set_copy_result(&mut self, result: Result<(), String>) {
        self.notice = Some(match result {
            Ok(()) => Notice::success("Copied", "Payment summary copied to the clipboard"),
            Err(error) => Notice::error("Copy failed", error),
        });
    }

    /// Leaves the calculator for the application form, carrying the chosen
    /// amount and, when it is one of the offered terms, the term.
    ///
    /// Without a signed-in user this lands on the sign-in screen instead.
    pub fn apply_from_calculator(&mut self) {
        self.navigate(View::Application);
        if self.session.view == View::Application {
            self.application_form
                .set_text("amount", &self.calculator.amount.to_string());
            self.application_form
                .select_value("term", &self.calculator.term_months.to_string());
        } else {
            self.notice = Some(Notice::error("Sign in required", "Sign in to apply for a loan"));
        }
    }

    /// Switches between the sign-in and registration tabs.
    pub fn toggle_auth_tab(&mut self) {
        self.auth_tab = match self.auth_tab {
            AuthTab::Login => AuthTab::Register,
            AuthTab::Register => AuthTab::Login,
        };
    }

    pub fn submit_login(&mut self) {
        let form = self.login_form.to_login();
        if self.dispatch(Action::Login(form), "Sign-in failed") {
            self.login_form = FormEditor::login();
            self.dashboard_scroll = 0;
            self.notice = Some(Notice::success("Signed in", "Welcome to your account!"));
        }
    }

    pub fn submit_registration(&mut self) {
        let form = self.registration_form.to_registration();
        if self.dispatch(Action::Register(form), "Registration failed") {
            self.registration_form = FormEditor::registration();
            self.dashboard_scroll = 0;
            self.notice = Some(Notice::success("Registered", "Welcome to MicroZaim!"));
        }
    }

    /// Submits whichever sign-in tab is active.
    pub fn submit_auth(&mut self) {
        match self.auth_tab {
            AuthTab::Login => self.submit_login(),
            AuthTab::Register => self.submit_registration(),
        }
    }

    /// Submits the loan application form.
    ///
    /// On success the application is recorded as pending and the dashboard
    /// is shown. On failure the form keeps its contents.
    pub fn submit_application(&mut self) {
        let form = self.application_form.to_application();
        if self.dispatch(Action::SubmitApplication(form), "Application not sent") {
            self.application_form = FormEditor::application(self.session.cards());
            self.dashboard_scroll = 0;
            self.notice = Some(Notice::success(
                "Application sent",
                "We will review your application within 15 minutes",
            ));
        }
    }

    /// Opens an empty application form from the dashboard.
    pub fn new_application(&mut self) {
        let before = self.session.view;
        self.dispatch(Action::NewApplication, "Navigation failed");
        self.after_view_change(before);
    }

    /// Signs out, dropping the user, their applications and all form input.
    pub fn logout(&mut self) {
        if self.dispatch(Action::Logout, "Sign-out failed") {
            self.login_form = FormEditor::login();
            self.registration_form = FormEditor::registration();
            self.application_form = FormEditor::application(&[]);
            self.card_form = FormEditor::card();
            self.auth_tab = AuthTab::Login;
            self.mode = AppMode::Normal;
            self.notice = None;
        }
    }

    /// Opens the card binding form over the current view.
    pub fn start_card_binding(&mut self) {
        self.mode = AppMode::BindingCard;
        self.card_form = FormEditor::card();
        self.notice = None;
    }

    pub fn cancel_card_binding(&mut self) {
        self.mode = AppMode::Normal;
        self.card_form = FormEditor::card();
    }

    /// Binds the card in the card form and closes the form on success.
    pub fn submit_card(&mut self) {
        let form = self.card_form.to_card();
        if self.dispatch(Action::BindCard(form), "Card not bound") {
            let message = self
                .session
                .cards()
                .last()
                .map(|card| format!("{} is verified", card.masked_number))
                .unwrap_or_default();
            self.mode = AppMode::Normal;
            self.card_form = FormEditor::card();
            self.notice = Some(Notice::success("Card bound", message));
        }
    }

    /// The form that receives typing in the current mode and view, if any.
    pub fn active_form_mut(&mut self) -> Option<&mut FormEditor> {
        match (self.mode, self.session.view) {
            (AppMode::BindingCard, _) => Some(&mut self.card_form),
            (AppMode::Normal, View::Auth) => Some(match self.auth_tab {
                AuthTab::Login => &mut self.login_form,
                AuthTab::Register => &mut self.registration_form,
            }),
            (AppMode::Normal, View::Application) => Some(&mut self.application_form),
            _ => None,
        }
    }

    pub fn scroll_applications_down(&mut self) {
        let len = self.session.applications.len();
        if self.dashboard_scroll + 1 < len {
            self.dashboard_scroll += 1;
        }
    }

    pub fn scroll_applications_up(&mut self) {
        self.dashboard_scroll = self.dashboard_scroll.saturating_sub(1);
    }

    /// Switches to export mode to prompt for a filename.
    ///
    /// Initializes the filename input with `applications.csv` inside the
    /// export directory.
    pub fn start_export(&mut self) {
        self.mode = AppMode::Export;
        self.filename_input = self.default_export_filename();
        self.notice = None;
    }

    fn default_export_filename(&self) -> String {
        self.export_dir.join("applications.csv").to_string_lossy().into_owned()
    }

    /// Gets the filename to use for export.
    ///
    /// Returns the filename input if not empty, otherwise the default.
    pub fn get_export_filename(&self) -> String {
        if self.filename_input.trim().is_empty() {
            self.default_export_filename()
        } else {
            self.filename_input.trim().to_string()
        }
    }

    /// Cancels filename input and returns to normal mode.
    pub fn cancel_export(&mut self) {
        self.mode = AppMode::Normal;
        self.filename_input.clear();
    }

    /// Processes the result of an export operation.
    ///
    /// # Arguments
    ///
    /// * `result` - Written filename, or the error message
    pub fn set_export_result(&mut self, result: Result<String, String>) {
        self.notice = Some(match result {
            Ok(filename) => Notice::success(
                "Exported",
                format!("{} applications written to {}", self.session.applications.len(), filename),
            ),
            Err(error) => Notice::error("Export failed", error),
        });
        self.mode = AppMode::Normal;
        self.filename_input.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ApplicationStatus, DEFAULT_ANNUAL_RATE};

    fn type_into(app: &mut App, text: &str) {
        for c in text.chars() {
            if let Some(form) = app.active_form_mut() {
                form.insert_char(c);
            }
        }
    }

    fn signed_in_app() -> App {
        let mut app = App::default();
        app.navigate(View::Auth);
        type_into(&mut app, "+7 999 123-45-67");
        app.active_form_mut().unwrap().focus_next();
        type_into(&mut app, "secret");
        app.submit_auth();
        app
    }

    fn fill_application(app: &mut App) {
        let form = &mut app.application_form;
        form.set_text("amount", "50000");
        form.select_value("term", "12");
        form.set_text("income", "80000");
        form.set_text("passport_series", "1234");
    }

    #[test]
    fn test_app_default() {
        let app = App::default();
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.session.view, View::Calculator);
        assert_eq!(app.calculator, CalculatorState { amount: 50_000, term_months: 12 });
        assert_eq!(app.auth_tab, AuthTab::Login);
        assert!(app.notice.is_none());
        assert!(app.filename_input.is_empty());
    }

    #[test]
    fn test_calculator_sliders_clamp() {
        let mut app = App::default();
        for _ in 0..200 {
            app.calculator.increase_amount();
            app.calculator.increase_term();
        }
        assert_eq!(app.calculator.amount, AMOUNT_MAX);
        assert_eq!(app.calculator.term_months, TERM_MAX);

        for _ in 0..200 {
            app.calculator.decrease_amount();
            app.calculator.decrease_term();
        }
        assert_eq!(app.calculator.amount, AMOUNT_MIN);
        assert_eq!(app.calculator.term_months, TERM_MIN);
    }

    #[test]
    fn test_payment_follows_sliders() {
        let mut app = App::default();
        let before = app.payment();
        app.calculator.increase_amount();
        let after = app.payment();
        assert_ne!(before, after);
        assert_eq!(
            after,
            PaymentCalculator::calculate(&LoanTerms::new(55_000, 12, DEFAULT_ANNUAL_RATE))
        );
    }

    #[test]
    fn test_configured_rate_reaches_calculator() {
        let policy = LoanPolicy { annual_rate: 0.0, premium_fee: 0 };
        let app = App::new(policy, PathBuf::from("."));
        let result = app.payment();
        assert_eq!(result.overpayment, 0);
        assert_eq!(result.total_repayment, 50_000);
    }

    #[test]
    fn test_login_flow() {
        let app = signed_in_app();
        assert_eq!(app.session.view, View::Dashboard);
        assert_eq!(app.notice.as_ref().unwrap().kind, NoticeKind::Success);
        assert!(app.login_form.text("phone").is_empty());
    }

    #[test]
    fn test_login_with_missing_password_shows_error() {
        let mut app = App::default();
        app.navigate(View::Auth);
        type_into(&mut app, "+7 999");
        app.submit_auth();

        assert_eq!(app.session.view, View::Auth);
        let notice = app.notice.as_ref().unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(notice.title, "Sign-in failed");
        assert!(notice.message.contains("password"));
        assert_eq!(app.login_form.text("phone"), "+7 999");
    }

    #[test]
    fn test_registration_tab() {
        let mut app = App::default();
        app.navigate(View::Auth);
        app.toggle_auth_tab();
        assert_eq!(app.auth_tab, AuthTab::Register);

        let form = app.active_form_mut().unwrap();
        form.set_text("first_name", "Anna");
        form.set_text("phone", "+7 900");
        form.set_text("password", "pw");
        app.submit_auth();
        assert_eq!(app.notice.as_ref().unwrap().kind, NoticeKind::Error);

        app.registration_form.set_checked("agreement", true);
        app.submit_auth();
        assert_eq!(app.session.view, View::Dashboard);
        assert_eq!(app.session.user.as_ref().unwrap().first_name, "Anna");
    }

    #[test]
    fn test_apply_from_calculator_requires_sign_in() {
        let mut app = App::default();
        app.apply_from_calculator();
        assert_eq!(app.session.view, View::Auth);
        assert_eq!(app.notice.as_ref().unwrap().title, "Sign in required");
    }

    #[test]
    fn test_apply_from_calculator_prefills_form() {
        let mut app = signed_in_app();
        app.navigate(View::Calculator);
        app.calculator.increase_amount();
        app.apply_from_calculator();

        assert_eq!(app.session.view, View::Application);
        assert_eq!(app.application_form.text("amount"), "55000");
        assert_eq!(app.application_form.choice("term"), Some("12"));

        app.navigate(View::Calculator);
        app.calculator.increase_term();
        app.apply_from_calculator();
        assert_eq!(app.application_form.choice("term"), None);
    }

    #[test]
    fn test_submit_application() {
        let mut app = signed_in_app();
        app.new_application();
        assert_eq!(app.session.view, View::Application);
        fill_application(&mut app);
        app.submit_application();

        assert_eq!(app.session.view, View::Dashboard);
        assert_eq!(app.session.applications.len(), 1);
        assert_eq!(app.session.applications[0].status, ApplicationStatus::Pending);
        assert_eq!(app.session.applications[0].monthly_payment, 994);
        assert_eq!(app.notice.as_ref().unwrap().title, "Application sent");
        assert!(app.application_form.text("amount").is_empty());
    }

    #[test]
    fn test_incomplete_application_keeps_form() {
        let mut app = signed_in_app();
        app.new_application();
        app.application_form.set_text("amount", "50000");
        app.submit_application();

        assert_eq!(app.session.view, View::Application);
        assert!(app.session.applications.is_empty());
        assert_eq!(app.application_form.text("amount"), "50000");
        assert_eq!(app.notice.as_ref().unwrap().kind, NoticeKind::Error);
    }

    #[test]
    fn test_logout_resets_everything() {
        let mut app = signed_in_app();
        app.new_application();
        fill_application(&mut app);
        app.submit_application();
        app.logout();

        assert!(app.session.user.is_none());
        assert_eq!(app.session.applications.len(), 0);
        assert_eq!(app.session.view, View::Calculator);
        assert!(app.notice.is_none());
    }

    #[test]
    fn test_card_binding_from_dashboard() {
        let mut app = signed_in_app();
        app.start_card_binding();
        assert_eq!(app.mode, AppMode::BindingCard);
        type_into(&mut app, "4276123456789012");
        app.card_form.set_text("expiry", "12/27");
        app.card_form.set_text("cvv", "123");
        app.submit_card();

        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.session.cards().len(), 1);
        assert_eq!(
            app.notice.as_ref().unwrap().message,
            "**** **** **** 9012 is verified"
        );

        app.new_application();
        assert!(app.application_form.fields.iter().any(|f| f.key == "card"));
    }

    #[test]
    fn test_card_binding_cancel() {
        let mut app = signed_in_app();
        app.start_card_binding();
        type_into(&mut app, "4276");
        app.cancel_card_binding();
        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.card_form.text("number").is_empty());
        assert!(app.session.cards().is_empty());
    }

    #[test]
    fn test_incomplete_card_keeps_popup_open() {
        let mut app = App::default();
        app.navigate(View::Auth);
        app.start_card_binding();
        type_into(&mut app, "4276");
        app.submit_card();
        assert_eq!(app.mode, AppMode::BindingCard);
        assert!(app.session.pending_cards.is_empty());
    }

    #[test]
    fn test_dashboard_scroll_bounds() {
        let mut app = signed_in_app();
        for _ in 0..3 {
            app.new_application();
            fill_application(&mut app);
            app.submit_application();
        }
        app.scroll_applications_up();
        assert_eq!(app.dashboard_scroll, 0);
        for _ in 0..10 {
            app.scroll_applications_down();
        }
        assert_eq!(app.dashboard_scroll, 2);
    }

    #[test]
    fn test_export_prompt() {
        let mut app = App::new(LoanPolicy::default(), PathBuf::from("out"));
        app.start_export();
        assert_eq!(app.mode, AppMode::Export);
        assert_eq!(
            app.filename_input,
            PathBuf::from("out").join("applications.csv").to_string_lossy()
        );

        app.filename_input.clear();
        assert_eq!(app.get_export_filename(), app.default_export_filename());

        app.set_export_result(Err("disk full".to_string()));
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.notice.as_ref().unwrap().message, "disk full");
        assert!(app.filename_input.is_empty());
    }

    #[test]
    fn test_copy_result() {
        let mut app = App::default();
        app.set_copy_result(Err("no clipboard".to_string()));
        assert_eq!(app.notice.as_ref().unwrap().kind, NoticeKind::Error);
        assert!(app.payment_summary().contains("4534"));
    }
}
