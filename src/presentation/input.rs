use crate::application::{App, AppMode, View};
use crate::infrastructure::{ApplicationExporter, ClipboardService};
use crossterm::event::{KeyCode, KeyModifiers};

pub struct InputHandler;

/// What Enter means for the form that currently has focus.
enum FormTarget {
    Auth,
    Application,
    Card,
}

impl InputHandler {
    /// Whether this key press should end the program.
    ///
    /// Ctrl+C always quits; `q` only where it cannot be typed into a form.
    pub fn is_quit(app: &App, key: KeyCode, modifiers: KeyModifiers) -> bool {
        match key {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => true,
            KeyCode::Char('q') => {
                app.mode == AppMode::Normal
                    && matches!(app.session.view, View::Calculator | View::Dashboard)
            }
            _ => false,
        }
    }

    pub fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        match app.mode {
            AppMode::Normal => Self::handle_normal_mode(app, key, modifiers),
            AppMode::Help => Self::handle_help_mode(app, key),
            AppMode::BindingCard => Self::handle_form_keys(app, key, modifiers, FormTarget::Card),
            AppMode::Export => Self::handle_export_mode(app, key),
        }
    }

    fn handle_normal_mode(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        match key {
            KeyCode::F(1) => {
                app.mode = AppMode::Help;
                app.help_scroll = 0;
                return;
            }
            KeyCode::F(2) => {
                app.navigate(View::Calculator);
                return;
            }
            KeyCode::F(3) => {
                app.navigate(if app.session.is_signed_in() { View::Dashboard } else { View::Auth });
                return;
            }
            _ => {}
        }

        match app.session.view {
            View::Calculator => Self::handle_calculator(app, key),
            View::Auth => Self::handle_auth(app, key, modifiers),
            View::Application => {
                if key == KeyCode::Esc {
                    app.navigate(View::Dashboard);
                } else {
                    Self::handle_form_keys(app, key, modifiers, FormTarget::Application);
                }
            }
            View::Dashboard => Self::handle_dashboard(app, key),
        }
    }

    fn handle_calculator(app: &mut App, key: KeyCode) {
        app.notice = None;
        match key {
            KeyCode::Right | KeyCode::Char('l') => app.calculator.increase_amount(),
            KeyCode::Left | KeyCode::Char('h') => app.calculator.decrease_amount(),
            KeyCode::Up | KeyCode::Char('k') => app.calculator.increase_term(),
            KeyCode::Down | KeyCode::Char('j') => app.calculator.decrease_term(),
            KeyCode::Enter => app.apply_from_calculator(),
            KeyCode::Char('y') => {
                let result = ClipboardService::copy(&app.payment_summary()).map_err(|e| e.to_string());
                app.set_copy_result(result);
            }
            _ => {}
        }
    }

    fn handle_auth(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            match key {
                KeyCode::Char('r') => {
                    app.toggle_auth_tab();
                    return;
                }
                KeyCode::Char('b') => {
                    app.start_card_binding();
                    return;
                }
                _ => {}
            }
        }

        if key == KeyCode::Esc {
            app.navigate(View::Calculator);
            return;
        }
        Self::handle_form_keys(app, key, modifiers, FormTarget::Auth);
    }

    fn handle_dashboard(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Char('n') => app.new_application(),
            KeyCode::Char('b') => app.start_card_binding(),
            KeyCode::Char('e') => app.start_export(),
            KeyCode::Char('l') => app.logout(),
            KeyCode::Down | KeyCode::Char('j') => app.scroll_applications_down(),
            KeyCode::Up | KeyCode::Char('k') => app.scroll_applications_up(),
            KeyCode::Esc => app.notice = None,
            _ => {}
        }
    }

    fn handle_form_keys(app: &mut App, key: KeyCode, modifiers: KeyModifiers, target: FormTarget) {
        match key {
            KeyCode::Enter => {
                match target {
                    FormTarget::Auth => app.submit_auth(),
                    FormTarget::Application => app.submit_application(),
                    FormTarget::Card => app.submit_card(),
                }
                return;
            }
            KeyCode::Esc => {
                if let FormTarget::Card = target {
                    app.cancel_card_binding();
                }
                return;
            }
            _ => {}
        }

        let Some(form) = app.active_form_mut() else {
            return;
        };
        match key {
            KeyCode::Tab | KeyCode::Down => form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => form.focus_previous(),
            KeyCode::Right => form.cycle_choice(true),
            KeyCode::Left => form.cycle_choice(false),
            KeyCode::Backspace => form.backspace(),
            // unbound Ctrl/Alt chords are not text
            KeyCode::Char(_) if modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {}
            KeyCode::Char(c) => form.insert_char(c),
            _ => {}
        }
    }

    fn handle_help_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('q') => {
                app.mode = AppMode::Normal;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if app.help_scroll > 0 {
                    app.help_scroll -= 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.help_scroll += 1;
            }
            KeyCode::PageUp => {
                app.help_scroll = app.help_scroll.saturating_sub(5);
            }
            KeyCode::PageDown => {
                app.help_scroll += 5;
            }
            KeyCode::Home => {
                app.help_scroll = 0;
            }
            _ => {}
        }
    }

    fn handle_export_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter => {
                let filename = app.get_export_filename();
                let result = ApplicationExporter::export(&app.session.applications, &filename)
                    .map_err(|e| e.to_string());
                app.set_export_result(result);
            }
            KeyCode::Esc => {
                app.cancel_export();
            }
            KeyCode::Backspace => {
                app.filename_input.pop();
            }
            KeyCode::Char(c) => {
                app.filename_input.push(c);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{AuthTab, NoticeKind};
    use crate::domain::LoanPolicy;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn press(app: &mut App, key: KeyCode) {
        InputHandler::handle_key_event(app, key, KeyModifiers::NONE);
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn sign_in(app: &mut App) {
        press(app, KeyCode::F(3));
        type_text(app, "+7 999 123-45-67");
        press(app, KeyCode::Tab);
        type_text(app, "secret");
        press(app, KeyCode::Enter);
    }

    #[test]
    fn test_calculator_keys_move_sliders() {
        let mut app = App::default();
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.calculator.amount, 60_000);
        assert_eq!(app.calculator.term_months, 13);

        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.calculator.amount, 55_000);
        assert_eq!(app.calculator.term_months, 12);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = App::default();
        assert!(InputHandler::is_quit(&app, KeyCode::Char('q'), KeyModifiers::NONE));
        assert!(InputHandler::is_quit(&app, KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!InputHandler::is_quit(&app, KeyCode::Char('c'), KeyModifiers::NONE));

        press(&mut app, KeyCode::F(3));
        assert_eq!(app.session.view, View::Auth);
        assert!(!InputHandler::is_quit(&app, KeyCode::Char('q'), KeyModifiers::NONE));
        assert!(InputHandler::is_quit(&app, KeyCode::Char('c'), KeyModifiers::CONTROL));
    }

    #[test]
    fn test_sign_in_by_keyboard() {
        let mut app = App::default();
        sign_in(&mut app);
        assert_eq!(app.session.view, View::Dashboard);
        assert_eq!(app.session.user.as_ref().unwrap().phone, "+7 999 123-45-67");
    }

    #[test]
    fn test_auth_tab_switch_and_escape() {
        let mut app = App::default();
        press(&mut app, KeyCode::F(3));
        InputHandler::handle_key_event(&mut app, KeyCode::Char('r'), KeyModifiers::CONTROL);
        assert_eq!(app.auth_tab, AuthTab::Register);
        type_text(&mut app, "Anna");
        assert_eq!(app.registration_form.text("first_name"), "Anna");
        assert!(app.login_form.text("phone").is_empty());

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.session.view, View::Calculator);
    }

    #[test]
    fn test_application_form_by_keyboard() {
        let mut app = App::default();
        sign_in(&mut app);
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.session.view, View::Application);

        type_text(&mut app, "30000");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "70000");
        for _ in 0..3 {
            press(&mut app, KeyCode::Tab);
        }
        type_text(&mut app, "4510");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.session.view, View::Dashboard);
        let application = &app.session.applications[0];
        assert_eq!(application.amount, 30_000);
        assert_eq!(application.term_months, 6);
        assert_eq!(application.income, 70_000);
        assert_eq!(application.passport.series, "4510");
        assert_eq!(application.monthly_payment, 596);
    }

    #[test]
    fn test_control_chords_are_not_typed_into_forms() {
        let mut app = App::default();
        sign_in(&mut app);
        press(&mut app, KeyCode::Char('n'));
        for _ in 0..5 {
            press(&mut app, KeyCode::Tab);
        }
        assert_eq!(app.application_form.fields[app.application_form.focus].key, "workplace");

        type_text(&mut app, "Acme");
        InputHandler::handle_key_event(&mut app, KeyCode::Char('b'), KeyModifiers::CONTROL);
        InputHandler::handle_key_event(&mut app, KeyCode::Char('r'), KeyModifiers::CONTROL);
        InputHandler::handle_key_event(&mut app, KeyCode::Char('x'), KeyModifiers::ALT);
        InputHandler::handle_key_event(&mut app, KeyCode::Char('C'), KeyModifiers::SHIFT);
        assert_eq!(app.application_form.text("workplace"), "AcmeC");

        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('b'));
        assert_eq!(app.mode, AppMode::BindingCard);
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "ANNA");
        InputHandler::handle_key_event(&mut app, KeyCode::Char('v'), KeyModifiers::CONTROL);
        assert_eq!(app.card_form.text("holder"), "ANNA");
    }

    #[test]
    fn test_application_escape_returns_to_dashboard() {
        let mut app = App::default();
        sign_in(&mut app);
        press(&mut app, KeyCode::Char('n'));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.session.view, View::Dashboard);
        assert!(app.session.applications.is_empty());
    }

    #[test]
    fn test_card_binding_popup_by_keyboard() {
        let mut app = App::default();
        sign_in(&mut app);
        press(&mut app, KeyCode::Char('b'));
        assert_eq!(app.mode, AppMode::BindingCard);

        type_text(&mut app, "4276123456781111");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "12/27");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "123");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.session.cards()[0].masked_number, "**** **** **** 1111");
    }

    #[test]
    fn test_card_binding_escape() {
        let mut app = App::default();
        press(&mut app, KeyCode::F(3));
        InputHandler::handle_key_event(&mut app, KeyCode::Char('b'), KeyModifiers::CONTROL);
        assert_eq!(app.mode, AppMode::BindingCard);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.session.view, View::Auth);
    }

    #[test]
    fn test_logout_key() {
        let mut app = App::default();
        sign_in(&mut app);
        press(&mut app, KeyCode::Char('l'));
        assert!(app.session.user.is_none());
        assert_eq!(app.session.view, View::Calculator);
    }

    #[test]
    fn test_help_mode() {
        let mut app = App::default();
        press(&mut app, KeyCode::F(1));
        assert_eq!(app.mode, AppMode::Help);
        press(&mut app, KeyCode::PageDown);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.help_scroll, 4);
        press(&mut app, KeyCode::Home);
        assert_eq!(app.help_scroll, 0);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn test_export_from_dashboard() {
        let dir = tempdir().unwrap();
        let mut app = App::new(LoanPolicy::default(), PathBuf::from(dir.path()));
        sign_in(&mut app);

        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.mode, AppMode::Export);
        for _ in 0..".csv".len() {
            press(&mut app, KeyCode::Backspace);
        }
        type_text(&mut app, ".json");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.notice.as_ref().unwrap().kind, NoticeKind::Success);
        assert!(dir.path().join("applications.json").exists());
    }

    #[test]
    fn test_export_escape() {
        let mut app = App::default();
        sign_in(&mut app);
        press(&mut app, KeyCode::Char('e'));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.filename_input.is_empty());
    }
}
