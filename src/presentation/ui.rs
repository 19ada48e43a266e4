use super::views::{
    format_amount, render_application, render_auth, render_calculator, render_dashboard, render_form,
};
use crate::application::{App, AppMode, NoticeKind, View};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

pub fn render_ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);
    match app.session.view {
        View::Calculator => render_calculator(f, app, chunks[1]),
        View::Auth => render_auth(f, app, chunks[1]),
        View::Application => render_application(f, app, chunks[1]),
        View::Dashboard => render_dashboard(f, app, chunks[1]),
    }
    render_status_bar(f, app, chunks[2]);

    match app.mode {
        AppMode::Help => render_help_popup(f, app.help_scroll),
        AppMode::BindingCard => render_card_popup(f, app),
        AppMode::Export => render_export_popup(f, app),
        AppMode::Normal => {}
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let account = if app.session.is_signed_in() {
        "F3 My applications"
    } else {
        "F3 Account"
    };
    let selected = match app.session.view {
        View::Calculator => 0,
        View::Auth | View::Application | View::Dashboard => 1,
    };
    let title = Line::from(vec![
        Span::styled(
            " MicroZaim ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled("fast microloans online ", Style::default().fg(Color::Gray)),
    ]);
    let tabs = Tabs::new(vec!["F2 Calculator", account, "F1 Help"])
        .block(Block::default().borders(Borders::ALL).title(title))
        .select(selected)
        .highlight_style(Style::default().fg(Color::Black).bg(Color::Cyan));
    f.render_widget(tabs, area);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    if app.mode == AppMode::Normal {
        if let Some(notice) = &app.notice {
            let color = match notice.kind {
                NoticeKind::Success => Color::Green,
                NoticeKind::Error => Color::Red,
            };
            let widget = Paragraph::new(notice.message.clone())
                .block(Block::default().borders(Borders::ALL).title(notice.title.clone()))
                .style(Style::default().fg(color));
            f.render_widget(widget, area);
            return;
        }
    }

    let hint = match app.mode {
        AppMode::Normal => match app.session.view {
            View::Calculator => "←→: amount | ↑↓: term | Enter: apply | y: copy | F1: help | q: quit",
            View::Auth => "Tab/↑↓: field | Enter: submit | Ctrl+R: switch tab | Ctrl+B: bind card | Esc: back",
            View::Application => "Tab/↑↓: field | ←→: choose | Space: toggle | Enter: submit | Esc: back",
            View::Dashboard => "n: new | b: bind card | e: export | ↑↓: scroll | l: sign out | q: quit",
        },
        AppMode::Help => "↑↓/jk: scroll | PgUp/PgDn: fast scroll | Home: top | Esc/q: close help",
        AppMode::BindingCard => "Tab/↑↓: field | Enter: bind card | Esc: cancel",
        AppMode::Export => "Enter: export | Esc: cancel (.json for JSON, anything else for CSV)",
    };

    let widget = Paragraph::new(hint)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(match app.mode {
            AppMode::Normal => Style::default(),
            AppMode::Help => Style::default().fg(Color::Cyan),
            AppMode::BindingCard => Style::default().fg(Color::Green),
            AppMode::Export => Style::default().fg(Color::Magenta),
        });
    f.render_widget(widget, area);
}

/// Fraction of a terminal dimension, computed in u32 so wide terminals
/// cannot overflow.
fn scale(length: u16, numerator: u16, denominator: u16) -> u16 {
    (u32::from(length) * u32::from(numerator) / u32::from(denominator)) as u16
}

fn centered_rect(width_percent: u16, height: u16, area: Rect) -> Rect {
    let width = scale(area.width, width_percent.min(100), 100);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_card_popup(f: &mut Frame, app: &App) {
    let popup_area = centered_rect(60, 8, f.area());
    f.render_widget(Clear, popup_area);
    render_form(f, &app.card_form, popup_area, app.card_form.title);
}

fn render_export_popup(f: &mut Frame, app: &App) {
    let popup_area = centered_rect(70, 3, f.area());
    f.render_widget(Clear, popup_area);
    let widget = Paragraph::new(format!("{}_", app.filename_input))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Export {} applications to", app.session.applications.len())),
        )
        .style(Style::default().fg(Color::Magenta));
    f.render_widget(widget, popup_area);
}

fn render_help_popup(f: &mut Frame, scroll: usize) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: scale(area.width, 4, 5),
        height: scale(area.height, 4, 5),
    };

    f.render_widget(Clear, popup_area);

    let help_text = help_text();
    let help_lines: Vec<&str> = help_text.lines().collect();
    let visible_height = popup_area.height.saturating_sub(2) as usize;
    let start_line = scroll.min(help_lines.len().saturating_sub(visible_height));
    let end_line = (start_line + visible_height).min(help_lines.len());
    let visible_text = help_lines[start_line..end_line].join("\n");

    let widget = Paragraph::new(visible_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("MicroZaim Help (Line {}/{})", start_line + 1, help_lines.len())),
        )
        .style(Style::default().fg(Color::White).bg(Color::Black));
    f.render_widget(widget, popup_area);
}

fn help_text() -> String {
    format!(
        r#"MICROZAIM: MICROLOANS FROM {min} TO {max}

Pick an amount and a term on the calculator, then apply. Decisions are
made within 15 minutes; priority review guarantees 5 minutes.

GLOBAL
F1              Show this help
F2              Loan calculator
F3              Account (sign in) or My applications
Ctrl+C          Quit

CALCULATOR
←/→             Change amount by {step}
↑/↓             Change term by one month
Enter           Apply for the selected loan
y               Copy the payment summary to the clipboard
q               Quit

SIGN IN / REGISTER
Tab, ↓ / Shift+Tab, ↑   Next / previous field
Ctrl+R          Switch between Sign in and Register
Ctrl+B          Bind a bank card (+85% approval odds)
Space           Toggle the terms checkbox
Enter           Submit
Esc             Back to the calculator

LOAN APPLICATION
←/→             Choose term, purpose or payout card
Space           Toggle priority review
Enter           Submit the application
Esc             Back

MY APPLICATIONS
n               New application
b               Bind a bank card
e               Export applications (.json or .csv)
↑/↓             Scroll the application list
l               Sign out
q               Quit

HELP WINDOW
↑↓ or j/k       Scroll help text up/down one line
Page Up/Down    Scroll help text up/down 5 lines
Home            Jump to top of help text
Esc/F1/q        Close this help window"#,
        min = format_amount(crate::domain::AMOUNT_MIN),
        max = format_amount(crate::domain::AMOUNT_MAX),
        step = format_amount(crate::domain::AMOUNT_STEP),
    )
}
