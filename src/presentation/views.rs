use crate::application::{App, AuthTab, FieldKind, FormEditor};
use crate::domain::{
    Application, ApplicationStatus, DashboardStats, AMOUNT_MAX, AMOUNT_MIN, TERM_MAX, TERM_MIN,
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Table, Tabs, Wrap},
    Frame,
};

/// Formats whole currency units with thin grouping: `54 410 ₽`.
pub fn format_amount(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }
    format!("{grouped} ₽")
}

fn status_style(status: ApplicationStatus) -> Style {
    match status {
        ApplicationStatus::Pending => Style::default().fg(Color::Yellow),
        ApplicationStatus::Approved => Style::default().fg(Color::Green),
        ApplicationStatus::Rejected => Style::default().fg(Color::Red),
    }
}

pub fn render_calculator(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Loan calculator");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Length(5),
            Constraint::Min(0),
        ])
        .split(inner);

    let calculator = app.calculator;
    let amount_ratio = (calculator.amount - AMOUNT_MIN) as f64 / (AMOUNT_MAX - AMOUNT_MIN) as f64;
    let amount_gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(format!(
            "Amount: {}  (←/→, {} to {})",
            format_amount(calculator.amount),
            format_amount(AMOUNT_MIN),
            format_amount(AMOUNT_MAX)
        )))
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(amount_ratio.clamp(0.0, 1.0))
        .label(format_amount(calculator.amount));
    f.render_widget(amount_gauge, chunks[0]);

    let term_ratio = (calculator.term_months - TERM_MIN) as f64 / (TERM_MAX - TERM_MIN) as f64;
    let term_gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(format!(
            "Term: {} months  (↑/↓, {TERM_MIN} to {TERM_MAX})",
            calculator.term_months
        )))
        .gauge_style(Style::default().fg(Color::Blue))
        .ratio(term_ratio.clamp(0.0, 1.0))
        .label(format!("{} months", calculator.term_months));
    f.render_widget(term_gauge, chunks[1]);

    let rate = Paragraph::new(format!(" Interest rate: {}% per year", app.session.policy.annual_rate))
        .style(Style::default().fg(Color::Gray));
    f.render_widget(rate, chunks[2]);

    let result = app.payment();
    let figures = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(chunks[3]);
    let cards = [
        ("Monthly payment", result.monthly_payment, Color::Cyan),
        ("Total to repay", result.total_repayment, Color::Blue),
        ("Overpayment", result.overpayment, Color::LightRed),
    ];
    for ((title, value, color), area) in cards.into_iter().zip(figures.iter()) {
        let widget = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                format_amount(value),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
        ])
        .alignment(ratatui::layout::Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(widget, *area);
    }

    let hint = Paragraph::new(" Enter: apply for this loan | y: copy summary")
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(hint, chunks[4]);
}

/// Draws a form as one line per field, highlighting the focused one.
pub fn render_form(f: &mut Frame, form: &FormEditor, area: Rect, title: &str) {
    let lines: Vec<Line> = form
        .fields
        .iter()
        .enumerate()
        .map(|(index, field)| {
            let focused = index == form.focus;
            let marker = if field.required { " *" } else { "" };
            let value = match field.kind {
                FieldKind::Select(_) if focused => format!("◀ {} ▶", field.display_value()),
                _ => field.display_value(),
            };
            let label_style = if focused {
                Style::default().fg(Color::Black).bg(Color::LightBlue)
            } else {
                Style::default().fg(Color::Yellow)
            };
            let cursor = if focused && matches!(field.kind, FieldKind::Text | FieldKind::Numeric | FieldKind::Secret) {
                "_"
            } else {
                ""
            };
            Line::from(vec![
                Span::styled(format!(" {}{}: ", field.label, marker), label_style),
                Span::raw(value),
                Span::styled(cursor, Style::default().add_modifier(Modifier::SLOW_BLINK)),
            ])
        })
        .collect();

    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .wrap(Wrap { trim: false });
    f.render_widget(widget, area);
}

pub fn render_auth(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(4)])
        .split(area);

    let selected = match app.auth_tab {
        AuthTab::Login => 0,
        AuthTab::Register => 1,
    };
    let tabs = Tabs::new(vec!["Sign in", "Register"])
        .block(Block::default().borders(Borders::ALL).title("Account (Ctrl+R to switch)"))
        .select(selected)
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, chunks[0]);

    let form = match app.auth_tab {
        AuthTab::Login => &app.login_form,
        AuthTab::Register => &app.registration_form,
    };
    render_form(f, form, chunks[1], form.title);

    let pending = app.session.pending_cards.len();
    let card_text = if pending == 0 {
        "Bind a bank card to raise your approval odds by 85% (Ctrl+B)".to_string()
    } else {
        format!("{pending} card(s) will be linked when you sign in (Ctrl+B to add another)")
    };
    let card_hint = Paragraph::new(card_text)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Card binding"))
        .style(Style::default().fg(Color::Green));
    f.render_widget(card_hint, chunks[2]);
}

pub fn render_application(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);

    render_form(f, &app.application_form, chunks[0], app.application_form.title);

    let fee = app.session.policy.premium_fee;
    let footer = Paragraph::new(format!(
        " Priority review costs {} and guarantees a decision within 5 minutes | Enter: submit | Esc: back",
        format_amount(fee)
    ))
    .block(Block::default().borders(Borders::ALL))
    .style(Style::default().fg(Color::DarkGray));
    f.render_widget(footer, chunks[1]);
}

pub fn render_dashboard(f: &mut Frame, app: &App, area: Rect) {
    let Some(user) = app.session.user.as_ref() else {
        return;
    };
    let applications = &app.session.applications;
    let stats = DashboardStats::from_applications(applications);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Min(5),
        ])
        .split(area);

    let profile = Paragraph::new(Line::from(vec![
        Span::styled(user.display_name(), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled(user.phone.clone(), Style::default().fg(Color::Gray)),
        Span::raw("  "),
        Span::styled(user.email.clone(), Style::default().fg(Color::Gray)),
    ]))
    .block(Block::default().borders(Borders::ALL).title("Profile (l: sign out)"));
    f.render_widget(profile, chunks[0]);

    let stat_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(chunks[1]);
    let stat_values = [
        ("Applications", stats.total.to_string()),
        ("Approved", stats.approved.to_string()),
        ("Total loaned", format_amount(stats.total_loaned)),
    ];
    for ((title, value), area) in stat_values.into_iter().zip(stat_areas.iter()) {
        let widget = Paragraph::new(value)
            .alignment(ratatui::layout::Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(widget, *area);
    }

    let extras = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[2]);
    render_cards(f, app, extras[0]);
    render_premium(f, applications, &stats, extras[1]);

    render_application_list(f, app, chunks[3]);
}

fn render_cards(f: &mut Frame, app: &App, area: Rect) {
    let cards = app.session.cards();
    let lines: Vec<Line> = if cards.is_empty() {
        vec![Line::from(Span::styled(
            "No cards yet. Binding one raises approval odds by 85%",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        cards
            .iter()
            .map(|card| {
                let mut spans = vec![Span::raw(format!(
                    "{}  {} • {}",
                    card.masked_number, card.bank_name, card.expiry
                ))];
                if card.verified {
                    spans.push(Span::styled("  verified", Style::default().fg(Color::Green)));
                }
                Line::from(spans)
            })
            .collect()
    };
    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Bank cards (b: add)"));
    f.render_widget(widget, area);
}

fn render_premium(f: &mut Frame, applications: &[Application], stats: &DashboardStats, area: Rect) {
    let lines: Vec<Line> = if stats.premium.is_empty() {
        vec![Line::from(Span::styled(
            "No active premium services",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        applications
            .iter()
            .filter(|app| stats.premium.contains(&app.id))
            .map(|app| {
                Line::from(vec![
                    Span::styled("★ ", Style::default().fg(Color::Yellow)),
                    Span::raw(format!(
                        "Priority review for {}  {}",
                        format_amount(app.amount),
                        format_amount(app.premium_service_cost)
                    )),
                ])
            })
            .collect()
    };
    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Premium services"),
    );
    f.render_widget(widget, area);
}

fn render_application_list(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("My applications (n: new, e: export)");

    let applications = &app.session.applications;
    if applications.is_empty() {
        let empty = Paragraph::new("No applications yet. Press n to submit your first one.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let header = Row::new(vec!["Amount", "Term", "Submitted", "Status", "Monthly"])
        .style(Style::default().fg(Color::Yellow))
        .height(1);
    let rows: Vec<Row> = applications
        .iter()
        .enumerate()
        .skip(app.dashboard_scroll)
        .map(|(index, application)| {
            let monthly = match application.status {
                ApplicationStatus::Approved => format_amount(application.monthly_payment),
                ApplicationStatus::Pending | ApplicationStatus::Rejected => String::new(),
            };
            let style = if index == app.dashboard_scroll {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(format_amount(application.amount)),
                Cell::from(format!("{} mo.", application.term_months)),
                Cell::from(application.created_at.format("%d.%m.%Y").to_string()),
                Cell::from(application.status.label()).style(status_style(application.status)),
                Cell::from(monthly),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(12),
        Constraint::Length(8),
        Constraint::Length(12),
        Constraint::Length(14),
        Constraint::Min(10),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .column_spacing(1);
    f.render_widget(table, area);
}
