use chrono::Datelike;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, AppState, NotificationKind, Tab};

use super::styles;
use super::tabs::{forms, location, menu};

const TAGLINE: &str =
    "A minimal restaurant experience. Reserve, order, and enjoy our bestselling dishes.";

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(2), // Tabs
            Constraint::Min(10),   // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_tabs(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    // Render overlays
    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame);
    }

    if matches!(app.state, AppState::ConfirmingQuit) {
        render_quit_overlay(frame);
    }

    if app.notification.is_some() {
        render_notification(frame, app);
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  COVA";
    let session_hint = if app.authed { "[l] Logout" } else { "[a] Sign in" };
    let help_hint = "  [?] Help";
    let right_len = session_hint.len() + help_hint.len();

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(
            (area.width as usize).saturating_sub(title.len() + right_len + 2),
        )),
        Span::styled(session_hint, styles::highlight_style()),
        Span::styled(help_hint, styles::muted_style()),
    ]);
    let tagline = Line::from(Span::styled(format!("  {}", TAGLINE), styles::muted_style()));

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(vec![title_line, tagline]).block(block);
    frame.render_widget(paragraph, area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::raw(" ")];
    for (i, tab) in Tab::ALL.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        let label = format!("[{}] {}", i + 1, tab.title());
        if *tab == app.current_tab {
            spans.push(Span::styled(label, styles::tab_style(true)));
        } else {
            spans.push(Span::styled(label, styles::muted_style()));
        }
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.current_tab {
        Tab::Menu => menu::render_menu(frame, app, area),
        Tab::Bestsellers => menu::render_bestsellers(frame, app, area),
        Tab::Booking => forms::render_booking(frame, app, area),
        Tab::Order => forms::render_order(frame, app, area),
        Tab::Location => location::render(frame, app, area),
        Tab::Account => forms::render_account(frame, app, area),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let footer = format!(" © {} COVA ", chrono::Local::now().year());

    let left_text = if let Some(kind) = app.busy() {
        format!(" {} [Esc] cancel ", kind.busy_label())
    } else if let Some(ref msg) = app.status_message {
        format!(" {} ", msg)
    } else {
        " [q]uit ".to_string()
    };

    let width = area.width as usize;
    let padding_len = width
        .saturating_sub(left_text.chars().count())
        .saturating_sub(footer.chars().count());
    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(footer, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(52, 24, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");
    let key = |k: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<10}", k), styles::help_key_style()),
            Span::styled(desc, styles::help_desc_style()),
        ])
    };

    let help_text = vec![
        Line::from(Span::styled("  COVA", styles::title_style())),
        Line::from(Span::styled(
            format!("  version {}", version),
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        key("1-6", "Switch tabs"),
        key("←/→", "Prev/next tab"),
        key("↑/↓", "Move through the menu"),
        key("Enter", "Edit the form on this tab"),
        Line::from(""),
        Line::from(Span::styled(" Forms", styles::highlight_style())),
        key("Tab/↓", "Next field"),
        key("S-Tab/↑", "Previous field"),
        key("Enter", "Submit from the button"),
        key("←/→", "Sign in / Sign up (Account)"),
        key("Esc", "Cancel request or stop editing"),
        Line::from(""),
        Line::from(Span::styled(" Actions", styles::highlight_style())),
        key("a / l", "Sign in / Logout"),
        key("r", "Reload menu and location"),
        key("q", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

fn render_notification(frame: &mut Frame, app: &App) {
    let Some(ref notification) = app.notification else {
        return;
    };
    let width = (notification.message.chars().count() as u16 + 8).max(30);
    let area = centered_rect_fixed(width, 6, frame.area());
    frame.render_widget(Clear, area);

    let style = match notification.kind {
        NotificationKind::Success => styles::success_style(),
        NotificationKind::Error => styles::error_style(),
    };

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(format!("  {}", notification.message), style)),
        Line::from(""),
        Line::from(Span::styled("  Press any key", styles::muted_style())),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(style);

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

/// Create a centered rectangle with fixed dimensions
pub fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(40, 7, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
