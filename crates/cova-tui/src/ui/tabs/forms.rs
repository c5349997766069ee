use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use cova_core::models::OrderRequest;
use cova_core::utils::format_price;

use crate::app::{App, AppState, AuthMode, Submission};
use crate::form::FormState;
use crate::ui::styles;

/// Width of the label column
const LABEL_WIDTH: usize = 11;

pub fn render_booking(frame: &mut Frame, app: &App, area: Rect) {
    let editing = matches!(app.state, AppState::Editing);
    render_form(
        frame,
        app,
        &app.booking_form,
        Submission::Booking,
        " Book a Table ",
        Vec::new(),
        editing,
        area,
    );
}

pub fn render_order(frame: &mut Frame, app: &App, area: Rect) {
    let order = OrderRequest::first_item(&app.menu, "", "");
    let summary = match app.menu.first() {
        Some(item) => vec![
            Line::from(vec![
                Span::styled(" Ordering: ", styles::muted_style()),
                Span::raw(format!("1 x {} ", item.name)),
                Span::styled(format_price(order.total), styles::price_style()),
            ]),
            Line::from(Span::styled(
                " Demo cart: the first menu item, quantity 1.",
                styles::muted_style(),
            )),
            Line::from(""),
        ],
        None => vec![
            Line::from(Span::styled(" Menu coming soon.", styles::muted_style())),
            Line::from(""),
        ],
    };

    let editing = matches!(app.state, AppState::Editing);
    render_form(
        frame,
        app,
        &app.order_form,
        Submission::Order,
        " Online Orders ",
        summary,
        editing,
        area,
    );
}

pub fn render_account(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let editing = matches!(app.state, AppState::Editing);
    let header = |active: bool| {
        let text = if app.authed {
            " You are signed in."
        } else if active {
            " [←/→] switch form"
        } else {
            ""
        };
        vec![Line::from(Span::styled(text, styles::muted_style())), Line::from("")]
    };

    let sign_in_active = app.auth_mode == AuthMode::SignIn;
    render_form(
        frame,
        app,
        &app.sign_in_form,
        Submission::SignIn,
        " Sign in ",
        header(sign_in_active),
        editing && sign_in_active,
        chunks[0],
    );
    render_form(
        frame,
        app,
        &app.sign_up_form,
        Submission::SignUp,
        " Sign up ",
        header(!sign_in_active),
        editing && !sign_in_active,
        chunks[1],
    );
}

#[allow(clippy::too_many_arguments)]
fn render_form(
    frame: &mut Frame,
    app: &App,
    form: &FormState,
    kind: Submission,
    title: &str,
    mut lines: Vec<Line>,
    focused: bool,
    area: Rect,
) {
    for (i, field) in form.fields.iter().enumerate() {
        let field_focused = focused && form.focus == i;
        let label = if field.required {
            format!(" {}*", field.label)
        } else {
            format!(" {}", field.label)
        };

        let value = if field.value.is_empty() && !field_focused {
            Span::styled(field.placeholder, styles::muted_style())
        } else {
            let cursor = if field_focused { "▌" } else { "" };
            let style = if field_focused {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            Span::styled(format!("{}{}", field.display_value(), cursor), style)
        };

        lines.push(Line::from(vec![
            Span::styled(format!("{:<width$} ", label, width = LABEL_WIDTH), styles::muted_style()),
            value,
        ]));
    }

    lines.push(Line::from(""));
    let button_focused = focused && form.on_button();
    let label = if app.busy() == Some(kind) {
        kind.busy_label()
    } else {
        kind.button_label()
    };
    let button_style = if button_focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    if button_focused {
        lines.push(Line::from(vec![
            Span::raw(" ["),
            Span::styled(format!(" ▶ {} ◀ ", label), button_style),
            Span::raw("]"),
        ]));
    } else {
        lines.push(Line::from(vec![
            Span::raw(" ["),
            Span::styled(format!("   {}   ", label), button_style),
            Span::raw("]"),
        ]));
    }

    if let Some(ref error) = form.error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {}", error),
            styles::error_style(),
        )));
    } else if !focused && app.active_submission() == Some(kind) {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            " Press Enter to fill in",
            styles::muted_style(),
        )));
    }

    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
