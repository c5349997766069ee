use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use cova_core::models::MenuItem;
use cova_core::utils::{format_price, truncate_string};

use crate::app::App;
use crate::ui::styles;

const NAME_WIDTH: usize = 28;

pub fn render_menu(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<&MenuItem> = app.menu.iter().collect();
    render_items(
        frame,
        &items,
        app.menu_selection,
        " Menu ",
        "Menu coming soon.",
        area,
    );
}

pub fn render_bestsellers(frame: &mut Frame, app: &App, area: Rect) {
    render_items(
        frame,
        &app.bestsellers(),
        app.bestseller_selection,
        " Bestsellers ",
        "Bestsellers will appear here once added.",
        area,
    );
}

fn render_items(
    frame: &mut Frame,
    items: &[&MenuItem],
    selection: usize,
    title: &str,
    empty_text: &str,
    area: Rect,
) {
    if items.is_empty() {
        let block = Block::default()
            .title(title)
            .title_style(styles::title_style())
            .borders(Borders::ALL)
            .border_style(styles::border_style(true));
        let paragraph = Paragraph::new(Line::from(Span::styled(
            format!(" {}", empty_text),
            styles::muted_style(),
        )))
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let list_items: Vec<ListItem> = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let mut spans = vec![
                Span::raw(format!(
                    " {:<width$} ",
                    truncate_string(&item.name, NAME_WIDTH),
                    width = NAME_WIDTH
                )),
                Span::styled(format!("{:>8}", format_price(item.price)), styles::price_style()),
            ];
            if item.is_bestseller {
                spans.push(Span::raw(" "));
                spans.push(Span::styled(" Bestseller ", styles::bestseller_tag_style()));
            }

            let style = if i == selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            ListItem::new(Line::from(spans)).style(style)
        })
        .collect();

    let block = Block::default()
        .title(format!("{}({}) ", title, items.len()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let list = List::new(list_items).block(block);
    let mut state = ListState::default();
    state.select(Some(selection.min(items.len() - 1)));
    frame.render_stateful_widget(list, chunks[0], &mut state);

    render_item_card(frame, items.get(selection).copied(), chunks[1]);
}

fn render_item_card(frame: &mut Frame, item: Option<&MenuItem>, area: Rect) {
    let Some(item) = item else {
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(item.name.clone(), styles::title_style())),
        Line::from(Span::styled(format_price(item.price), styles::price_style())),
        Line::from(""),
    ];
    if item.is_bestseller {
        lines.push(Line::from(Span::styled(" Bestseller ", styles::bestseller_tag_style())));
        lines.push(Line::from(""));
    }
    if let Some(ref description) = item.description {
        lines.push(Line::from(description.clone()));
    }
    if let Some(ref image) = item.image {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Image: ", styles::muted_style()),
            Span::raw(image.clone()),
        ]));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
