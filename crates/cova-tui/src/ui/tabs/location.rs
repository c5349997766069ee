use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Location ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let Some(ref location) = app.location else {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            " Loading...",
            styles::muted_style(),
        )))
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    };

    let field = |label: &'static str, value: Option<String>| {
        Line::from(vec![
            Span::styled(format!(" {:<10}", label), styles::highlight_style()),
            Span::raw(value.unwrap_or_default()),
        ])
    };

    let mut lines = vec![
        field("Address", location.address.clone()),
        field("Phone", location.phone.clone()),
        field("Hours", location.opening_hours.clone()),
    ];
    if let Some(url) = location.maps_url() {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(" Open in Maps ", styles::highlight_style()),
            Span::styled(url, styles::muted_style()),
        ]));
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
