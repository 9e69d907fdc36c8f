use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

use crate::domain::email::EmailSummary;
use crate::domain::query::Status;
use crate::format::{
    EMPTY_LIST_MESSAGE, count_label, extract_address, format_display_date, format_short_date,
    sender_name, subject_initial,
};
use crate::terminal::state::{AppState, Focus, ViewMode};

pub fn render(f: &mut Frame, state: &AppState) {
    let [header, banner, main, footer] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(f.area());

    render_header(f, header, state);
    render_banner(f, banner, state);

    match state.mode {
        ViewMode::ListOnly => render_list(f, main, state),
        ViewMode::Split => {
            let [left, right] =
                Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
                    .areas(main);
            render_list(f, left, state);
            render_detail(f, right, state);
        }
    }

    render_footer(f, footer, state);
}

fn border(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn render_header(f: &mut Frame, area: Rect, state: &AppState) {
    let q = state.inbox.state();
    let status = match q.status {
        Status::Idle => Span::raw(""),
        Status::Loading => Span::styled("loading…", Style::default().fg(Color::Yellow)),
        Status::Ready => Span::styled("ready", Style::default().fg(Color::Green)),
        Status::Error => Span::styled("error", Style::default().fg(Color::Red)),
    };
    let mut spans = vec![
        Span::styled("Filter ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(q.filter.to_string()),
        Span::raw("   "),
        Span::styled("Limit ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!("{} emails", q.limit)),
    ];
    if let Some(since) = q.since {
        spans.push(Span::raw("   "));
        spans.push(Span::styled("Since ", Style::default().add_modifier(Modifier::BOLD)));
        spans.push(Span::raw(since.format("%Y-%m-%d").to_string()));
    }
    spans.push(Span::raw("   "));
    spans.push(status);

    let p = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .title(" Email Inbox ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue)),
    );
    f.render_widget(p, area);
}

fn render_banner(f: &mut Frame, area: Rect, state: &AppState) {
    let q = state.inbox.state();
    let line = match &q.error_message {
        Some(msg) => Line::from(Span::styled(
            format!(" ✗ {msg}"),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        None => Line::from(Span::styled(
            format!(" {}", count_label(q.results.len())),
            Style::default().fg(Color::Gray),
        )),
    };
    f.render_widget(Paragraph::new(line), area);
}

fn summary_item(e: &EmailSummary) -> ListItem<'static> {
    let mut top = vec![
        Span::styled(
            format!("[{}] ", subject_initial(&e.subject)),
            Style::default().fg(Color::Blue),
        ),
    ];
    if e.urgent {
        top.push(Span::styled(
            "! ",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }
    top.push(Span::styled(
        e.subject.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    ));
    if let Some(sku) = &e.sku {
        top.push(Span::styled(format!("  {sku}"), Style::default().fg(Color::Magenta)));
    }

    let bottom = Line::from(vec![
        Span::raw("    "),
        Span::styled(sender_name(&e.from), Style::default().fg(Color::Gray)),
        Span::raw(" · "),
        Span::styled(format_short_date(&e.date), Style::default().fg(Color::DarkGray)),
    ]);

    ListItem::new(Text::from(vec![Line::from(top), bottom]))
}

fn render_list(f: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .title(" Inbox ")
        .borders(Borders::ALL)
        .border_style(border(state.focus == Focus::List));

    let q = state.inbox.state();
    if q.is_loading() && q.results.is_empty() {
        f.render_widget(Paragraph::new("Loading emails…").block(block), area);
        return;
    }
    if q.results.is_empty() {
        f.render_widget(
            Paragraph::new(EMPTY_LIST_MESSAGE)
                .style(Style::default().fg(Color::Gray))
                .block(block),
            area,
        );
        return;
    }

    let items: Vec<ListItem> = q.results.iter().map(summary_item).collect();
    let list = List::new(items)
        .block(block)
        .highlight_symbol("➜ ")
        .highlight_style(Style::default().fg(Color::Green));

    f.render_stateful_widget(list, area, &mut state.list_state.clone());
}

fn render_detail(f: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .title(" Email ")
        .borders(Borders::ALL)
        .border_style(border(state.focus == Focus::Body));

    let d = state.detail.state();
    let text = match (d.status, &d.detail) {
        (Status::Loading, _) => Text::raw("Loading email…"),
        (Status::Error, _) => Text::styled(
            d.error_message.clone().unwrap_or_default(),
            Style::default().fg(Color::Red),
        ),
        (_, Some(e)) => {
            let bold = Style::default().add_modifier(Modifier::BOLD);
            let mut lines = vec![
                Line::from(Span::styled(e.subject.clone(), bold)),
                Line::from(vec![
                    Span::styled("From: ", bold),
                    Span::raw(format!("{} <{}>", sender_name(&e.from), extract_address(&e.from))),
                ]),
                Line::from(vec![Span::styled("To: ", bold), Span::raw(e.to.clone())]),
                Line::from(vec![
                    Span::styled("Date: ", bold),
                    Span::raw(format_display_date(&e.date)),
                ]),
                Line::raw(""),
            ];
            lines.extend(e.body.lines().map(|l| Line::raw(l.to_string())));
            Text::from(lines)
        }
        (_, None) => Text::raw("Select an email to view details."),
    };

    let p = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((state.body_scroll, 0));
    f.render_widget(p, area);
}

fn render_footer(f: &mut Frame, area: Rect, state: &AppState) {
    if let Some(notice) = &state.notice {
        f.render_widget(
            Paragraph::new(Span::styled(notice.clone(), Style::default().fg(Color::Yellow))),
            area,
        );
        return;
    }

    let key = |k: &'static str| Span::styled(k, Style::default().add_modifier(Modifier::BOLD));
    let hint = Paragraph::new(Line::from(vec![
        key("j/k"),
        Span::raw(" move  "),
        key("Enter"),
        Span::raw(" open  "),
        key("f/F"),
        Span::raw(" filter  "),
        key("l/L"),
        Span::raw(" limit  "),
        key("r"),
        Span::raw(" refresh  "),
        key("Tab"),
        Span::raw(" focus  "),
        key("q"),
        Span::raw(" quit"),
    ]));
    f.render_widget(hint, area);
}
