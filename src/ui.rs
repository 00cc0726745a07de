use ratatui::{
    prelude::*,
    style::Style,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::dashboard::NoticeKind;
use crate::strength::{Strength, MAX_SCORE};
use crate::view::{
    DashboardView, DetailView, ListBody, ModalView, RowView, EMPTY_MESSAGE, NO_MATCHES_MESSAGE,
    RETRY_HINT,
};

const COLOR_SAND: Color = Color::Rgb(0xEB, 0xDB, 0xB2);
const COLOR_OLIVE: Color = Color::Rgb(0x98, 0x97, 0x1A);
const COLOR_MOSS: Color = Color::Rgb(0x67, 0x67, 0x1C);

#[derive(Clone, Copy)]
struct OverlayTheme {
    border: Color,
    title: Color,
    text: Color,
    bg: Color,
}

fn themed_overlay(title: &str) -> OverlayTheme {
    match title {
        "Add Password" => OverlayTheme {
            border: COLOR_OLIVE,
            title: COLOR_SAND,
            text: COLOR_SAND,
            bg: Color::Rgb(0x1D, 0x21, 0x10),
        },
        "Edit Password" => OverlayTheme {
            border: Color::Rgb(0xB3, 0xB2, 0x3A),
            title: COLOR_OLIVE,
            text: COLOR_SAND,
            bg: Color::Rgb(0x20, 0x23, 0x12),
        },
        "Confirm delete" => OverlayTheme {
            border: Color::Rgb(0xB3, 0x88, 0x45),
            title: Color::Rgb(0xF0, 0xD8, 0xA8),
            text: COLOR_SAND,
            bg: Color::Rgb(0x2A, 0x1C, 0x11),
        },
        "Confirm logout" => OverlayTheme {
            border: Color::Rgb(0xA7, 0xA2, 0x36),
            title: Color::Rgb(0xE6, 0xD8, 0xB2),
            text: COLOR_SAND,
            bg: Color::Rgb(0x25, 0x24, 0x13),
        },
        _ => OverlayTheme {
            border: COLOR_MOSS,
            title: COLOR_SAND,
            text: COLOR_SAND,
            bg: Color::Rgb(0x1E, 0x20, 0x12),
        },
    }
}

/// Box sized to its content plus borders and padding, centered in `frame`.
fn overlay_area(frame: Rect, lines: &[Line<'_>]) -> Rect {
    let content_width = lines.iter().map(Line::width).max().unwrap_or(0);
    let width = u16::try_from(content_width + 4).unwrap_or(u16::MAX);
    let height = u16::try_from(lines.len() + 2).unwrap_or(u16::MAX);
    let [_, row, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height),
        Constraint::Fill(1),
    ])
    .areas(frame);
    let [_, area, _] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width),
        Constraint::Fill(1),
    ])
    .areas(row);
    area
}

fn render_overlay(f: &mut Frame<'_>, lines: Vec<Line<'_>>, title: &str) {
    let area = overlay_area(f.size(), &lines);
    let theme = themed_overlay(title);
    let paragraph = Paragraph::new(lines)
        .style(Style::default().fg(theme.text).bg(theme.bg))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(
                    title,
                    Style::default()
                        .fg(theme.title)
                        .add_modifier(Modifier::BOLD),
                ))
                .border_style(
                    Style::default()
                        .fg(theme.border)
                        .add_modifier(Modifier::BOLD),
                )
                .style(Style::default().bg(theme.bg)),
        );
    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}

fn strength_color(score: u8) -> Color {
    match score {
        0 | 1 => Color::Red,
        2 => Color::Yellow,
        3 => Color::Green,
        _ => Color::Cyan,
    }
}

fn strength_bar(strength: Strength) -> Line<'static> {
    if strength.is_empty() {
        return Line::from("Strength: -");
    }
    let color = strength_color(strength.score);
    let total = usize::from(MAX_SCORE) * 3;
    let filled = (usize::from(strength.score) * 3).min(total);
    Line::from(vec![
        Span::raw("Strength: "),
        Span::styled(
            strength.label,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" ["),
        Span::styled("=".repeat(filled), Style::default().fg(color)),
        Span::styled(
            "-".repeat(total - filled),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw("]"),
    ])
}

pub fn draw(f: &mut Frame<'_>, view: &DashboardView) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(f.size());

    draw_header(f, view, layout[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(layout[1]);
    draw_list(f, view, body[0]);
    draw_detail(f, view.detail.as_ref(), body[1]);

    let footer_style = match view.footer.kind {
        Some(NoticeKind::Success) => Style::default().fg(Color::Green),
        Some(NoticeKind::Error) => Style::default().fg(Color::Red),
        Some(NoticeKind::Info) => Style::default().fg(Color::Cyan),
        None => Style::default(),
    };
    let footer = Paragraph::new(Span::styled(view.footer.text.as_str(), footer_style))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, layout[2]);

    if let Some(modal) = &view.modal {
        draw_modal(f, modal);
    }

    if let Some(prompt) = &view.delete_prompt {
        let lines = vec![
            Line::from(prompt.as_str()),
            Line::from(""),
            Line::from("[y] Yes   [n] No"),
        ];
        render_overlay(f, lines, "Confirm delete");
    }

    if let Some(prompt) = view.logout_prompt {
        let lines = vec![
            Line::from(prompt),
            Line::from(""),
            Line::from("[y] Yes   [n] No"),
        ];
        render_overlay(f, lines, "Confirm logout");
    }
}

fn draw_header(f: &mut Frame<'_>, view: &DashboardView, area: Rect) {
    let search_style = if view.search_focused {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(COLOR_SAND)
    };
    let cursor = if view.search_focused { "_" } else { "" };
    let line = Line::from(vec![
        Span::styled(
            format!("Passwords ({}) ", view.count),
            Style::default().fg(COLOR_SAND).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Search: "),
        Span::styled(format!("{}{cursor}", view.search), search_style),
    ]);
    let header = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(COLOR_MOSS)),
    );
    f.render_widget(header, area);
}

fn row_item(row: &RowView) -> ListItem<'_> {
    ListItem::new(Line::from(vec![
        Span::styled(
            row.website.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("  {}  ", row.username)),
        Span::styled(row.secret.as_str(), Style::default().fg(COLOR_SAND)),
        Span::styled(
            format!("  [{}]", row.toggle_label),
            Style::default().fg(COLOR_OLIVE),
        ),
    ]))
}

fn draw_list(f: &mut Frame<'_>, view: &DashboardView, area: Rect) {
    let block = Block::default().title("Passwords").borders(Borders::ALL);
    let placeholder = |lines: Vec<Line<'static>>| {
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block.clone())
    };

    match &view.body {
        ListBody::Loading => f.render_widget(placeholder(vec![Line::from("Loading...")]), area),
        ListBody::Error { message } => {
            let lines = vec![
                Line::from(Span::styled(
                    message.clone(),
                    Style::default().fg(Color::Red),
                )),
                Line::from(""),
                Line::from(RETRY_HINT),
            ];
            f.render_widget(placeholder(lines), area);
        }
        ListBody::Empty => f.render_widget(placeholder(vec![Line::from(EMPTY_MESSAGE)]), area),
        ListBody::NoMatches => {
            f.render_widget(placeholder(vec![Line::from(NO_MATCHES_MESSAGE)]), area)
        }
        ListBody::Rows(rows) => {
            let items: Vec<ListItem> = rows.iter().map(row_item).collect();
            let mut state = ListState::default();
            state.select(view.selected.map(|i| i.min(rows.len().saturating_sub(1))));
            let list = List::new(items)
                .block(block.clone())
                .highlight_symbol("▶ ")
                .highlight_style(
                    Style::default()
                        .fg(Color::Yellow)
                        .bg(Color::Rgb(40, 40, 40))
                        .add_modifier(Modifier::BOLD),
                );
            f.render_stateful_widget(list, area, &mut state);
        }
    }
}

fn draw_detail(f: &mut Frame<'_>, detail: Option<&DetailView>, area: Rect) {
    let block = Block::default().title("Details").borders(Borders::ALL);
    let lines = match detail {
        Some(d) => {
            let mut lines = vec![
                Line::from(format!("Website: {}", d.website)),
                Line::from(format!("Username: {}", d.username)),
                Line::from(format!("Password: {}", d.secret)),
                Line::from(format!("Notes: {}", d.notes)),
            ];
            if let Some(created) = &d.created_at {
                lines.push(Line::from(format!("Created: {created}")));
            }
            lines
        }
        None => vec![Line::from("No password selected.")],
    };
    let detail = Paragraph::new(lines).wrap(Wrap { trim: true }).block(block);
    f.render_widget(detail, area);
}

fn draw_modal(f: &mut Frame<'_>, modal: &ModalView) {
    let mut lines = Vec::new();
    for field in &modal.fields {
        let marker = if field.focused { "> " } else { "  " };
        let style = if field.focused {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{marker}{}: ", field.label), style),
            Span::raw(field.value.as_str()),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(strength_bar(modal.strength));
    if let Some(error) = &modal.error {
        lines.push(Line::from(Span::styled(
            error.as_str(),
            Style::default().fg(Color::Red),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from("[Enter] Save   [Esc] Cancel"));
    render_overlay(f, lines, modal.title);
}
