use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};

use crate::tui::commands::command_palette_matches;
use crate::tui::state::{App, PaletteEntry, SourceMode};
use crate::tui::utils::clipped_input;

pub const INPUT_HEIGHT: u16 = 3;
pub const FOOTER_HEIGHT: u16 = 1;
pub const HEADER_HEIGHT: u16 = 6;
pub const HEADER_WIDTH: u16 = 72;
pub const MAX_PALETTE_LINES: usize = 8;

pub fn draw_ui(frame: &mut ratatui::Frame, app: &App) {
    let size = frame.size();

    let palette = command_palette_matches(&app.input);
    let palette_height = palette.len().min(MAX_PALETTE_LINES) as u16;
    // +1 for the spacer above the input bar
    let bottom_reserved = INPUT_HEIGHT + FOOTER_HEIGHT + palette_height + 1;

    let body_height = size
        .height
        .saturating_sub(HEADER_HEIGHT)
        .saturating_sub(bottom_reserved)
        .max(1);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Length(body_height),
            Constraint::Length(1),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(FOOTER_HEIGHT),
            Constraint::Length(palette_height),
        ])
        .split(size);

    let header_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(HEADER_WIDTH), Constraint::Min(1)])
        .split(layout[0]);
    frame.render_widget(render_header(app), header_layout[0]);

    let body = render_body(app, layout[1].height as usize);
    frame.render_widget(body, layout[1]);

    let (input_area, cursor) = render_input_bar(app, layout[3]);
    frame.render_widget(input_area, layout[3]);

    frame.render_widget(render_status_line(app), layout[4]);

    if palette_height > 0 {
        let palette_view = render_palette(&palette, app.palette_select);
        frame.render_widget(palette_view, layout[5]);
    }
    if let Some((x, y)) = cursor {
        frame.set_cursor(x, y);
    }
}

fn render_header(app: &App) -> Paragraph<'static> {
    let title = Line::from(vec![
        Span::styled(">_ ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("sqlplay (v{})", env!("CARGO_PKG_VERSION")),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ]);

    let (mode, hint) = match &app.source {
        SourceMode::Generate => ("generate", "  /seed /rows /scenario"),
        SourceMode::Upload { .. } => ("upload", "  /generate"),
        SourceMode::None => ("empty", "  /generate /upload"),
    };
    let line_source = Line::from(vec![
        Span::styled("source:    ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.source_display(), Style::default().fg(Color::Cyan)),
        Span::styled(hint, Style::default().fg(Color::DarkGray)),
    ]);

    let tables: Vec<String> = app
        .session
        .dataset()
        .map(|dataset| dataset.table_names().map(str::to_string).collect())
        .unwrap_or_default();
    let line_tables = Line::from(vec![
        Span::styled("tables:    ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            if tables.is_empty() {
                "none".to_string()
            } else {
                tables.join(", ")
            },
            Style::default().fg(Color::White),
        ),
        Span::styled(format!("  ({mode})"), Style::default().fg(Color::DarkGray)),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .border_type(BorderType::Rounded);

    Paragraph::new(Text::from(vec![
        title,
        Line::from(""),
        line_source,
        line_tables,
    ]))
    .block(block)
}

fn render_body(app: &App, height: usize) -> Paragraph<'static> {
    let total_lines = app.messages.len();
    if total_lines == 0 {
        return Paragraph::new("");
    }

    let view_end = total_lines.saturating_sub(app.scroll_offset as usize);
    let view_start = view_end.saturating_sub(height);

    let lines: Vec<Line<'static>> = app.messages[view_start..view_end]
        .iter()
        .map(|line| {
            if line.starts_with('►') {
                let text = line.trim_start_matches(['►', ' ']);
                Line::from(vec![
                    Span::styled("●", Style::default().fg(Color::Green)),
                    Span::raw(" "),
                    Span::styled(
                        text.to_string(),
                        Style::default()
                            .fg(Color::White)
                            .add_modifier(Modifier::BOLD),
                    ),
                ])
            } else if line.starts_with("error:") {
                Line::from(Span::styled(line.clone(), Style::default().fg(Color::Red)))
            } else {
                Line::from(Span::raw(line.clone()))
            }
        })
        .collect();

    Paragraph::new(Text::from(lines)).wrap(Wrap { trim: false })
}

fn render_input_bar(app: &App, area: Rect) -> (Paragraph<'static>, Option<(u16, u16)>) {
    let prefix = "> ";
    let prefix_len = prefix.len();
    let (visible, cursor_x) = clipped_input(&app.input, area.width as usize, prefix_len);

    let content = if app.input.is_empty() {
        vec![
            Span::styled(prefix, Style::default().fg(Color::Cyan)),
            Span::styled(
                "SELECT ... or /command",
                Style::default().fg(Color::DarkGray),
            ),
        ]
    } else {
        vec![
            Span::styled(prefix, Style::default().fg(Color::Cyan)),
            Span::raw(visible),
        ]
    };

    let padding_line = Line::from("");
    let paragraph = Paragraph::new(vec![padding_line.clone(), Line::from(content), padding_line])
        .style(Style::default().bg(Color::Rgb(30, 30, 30)));

    let cursor = Some((area.x + cursor_x + prefix_len as u16, area.y + 1));
    (paragraph, cursor)
}

fn render_status_line(app: &App) -> Paragraph<'static> {
    let mut status = format!(
        "history: {} . preview: {} rows",
        app.session.history().len(),
        app.settings.preview_rows
    );
    if app.is_generating() {
        status.push_str(&format!(" . seed: {}", app.params.seed));
    }

    Paragraph::new(Line::from(vec![
        Span::styled(
            "Tip: Use /help to list commands.",
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw("   "),
        Span::styled(status, Style::default().fg(Color::DarkGray)),
    ]))
}

fn render_palette(entries: &[PaletteEntry], selected_idx: usize) -> Paragraph<'static> {
    let max_lines = MAX_PALETTE_LINES;
    // Scroll so the selected entry stays visible.
    let start_idx = if selected_idx >= max_lines {
        selected_idx - max_lines + 1
    } else {
        0
    };
    let end_idx = (start_idx + max_lines).min(entries.len());

    let lines: Vec<Line<'static>> = entries[start_idx..end_idx]
        .iter()
        .enumerate()
        .map(|(offset, entry)| {
            let raw_str = format!("{:<20}  {}", entry.command, entry.description);
            if start_idx + offset == selected_idx {
                Line::from(Span::styled(
                    raw_str,
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(Span::styled(raw_str, Style::default().fg(Color::DarkGray)))
            }
        })
        .collect();
    Paragraph::new(Text::from(lines))
}
