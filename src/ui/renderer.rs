use chrono::{DateTime, Local};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::core::constants::{APP_TAGLINE, APP_TITLE, MAX_INPUT_CHARS, QUICK_SUGGESTIONS};
use crate::core::message::Message;
use crate::core::session::SessionView;
use crate::ui::chat_loop::ChatView;
use crate::ui::layout::{scroll_top, wrap_text};

const INPUT_PLACEHOLDER: &str = "Ask about admissions, essays, scholarships, or anything else...";

pub fn draw(frame: &mut Frame, chat: &mut ChatView, session: &SessionView) {
    let panel_height = panel_lines(chat, session).len() as u16;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(panel_height),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], chat, session);
    draw_conversation(frame, chunks[1], chat, session);
    if panel_height > 0 {
        let panel = Paragraph::new(panel_lines(chat, session));
        frame.render_widget(panel, chunks[2]);
    }
    draw_input(frame, chunks[3], chat, session);

    let footer = Paragraph::new(Line::from(Span::styled(
        "Enter send · Alt+Enter send now · Esc cancel · /help · Ctrl+C quit",
        Style::default().fg(Color::DarkGray),
    )));
    frame.render_widget(footer, chunks[4]);
}

fn draw_header(frame: &mut Frame, area: Rect, chat: &ChatView, session: &SessionView) {
    let title = Line::from(vec![
        Span::styled(
            format!(" {APP_TITLE}"),
            Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" · {APP_TAGLINE}"),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    let mut spans = Vec::new();
    if session.busy {
        spans.push(Span::styled(
            "Waiting for reply… ",
            Style::default().fg(Color::Yellow),
        ));
    } else if let Some(status) = &chat.status {
        spans.push(Span::raw(format!("{status} ")));
    } else if session.last_response.is_some() {
        spans.push(Span::styled(
            "✓ Reply received ",
            Style::default().fg(Color::Green),
        ));
    }
    let (label, color) = if session.online {
        ("● IBM Granite Online ", Color::Green)
    } else {
        ("● Connection Issue ", Color::Red)
    };
    spans.push(Span::styled(
        label,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ));
    let status = Line::from(spans);
    let status_width = u16::try_from(status.width()).unwrap_or(u16::MAX);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(status_width)])
        .split(area);
    frame.render_widget(Paragraph::new(title), columns[0]);
    frame.render_widget(Paragraph::new(status).right_aligned(), columns[1]);
}

fn draw_conversation(frame: &mut Frame, area: Rect, chat: &mut ChatView, session: &SessionView) {
    let block = Block::default().borders(Borders::TOP);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = conversation_lines(&session.messages, session.busy, inner.width as usize);
    let (top, from_bottom) = scroll_top(lines.len(), inner.height as usize, chat.scroll_from_bottom);
    chat.scroll_from_bottom = from_bottom;

    let top = u16::try_from(top).unwrap_or(u16::MAX);
    frame.render_widget(Paragraph::new(lines).scroll((top, 0)), inner);
}

/// Pre-wrapped conversation lines so the scroll math matches what is drawn.
pub fn conversation_lines(messages: &[Message], busy: bool, width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    if messages.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("Welcome to {APP_TITLE}"),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for line in wrap_text(
            "Your intelligent college admission assistant powered by IBM Granite AI. \
             Get personalized guidance for applications, essays, and scholarships.",
            width,
        ) {
            lines.push(Line::from(Span::styled(
                line,
                Style::default().fg(Color::DarkGray),
            )));
        }
        return lines;
    }

    for message in messages {
        let (name, name_style, text_style) = if message.is_user() {
            (
                "You",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
                Style::default().fg(Color::Cyan),
            )
        } else {
            (
                "Assistant",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
                Style::default(),
            )
        };

        let mut heading = vec![Span::styled(name, name_style)];
        if let Some(time) = format_time(message.timestamp()) {
            heading.push(Span::styled(
                format!(" · {time}"),
                Style::default().fg(Color::DarkGray),
            ));
        }
        lines.push(Line::from(heading));
        for line in wrap_text(message.text(), width) {
            lines.push(Line::from(Span::styled(line, text_style)));
        }
        lines.push(Line::from(""));
    }

    if busy {
        lines.push(Line::from(Span::styled(
            "Assistant is typing…",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    lines
}

fn format_time(timestamp: i64) -> Option<String> {
    DateTime::from_timestamp_millis(timestamp)
        .map(|utc| utc.with_timezone(&Local).format("%H:%M").to_string())
}

/// Info panel while one is open, otherwise suggestions for an idle, empty
/// input line.
fn panel_lines(chat: &ChatView, session: &SessionView) -> Vec<Line<'static>> {
    if let Some(info) = &chat.info {
        return info.iter().map(|line| Line::from(line.clone())).collect();
    }
    if chat.input.text().is_empty() && !session.busy {
        let mut spans = Vec::new();
        for (index, suggestion) in QUICK_SUGGESTIONS.iter().enumerate() {
            if index > 0 {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled(
                format!("F{}", index + 1),
                Style::default()
                    .fg(Color::Blue)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(
                format!(" {suggestion}"),
                Style::default().fg(Color::Gray),
            ));
        }
        return vec![Line::from(spans)];
    }
    Vec::new()
}

fn draw_input(frame: &mut Frame, area: Rect, chat: &ChatView, session: &SessionView) {
    let count = chat.input.char_count();
    let counter_color = if count > 1_900 {
        Color::Red
    } else if count > 1_800 {
        Color::Yellow
    } else {
        Color::DarkGray
    };
    let (title, border_color) = if session.busy {
        (" Waiting for the assistant… (Esc to cancel) ", Color::DarkGray)
    } else {
        (" Your question ", Color::Blue)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title)
        .title_bottom(
            Line::from(Span::styled(
                format!(" {count}/{MAX_INPUT_CHARS} "),
                Style::default().fg(counter_color),
            ))
            .right_aligned(),
        );
    let inner = block.inner(area);

    let width = inner.width.max(1) as usize;
    let cursor_column = chat.input.cursor_column();
    let offset = cursor_column.saturating_sub(width - 1);

    let content = if chat.input.text().is_empty() {
        Paragraph::new(Span::styled(
            INPUT_PLACEHOLDER,
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Paragraph::new(chat.input.text().to_string())
            .scroll((0, u16::try_from(offset).unwrap_or(u16::MAX)))
    };
    frame.render_widget(content.block(block), area);

    let x = inner.x + u16::try_from(cursor_column - offset).unwrap_or(0);
    frame.set_cursor_position((x, inner.y));
}
