use gummyte_core::utils::{format_timestamp, single_line, truncate_string};
use gummyte_core::{Record, RecordKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::ui::styles;

/// Width of the formatted timestamp column
const DATE_WIDTH: usize = 20;
const EMAIL_WIDTH: usize = 30;
const SENDER_WIDTH: usize = 20;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    render_record_list(frame, app, chunks[0]);
    render_record_detail(frame, app, chunks[1]);
}

fn header_line(kind: RecordKind) -> Line<'static> {
    let (second, third) = match kind {
        RecordKind::Signups => ("Email", "Source"),
        RecordKind::Messages => ("Sender", "Content"),
    };
    let second_width = match kind {
        RecordKind::Signups => EMAIL_WIDTH,
        RecordKind::Messages => SENDER_WIDTH,
    };
    Line::styled(
        format!(
            "{:<date$} {:<second_width$} {}",
            "DATE",
            second.to_uppercase(),
            third.to_uppercase(),
            date = DATE_WIDTH,
        ),
        styles::muted_style(),
    )
}

fn row_text(record: &Record) -> String {
    let date = format_timestamp(&record.timestamp());
    match record {
        Record::Signup(r) => format!(
            "{:<date_w$} {:<email_w$} {}",
            date,
            truncate_string(&r.email, EMAIL_WIDTH),
            r.source.as_deref().unwrap_or("-"),
            date_w = DATE_WIDTH,
            email_w = EMAIL_WIDTH,
        ),
        Record::Message(r) => format!(
            "{:<date_w$} {:<sender_w$} {}",
            date,
            truncate_string(r.sender(), SENDER_WIDTH),
            truncate_string(&single_line(&r.message), 40),
            date_w = DATE_WIDTH,
            sender_w = SENDER_WIDTH,
        ),
    }
}

fn render_record_list(frame: &mut Frame, app: &App, area: Rect) {
    let kind = app.current_tab;
    let records = app.records();

    let block = Block::default()
        .title(format!(" {} ({}) ", kind.title(), records.len()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    if records.is_empty() {
        let message = match app.last_error {
            Some(ref error) => Line::from(Span::styled(format!("  {}", error), styles::error_style())),
            None if app.is_busy() => Line::from(Span::styled("  Loading...", styles::muted_style())),
            None => Line::from(Span::styled("  No records found yet.", styles::muted_style())),
        };
        let paragraph = Paragraph::new(vec![header_line(kind), Line::from(""), message]).block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let mut items: Vec<ListItem> = vec![ListItem::new(header_line(kind))];
    items.extend(records.iter().enumerate().map(|(i, record)| {
        let style = if i == app.selection {
            styles::selected_style()
        } else {
            styles::list_item_style()
        };
        ListItem::new(Line::from(row_text(record))).style(style)
    }));

    let list = List::new(items).block(block);

    // Offset by one for the header row
    let mut state = ListState::default();
    state.select(Some(app.selection + 1));

    frame.render_stateful_widget(list, area, &mut state);
}

fn field(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<9}", label), styles::highlight_style()),
        Span::raw(value),
    ])
}

fn render_record_detail(frame: &mut Frame, app: &App, area: Rect) {
    let (title, content) = match app.selected_record() {
        Some(Record::Signup(r)) => (
            " Signup ".to_string(),
            vec![
                field("Email:", r.email.clone()),
                field("Source:", r.source.clone().unwrap_or_else(|| "-".to_string())),
                field("Date:", format_timestamp(&r.timestamp)),
                Line::from(""),
                Line::from(Span::styled(format!("id {}", r.id), styles::muted_style())),
            ],
        ),
        Some(Record::Message(r)) => {
            let mut lines = vec![
                field("From:", r.name.clone().unwrap_or_default()),
                field("Email:", r.email.clone()),
                field("Date:", format_timestamp(&r.timestamp)),
                Line::from(""),
            ];
            lines.extend(r.message.lines().map(|l| Line::from(l.to_string())));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(format!("id {}", r.id), styles::muted_style())));
            (" Message ".to_string(), lines)
        }
        None => (
            " No Record Selected ".to_string(),
            vec![Line::from(Span::styled(
                "Select a record from the list",
                styles::muted_style(),
            ))],
        ),
    };

    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use gummyte_core::{MessageRecord, SignupRecord};

    #[test]
    fn test_row_text_signup_without_source() {
        let record = Record::Signup(SignupRecord {
            id: "1".into(),
            email: "fan@example.com".into(),
            source: None,
            timestamp: "2025-03-01T10:00:00Z".parse().unwrap(),
        });
        let row = row_text(&record);
        assert!(row.contains("fan@example.com"));
        assert!(row.trim_end().ends_with('-'));
    }

    #[test]
    fn test_row_text_message_is_single_line() {
        let record = Record::Message(MessageRecord {
            id: "m1".into(),
            name: Some("Asha".into()),
            email: "asha@example.com".into(),
            message: "Line one\nLine two".into(),
            timestamp: "2025-03-01T10:00:00Z".parse().unwrap(),
        });
        let row = row_text(&record);
        assert!(row.contains("Asha"));
        assert!(row.contains("Line one Line two"));
        assert!(!row.contains('\n'));
    }
}
