use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use tasklane_core::tasks::Category;

use super::state::{Focus, Row, TaskListState};
use crate::overlays::render_utils::{InputHint, render_hints};

pub fn category_color(category: Category) -> Color {
    match category {
        Category::Work => Color::Blue,
        Category::Study => Color::Yellow,
        Category::Personal => Color::Green,
    }
}

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

pub fn render_tasks(frame: &mut Frame, area: Rect, list: &TaskListState) {
    let [draft_area, list_area, hints_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(area);
    let [input_area, category_area] =
        Layout::horizontal([Constraint::Min(20), Constraint::Length(18)]).areas(draft_area);

    render_draft_input(frame, input_area, list);
    render_category(frame, category_area, list);
    render_rows(frame, list_area, list);

    let hints: &[InputHint] = match list.focus {
        Focus::Input => &[
            InputHint::new("Enter", "add"),
            InputHint::new("Tab", "next"),
            InputHint::new("^O", "sign out"),
        ],
        Focus::Category => &[
            InputHint::new("←/→", "category"),
            InputHint::new("Enter", "add"),
            InputHint::new("Tab", "next"),
        ],
        Focus::List => &[
            InputHint::new("↑/↓", "select"),
            InputHint::new("Space", "toggle"),
            InputHint::new("d", "remove"),
            InputHint::new("Tab", "next"),
        ],
    };
    render_hints(frame, hints_area, hints, Color::Cyan);
}

fn render_draft_input(frame: &mut Frame, area: Rect, list: &TaskListState) {
    let focused = list.focus == Focus::Input;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(focused))
        .title(" New task ");
    let inner = block.inner(area);
    let text = &list.draft.text;
    let line = if text.is_empty() && !focused {
        Line::from(Span::styled(
            "What needs doing?",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(text.display())
    };
    frame.render_widget(Paragraph::new(line).block(block), area);
    if focused {
        let x = inner.x + text.cursor_offset();
        frame.set_cursor_position((x.min(inner.right().saturating_sub(1)), inner.y));
    }
}

fn render_category(frame: &mut Frame, area: Rect, list: &TaskListState) {
    let category = list.draft.category;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(list.focus == Focus::Category))
        .title(" Category ");
    let line = Line::from(vec![
        Span::styled("‹ ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            category.as_str(),
            Style::default()
                .fg(category_color(category))
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" ›", Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_rows(frame: &mut Frame, area: Rect, list: &TaskListState) {
    let rows = list.rows();
    let done = rows.iter().filter(|r| r.task.completed).count();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(list.focus == Focus::List))
        .title(format!(" Tasks ({done}/{}) ", rows.len()));

    if rows.is_empty() {
        let text = if list.authoritative.loaded {
            "No tasks yet."
        } else {
            "Loading tasks…"
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                text,
                Style::default().fg(Color::DarkGray),
            )))
            .block(block),
            area,
        );
        return;
    }

    let items: Vec<ListItem> = rows.iter().map(row_item).collect();
    let widget = List::new(items).block(block).highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    );
    let mut state = ListState::default();
    if list.focus == Focus::List {
        state.select(Some(list.selected));
    }
    frame.render_stateful_widget(widget, area, &mut state);
}

fn row_item(row: &Row) -> ListItem<'static> {
    let task = &row.task;
    let check = if task.completed { "[x] " } else { "[ ] " };
    let mut text_style = Style::default();
    if task.completed {
        text_style = text_style
            .fg(Color::DarkGray)
            .add_modifier(Modifier::CROSSED_OUT);
    }
    let mut spans = vec![
        Span::raw(check),
        Span::styled(
            format!("{:<9}", task.category.as_str()),
            Style::default().fg(category_color(task.category)),
        ),
        Span::styled(task.text.clone(), text_style),
    ];
    if row.pending {
        spans.push(Span::styled(" …", Style::default().fg(Color::Yellow)));
    }
    ListItem::new(Line::from(spans))
}
