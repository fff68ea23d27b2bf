use crate::app::{App, InputMode};
use crossterm::event::{self, Event as CEvent};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;

fn centered_rect_absolute(width: u16, height: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length((r.height.saturating_sub(height)) / 2),
                Constraint::Length(height),
                Constraint::Length((r.height.saturating_sub(height) + 1) / 2),
            ]
            .as_ref(),
        )
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Length((r.width.saturating_sub(width)) / 2),
                Constraint::Length(width),
                Constraint::Length((r.width.saturating_sub(width) + 1) / 2),
            ]
            .as_ref(),
        )
        .split(popup_layout[1])[1]
}

fn get_legend(input_mode: &InputMode) -> Text<'static> {
    match input_mode {
        InputMode::Normal => Text::from(Line::from(vec![
            Span::styled(" q ", Style::default().fg(Color::Red)),
            Span::raw(": Quit "),
            Span::styled(" j ", Style::default().fg(Color::Red)),
            Span::raw(": Down "),
            Span::styled(" k ", Style::default().fg(Color::Red)),
            Span::raw(": Up "),
            Span::styled(" Space ", Style::default().fg(Color::Red)),
            Span::raw(": Toggle Done "),
            Span::styled(" d ", Style::default().fg(Color::Red)),
            Span::raw(": Delete "),
            Span::styled(" r ", Style::default().fg(Color::Red)),
            Span::raw(": Refresh "),
            Span::styled(" a ", Style::default().fg(Color::Red)),
            Span::raw(": Add Task "),
        ])),
        InputMode::Editing => Text::from(Line::from(vec![
            Span::styled(" Enter ", Style::default().fg(Color::Red)),
            Span::raw(": Submit "),
            Span::styled(" Esc ", Style::default().fg(Color::Red)),
            Span::raw(": Cancel "),
        ])),
    }
}

fn draw(f: &mut Frame, app: &mut App) {
    let size = f.area();

    // Split the main layout into body and footer
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([Constraint::Min(0), Constraint::Length(2)].as_ref())
        .split(size);

    let body_chunk = chunks[0];
    let footer_chunk = chunks[1];

    match app.input_mode {
        InputMode::Normal => {
            let block = Block::default().borders(Borders::ALL).title("Tasks");

            if app.loading {
                let placeholder = Paragraph::new("Loading tasks...")
                    .block(block)
                    .wrap(Wrap { trim: true });
                f.render_widget(placeholder, body_chunk);
            } else if app.tasks.is_empty() {
                let tasks_widget =
                    List::new(vec![ListItem::new("No tasks yet")]).block(block);
                f.render_widget(tasks_widget, body_chunk);
            } else {
                let tasks: Vec<ListItem> = app
                    .tasks
                    .iter()
                    .map(|task| {
                        let content = if task.completed {
                            vec![
                                Span::styled("[x] ", Style::default().fg(Color::Green)),
                                Span::styled(
                                    &task.content,
                                    Style::default().add_modifier(Modifier::CROSSED_OUT),
                                ),
                            ]
                        } else {
                            vec![Span::raw("[ ] "), Span::raw(&task.content)]
                        };
                        ListItem::new(Line::from(content))
                    })
                    .collect();

                let tasks_widget = List::new(tasks)
                    .block(block)
                    .highlight_style(
                        Style::default()
                            .fg(Color::Green)
                            .add_modifier(Modifier::BOLD),
                    )
                    .highlight_symbol(">> ");

                f.render_stateful_widget(tasks_widget, body_chunk, &mut app.state);
            }
        }
        InputMode::Editing => {
            let popup_width_percentage = 60;
            let popup_width = (size.width * popup_width_percentage / 100).saturating_sub(2);

            let lines_required = calculate_wrapped_lines(&app.new_task_content, popup_width);

            let min_required_height = 1;

            let required_height = std::cmp::max(lines_required as u16, min_required_height);

            let popup_height = required_height + 2;

            let max_popup_height = size.height.saturating_sub(2);
            let popup_height = std::cmp::min(popup_height, max_popup_height);

            let popup_area = centered_rect_absolute(popup_width + 2, popup_height, body_chunk);

            let popup_block = Block::default()
                .title("Enter New Task (Press Enter to Submit)")
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::Green));

            let input = Paragraph::new(app.new_task_content.as_str())
                .style(Style::default().fg(Color::White))
                .block(popup_block)
                .wrap(Wrap { trim: false });

            f.render_widget(Clear, popup_area);
            f.render_widget(input, popup_area);
        }
    }

    // Render the legend in the footer
    let legend = Paragraph::new(get_legend(&app.input_mode))
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true });

    f.render_widget(legend, footer_chunk);
}

pub async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    server_url: &str,
) -> io::Result<()> {
    // Show the loading placeholder once before the first fetch resolves.
    terminal.draw(|f| draw(f, &mut app))?;
    app.initial_load(server_url).await;

    loop {
        terminal.draw(|f| draw(f, &mut app))?;

        // Handle input
        if event::poll(Duration::from_millis(100))? {
            if let CEvent::Key(key) = event::read()? {
                let should_quit = app.handle_input(key, server_url).await?;
                if should_quit {
                    return Ok(());
                }
            }
        }
    }
}

fn calculate_wrapped_lines(text: &str, max_width: u16) -> usize {
    // A popup on a terminal narrower than its borders still needs a width.
    let max_width = max_width.max(1);
    let mut line_count = 0;
    for line in text.lines() {
        let line_width = line.chars().count() as u16;
        line_count += ((line_width + max_width - 1) / max_width) as usize;
    }
    line_count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_lines_counts_each_wrap() {
        assert_eq!(calculate_wrapped_lines("abcdef", 3), 2);
        assert_eq!(calculate_wrapped_lines("abc\ndef", 10), 2);
        assert_eq!(calculate_wrapped_lines("", 10), 0);
    }

    #[test]
    fn wrapped_lines_survives_zero_width() {
        assert_eq!(calculate_wrapped_lines("abc", 0), 3);
    }

    #[test]
    fn centered_rect_fits_inside_tiny_areas() {
        let tiny = Rect::new(0, 0, 2, 1);
        let rect = centered_rect_absolute(10, 5, tiny);
        assert!(rect.width <= tiny.width);
        assert!(rect.height <= tiny.height);
    }
}
