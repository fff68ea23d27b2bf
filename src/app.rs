use crate::api::{create_task, delete_task, fetch_tasks, set_completed};
use crate::models::Task;
use crossterm::event::KeyCode;
use ratatui::widgets::ListState;
use std::io;

pub struct App {
    pub tasks: Vec<Task>,
    pub state: ListState,
    pub input_mode: InputMode,
    pub new_task_content: String,
    pub loading: bool,
}

pub enum InputMode {
    Normal,
    Editing,
}

impl App {
    pub fn new() -> App {
        App {
            tasks: Vec::new(),
            state: ListState::default(),
            input_mode: InputMode::Normal,
            new_task_content: String::new(),
            loading: true,
        }
    }

    /// First fetch after the terminal is up. A failure here resets to an
    /// empty list rather than aborting the view.
    pub async fn initial_load(&mut self, server_url: &str) {
        match fetch_tasks(server_url).await {
            Ok(tasks) => {
                self.tasks = tasks;
                self.state
                    .select(if self.tasks.is_empty() { None } else { Some(0) });
            }
            Err(err) => {
                eprintln!("Error fetching tasks: {}", err);
                self.tasks = Vec::new();
                self.state.select(None);
            }
        }
        self.loading = false;
    }

    /// Full re-fetch, done after every mutation; there is no optimistic
    /// update. Keeps the selection index where possible.
    pub async fn refresh_tasks(&mut self, server_url: &str) -> Result<(), reqwest::Error> {
        let selected = self.state.selected();
        self.tasks = fetch_tasks(server_url).await?;
        let selected = match selected {
            Some(i) if !self.tasks.is_empty() => Some(i.min(self.tasks.len() - 1)),
            _ if !self.tasks.is_empty() => Some(0),
            _ => None,
        };
        self.state.select(selected);
        Ok(())
    }

    pub fn next(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i >= self.tasks.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i == 0 {
                    self.tasks.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.state.selected().and_then(|i| self.tasks.get(i))
    }

    async fn toggle_selected(&mut self, server_url: &str) {
        let Some(task) = self.selected_task() else {
            return;
        };
        // Invert the current value; the server is the source of truth.
        if let Err(err) = set_completed(server_url, task.id, !task.completed).await {
            eprintln!("Error updating task: {}", err);
        } else if let Err(err) = self.refresh_tasks(server_url).await {
            eprintln!("Error fetching tasks: {}", err);
        }
    }

    async fn delete_selected(&mut self, server_url: &str) {
        let Some(task) = self.selected_task() else {
            return;
        };
        if let Err(err) = delete_task(server_url, task.id).await {
            eprintln!("Error deleting task: {}", err);
        } else if let Err(err) = self.refresh_tasks(server_url).await {
            eprintln!("Error fetching tasks: {}", err);
        }
    }

    pub async fn handle_input(
        &mut self,
        key: crossterm::event::KeyEvent,
        server_url: &str,
    ) -> io::Result<bool> {
        match self.input_mode {
            InputMode::Normal => match key.code {
                KeyCode::Char('q') => return Ok(true),
                KeyCode::Char('j') | KeyCode::Down => self.next(),
                KeyCode::Char('k') | KeyCode::Up => self.previous(),
                KeyCode::Char('r') => {
                    if let Err(err) = self.refresh_tasks(server_url).await {
                        eprintln!("Error fetching tasks: {}", err);
                    }
                }
                KeyCode::Char(' ') | KeyCode::Enter => {
                    self.toggle_selected(server_url).await;
                }
                KeyCode::Char('d') => {
                    self.delete_selected(server_url).await;
                }
                KeyCode::Char('a') => {
                    self.input_mode = InputMode::Editing;
                    self.new_task_content.clear();
                }
                _ => {}
            },

            InputMode::Editing => match key.code {
                KeyCode::Enter => {
                    // Empty or whitespace-only input is ignored outright.
                    if !self.new_task_content.trim().is_empty() {
                        if let Err(err) =
                            create_task(server_url, self.new_task_content.trim()).await
                        {
                            eprintln!("Error creating task: {}", err);
                        } else {
                            self.new_task_content.clear();
                            if let Err(err) = self.refresh_tasks(server_url).await {
                                eprintln!("Error fetching tasks: {}", err);
                            }
                            self.input_mode = InputMode::Normal;
                        }
                    }
                }
                KeyCode::Char(c) => {
                    self.new_task_content.push(c);
                }
                KeyCode::Backspace => {
                    self.new_task_content.pop();
                }
                KeyCode::Esc => {
                    self.new_task_content.clear();
                    self.input_mode = InputMode::Normal;
                }
                _ => {}
            },
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn task(id: i64, content: &str) -> Task {
        Task {
            id,
            content: content.to_string(),
            completed: false,
            created_at: Utc::now(),
        }
    }

    fn app_with(tasks: Vec<Task>) -> App {
        let mut app = App::new();
        app.loading = false;
        if !tasks.is_empty() {
            app.state.select(Some(0));
        }
        app.tasks = tasks;
        app
    }

    #[test]
    fn selection_wraps_in_both_directions() {
        let mut app = app_with(vec![task(1, "a"), task(2, "b"), task(3, "c")]);
        assert_eq!(app.state.selected(), Some(0));

        app.previous();
        assert_eq!(app.state.selected(), Some(2));
        app.next();
        assert_eq!(app.state.selected(), Some(0));
        app.next();
        assert_eq!(app.state.selected(), Some(1));
    }

    #[test]
    fn selection_is_inert_on_empty_list() {
        let mut app = app_with(Vec::new());
        app.next();
        app.previous();
        assert_eq!(app.state.selected(), None);
        assert!(app.selected_task().is_none());
    }

    #[test]
    fn selected_task_follows_the_cursor() {
        let mut app = app_with(vec![task(1, "a"), task(2, "b")]);
        app.next();
        assert_eq!(app.selected_task().map(|t| t.id), Some(2));
    }
}
