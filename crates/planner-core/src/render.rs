use hypertext::prelude::*;
use planner_shared::{TaskDto, TaskForm, hex_color};

use crate::messages::Messages;
use crate::panel::PanelState;

/// Something the user can do to a rendered row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskAction {
    Toggle(String),
    Edit(String),
    Delete(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryBadge {
    pub name: String,
    pub icon: String,
    pub color: String,
}

/// One display row of the day panel. Text fields are raw; escaping happens
/// at the output boundary ([`TaskRenderer::markup`] or the DOM's text nodes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    pub id: String,
    pub title: String,
    pub time: Option<String>,
    pub description: String,
    pub category: Option<CategoryBadge>,
    pub completed: bool,
    task: TaskDto,
}

impl TaskRow {
    pub fn task(&self) -> &TaskDto {
        &self.task
    }

    /// Form bindings for editing this task.
    pub fn edit_form(&self) -> TaskForm {
        TaskForm::from_task(&self.task)
    }

    pub fn toggle(&self) -> TaskAction {
        TaskAction::Toggle(self.id.clone())
    }

    pub fn edit(&self) -> TaskAction {
        TaskAction::Edit(self.id.clone())
    }

    pub fn delete(&self) -> TaskAction {
        TaskAction::Delete(self.id.clone())
    }
}

impl From<&TaskDto> for TaskRow {
    fn from(task: &TaskDto) -> Self {
        Self {
            id: task.id.clone(),
            title: task.title.clone(),
            time: task.time_label().map(str::to_string),
            description: task.description_text().to_string(),
            category: task.category.as_ref().map(|c| CategoryBadge {
                name: c.name.clone(),
                icon: c.icon.clone(),
                color: c.color.clone(),
            }),
            completed: task.is_completed,
            task: task.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TaskRenderer {
    messages: &'static Messages,
}

impl TaskRenderer {
    pub fn new(messages: &'static Messages) -> Self {
        Self { messages }
    }

    pub fn messages(&self) -> &'static Messages {
        self.messages
    }

    /// Rows in backend order.
    pub fn rows(&self, tasks: &[TaskDto]) -> Vec<TaskRow> {
        tasks.iter().map(TaskRow::from).collect()
    }

    /// `panel-task-row` markup for one row. Text is escaped on output and the
    /// category color only reaches `style` as `#rrggbb`.
    pub fn row_markup(&self, row: &TaskRow) -> String {
        let messages = self.messages;
        let accent = row
            .category
            .as_ref()
            .and_then(|category| hex_color(&category.color))
            .map(|color| format!("border-left-color: {color}"));
        let class = if row.category.is_some() {
            "panel-task-row has-category"
        } else {
            "panel-task-row"
        };

        let body = maud! {
            div .left {
                @if row.completed {
                    input .panel-task-checkbox type="checkbox" data-id=(row.id) checked;
                } @else {
                    input .panel-task-checkbox type="checkbox" data-id=(row.id);
                }
                @if let Some(category) = &row.category {
                    span .panel-task-category title=(category.name) { (category.icon) }
                }
                div .panel-task-info {
                    div .panel-task-title { (row.title) }
                    @if let Some(time) = &row.time {
                        div .panel-task-time { "⏰ " (time) }
                    }
                }
            }
            div .panel-task-actions {
                button .edit-task-btn data-id=(row.id) title=(messages.edit) { "✏️" }
                button .delete-task-btn-inline data-id=(row.id) title=(messages.delete) { "🗑️" }
            }
        };

        match accent {
            Some(style) => maud! {
                div class=(class) data-id=(row.id) draggable="true" style=(style) { (body) }
            }
            .render()
            .into_inner(),
            None => maud! {
                div class=(class) data-id=(row.id) draggable="true" { (body) }
            }
            .render()
            .into_inner(),
        }
    }

    pub fn markup(&self, rows: &[TaskRow]) -> String {
        rows.iter().map(|row| self.row_markup(row)).collect()
    }

    /// Whole panel body for a given state.
    pub fn panel_markup(&self, state: &PanelState) -> String {
        let messages = self.messages;
        match state {
            PanelState::Loading => maud! {
                div .empty { (messages.loading) }
            }
            .render()
            .into_inner(),
            PanelState::Empty => maud! {
                div .empty { (messages.empty) br; small { (messages.empty_hint) } }
            }
            .render()
            .into_inner(),
            PanelState::Error(detail) => {
                let message = messages.failure(detail);
                maud! {
                    div .empty .error { (message) }
                }
                .render()
                .into_inner()
            }
            PanelState::Rows(rows) => self.markup(rows),
        }
    }
}
