use crate::dates::Locale;

/// User-facing strings of the day panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Messages {
    pub loading: &'static str,
    pub empty: &'static str,
    pub empty_hint: &'static str,
    pub error_prefix: &'static str,
    pub confirm_delete: &'static str,
    pub title_required: &'static str,
    pub no_day_selected: &'static str,
    pub task_added: &'static str,
    pub task_updated: &'static str,
    pub add_failed: &'static str,
    pub status_updated: &'static str,
    pub update_failed: &'static str,
    pub task_deleted: &'static str,
    pub delete_failed: &'static str,
    pub task_moved: &'static str,
    pub move_failed: &'static str,
    pub sticker_added: &'static str,
    pub sticker_failed: &'static str,
    pub color_changed: &'static str,
    pub color_failed: &'static str,
    pub edit: &'static str,
    pub delete: &'static str,
}

pub const UK: Messages = Messages {
    loading: "⏳ Завантаження...",
    empty: "📝 Немає задач на цей день",
    empty_hint: "Перейдіть на вкладку \"Створити\" щоб додати",
    error_prefix: "❌ Помилка",
    confirm_delete: "Видалити завдання?",
    title_required: "Введіть назву завдання",
    no_day_selected: "Спочатку оберіть день",
    task_added: "Завдання додано!",
    task_updated: "Завдання оновлено!",
    add_failed: "Помилка додавання завдання",
    status_updated: "Статус оновлено!",
    update_failed: "Помилка оновлення",
    task_deleted: "Завдання видалено!",
    delete_failed: "Помилка видалення",
    task_moved: "Завдання переміщено!",
    move_failed: "Помилка переміщення",
    sticker_added: "Стікер додано!",
    sticker_failed: "Помилка додавання стікера",
    color_changed: "Колір дня змінено!",
    color_failed: "Помилка зміни кольору",
    edit: "Редагувати",
    delete: "Видалити",
};

pub const EN: Messages = Messages {
    loading: "⏳ Loading...",
    empty: "📝 No tasks for this day",
    empty_hint: "Open the \"Create\" tab to add one",
    error_prefix: "❌ Error",
    confirm_delete: "Delete this task?",
    title_required: "Enter a task title",
    no_day_selected: "Select a day first",
    task_added: "Task added!",
    task_updated: "Task updated!",
    add_failed: "Could not add the task",
    status_updated: "Status updated!",
    update_failed: "Could not update the task",
    task_deleted: "Task deleted!",
    delete_failed: "Could not delete the task",
    task_moved: "Task moved!",
    move_failed: "Could not move the task",
    sticker_added: "Sticker added!",
    sticker_failed: "Could not add the sticker",
    color_changed: "Day color changed!",
    color_failed: "Could not change the day color",
    edit: "Edit",
    delete: "Delete",
};

impl Locale {
    pub fn messages(self) -> &'static Messages {
        match self {
            Locale::Uk => &UK,
            Locale::En => &EN,
        }
    }
}

impl Messages {
    /// `"{prefix}: {detail}"`, as shown inline and in error toasts.
    pub fn failure(&self, detail: impl std::fmt::Display) -> String {
        format!("{}: {detail}", self.error_prefix)
    }

    /// Action failure with the reason appended, e.g. `Помилка видалення: HTTP 500`.
    pub fn with_detail(summary: &str, detail: impl std::fmt::Display) -> String {
        format!("{summary}: {detail}")
    }
}
