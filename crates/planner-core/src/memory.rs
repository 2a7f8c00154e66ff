//! An in-process [`PlannerApi`], following the backend's rules.
//!
//! Used to drive the controllers without a server. Failures can be injected
//! per operation, and every call is recorded so callers can check which
//! requests were (or were not) issued.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, VecDeque};

use async_trait::async_trait;
use chrono::NaiveDate;
use planner_shared::{
    ApiReply, CategoryDto, CategoryRecord, MAX_STICKERS_PER_DAY, TaskDto, TaskForm, TaskPatch,
};
use tracing::debug;

use crate::api::{DATE_FORMAT, PlannerApi, wire_date};
use crate::error::ApiError;

/// One backend endpoint, used to target injected failures and recorded calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Endpoint {
    GetTasks,
    AddTask,
    EditTask,
    ToggleTask,
    DeleteTask,
    MoveTask,
    AddSticker,
    GetStickers,
    SetDayColor,
    GetCategories,
}

#[derive(Debug, Clone)]
struct StoredTask {
    date: NaiveDate,
    task: TaskDto,
}

#[derive(Debug, Default)]
pub struct MemoryPlanner {
    tasks: RefCell<Vec<StoredTask>>,
    stickers: RefCell<BTreeMap<NaiveDate, Vec<String>>>,
    colors: RefCell<BTreeMap<NaiveDate, String>>,
    categories: RefCell<Vec<CategoryRecord>>,
    failures: RefCell<BTreeMap<Endpoint, VecDeque<ApiError>>>,
    calls: RefCell<Vec<Endpoint>>,
    next_id: Cell<u64>,
}

impl MemoryPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a task directly, bypassing the call log. Returns its id.
    pub fn seed_task(&self, date: NaiveDate, title: &str, is_completed: bool) -> String {
        let id = self.allocate_id();
        self.tasks.borrow_mut().push(StoredTask {
            date,
            task: TaskDto {
                id: id.clone(),
                title: title.to_string(),
                description: Some(String::new()),
                time: None,
                is_completed,
                category: None,
                date: Some(wire_date(date)),
                created_at: None,
                updated_at: None,
            },
        });
        id
    }

    pub fn seed_category(&self, id: &str, name: &str, icon: &str, color: &str) {
        self.categories.borrow_mut().push(CategoryRecord {
            id: id.to_string(),
            name_ua: name.to_string(),
            icon: icon.to_string(),
            color_hex: color.to_string(),
        });
    }

    /// The next call to `endpoint` fails with `error`. Queued failures are
    /// consumed in order, one per call.
    pub fn fail_next(&self, endpoint: Endpoint, error: ApiError) {
        self.failures
            .borrow_mut()
            .entry(endpoint)
            .or_default()
            .push_back(error);
    }

    pub fn calls(&self) -> Vec<Endpoint> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self, endpoint: Endpoint) -> usize {
        self.calls.borrow().iter().filter(|c| **c == endpoint).count()
    }

    pub fn day_color(&self, date: NaiveDate) -> Option<String> {
        self.colors.borrow().get(&date).cloned()
    }

    pub fn task(&self, id: &str) -> Option<TaskDto> {
        self.tasks
            .borrow()
            .iter()
            .find(|stored| stored.task.id == id)
            .map(|stored| stored.task.clone())
    }

    fn allocate_id(&self) -> String {
        let next = self.next_id.get() + 1;
        self.next_id.set(next);
        format!("{next:024x}")
    }

    fn enter(&self, endpoint: Endpoint) -> Result<(), ApiError> {
        self.calls.borrow_mut().push(endpoint);
        let injected = self
            .failures
            .borrow_mut()
            .get_mut(&endpoint)
            .and_then(VecDeque::pop_front);
        match injected {
            Some(error) => {
                debug!(?endpoint, %error, "memory backend: injected failure");
                Err(error)
            }
            None => Ok(()),
        }
    }

    fn category_for(&self, category_id: &str) -> Option<CategoryDto> {
        self.categories
            .borrow()
            .iter()
            .find(|c| c.id == category_id)
            .map(CategoryDto::from)
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[async_trait(?Send)]
impl PlannerApi for MemoryPlanner {
    async fn get_tasks(&self, date: NaiveDate) -> Result<Vec<TaskDto>, ApiError> {
        self.enter(Endpoint::GetTasks)?;
        let mut tasks: Vec<&StoredTask> = Vec::new();
        let stored = self.tasks.borrow();
        tasks.extend(stored.iter().filter(|s| s.date == date));
        // the server orders a day by start time; tasks without a time start at midnight
        tasks.sort_by(|a, b| {
            a.task
                .time_label()
                .unwrap_or("00:00")
                .cmp(b.task.time_label().unwrap_or("00:00"))
        });
        Ok(tasks.into_iter().map(|s| s.task.clone()).collect())
    }

    async fn add_task(&self, form: &TaskForm, date: NaiveDate) -> Result<(), ApiError> {
        self.enter(Endpoint::AddTask)?;
        let Some(title) = non_blank(&form.title) else {
            return Err(ApiError::Application("Missing data (title/date)".to_string()));
        };
        let id = self.allocate_id();
        let category = self.category_for(form.category_id.trim());
        self.tasks.borrow_mut().push(StoredTask {
            date,
            task: TaskDto {
                id,
                title,
                description: Some(form.description.trim().to_string()),
                time: non_blank(&form.time),
                is_completed: false,
                category,
                date: Some(wire_date(date)),
                created_at: None,
                updated_at: None,
            },
        });
        Ok(())
    }

    async fn edit_task(&self, id: &str, patch: &TaskPatch) -> Result<ApiReply, ApiError> {
        self.enter(Endpoint::EditTask)?;
        let new_date = match patch.date.as_deref() {
            Some(raw) => Some(
                NaiveDate::parse_from_str(raw, DATE_FORMAT)
                    .map_err(|_| ApiError::Application("Invalid date/time".to_string()))?,
            ),
            None => None,
        };
        let category = patch
            .category_id
            .as_deref()
            .map(|cid| self.category_for(cid.trim()));

        let mut tasks = self.tasks.borrow_mut();
        let Some(stored) = tasks.iter_mut().find(|s| s.task.id == id) else {
            return Err(ApiError::Application("Task not found".to_string()));
        };
        if let Some(title) = &patch.title {
            stored.task.title = title.trim().to_string();
        }
        if let Some(description) = &patch.description {
            stored.task.description = Some(description.trim().to_string());
        }
        if let Some(time) = &patch.time {
            stored.task.time = non_blank(time);
        }
        if let Some(category) = category {
            stored.task.category = category;
        }
        if let Some(date) = new_date {
            stored.date = date;
            stored.task.date = Some(wire_date(date));
        }
        Ok(ApiReply::ok())
    }

    async fn toggle_task(&self, id: &str) -> Result<ApiReply, ApiError> {
        self.enter(Endpoint::ToggleTask)?;
        let mut tasks = self.tasks.borrow_mut();
        let Some(stored) = tasks.iter_mut().find(|s| s.task.id == id) else {
            return Err(ApiError::Application("Task not found".to_string()));
        };
        stored.task.is_completed = !stored.task.is_completed;
        Ok(ApiReply {
            is_completed: Some(stored.task.is_completed),
            ..ApiReply::ok()
        })
    }

    async fn delete_task(&self, id: &str) -> Result<ApiReply, ApiError> {
        self.enter(Endpoint::DeleteTask)?;
        let mut tasks = self.tasks.borrow_mut();
        let before = tasks.len();
        tasks.retain(|s| s.task.id != id);
        if tasks.len() == before {
            return Err(ApiError::Application("Task not found".to_string()));
        }
        Ok(ApiReply::ok())
    }

    async fn move_task(&self, id: &str, new_date: NaiveDate) -> Result<(), ApiError> {
        self.enter(Endpoint::MoveTask)?;
        let mut tasks = self.tasks.borrow_mut();
        let Some(stored) = tasks.iter_mut().find(|s| s.task.id == id) else {
            return Err(ApiError::Application("Task not found".to_string()));
        };
        stored.date = new_date;
        stored.task.date = Some(wire_date(new_date));
        Ok(())
    }

    async fn add_sticker(&self, date: NaiveDate, sticker: &str) -> Result<(), ApiError> {
        self.enter(Endpoint::AddSticker)?;
        if sticker.trim().is_empty() {
            return Err(ApiError::Application("Missing data".to_string()));
        }
        let mut stickers = self.stickers.borrow_mut();
        let day = stickers.entry(date).or_default();
        if day.len() >= MAX_STICKERS_PER_DAY {
            return Err(ApiError::Application("Maximum stickers reached".to_string()));
        }
        day.push(sticker.to_string());
        Ok(())
    }

    async fn get_stickers(&self, date: NaiveDate) -> Result<Vec<String>, ApiError> {
        self.enter(Endpoint::GetStickers)?;
        Ok(self.stickers.borrow().get(&date).cloned().unwrap_or_default())
    }

    async fn set_day_color(&self, date: NaiveDate, color: &str) -> Result<(), ApiError> {
        self.enter(Endpoint::SetDayColor)?;
        self.colors.borrow_mut().insert(date, color.to_string());
        Ok(())
    }

    async fn get_categories(&self) -> Result<Vec<CategoryRecord>, ApiError> {
        self.enter(Endpoint::GetCategories)?;
        Ok(self.categories.borrow().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).expect("valid date")
    }

    #[tokio::test]
    async fn injected_failures_are_consumed_in_order() {
        let api = MemoryPlanner::new();
        api.fail_next(Endpoint::GetTasks, ApiError::Status(500));
        api.fail_next(Endpoint::GetTasks, ApiError::Network("offline".into()));

        assert_eq!(api.get_tasks(day("2024-05-01")).await, Err(ApiError::Status(500)));
        assert_eq!(
            api.get_tasks(day("2024-05-01")).await,
            Err(ApiError::Network("offline".into()))
        );
        assert_eq!(api.get_tasks(day("2024-05-01")).await, Ok(vec![]));
        assert_eq!(api.call_count(Endpoint::GetTasks), 3);
    }

    #[tokio::test]
    async fn sticker_cap_is_enforced() {
        let api = MemoryPlanner::new();
        let date = day("2024-05-01");
        for _ in 0..MAX_STICKERS_PER_DAY {
            api.add_sticker(date, "⭐").await.expect("below cap");
        }
        assert_eq!(
            api.add_sticker(date, "⭐").await,
            Err(ApiError::Application("Maximum stickers reached".into()))
        );
        assert_eq!(api.get_stickers(date).await.map(|s| s.len()), Ok(MAX_STICKERS_PER_DAY));
    }

    #[tokio::test]
    async fn add_without_title_is_an_application_error() {
        let api = MemoryPlanner::new();
        let result = api.add_task(&TaskForm::default(), day("2024-05-01")).await;
        assert_eq!(
            result,
            Err(ApiError::Application("Missing data (title/date)".into()))
        );
    }

    #[tokio::test]
    async fn edit_with_date_reschedules() {
        let api = MemoryPlanner::new();
        let id = api.seed_task(day("2024-05-01"), "Dentist", false);
        let patch = TaskPatch {
            title: Some("Dentist appointment".into()),
            date: Some("2024-05-03".into()),
            ..TaskPatch::default()
        };
        api.edit_task(&id, &patch).await.expect("edit");

        assert!(api.get_tasks(day("2024-05-01")).await.expect("load").is_empty());
        let moved = api.get_tasks(day("2024-05-03")).await.expect("load");
        assert_eq!(moved[0].title, "Dentist appointment");
    }
}
