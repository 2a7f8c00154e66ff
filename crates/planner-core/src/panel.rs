//! The day panel controller.
//!
//! Every mutation follows the same cycle: call the backend, report the
//! outcome, then re-fetch the selected day from scratch. Nothing is patched
//! locally and no task list outlives the date it was loaded for.

use std::cell::{Cell, RefCell};

use chrono::NaiveDate;
use planner_shared::{CategoryRecord, TaskDto, TaskForm};
use tracing::{debug, info, warn};

use crate::api::PlannerApi;
use crate::dates::{DateFormatter, Locale};
use crate::error::ApiError;
use crate::messages::Messages;
use crate::notify::{Notifier, Toast};
use crate::render::{TaskAction, TaskRenderer, TaskRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Tasks,
    Create,
}

impl Tab {
    /// Value of the tab button's `data-tab` attribute.
    pub fn name(self) -> &'static str {
        match self {
            Tab::Tasks => "tasks",
            Tab::Create => "create",
        }
    }

    /// Id of the tab's `.tab-content` element.
    pub fn content_id(self) -> &'static str {
        match self {
            Tab::Tasks => "tabTasks",
            Tab::Create => "tabCreate",
        }
    }
}

/// What the task list of the panel currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelState {
    Loading,
    Rows(Vec<TaskRow>),
    Empty,
    Error(String),
}

impl PanelState {
    /// Value of the task counter, if this state sets one.
    pub fn count(&self) -> Option<usize> {
        match self {
            PanelState::Rows(rows) => Some(rows.len()),
            PanelState::Empty => Some(0),
            PanelState::Loading | PanelState::Error(_) => None,
        }
    }

    pub fn rows(&self) -> &[TaskRow] {
        match self {
            PanelState::Rows(rows) => rows,
            _ => &[],
        }
    }
}

/// How a user action ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// The user declined the confirmation; nothing was sent.
    Declined,
    /// Rejected on the client before any request (blank title, no day).
    Invalid,
    /// The backend answered with an `error` field.
    Rejected(String),
    /// The request failed in transport.
    Failed(String),
}

impl Outcome {
    pub fn is_done(&self) -> bool {
        matches!(self, Outcome::Done)
    }
}

/// The page elements the controller drives.
///
/// In the browser these map to `#panelTasks`, `#tasksCount`, `#taskForm`
/// and friends; elsewhere they are stubbed.
pub trait PanelView {
    fn show_panel(&self, state: &PanelState);
    fn set_count(&self, count: usize);
    fn set_title(&self, title: &str);
    fn reset_form(&self);
    fn fill_form(&self, form: &TaskForm);
    fn switch_tab(&self, tab: Tab);
    fn confirm(&self, question: &str) -> bool;
    /// Resynchronizes the whole page, not just the panel.
    fn reload_page(&self);

    fn set_modal_visible(&self, _visible: bool) {}
    fn show_stickers(&self, _date: NaiveDate, _stickers: &[String]) {}
    fn paint_day(&self, _date: NaiveDate, _color: &str) {}
    fn mark_day(&self, _date: NaiveDate, _completed: bool) {}
    fn show_categories(&self, _categories: &[CategoryRecord]) {}
}

impl<V: PanelView + ?Sized> PanelView for &V {
    fn show_panel(&self, state: &PanelState) {
        (**self).show_panel(state);
    }
    fn set_count(&self, count: usize) {
        (**self).set_count(count);
    }
    fn set_title(&self, title: &str) {
        (**self).set_title(title);
    }
    fn reset_form(&self) {
        (**self).reset_form();
    }
    fn fill_form(&self, form: &TaskForm) {
        (**self).fill_form(form);
    }
    fn switch_tab(&self, tab: Tab) {
        (**self).switch_tab(tab);
    }
    fn confirm(&self, question: &str) -> bool {
        (**self).confirm(question)
    }
    fn reload_page(&self) {
        (**self).reload_page();
    }
    fn set_modal_visible(&self, visible: bool) {
        (**self).set_modal_visible(visible);
    }
    fn show_stickers(&self, date: NaiveDate, stickers: &[String]) {
        (**self).show_stickers(date, stickers);
    }
    fn paint_day(&self, date: NaiveDate, color: &str) {
        (**self).paint_day(date, color);
    }
    fn mark_day(&self, date: NaiveDate, completed: bool) {
        (**self).mark_day(date, completed);
    }
    fn show_categories(&self, categories: &[CategoryRecord]) {
        (**self).show_categories(categories);
    }
}

pub struct TaskPanel<A, V, N> {
    api: A,
    view: V,
    notifier: N,
    renderer: TaskRenderer,
    formatter: DateFormatter,
    confirm_deletes: bool,
    selected: Cell<Option<NaiveDate>>,
    shown: RefCell<Vec<TaskRow>>,
}

impl<A, V, N> TaskPanel<A, V, N>
where
    A: PlannerApi,
    V: PanelView,
    N: Notifier,
{
    pub fn new(api: A, view: V, notifier: N) -> Self {
        let locale = Locale::default();
        Self {
            api,
            view,
            notifier,
            renderer: TaskRenderer::new(locale.messages()),
            formatter: DateFormatter::new(locale),
            confirm_deletes: true,
            selected: Cell::new(None),
            shown: RefCell::new(Vec::new()),
        }
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.renderer = TaskRenderer::new(locale.messages());
        self.formatter = DateFormatter::new(locale);
        self
    }

    /// Turns the delete confirmation off (`confirm = off`, `delete --yes`).
    pub fn with_confirmation(mut self, enabled: bool) -> Self {
        self.confirm_deletes = enabled;
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn renderer(&self) -> &TaskRenderer {
        &self.renderer
    }

    pub fn formatter(&self) -> &DateFormatter {
        &self.formatter
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.selected.get()
    }

    /// Binds `date` without loading it.
    pub fn select(&self, date: NaiveDate) {
        self.selected.set(Some(date));
    }

    fn messages(&self) -> &'static Messages {
        self.renderer.messages()
    }

    fn report(&self, summary: &str, err: &ApiError) -> Outcome {
        if err.is_transport() {
            self.notifier
                .notify(Toast::error(Messages::with_detail(summary, err)));
            Outcome::Failed(err.to_string())
        } else {
            self.notifier.notify(Toast::error(err.to_string()));
            Outcome::Rejected(err.to_string())
        }
    }

    /// Binds `date`, shows its title, resets the form and loads the day.
    #[tracing::instrument(skip(self))]
    pub async fn open_day(&self, date: NaiveDate) -> PanelState {
        self.selected.set(Some(date));
        self.view.set_title(&self.formatter.panel_title(date));
        self.view.reset_form();
        self.view.switch_tab(Tab::Tasks);
        let state = self.load_tasks(date).await;
        self.load_stickers(date).await;
        state
    }

    /// Fetches `date` and replaces the loading placeholder with exactly one
    /// of rows, empty state or error state.
    #[tracing::instrument(skip(self))]
    pub async fn load_tasks(&self, date: NaiveDate) -> PanelState {
        self.selected.set(Some(date));
        self.view.show_panel(&PanelState::Loading);

        let state = match self.api.get_tasks(date).await {
            Ok(tasks) if tasks.is_empty() => PanelState::Empty,
            Ok(tasks) => PanelState::Rows(self.renderer.rows(&tasks)),
            Err(err) => {
                warn!(%date, error = %err, "loading tasks failed");
                PanelState::Error(err.to_string())
            }
        };

        if let Some(count) = state.count() {
            self.view.set_count(count);
        }
        *self.shown.borrow_mut() = state.rows().to_vec();
        debug!(%date, count = ?state.count(), "panel updated");
        self.view.show_panel(&state);
        state
    }

    /// Reloads the selected day, if any.
    pub async fn reload(&self) -> Option<PanelState> {
        let date = self.selected.get()?;
        Some(self.load_tasks(date).await)
    }

    #[tracing::instrument(skip(self))]
    pub async fn toggle_task(&self, id: &str) -> Outcome {
        let outcome = match self.api.toggle_task(id).await {
            Ok(reply) if !reply.is_success() => {
                let message = reply.error.unwrap_or_default();
                self.notifier.notify(Toast::error(message.clone()));
                Outcome::Rejected(message)
            }
            Ok(reply) => {
                info!(id, completed = ?reply.is_completed, "task toggled");
                self.notifier
                    .notify(Toast::success(self.messages().status_updated));
                Outcome::Done
            }
            Err(err) => self.report(self.messages().update_failed, &err),
        };

        // reload whatever the outcome
        if let Some(date) = self.selected.get() {
            self.load_tasks(date).await;
            self.refresh_day_status(date).await;
        }
        outcome
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_task(&self, id: &str) -> Outcome {
        if self.confirm_deletes && !self.view.confirm(self.messages().confirm_delete) {
            debug!(id, "delete declined");
            return Outcome::Declined;
        }

        match self.api.delete_task(id).await {
            Ok(reply) if reply.is_success() => {
                info!(id, "task deleted");
                self.notifier
                    .notify(Toast::success(self.messages().task_deleted));
                if let Some(date) = self.selected.get() {
                    self.view.reset_form();
                    self.load_tasks(date).await;
                    self.refresh_day_status(date).await;
                }
                Outcome::Done
            }
            Ok(reply) => {
                let message = reply
                    .error
                    .unwrap_or_else(|| self.messages().delete_failed.to_string());
                self.notifier.notify(Toast::error(message.clone()));
                Outcome::Rejected(message)
            }
            Err(err) => self.report(self.messages().delete_failed, &err),
        }
    }

    /// Moves a task to `new_date` and resynchronizes the whole page, since
    /// both day cells change.
    #[tracing::instrument(skip(self))]
    pub async fn move_task(&self, id: &str, new_date: NaiveDate) -> Outcome {
        match self.api.move_task(id, new_date).await {
            Ok(()) => {
                info!(id, %new_date, "task moved");
                self.notifier.notify(Toast::success(self.messages().task_moved));
                self.view.reload_page();
                Outcome::Done
            }
            Err(err) => self.report(self.messages().move_failed, &err),
        }
    }

    /// Submits the form: a create without `task_id`, an update with one.
    #[tracing::instrument(skip(self, form), fields(update = form.is_update()))]
    pub async fn create_task(&self, form: &TaskForm, date: NaiveDate) -> Outcome {
        if form.title.trim().is_empty() {
            self.notifier
                .notify(Toast::error(self.messages().title_required));
            return Outcome::Invalid;
        }

        let messages = self.messages();
        let (result, done) = match form.task_id.as_deref() {
            Some(id) if form.is_update() => {
                let result = self
                    .api
                    .edit_task(id, &form.to_patch(None))
                    .await
                    .and_then(|reply| {
                        if reply.is_success() {
                            Ok(())
                        } else {
                            Err(ApiError::Application(reply.error.unwrap_or_default()))
                        }
                    });
                (result, messages.task_updated)
            }
            _ => (self.api.add_task(form, date).await, messages.task_added),
        };

        match result {
            Ok(()) => {
                info!(%date, "task saved");
                self.view.reset_form();
                self.view.switch_tab(Tab::Tasks);
                self.load_tasks(date).await;
                self.notifier.notify(Toast::success(done));
                self.refresh_day_status(date).await;
                Outcome::Done
            }
            Err(err) => self.report(messages.add_failed, &err),
        }
    }

    /// Fills the form with `task` so the next submit updates it.
    pub fn open_edit_form(&self, task: &TaskDto) {
        debug!(id = %task.id, "editing task");
        self.view.switch_tab(Tab::Create);
        self.view.fill_form(&TaskForm::from_task(task));
    }

    /// Routes a row control to its operation.
    pub async fn handle_action(&self, action: TaskAction) -> Outcome {
        match action {
            TaskAction::Toggle(id) => self.toggle_task(&id).await,
            TaskAction::Delete(id) => self.delete_task(&id).await,
            TaskAction::Edit(id) => {
                let task = self
                    .shown
                    .borrow()
                    .iter()
                    .find(|row| row.id == id)
                    .map(|row| row.task().clone());
                match task {
                    Some(task) => {
                        self.open_edit_form(&task);
                        Outcome::Done
                    }
                    None => Outcome::Invalid,
                }
            }
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn add_sticker(&self, sticker: &str) -> Outcome {
        let Some(date) = self.selected.get() else {
            self.notifier
                .notify(Toast::error(self.messages().no_day_selected));
            return Outcome::Invalid;
        };
        match self.api.add_sticker(date, sticker).await {
            Ok(()) => {
                self.notifier.notify(Toast::success(format!(
                    "{} {sticker}",
                    self.messages().sticker_added
                )));
                self.load_stickers(date).await;
                Outcome::Done
            }
            Err(err) => self.report(self.messages().sticker_failed, &err),
        }
    }

    /// Shows the stickers of `date`. A failure is logged and shows nothing.
    #[tracing::instrument(skip(self))]
    pub async fn load_stickers(&self, date: NaiveDate) -> Vec<String> {
        match self.api.get_stickers(date).await {
            Ok(stickers) => {
                self.view.show_stickers(date, &stickers);
                stickers
            }
            Err(err) => {
                warn!(%date, error = %err, "loading stickers failed");
                Vec::new()
            }
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn set_day_color(&self, color: &str) -> Outcome {
        let Some(date) = self.selected.get() else {
            self.notifier
                .notify(Toast::error(self.messages().no_day_selected));
            return Outcome::Invalid;
        };
        match self.api.set_day_color(date, color).await {
            Ok(()) => {
                self.view.paint_day(date, color);
                self.notifier
                    .notify(Toast::success(self.messages().color_changed));
                Outcome::Done
            }
            Err(err) => self.report(self.messages().color_failed, &err),
        }
    }

    /// Recomputes the completion badge of a day cell: completed when the day
    /// has tasks and all of them are done.
    #[tracing::instrument(skip(self))]
    pub async fn refresh_day_status(&self, date: NaiveDate) -> Option<bool> {
        match self.api.get_tasks(date).await {
            Ok(tasks) => {
                let completed = !tasks.is_empty() && tasks.iter().all(|t| t.is_completed);
                self.view.mark_day(date, completed);
                Some(completed)
            }
            Err(err) => {
                debug!(%date, error = %err, "day status not refreshed");
                None
            }
        }
    }

    /// Categories for the form selector. A failure is logged and yields none.
    #[tracing::instrument(skip(self))]
    pub async fn load_categories(&self) -> Vec<CategoryRecord> {
        match self.api.get_categories().await {
            Ok(categories) => {
                self.view.show_categories(&categories);
                categories
            }
            Err(err) => {
                warn!(error = %err, "loading categories failed");
                Vec::new()
            }
        }
    }
}
