use std::cell::{Cell, RefCell};

use chrono::NaiveDate;
use planner_core::dates::parse_date;
use planner_core::memory::Endpoint;
use planner_core::{
    ApiError, DragDropController, MemoryPlanner, ModalController, ModalEvent, ModalState,
    Notifier, Outcome, PanelState, PanelView, PlannerApi, Tab, TaskPanel, Toast, ToastLevel,
};
use planner_shared::{CategoryRecord, TaskForm};

#[derive(Debug, Clone, PartialEq)]
enum Seen {
    Panel(PanelState),
    Count(usize),
    Title(String),
    FormReset,
    FormFilled(TaskForm),
    Tab(Tab),
    Confirm(String),
    PageReload,
    Modal(bool),
    Stickers(Vec<String>),
    Painted(String),
    Marked(bool),
    Categories(usize),
}

struct Recorder {
    seen: RefCell<Vec<Seen>>,
    toasts: RefCell<Vec<Toast>>,
    answer: Cell<bool>,
}

impl Recorder {
    fn new() -> Self {
        Self {
            seen: RefCell::new(Vec::new()),
            toasts: RefCell::new(Vec::new()),
            answer: Cell::new(true),
        }
    }

    fn seen(&self) -> Vec<Seen> {
        self.seen.borrow().clone()
    }

    fn toasts(&self) -> Vec<Toast> {
        self.toasts.borrow().clone()
    }

    fn last_toast(&self) -> Toast {
        self.toasts.borrow().last().cloned().expect("a toast")
    }

    fn push(&self, seen: Seen) {
        self.seen.borrow_mut().push(seen);
    }

    fn clear(&self) {
        self.seen.borrow_mut().clear();
        self.toasts.borrow_mut().clear();
    }
}

impl PanelView for Recorder {
    fn show_panel(&self, state: &PanelState) {
        self.push(Seen::Panel(state.clone()));
    }
    fn set_count(&self, count: usize) {
        self.push(Seen::Count(count));
    }
    fn set_title(&self, title: &str) {
        self.push(Seen::Title(title.to_string()));
    }
    fn reset_form(&self) {
        self.push(Seen::FormReset);
    }
    fn fill_form(&self, form: &TaskForm) {
        self.push(Seen::FormFilled(form.clone()));
    }
    fn switch_tab(&self, tab: Tab) {
        self.push(Seen::Tab(tab));
    }
    fn confirm(&self, question: &str) -> bool {
        self.push(Seen::Confirm(question.to_string()));
        self.answer.get()
    }
    fn reload_page(&self) {
        self.push(Seen::PageReload);
    }
    fn set_modal_visible(&self, visible: bool) {
        self.push(Seen::Modal(visible));
    }
    fn show_stickers(&self, _date: NaiveDate, stickers: &[String]) {
        self.push(Seen::Stickers(stickers.to_vec()));
    }
    fn paint_day(&self, _date: NaiveDate, color: &str) {
        self.push(Seen::Painted(color.to_string()));
    }
    fn mark_day(&self, _date: NaiveDate, completed: bool) {
        self.push(Seen::Marked(completed));
    }
    fn show_categories(&self, categories: &[CategoryRecord]) {
        self.push(Seen::Categories(categories.len()));
    }
}

impl Notifier for Recorder {
    fn notify(&self, toast: Toast) {
        self.toasts.borrow_mut().push(toast);
    }
}

type Panel<'a> = TaskPanel<&'a MemoryPlanner, &'a Recorder, &'a Recorder>;

fn panel<'a>(api: &'a MemoryPlanner, ui: &'a Recorder) -> Panel<'a> {
    TaskPanel::new(api, ui, ui)
}

fn day(raw: &str) -> NaiveDate {
    parse_date(raw).expect("valid date")
}

fn panel_states(ui: &Recorder) -> Vec<PanelState> {
    ui.seen()
        .into_iter()
        .filter_map(|seen| match seen {
            Seen::Panel(state) => Some(state),
            _ => None,
        })
        .collect()
}

fn titles(state: &PanelState) -> Vec<String> {
    state.rows().iter().map(|row| row.title.clone()).collect()
}

fn form(title: &str) -> TaskForm {
    TaskForm {
        title: title.to_string(),
        ..TaskForm::default()
    }
}

#[tokio::test]
async fn load_replaces_placeholder_with_rows_and_count() {
    let api = MemoryPlanner::new();
    let ui = Recorder::new();
    let date = day("2024-05-01");
    api.seed_task(date, "Buy milk", false);
    api.seed_task(date, "Call mom", true);

    let state = panel(&api, &ui).load_tasks(date).await;

    assert_eq!(titles(&state), ["Buy milk", "Call mom"]);
    let states = panel_states(&ui);
    assert_eq!(states.first(), Some(&PanelState::Loading));
    assert_eq!(states.last(), Some(&state));
    assert!(ui.seen().contains(&Seen::Count(2)));
}

#[tokio::test]
async fn empty_day_shows_empty_state_and_zero() {
    let api = MemoryPlanner::new();
    let ui = Recorder::new();

    let state = panel(&api, &ui).load_tasks(day("2024-05-02")).await;

    assert_eq!(state, PanelState::Empty);
    assert_eq!(
        ui.seen(),
        [
            Seen::Panel(PanelState::Loading),
            Seen::Count(0),
            Seen::Panel(PanelState::Empty)
        ]
    );
}

#[tokio::test]
async fn failures_end_in_error_state_never_loading() {
    let api = MemoryPlanner::new();
    let ui = Recorder::new();
    let panel = panel(&api, &ui);
    let date = day("2024-05-01");

    api.fail_next(Endpoint::GetTasks, ApiError::Status(500));
    assert_eq!(
        panel.load_tasks(date).await,
        PanelState::Error("HTTP 500".into())
    );

    api.fail_next(Endpoint::GetTasks, ApiError::Application("Database error".into()));
    assert_eq!(
        panel.load_tasks(date).await,
        PanelState::Error("Database error".into())
    );

    assert_eq!(panel_states(&ui).last(), Some(&PanelState::Error("Database error".into())));
    assert!(!ui.seen().iter().any(|s| matches!(s, Seen::Count(_))));
}

#[tokio::test]
async fn created_task_shows_up_in_its_day() {
    let api = MemoryPlanner::new();
    let ui = Recorder::new();
    let panel = panel(&api, &ui);
    let date = day("2024-05-01");

    let outcome = panel.create_task(&form("Buy milk"), date).await;
    assert_eq!(outcome, Outcome::Done);
    assert!(ui.seen().contains(&Seen::FormReset));
    assert_eq!(ui.last_toast().level, ToastLevel::Success);

    let state = panel.load_tasks(day("2024-05-01")).await;
    assert!(titles(&state).contains(&"Buy milk".to_string()));
}

#[tokio::test]
async fn blank_title_sends_nothing() {
    let api = MemoryPlanner::new();
    let ui = Recorder::new();

    let outcome = panel(&api, &ui)
        .create_task(&form("   "), day("2024-05-01"))
        .await;

    assert_eq!(outcome, Outcome::Invalid);
    assert_eq!(api.call_count(Endpoint::AddTask), 0);
    assert_eq!(ui.last_toast().level, ToastLevel::Error);
}

#[tokio::test]
async fn submitting_an_edit_form_updates_in_place() {
    let api = MemoryPlanner::new();
    let ui = Recorder::new();
    let panel = panel(&api, &ui);
    let date = day("2024-05-01");
    let id = api.seed_task(date, "Dentist", false);

    let state = panel.load_tasks(date).await;
    let row = state.rows()[0].clone();
    panel.open_edit_form(row.task());
    let filled = ui
        .seen()
        .into_iter()
        .find_map(|seen| match seen {
            Seen::FormFilled(form) => Some(form),
            _ => None,
        })
        .expect("form filled");
    assert_eq!(filled.task_id.as_deref(), Some(id.as_str()));
    assert!(ui.seen().contains(&Seen::Tab(Tab::Create)));

    let edited = TaskForm {
        title: "Dentist at 10".into(),
        ..filled
    };
    assert_eq!(panel.create_task(&edited, date).await, Outcome::Done);
    assert_eq!(api.call_count(Endpoint::AddTask), 0);
    assert_eq!(api.call_count(Endpoint::EditTask), 1);
    assert_eq!(titles(&panel.load_tasks(date).await), ["Dentist at 10"]);
}

#[tokio::test]
async fn toggling_twice_restores_completion() {
    let api = MemoryPlanner::new();
    let ui = Recorder::new();
    let panel = panel(&api, &ui);
    let date = day("2024-05-01");
    let id = api.seed_task(date, "Gym", false);
    panel.load_tasks(date).await;

    assert_eq!(panel.toggle_task(&id).await, Outcome::Done);
    assert_eq!(api.task(&id).map(|t| t.is_completed), Some(true));
    assert!(ui.seen().contains(&Seen::Marked(true)));

    assert_eq!(panel.toggle_task(&id).await, Outcome::Done);
    assert_eq!(api.task(&id).map(|t| t.is_completed), Some(false));
}

#[tokio::test]
async fn toggle_reloads_whatever_the_outcome() {
    let api = MemoryPlanner::new();
    let ui = Recorder::new();
    let panel = panel(&api, &ui);
    let date = day("2024-05-01");
    let id = api.seed_task(date, "Gym", false);
    panel.select(date);

    api.fail_next(Endpoint::ToggleTask, ApiError::Network("connection refused".into()));
    let outcome = panel.toggle_task(&id).await;
    assert_eq!(outcome, Outcome::Failed("connection refused".into()));
    let transport = ui.last_toast();

    let outcome = panel.toggle_task("missing").await;
    assert_eq!(outcome, Outcome::Rejected("Task not found".into()));
    let application = ui.last_toast();

    panel.toggle_task(&id).await;
    let success = ui.last_toast();

    assert_ne!(transport, application);
    assert_eq!(transport.level, ToastLevel::Error);
    assert!(transport.message.contains("connection refused"));
    assert_eq!(application.message, "Task not found");
    assert_eq!(success.level, ToastLevel::Success);
    // one reload plus one badge refresh per toggle
    assert_eq!(api.call_count(Endpoint::GetTasks), 6);
}

#[tokio::test]
async fn deleted_task_is_gone_from_every_day() {
    let api = MemoryPlanner::new();
    let ui = Recorder::new();
    let panel = panel(&api, &ui);
    let first = day("2024-05-01");
    let second = day("2024-05-02");
    let id = api.seed_task(first, "Old", false);
    api.seed_task(second, "Other", false);
    panel.load_tasks(first).await;

    assert_eq!(panel.delete_task(&id).await, Outcome::Done);
    assert!(ui.seen().contains(&Seen::Confirm("Видалити завдання?".into())));

    assert_eq!(panel.load_tasks(first).await, PanelState::Empty);
    let other = panel.load_tasks(second).await;
    assert!(other.rows().iter().all(|row| row.id != id));
}

#[tokio::test]
async fn declined_confirmation_sends_no_delete() {
    let api = MemoryPlanner::new();
    let ui = Recorder::new();
    ui.answer.set(false);
    let panel = panel(&api, &ui);
    let date = day("2024-05-01");
    let id = api.seed_task(date, "Keep me", false);

    assert_eq!(panel.delete_task(&id).await, Outcome::Declined);
    assert_eq!(api.call_count(Endpoint::DeleteTask), 0);
    assert!(api.task(&id).is_some());
}

#[tokio::test]
async fn delete_error_is_surfaced_without_reload() {
    let api = MemoryPlanner::new();
    let ui = Recorder::new();
    let panel = panel(&api, &ui);
    panel.select(day("2024-05-01"));

    let outcome = panel.delete_task("ghost").await;

    assert_eq!(outcome, Outcome::Rejected("Task not found".into()));
    assert_eq!(ui.last_toast(), Toast::error("Task not found"));
    assert_eq!(api.call_count(Endpoint::GetTasks), 0);
}

#[tokio::test]
async fn confirmation_can_be_turned_off() {
    let api = MemoryPlanner::new();
    let ui = Recorder::new();
    ui.answer.set(false);
    let panel = panel(&api, &ui).with_confirmation(false);
    let id = api.seed_task(day("2024-05-01"), "Scratch", false);

    assert_eq!(panel.delete_task(&id).await, Outcome::Done);
    assert!(!ui.seen().iter().any(|s| matches!(s, Seen::Confirm(_))));
}

#[tokio::test]
async fn moving_reschedules_and_resyncs_the_page() {
    let api = MemoryPlanner::new();
    let ui = Recorder::new();
    let panel = panel(&api, &ui);
    let a = day("2024-05-01");
    let b = day("2024-05-03");
    let id = api.seed_task(a, "Report", false);

    assert_eq!(panel.move_task(&id, b).await, Outcome::Done);
    assert!(ui.seen().contains(&Seen::PageReload));

    assert_eq!(panel.load_tasks(a).await, PanelState::Empty);
    assert_eq!(titles(&panel.load_tasks(b).await), ["Report"]);
}

#[tokio::test]
async fn failed_move_does_not_resync() {
    let api = MemoryPlanner::new();
    let ui = Recorder::new();
    let panel = panel(&api, &ui);
    api.fail_next(Endpoint::MoveTask, ApiError::Status(502));

    let outcome = panel.move_task("t", day("2024-05-03")).await;

    assert_eq!(outcome, Outcome::Failed("HTTP 502".into()));
    assert!(!ui.seen().contains(&Seen::PageReload));
    assert_eq!(ui.last_toast().level, ToastLevel::Error);
}

#[tokio::test]
async fn drop_always_clears_the_drag() {
    let api = MemoryPlanner::new();
    let ui = Recorder::new();
    let panel = panel(&api, &ui);
    let drag = DragDropController::new();
    let target = day("2024-05-04");
    let id = api.seed_task(day("2024-05-01"), "Move me", false);

    assert_eq!(drag.drop_on(target, &panel).await, None);
    assert_eq!(api.call_count(Endpoint::MoveTask), 0);

    api.fail_next(Endpoint::MoveTask, ApiError::Network("offline".into()));
    drag.drag_start(&id);
    let failed = drag.drop_on(target, &panel).await;
    assert_eq!(failed, Some(Outcome::Failed("offline".into())));
    assert!(!drag.is_dragging());

    drag.drag_start("stale");
    drag.drag_start(&id);
    assert_eq!(drag.dragged().as_deref(), Some(id.as_str()));
    assert_eq!(drag.drop_on(target, &panel).await, Some(Outcome::Done));
    assert!(!drag.is_dragging());
    assert_eq!(api.task(&id).and_then(|t| t.date).as_deref(), Some("2024-05-04"));
}

#[tokio::test]
async fn drag_end_without_drop_clears_reference() {
    let drag = DragDropController::new();
    drag.drag_start("t1");
    drag.drag_end();
    assert_eq!(drag.dragged(), None);
}

#[tokio::test]
async fn day_click_opens_and_loads_the_panel() {
    let api = MemoryPlanner::new();
    let ui = Recorder::new();
    let panel = panel(&api, &ui);
    let modal = ModalController::new();
    let date = day("2024-05-01");
    api.seed_task(date, "Buy milk", false);
    api.add_sticker(date, "🎉").await.expect("sticker");

    modal
        .dispatch(ModalEvent::DayClick { date, on_button: false }, &panel)
        .await;

    assert_eq!(modal.state(), ModalState::Open(date));
    assert_eq!(panel.selected_date(), Some(date));
    let seen = ui.seen();
    assert_eq!(seen[0], Seen::Modal(true));
    assert_eq!(seen[1], Seen::Title("Середа, 1 травня".into()));
    assert!(seen.contains(&Seen::Tab(Tab::Tasks)));
    assert!(seen.contains(&Seen::Count(1)));
    assert!(seen.contains(&Seen::Stickers(vec!["🎉".into()])));

    ui.clear();
    modal.dispatch(ModalEvent::Escape, &panel).await;
    assert_eq!(modal.state(), ModalState::Closed);
    assert_eq!(ui.seen(), [Seen::Modal(false)]);

    modal.dispatch(ModalEvent::Escape, &panel).await;
    assert_eq!(ui.seen(), [Seen::Modal(false)]);
}

#[tokio::test]
async fn reopening_rebinds_and_reloads() {
    let api = MemoryPlanner::new();
    let ui = Recorder::new();
    let panel = panel(&api, &ui);
    let modal = ModalController::new();
    let first = day("2024-05-01");
    let second = day("2024-05-02");
    api.seed_task(second, "Second day", false);

    modal
        .dispatch(ModalEvent::DayClick { date: first, on_button: false }, &panel)
        .await;
    modal
        .dispatch(ModalEvent::DayClick { date: second, on_button: false }, &panel)
        .await;

    assert_eq!(panel.selected_date(), Some(second));
    assert_eq!(titles(panel_states(&ui).last().expect("state")), ["Second day"]);
}

#[tokio::test]
async fn escaped_titles_in_rendered_rows() {
    let api = MemoryPlanner::new();
    let ui = Recorder::new();
    let panel = panel(&api, &ui);
    let date = day("2024-05-01");
    api.seed_task(date, "<script>alert(1)</script>", false);

    let state = panel.load_tasks(date).await;
    let html = panel.renderer().panel_markup(&state);

    assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(!html.contains("<script>"));
}

#[tokio::test]
async fn stickers_colors_and_day_badge() {
    let api = MemoryPlanner::new();
    let ui = Recorder::new();
    let panel = panel(&api, &ui);
    let date = day("2024-05-01");

    assert_eq!(panel.add_sticker("⭐").await, Outcome::Invalid);
    assert_eq!(api.call_count(Endpoint::AddSticker), 0);

    panel.select(date);
    assert_eq!(panel.add_sticker("⭐").await, Outcome::Done);
    assert_eq!(panel.add_sticker("⭐").await, Outcome::Done);
    assert_eq!(panel.load_stickers(date).await, ["⭐", "⭐"]);

    assert_eq!(panel.set_day_color("#ff6b6b").await, Outcome::Done);
    assert_eq!(api.day_color(date).as_deref(), Some("#ff6b6b"));
    assert!(ui.seen().contains(&Seen::Painted("#ff6b6b".into())));

    assert_eq!(panel.refresh_day_status(date).await, Some(false));
    api.seed_task(date, "Done already", true);
    assert_eq!(panel.refresh_day_status(date).await, Some(true));
    api.seed_task(date, "Still open", false);
    assert_eq!(panel.refresh_day_status(date).await, Some(false));
}

#[tokio::test]
async fn sticker_cap_is_reported_as_application_error() {
    let api = MemoryPlanner::new();
    let ui = Recorder::new();
    let panel = panel(&api, &ui);
    panel.select(day("2024-05-01"));
    for _ in 0..planner_shared::MAX_STICKERS_PER_DAY {
        panel.add_sticker("🔥").await;
    }

    let outcome = panel.add_sticker("🔥").await;

    assert_eq!(outcome, Outcome::Rejected("Maximum stickers reached".into()));
    assert_eq!(ui.last_toast(), Toast::error("Maximum stickers reached"));
}

#[tokio::test]
async fn categories_fall_back_to_empty_on_failure() {
    let api = MemoryPlanner::new();
    let ui = Recorder::new();
    let panel = panel(&api, &ui);
    api.seed_category("c1", "Робота", "💼", "#FF5733");

    assert_eq!(panel.load_categories().await.len(), 1);
    assert!(ui.seen().contains(&Seen::Categories(1)));

    api.fail_next(Endpoint::GetCategories, ApiError::Status(500));
    assert!(panel.load_categories().await.is_empty());
    assert!(ui.toasts().is_empty());
}
