use std::cell::Cell;
use std::rc::Rc;

use chrono::NaiveDate;
use gloo::timers::callback::Timeout;
use planner_core::notify::TOAST_TTL;
use planner_core::{
  Notifier,
  PanelState,
  PanelView,
  Tab,
  Toast
};
use planner_shared::{
  CategoryRecord,
  TaskForm
};
use yew::UseReducerDispatcher;

use crate::model::{
  UiAction,
  UiModel
};

/// Binds the controllers to the page: every view call becomes a reducer
/// action, confirmations and reloads go to `window`.
#[derive(Clone)]
pub struct WebSurface {
  dispatcher: UseReducerDispatcher<UiModel>,
  next_toast: Rc<Cell<u64>>
}

impl WebSurface {
  pub fn new(
    dispatcher: UseReducerDispatcher<UiModel>
  ) -> Self {
    Self {
      dispatcher,
      next_toast: Rc::new(Cell::new(0))
    }
  }

  fn send(&self, action: UiAction) {
    self.dispatcher.dispatch(action);
  }
}

impl PanelView for WebSurface {
  fn show_panel(
    &self,
    state: &PanelState
  ) {
    self.send(UiAction::Panel(
      state.clone()
    ));
  }

  fn set_count(&self, count: usize) {
    self.send(UiAction::Count(count));
  }

  fn set_title(&self, title: &str) {
    self.send(UiAction::Title(
      title.to_string()
    ));
  }

  fn reset_form(&self) {
    self.send(UiAction::ResetForm);
  }

  fn fill_form(&self, form: &TaskForm) {
    self.send(UiAction::FillForm(
      form.clone()
    ));
  }

  fn switch_tab(&self, tab: Tab) {
    self.send(UiAction::Tab(tab));
  }

  fn confirm(
    &self,
    question: &str
  ) -> bool {
    web_sys::window()
      .and_then(|window| {
        window
          .confirm_with_message(question)
          .ok()
      })
      .unwrap_or(false)
  }

  fn reload_page(&self) {
    let reloaded = web_sys::window()
      .map(|window| {
        window.location().reload()
      });
    if !matches!(reloaded, Some(Ok(())))
    {
      tracing::warn!(
        "page reload failed"
      );
    }
  }

  fn set_modal_visible(
    &self,
    visible: bool
  ) {
    self.send(UiAction::Modal(visible));
  }

  fn show_stickers(
    &self,
    _date: NaiveDate,
    stickers: &[String]
  ) {
    self.send(UiAction::Stickers(
      stickers.to_vec()
    ));
  }

  fn paint_day(
    &self,
    date: NaiveDate,
    color: &str
  ) {
    self.send(UiAction::Paint(
      date,
      color.to_string()
    ));
  }

  fn mark_day(
    &self,
    date: NaiveDate,
    completed: bool
  ) {
    self.send(UiAction::Mark(
      date, completed
    ));
  }

  fn show_categories(
    &self,
    categories: &[CategoryRecord]
  ) {
    self.send(UiAction::Categories(
      categories.to_vec()
    ));
  }
}

impl Notifier for WebSurface {
  fn notify(&self, toast: Toast) {
    let id = self.next_toast.get() + 1;
    self.next_toast.set(id);
    tracing::debug!(id, level = ?toast.level, message = %toast.message, "toast");
    self.send(UiAction::PushToast(
      id, toast
    ));

    let dispatcher =
      self.dispatcher.clone();
    Timeout::new(
      TOAST_TTL.as_millis() as u32,
      move || {
        dispatcher.dispatch(
          UiAction::DismissToast(id)
        );
      }
    )
    .forget();
  }
}
