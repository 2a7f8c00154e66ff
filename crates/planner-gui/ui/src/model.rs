use std::collections::BTreeMap;
use std::rc::Rc;

use chrono::NaiveDate;
use planner_core::{
  PanelState,
  Tab,
  Toast
};
use planner_shared::{
  CategoryRecord,
  TaskForm
};
use yew::Reducible;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum FormField {
  Title,
  Description,
  Time,
  Category
}

/// Everything the page shows. Mutated only through [`UiAction`].
#[derive(Debug, Clone, PartialEq)]
pub struct UiModel {
  pub panel:       PanelState,
  pub count:       usize,
  pub title:       String,
  pub form:        TaskForm,
  pub tab:         Tab,
  pub modal_open:  bool,
  pub stickers:    Vec<String>,
  pub day_colors:
    BTreeMap<NaiveDate, String>,
  pub day_done:
    BTreeMap<NaiveDate, bool>,
  pub categories: Vec<CategoryRecord>,
  pub toasts:      Vec<(u64, Toast)>
}

impl Default for UiModel {
  fn default() -> Self {
    Self {
      panel:      PanelState::Empty,
      count:      0,
      title:      String::new(),
      form:       TaskForm::default(),
      tab:        Tab::Tasks,
      modal_open: false,
      stickers:   Vec::new(),
      day_colors: BTreeMap::new(),
      day_done:   BTreeMap::new(),
      categories: Vec::new(),
      toasts:     Vec::new()
    }
  }
}

#[derive(Debug, Clone)]
pub enum UiAction {
  Panel(PanelState),
  Count(usize),
  Title(String),
  ResetForm,
  FillForm(TaskForm),
  EditForm(FormField, String),
  Tab(Tab),
  Modal(bool),
  Stickers(Vec<String>),
  Paint(NaiveDate, String),
  Mark(NaiveDate, bool),
  Categories(Vec<CategoryRecord>),
  PushToast(u64, Toast),
  DismissToast(u64)
}

impl Reducible for UiModel {
  type Action = UiAction;

  fn reduce(
    self: Rc<Self>,
    action: Self::Action
  ) -> Rc<Self> {
    let mut next = (*self).clone();
    match action {
      | UiAction::Panel(state) => {
        next.panel = state
      }
      | UiAction::Count(count) => {
        next.count = count
      }
      | UiAction::Title(title) => {
        next.title = title
      }
      | UiAction::ResetForm => {
        next.form = TaskForm::default()
      }
      | UiAction::FillForm(form) => {
        next.form = form
      }
      | UiAction::EditForm(
        field,
        value
      ) => {
        match field {
          | FormField::Title => {
            next.form.title = value
          }
          | FormField::Description => {
            next.form.description = value
          }
          | FormField::Time => {
            next.form.time = value
          }
          | FormField::Category => {
            next.form.category_id = value
          }
        }
      }
      | UiAction::Tab(tab) => {
        next.tab = tab
      }
      | UiAction::Modal(open) => {
        next.modal_open = open;
        if !open {
          next.stickers.clear();
        }
      }
      | UiAction::Stickers(stickers) => {
        next.stickers = stickers
      }
      | UiAction::Paint(date, color) => {
        next
          .day_colors
          .insert(date, color);
      }
      | UiAction::Mark(date, done) => {
        next.day_done.insert(date, done);
      }
      | UiAction::Categories(list) => {
        next.categories = list
      }
      | UiAction::PushToast(id, toast) => {
        next.toasts.push((id, toast))
      }
      | UiAction::DismissToast(id) => {
        next
          .toasts
          .retain(|(tid, _)| *tid != id)
      }
    }
    Rc::new(next)
  }
}
