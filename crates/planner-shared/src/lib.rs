//! Wire types of the planner REST contract.
//!
//! Everything here mirrors the JSON and form bodies the backend under
//! `/planner/*` produces and accepts, field for field.

use serde::{
  Deserialize,
  Serialize
};

/// Emoji offered by the sticker palette of the day panel.
pub const AVAILABLE_STICKERS: [&str; 20] = [
  "🎉", "⭐", "❤️", "🔥", "💪", "🎯",
  "✨", "🌟", "💖", "🎈", "🏆", "🎨",
  "📚", "☕", "🌈", "🦄", "🌸", "🍕",
  "🎮", "🎵"
];

/// The backend refuses a sticker once a day already carries this many.
pub const MAX_STICKERS_PER_DAY: usize =
  10;

pub const DEFAULT_CATEGORY_ICON: &str =
  "📌";
pub const DEFAULT_CATEGORY_COLOR: &str =
  "#666666";

/// `raw` when it is a `#rrggbb` color, the only form allowed into inline
/// styles.
pub fn hex_color(
  raw: &str
) -> Option<&str> {
  let digits = raw.strip_prefix('#')?;
  (digits.len() == 6
    && digits
      .chars()
      .all(|ch| ch.is_ascii_hexdigit()))
  .then_some(raw)
}

/// Category as embedded in a task record.
#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct CategoryDto {
  #[serde(default)]
  pub id:    Option<String>,
  #[serde(default)]
  pub name:  String,
  #[serde(default = "default_icon")]
  pub icon:  String,
  #[serde(default = "default_color")]
  pub color: String
}

/// Category as listed by `/planner/get_categories`.
#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct CategoryRecord {
  #[serde(rename = "_id")]
  pub id:        String,
  #[serde(default)]
  pub name_ua:   String,
  #[serde(default = "default_icon")]
  pub icon:      String,
  #[serde(default = "default_color")]
  pub color_hex: String
}

impl From<&CategoryRecord>
  for CategoryDto
{
  fn from(
    record: &CategoryRecord
  ) -> Self {
    Self {
      id:    Some(record.id.clone()),
      name:  record.name_ua.clone(),
      icon:  record.icon.clone(),
      color: record.color_hex.clone()
    }
  }
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct TaskDto {
  #[serde(rename = "_id", alias = "id")]
  pub id:           String,
  #[serde(default)]
  pub title:        String,
  #[serde(default)]
  pub description:  Option<String>,
  #[serde(default)]
  pub time:         Option<String>,
  #[serde(default)]
  pub is_completed: bool,
  #[serde(default)]
  pub category:     Option<CategoryDto>,
  #[serde(default)]
  pub date:         Option<String>,
  #[serde(default)]
  pub created_at:   Option<String>,
  #[serde(default)]
  pub updated_at:   Option<String>
}

impl TaskDto {
  /// Time label, with blank strings treated as absent.
  pub fn time_label(
    &self
  ) -> Option<&str> {
    self
      .time
      .as_deref()
      .map(str::trim)
      .filter(|t| !t.is_empty())
  }

  pub fn description_text(
    &self
  ) -> &str {
    self
      .description
      .as_deref()
      .unwrap_or_default()
  }
}

/// Body of `GET /planner/get_tasks/{date}`.
#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
)]
#[serde(untagged)]
pub enum TasksReply {
  Tasks(Vec<TaskDto>),
  Failure { error: String },
  Null
}

/// Fields of the day panel form.
///
/// The same form creates and edits tasks: a present `task_id` turns a
/// submit into an update of that task.
#[derive(
  Debug,
  Clone,
  Default,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct TaskForm {
  pub task_id:     Option<String>,
  pub title:       String,
  pub description: String,
  pub time:        String,
  pub category_id: String
}

impl TaskForm {
  pub fn from_task(
    task: &TaskDto
  ) -> Self {
    Self {
      task_id:     Some(task.id.clone()),
      title:       task.title.clone(),
      description: task
        .description_text()
        .to_string(),
      time:        task
        .time
        .clone()
        .unwrap_or_default(),
      category_id: task
        .category
        .as_ref()
        .and_then(|c| c.id.clone())
        .unwrap_or_default()
    }
  }

  pub fn is_update(&self) -> bool {
    self
      .task_id
      .as_deref()
      .is_some_and(|id| {
        !id.trim().is_empty()
      })
  }

  /// Form-encoded pairs sent to `/planner/add_task`.
  pub fn create_fields(
    &self,
    date: &str
  ) -> Vec<(&'static str, String)> {
    let mut fields = vec![
      ("title", self.title.trim().to_string()),
      (
        "description",
        self.description.trim().to_string()
      ),
      ("time", self.time.trim().to_string()),
    ];
    if !self.category_id.trim().is_empty()
    {
      fields.push((
        "category_id",
        self.category_id.trim().to_string()
      ));
    }
    fields.push(("date", date.to_string()));
    fields
  }

  /// JSON body sent to `/planner/edit_task/{id}`.
  pub fn to_patch(
    &self,
    date: Option<&str>
  ) -> TaskPatch {
    TaskPatch {
      title:       Some(
        self.title.trim().to_string()
      ),
      description: Some(
        self.description.trim().to_string()
      ),
      time:        Some(
        self.time.trim().to_string()
      ),
      category_id: Some(
        self.category_id.trim().to_string()
      ),
      date:        date.map(str::to_string)
    }
  }
}

#[derive(
  Debug,
  Clone,
  Default,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct TaskPatch {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub title:       Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub time:        Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub category_id: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub date:        Option<String>
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct MoveTaskArgs {
  pub new_date: String
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct StickerArgs {
  pub date:    String,
  pub sticker: String
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct DayColorArgs {
  pub date:  String,
  pub color: String
}

/// Generic mutation reply. The backend is loose about it: success is
/// signalled by `success: true` or simply by the absence of `error`.
#[derive(
  Debug,
  Clone,
  Default,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct ApiReply {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub success:      Option<bool>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub error:        Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub task_id:      Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub is_completed: Option<bool>
}

impl ApiReply {
  pub fn ok() -> Self {
    Self {
      success: Some(true),
      ..Self::default()
    }
  }

  pub fn failed(
    error: impl Into<String>
  ) -> Self {
    Self {
      error: Some(error.into()),
      ..Self::default()
    }
  }

  pub fn is_success(&self) -> bool {
    self.success == Some(true)
      || self.error.is_none()
  }
}

fn default_icon() -> String {
  DEFAULT_CATEGORY_ICON.to_string()
}

fn default_color() -> String {
  DEFAULT_CATEGORY_COLOR.to_string()
}
