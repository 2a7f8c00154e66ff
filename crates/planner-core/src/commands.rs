use anyhow::{Context, anyhow};
use chrono::NaiveDate;
use planner_shared::TaskForm;
use tracing::{debug, info, instrument};

use crate::api::{PlannerApi, wire_date};
use crate::cli::{Command, TaskFields};
use crate::notify::Notifier;
use crate::panel::{Outcome, PanelState, PanelView, TaskPanel};

#[instrument(skip(panel, command))]
pub async fn dispatch<A, V, N>(panel: &TaskPanel<A, V, N>, command: Command) -> anyhow::Result<()>
where
    A: PlannerApi,
    V: PanelView,
    N: Notifier,
{
    debug!(?command, "dispatching command");

    match command {
        Command::Day { date } => {
            let state = panel.open_day(date).await;
            panel.refresh_day_status(date).await;
            ensure_loaded(&state)
        }
        Command::Tasks { date, .. } => {
            let state = panel.load_tasks(date).await;
            ensure_loaded(&state)
        }
        Command::Add { date, fields } => {
            let mut form = TaskForm::default();
            apply_fields(&mut form, fields);
            panel.select(date);
            finish(panel.create_task(&form, date).await)
        }
        Command::Edit { date, id, fields } => {
            let mut form = existing_form(panel, date, &id).await?;
            apply_fields(&mut form, fields);
            panel.select(date);
            finish(panel.create_task(&form, date).await)
        }
        Command::Toggle { date, id } => {
            panel.select(date);
            finish(panel.toggle_task(&id).await)
        }
        Command::Delete { date, id, .. } => {
            panel.select(date);
            finish(panel.delete_task(&id).await)
        }
        Command::Move { id, new_date } => finish(panel.move_task(&id, new_date).await),
        Command::Stickers { date } => {
            let stickers = panel.load_stickers(date).await;
            info!(%date, count = stickers.len(), "stickers listed");
            Ok(())
        }
        Command::Sticker { date, sticker } => {
            panel.select(date);
            finish(panel.add_sticker(&sticker).await)
        }
        Command::Color { date, color } => {
            panel.select(date);
            finish(panel.set_day_color(&color).await)
        }
        Command::Categories => {
            let categories = panel.load_categories().await;
            info!(count = categories.len(), "categories listed");
            Ok(())
        }
    }
}

fn ensure_loaded(state: &PanelState) -> anyhow::Result<()> {
    match state {
        PanelState::Error(detail) => Err(anyhow!("failed to load tasks: {detail}")),
        _ => Ok(()),
    }
}

fn finish(outcome: Outcome) -> anyhow::Result<()> {
    match outcome {
        Outcome::Done => Ok(()),
        Outcome::Declined => {
            info!("cancelled");
            Ok(())
        }
        Outcome::Invalid => Err(anyhow!("nothing was sent")),
        Outcome::Rejected(message) => Err(anyhow!("backend rejected the request: {message}")),
        Outcome::Failed(detail) => Err(anyhow!("request failed: {detail}")),
    }
}

fn apply_fields(form: &mut TaskForm, fields: TaskFields) {
    if let Some(title) = fields.title {
        form.title = title;
    }
    if let Some(description) = fields.description {
        form.description = description;
    }
    if let Some(time) = fields.time {
        form.time = time;
    }
    if let Some(category_id) = fields.category_id {
        form.category_id = category_id;
    }
}

/// Form bindings of task `id`, read fresh from its day.
async fn existing_form<A, V, N>(
    panel: &TaskPanel<A, V, N>,
    date: NaiveDate,
    id: &str,
) -> anyhow::Result<TaskForm>
where
    A: PlannerApi,
    V: PanelView,
    N: Notifier,
{
    let tasks = panel
        .api()
        .get_tasks(date)
        .await
        .with_context(|| format!("failed to load tasks for {}", wire_date(date)))?;
    tasks
        .iter()
        .find(|task| task.id == id)
        .map(TaskForm::from_task)
        .ok_or_else(|| anyhow!("no task {id} on {}", wire_date(date)))
}
