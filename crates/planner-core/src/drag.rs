use std::cell::RefCell;

use chrono::NaiveDate;
use tracing::debug;

use crate::api::PlannerApi;
use crate::notify::Notifier;
use crate::panel::{Outcome, PanelView, TaskPanel};

/// Tracks the one task being dragged between day cells.
#[derive(Debug, Default)]
pub struct DragDropController {
    dragged: RefCell<Option<String>>,
}

impl DragDropController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts dragging `task_id`, replacing any previous drag.
    pub fn drag_start(&self, task_id: &str) {
        let previous = self.dragged.replace(Some(task_id.to_string()));
        if let Some(previous) = previous {
            debug!(%previous, task_id, "drag replaced");
        }
    }

    /// Pointer released outside any drop target.
    pub fn drag_end(&self) {
        self.dragged.take();
    }

    pub fn dragged(&self) -> Option<String> {
        self.dragged.borrow().clone()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragged.borrow().is_some()
    }

    /// Drops the dragged task onto `date`. The reference is cleared before the
    /// move is issued, whatever the move's outcome. Returns `None` when no
    /// drag was active.
    pub async fn drop_on<A, V, N>(
        &self,
        date: NaiveDate,
        panel: &TaskPanel<A, V, N>,
    ) -> Option<Outcome>
    where
        A: PlannerApi,
        V: PanelView,
        N: Notifier,
    {
        let task_id = self.dragged.take()?;
        debug!(task_id, %date, "drop");
        Some(panel.move_task(&task_id, date).await)
    }
}
