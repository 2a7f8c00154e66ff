use std::cell::Cell;

use chrono::NaiveDate;
use tracing::debug;

use crate::api::PlannerApi;
use crate::notify::Notifier;
use crate::panel::{PanelView, TaskPanel};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ModalState {
    #[default]
    Closed,
    Open(NaiveDate),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalEvent {
    /// Click on a day cell. `on_button` is set when the click landed on a
    /// control inside the cell.
    DayClick { date: NaiveDate, on_button: bool },
    CloseButton,
    Backdrop,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Opened(NaiveDate),
    Closed,
    Ignored,
}

/// Visibility of the day panel.
#[derive(Debug, Default)]
pub struct ModalController {
    state: Cell<ModalState>,
}

impl ModalController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ModalState {
        self.state.get()
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state.get(), ModalState::Open(_))
    }

    /// Applies `event` to the state machine without touching the panel.
    pub fn handle(&self, event: ModalEvent) -> Transition {
        let transition = match (self.state.get(), event) {
            (_, ModalEvent::DayClick { on_button: true, .. }) => Transition::Ignored,
            (_, ModalEvent::DayClick { date, .. }) => {
                self.state.set(ModalState::Open(date));
                Transition::Opened(date)
            }
            (ModalState::Closed, _) => Transition::Ignored,
            (
                ModalState::Open(_),
                ModalEvent::CloseButton | ModalEvent::Backdrop | ModalEvent::Escape,
            ) => {
                self.state.set(ModalState::Closed);
                Transition::Closed
            }
        };
        debug!(?event, ?transition, "modal");
        transition
    }

    /// Applies `event` and drives the panel: an opened day is bound and
    /// loaded, reopening rebinds and reloads.
    pub async fn dispatch<A, V, N>(
        &self,
        event: ModalEvent,
        panel: &TaskPanel<A, V, N>,
    ) -> Transition
    where
        A: PlannerApi,
        V: PanelView,
        N: Notifier,
    {
        let transition = self.handle(event);
        match transition {
            Transition::Opened(date) => {
                panel.view().set_modal_visible(true);
                panel.open_day(date).await;
            }
            Transition::Closed => panel.view().set_modal_visible(false),
            Transition::Ignored => {}
        }
        transition
    }
}
