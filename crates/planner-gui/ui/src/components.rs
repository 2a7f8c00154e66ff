mod clock;
mod day_panel;
mod month_grid;
mod task_row;
mod toasts;

pub use clock::Clock;
pub use day_panel::DayPanel;
pub use month_grid::{
  MonthGrid,
  shift_month
};
pub use task_row::PanelTaskRow;
pub use toasts::ToastStack;
