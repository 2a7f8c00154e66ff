use std::collections::BTreeMap;

use chrono::{
  Datelike,
  Months,
  NaiveDate
};
use planner_core::dates::{
  DateFormatter,
  Locale
};
use planner_core::api::wire_date;
use planner_shared::hex_color;
use web_sys::{
  DragEvent,
  Element,
  MouseEvent
};
use yew::{
  Callback,
  Html,
  Properties,
  TargetCast,
  classes,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct MonthGridProps {
  /// First day of the shown month.
  pub month:       NaiveDate,
  pub today:       NaiveDate,
  pub selected:    Option<NaiveDate>,
  pub locale:      Locale,
  pub day_colors:
    BTreeMap<NaiveDate, String>,
  pub day_done:
    BTreeMap<NaiveDate, bool>,
  /// Day and whether the click landed on a button inside the cell.
  pub on_day_click:
    Callback<(NaiveDate, bool)>,
  pub on_drop:     Callback<NaiveDate>,
  pub on_shift:    Callback<i32>
}

fn month_days(
  month: NaiveDate
) -> Vec<NaiveDate> {
  month
    .iter_days()
    .take_while(|day| {
      day.month() == month.month()
    })
    .collect()
}

/// Month after (`delta > 0`) or before `month`.
pub fn shift_month(
  month: NaiveDate,
  delta: i32
) -> NaiveDate {
  let step = Months::new(delta.unsigned_abs());
  let shifted = if delta >= 0 {
    month.checked_add_months(step)
  } else {
    month.checked_sub_months(step)
  };
  shifted.unwrap_or(month)
}

/// Inline style of a day cell; colors other than `#rrggbb` are dropped.
fn cell_style(
  color: Option<&str>
) -> String {
  color
    .and_then(hex_color)
    .map(|color| {
      format!("background-color:{color}")
    })
    .unwrap_or_default()
}

#[function_component(MonthGrid)]
pub fn month_grid(
  props: &MonthGridProps
) -> Html {
  let formatter =
    DateFormatter::new(props.locale);
  let leading = props
    .month
    .weekday()
    .num_days_from_monday();

  let shift = |delta: i32| {
    let on_shift = props.on_shift.clone();
    Callback::from(
      move |_: MouseEvent| {
        on_shift.emit(delta)
      }
    )
  };

  let cell = |date: NaiveDate| {
    let onclick = {
      let on_day_click =
        props.on_day_click.clone();
      Callback::from(
        move |event: MouseEvent| {
          let on_button = event
            .target_dyn_into::<Element>()
            .and_then(|target| {
              target
                .closest("button")
                .ok()
                .flatten()
            })
            .is_some();
          on_day_click
            .emit((date, on_button));
        }
      )
    };
    let ondragover =
      Callback::from(|event: DragEvent| {
        event.prevent_default();
      });
    let ondrop = {
      let on_drop = props.on_drop.clone();
      Callback::from(
        move |event: DragEvent| {
          event.prevent_default();
          on_drop.emit(date);
        }
      )
    };

    let done = props
      .day_done
      .get(&date)
      .copied()
      .unwrap_or(false);
    let style = cell_style(
      props
        .day_colors
        .get(&date)
        .map(String::as_str)
    );

    html! {
        <div class={classes!(
                 "day",
                 "day-cell",
                 (date == props.today).then_some("today"),
                 (Some(date) == props.selected).then_some("selected"),
                 done.then_some("completed")
             )}
             data-date={wire_date(date)}
             {style}
             {onclick}
             {ondragover}
             {ondrop}>
            <span class="day-number">{ date.day() }</span>
            {
                if done {
                    html! { <span class="day-badge">{ "✓" }</span> }
                } else {
                    html! {}
                }
            }
        </div>
    }
  };

  html! {
      <div id="calendarSection" class="calendar">
          <div class="calendar-header">
              <button class="month-nav prev" onclick={shift(-1)}>{ "‹" }</button>
              <h2 class="month-title">{ formatter.month_title(props.month) }</h2>
              <button class="month-nav next" onclick={shift(1)}>{ "›" }</button>
          </div>
          <div class="calendar-grid">
              { for formatter.weekday_labels().iter().map(|label| html! {
                  <div class="weekday">{ *label }</div>
              }) }
              { for (0..leading).map(|_| html! { <div class="day empty"></div> }) }
              { for month_days(props.month).into_iter().map(cell) }
          </div>
      </div>
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn day(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(
      raw, "%Y-%m-%d"
    )
    .expect("valid date")
  }

  #[test]
  fn lists_every_day_of_the_month() {
    assert_eq!(
      month_days(day("2024-02-01")).len(),
      29
    );
    assert_eq!(
      shift_month(day("2024-01-01"), -1),
      day("2023-12-01")
    );
  }

  #[test]
  fn day_colors_must_be_hex() {
    assert_eq!(
      cell_style(Some("#A1B2C3")),
      "background-color:#A1B2C3"
    );
    assert_eq!(
      cell_style(Some(
        "red;background:url(x)"
      )),
      ""
    );
    assert_eq!(cell_style(None), "");
  }
}
