use chrono::Local;
use gloo::timers::callback::Interval;
use planner_core::dates::format_clock;
use yew::{
  Html,
  function_component,
  html,
  use_effect_with,
  use_state
};

fn now() -> String {
  format_clock(Local::now().time())
}

/// `#clock`, ticking once a second.
#[function_component(Clock)]
pub fn clock() -> Html {
  let label = use_state(now);

  {
    let label = label.clone();
    use_effect_with((), move |_| {
      let interval =
        Interval::new(1_000, move || {
          label.set(now());
        });
      move || drop(interval)
    });
  }

  html! {
      <div id="clock" class="clock">{ (*label).clone() }</div>
  }
}
