use std::future::Future;
use std::rc::Rc;

use chrono::{
  Datelike,
  Local,
  NaiveDate
};
use gloo::events::EventListener;
use planner_core::dates::Locale;
use planner_core::render::TaskAction;
use planner_core::{
  DragDropController,
  HttpPlanner,
  ModalController,
  ModalEvent,
  Notifier,
  PanelView,
  Tab,
  TaskPanel,
  Toast
};
use url::Url;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::KeyboardEvent;
use yew::{
  Callback,
  Html,
  Properties,
  function_component,
  html,
  use_effect_with,
  use_memo,
  use_reducer,
  use_state
};

use crate::components::{
  Clock,
  DayPanel,
  MonthGrid,
  ToastStack,
  shift_month
};
use crate::model::{
  FormField,
  UiAction,
  UiModel
};
use crate::surface::WebSurface;

type WebPanel =
  TaskPanel<HttpPlanner, WebSurface, WebSurface>;

/// The three controllers of the page, shared by every callback.
struct Session {
  panel: WebPanel,
  modal: ModalController,
  drag:  DragDropController
}

impl Session {
  fn run<F, Fut>(
    self: &Rc<Self>,
    task: F
  ) where
    F: FnOnce(Rc<Self>) -> Fut,
    Fut: Future<Output = ()> + 'static
  {
    spawn_local(task(self.clone()));
  }

  fn modal_event(
    self: &Rc<Self>,
    event: ModalEvent
  ) {
    self.run(move |session| async move {
      session
        .modal
        .dispatch(event, &session.panel)
        .await;
    });
  }
}

#[derive(Properties, PartialEq)]
pub struct AppProps {
  pub api_base: Url,
  #[prop_or_default]
  pub locale:   Locale
}

fn first_of_month(
  date: NaiveDate
) -> NaiveDate {
  date.with_day(1).unwrap_or(date)
}

#[function_component(App)]
pub fn app(props: &AppProps) -> Html {
  let model = use_reducer(UiModel::default);
  let today = Local::now().date_naive();
  let month =
    use_state(|| first_of_month(today));
  let messages = props.locale.messages();

  let session = {
    let dispatcher = model.dispatcher();
    use_memo(
      (props.api_base.clone(), props.locale),
      move |(base, locale)| {
        let surface =
          WebSurface::new(dispatcher);
        tracing::info!(%base, %locale, "planner session");
        Rc::new(Session {
          panel: TaskPanel::new(
            HttpPlanner::from_url(
              base.clone()
            ),
            surface.clone(),
            surface
          )
          .with_locale(*locale),
          modal: ModalController::new(),
          drag:  DragDropController::new()
        })
      }
    )
  };

  {
    let session = (*session).clone();
    use_effect_with((), move |_| {
      session.run(|session| async move {
        session.panel.load_categories().await;
      });
    });
  }

  {
    let session = (*session).clone();
    use_effect_with((), move |_| {
      let listener = web_sys::window()
        .and_then(|window| window.document())
        .map(|document| {
          EventListener::new(
            &document,
            "keydown",
            move |event| {
              let escape = event
                .dyn_ref::<KeyboardEvent>()
                .is_some_and(|key| {
                  key.key() == "Escape"
                });
              if escape {
                session.modal_event(
                  ModalEvent::Escape
                );
              }
            }
          )
        });
      move || drop(listener)
    });
  }

  let on_day_click = {
    let session = (*session).clone();
    Callback::from(
      move |(date, on_button): (
        NaiveDate,
        bool
      )| {
        session.modal_event(
          ModalEvent::DayClick {
            date,
            on_button
          }
        );
      }
    )
  };

  let on_close = {
    let session = (*session).clone();
    Callback::from(
      move |event: ModalEvent| {
        session.modal_event(event)
      }
    )
  };

  let on_tab = {
    let session = (*session).clone();
    Callback::from(move |tab: Tab| {
      session.panel.view().switch_tab(tab)
    })
  };

  let on_action = {
    let session = (*session).clone();
    Callback::from(
      move |action: TaskAction| {
        session.run(
          |session| async move {
            session
              .panel
              .handle_action(action)
              .await;
          }
        );
      }
    )
  };

  let on_drag_start = {
    let session = (*session).clone();
    Callback::from(move |id: String| {
      session.drag.drag_start(&id)
    })
  };

  let on_drag_end = {
    let session = (*session).clone();
    Callback::from(move |()| {
      session.drag.drag_end()
    })
  };

  let on_drop = {
    let session = (*session).clone();
    Callback::from(
      move |date: NaiveDate| {
        session.run(
          move |session| async move {
            session
              .drag
              .drop_on(date, &session.panel)
              .await;
          }
        );
      }
    )
  };

  let on_field = {
    let model = model.clone();
    Callback::from(
      move |(field, value): (
        FormField,
        String
      )| {
        model.dispatch(
          UiAction::EditForm(field, value)
        )
      }
    )
  };

  let on_submit = {
    let session = (*session).clone();
    let form = model.form.clone();
    Callback::from(move |()| {
      let Some(date) =
        session.panel.selected_date()
      else {
        session.panel.notifier().notify(
          Toast::error(
            messages.no_day_selected
          )
        );
        return;
      };
      let form = form.clone();
      session.run(
        move |session| async move {
          session
            .panel
            .create_task(&form, date)
            .await;
        }
      );
    })
  };

  let on_delete_form = {
    let session = (*session).clone();
    Callback::from(move |id: String| {
      session.run(
        |session| async move {
          session
            .panel
            .delete_task(&id)
            .await;
        }
      );
    })
  };

  let on_sticker = {
    let session = (*session).clone();
    Callback::from(
      move |sticker: String| {
        session.run(
          |session| async move {
            session
              .panel
              .add_sticker(&sticker)
              .await;
          }
        );
      }
    )
  };

  let on_color = {
    let session = (*session).clone();
    Callback::from(
      move |color: String| {
        session.run(
          |session| async move {
            session
              .panel
              .set_day_color(&color)
              .await;
          }
        );
      }
    )
  };

  let on_shift = {
    let month = month.clone();
    Callback::from(move |delta: i32| {
      month.set(shift_month(
        *month, delta
      ))
    })
  };

  let on_dismiss = {
    let model = model.clone();
    Callback::from(move |id: u64| {
      model.dispatch(
        UiAction::DismissToast(id)
      )
    })
  };

  html! {
      <div class="planner">
          <header class="planner-header">
              <Clock />
          </header>
          <MonthGrid
              month={*month}
              {today}
              selected={session.panel.selected_date()}
              locale={props.locale}
              day_colors={model.day_colors.clone()}
              day_done={model.day_done.clone()}
              {on_day_click}
              {on_drop}
              {on_shift} />
          <DayPanel
              open={model.modal_open}
              title={model.title.clone()}
              tab={model.tab}
              panel={model.panel.clone()}
              count={model.count}
              form={model.form.clone()}
              stickers={model.stickers.clone()}
              categories={model.categories.clone()}
              {messages}
              {on_close}
              {on_tab}
              {on_action}
              {on_drag_start}
              {on_drag_end}
              {on_field}
              {on_submit}
              {on_delete_form}
              {on_sticker}
              {on_color} />
          <ToastStack toasts={model.toasts.clone()} {on_dismiss} />
      </div>
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn months_start_on_the_first() {
    let date = NaiveDate::from_ymd_opt(
      2024, 5, 17
    )
    .expect("valid date");
    assert_eq!(
      first_of_month(date).day(),
      1
    );
  }
}
