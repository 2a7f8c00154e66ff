use planner_core::render::TaskAction;
use planner_core::TaskRow;
use planner_shared::hex_color;
use web_sys::DragEvent;
use yew::{
  Callback,
  Html,
  Properties,
  classes,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct TaskRowProps {
  pub row:           TaskRow,
  pub edit_label:    &'static str,
  pub delete_label:  &'static str,
  pub on_action:     Callback<TaskAction>,
  pub on_drag_start: Callback<String>,
  pub on_drag_end:   Callback<()>
}

#[function_component(PanelTaskRow)]
pub fn panel_task_row(
  props: &TaskRowProps
) -> Html {
  let row = &props.row;

  let ondragstart = {
    let on_drag_start =
      props.on_drag_start.clone();
    let task_id = row.id.clone();
    Callback::from(
      move |event: DragEvent| {
        if let Some(data_transfer) =
          event.data_transfer()
        {
          let _ = data_transfer
            .set_data(
              "text/plain", &task_id
            );
          data_transfer
            .set_effect_allowed("move");
        }
        on_drag_start
          .emit(task_id.clone());
      }
    )
  };

  let ondragend = {
    let on_drag_end =
      props.on_drag_end.clone();
    Callback::from(move |_| {
      on_drag_end.emit(());
    })
  };

  fn emit_with<E>(
    on_action: &Callback<TaskAction>,
    action: TaskAction,
  ) -> Callback<E> {
    let on_action = on_action.clone();
    Callback::from(move |_: E| {
      on_action.emit(action.clone());
    })
  }

  let badge = row.category.as_ref().map(
    |category| {
      html! {
          <span class="task-category" style={hex_color(&category.color).map(|color| format!("background:{color}"))}>
              { format!("{} {}", category.icon, category.name) }
          </span>
      }
    }
  );

  html! {
      <div class={classes!("panel-task-row", row.completed.then_some("completed"))}
           data-task-id={row.id.clone()}
           draggable="true"
           {ondragstart}
           {ondragend}>
          <input type="checkbox"
                 class="task-checkbox"
                 checked={row.completed}
                 onchange={emit_with(&props.on_action, row.toggle())} />
          <div class="task-body">
              <div class="task-title">
                  {
                      match &row.time {
                          Some(time) => html! { <span class="task-time">{ time }</span> },
                          None => html! {}
                      }
                  }
                  { &row.title }
              </div>
              {
                  if row.description.is_empty() {
                      html! {}
                  } else {
                      html! { <div class="task-description">{ &row.description }</div> }
                  }
              }
              { badge.unwrap_or_default() }
          </div>
          <div class="task-actions">
              <button class="task-edit" title={props.edit_label} onclick={emit_with(&props.on_action, row.edit())}>{ "✏️" }</button>
              <button class="task-delete" title={props.delete_label} onclick={emit_with(&props.on_action, row.delete())}>{ "🗑️" }</button>
          </div>
      </div>
  }
}
