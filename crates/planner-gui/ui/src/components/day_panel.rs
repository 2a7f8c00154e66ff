use planner_core::messages::Messages;
use planner_core::render::TaskAction;
use planner_core::{ModalEvent, PanelState, Tab};
use planner_shared::{AVAILABLE_STICKERS, CategoryRecord, TaskForm};
use wasm_bindgen::JsCast;
use web_sys::{
    Event, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement, InputEvent,
    MouseEvent, SubmitEvent,
};
use yew::{Callback, Html, Properties, classes, function_component, html};

use super::PanelTaskRow;
use crate::model::FormField;

#[derive(Properties, PartialEq)]
pub struct DayPanelProps {
    pub open: bool,
    pub title: String,
    pub tab: Tab,
    pub panel: PanelState,
    pub count: usize,
    pub form: TaskForm,
    pub stickers: Vec<String>,
    pub categories: Vec<CategoryRecord>,
    pub messages: &'static Messages,
    pub on_close: Callback<ModalEvent>,
    pub on_tab: Callback<Tab>,
    pub on_action: Callback<TaskAction>,
    pub on_drag_start: Callback<String>,
    pub on_drag_end: Callback<()>,
    pub on_field: Callback<(FormField, String)>,
    pub on_submit: Callback<()>,
    pub on_delete_form: Callback<String>,
    pub on_sticker: Callback<String>,
    pub on_color: Callback<String>,
}

/// Current value of whichever form control fired `event`.
fn control_value(event: &Event) -> Option<String> {
    let target = event.target()?;
    if let Some(input) = target.dyn_ref::<HtmlInputElement>() {
        return Some(input.value());
    }
    if let Some(area) = target.dyn_ref::<HtmlTextAreaElement>() {
        return Some(area.value());
    }
    target
        .dyn_ref::<HtmlSelectElement>()
        .map(HtmlSelectElement::value)
}

#[function_component(DayPanel)]
pub fn day_panel(props: &DayPanelProps) -> Html {
    let messages = props.messages;

    let emit_field = {
        let on_field = props.on_field.clone();
        move |which: FormField, event: &Event| match control_value(event) {
            Some(value) => on_field.emit((which, value)),
            None => tracing::warn!(?which, "form event had no control target"),
        }
    };
    let field = |which: FormField| {
        let emit_field = emit_field.clone();
        Callback::from(move |event: InputEvent| emit_field(which, &event))
    };
    let onchange_category = {
        let emit_field = emit_field.clone();
        Callback::from(move |event: Event| emit_field(FormField::Category, &event))
    };

    let close = |event: ModalEvent| {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(event))
    };

    let tab_button = |tab: Tab, label: &'static str| {
        let on_tab = props.on_tab.clone();
        html! {
            <button class={classes!("tab-btn", (props.tab == tab).then_some("active"))}
                    data-tab={tab.name()}
                    onclick={move |_| on_tab.emit(tab)}>
                { label }
            </button>
        }
    };

    let tasks = match &props.panel {
        PanelState::Loading => html! { <div class="empty">{ messages.loading }</div> },
        PanelState::Empty => html! {
            <div class="empty">
                { messages.empty }<br /><small>{ messages.empty_hint }</small>
            </div>
        },
        PanelState::Error(detail) => html! {
            <div class="empty error">{ messages.failure(detail) }</div>
        },
        PanelState::Rows(rows) => html! {
            <>{ for rows.iter().map(|row| html! {
                <PanelTaskRow key={row.id.clone()}
                              row={row.clone()}
                              edit_label={messages.edit}
                              delete_label={messages.delete}
                              on_action={props.on_action.clone()}
                              on_drag_start={props.on_drag_start.clone()}
                              on_drag_end={props.on_drag_end.clone()} />
            }) }</>
        },
    };

    let onsubmit = {
        let on_submit = props.on_submit.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            on_submit.emit(());
        })
    };

    let delete_button = props.form.task_id.clone().map(|task_id| {
        let on_delete_form = props.on_delete_form.clone();
        html! {
            <button type="button"
                    id="deleteTaskBtn"
                    class="btn-danger"
                    onclick={move |_| on_delete_form.emit(task_id.clone())}>
                { messages.delete }
            </button>
        }
    });

    let palette = AVAILABLE_STICKERS.iter().map(|sticker| {
        let on_sticker = props.on_sticker.clone();
        let value = sticker.to_string();
        html! {
            <button type="button" class="sticker-option"
                    onclick={move |_| on_sticker.emit(value.clone())}>
                { *sticker }
            </button>
        }
    });

    let oncolor = {
        let on_color = props.on_color.clone();
        Callback::from(move |event: Event| {
            if let Some(color) = control_value(&event) {
                on_color.emit(color);
            }
        })
    };

    html! {
        <div id="dayModal" class={classes!("modal", props.open.then_some("open"))}>
            <div class="modal-backdrop" onclick={close(ModalEvent::Backdrop)}></div>
            <div id="eventPanel" class="modal-content">
                <div class="modal-header">
                    <h3 id="modalDate">{ &props.title }</h3>
                    <button class="close-btn" onclick={close(ModalEvent::CloseButton)}>{ "×" }</button>
                </div>
                <div class="day-stickers">
                    { for props.stickers.iter().map(|sticker| html! {
                        <span class="day-sticker">{ sticker }</span>
                    }) }
                </div>
                <div class="tabs">
                    { tab_button(Tab::Tasks, "📋") }
                    <span id="tasksCount" class="tasks-count">{ props.count }</span>
                    { tab_button(Tab::Create, "➕") }
                </div>
                <div id={Tab::Tasks.content_id()}
                     class={classes!("tab-content", (props.tab == Tab::Tasks).then_some("active"))}>
                    <div id="panelTasks">{ tasks }</div>
                    <div class="sticker-palette">{ for palette }</div>
                    <input type="color" class="day-color" onchange={oncolor} />
                </div>
                <div id={Tab::Create.content_id()}
                     class={classes!("tab-content", (props.tab == Tab::Create).then_some("active"))}>
                    <form id="taskForm" {onsubmit}>
                        <input type="hidden" id="taskId"
                               value={props.form.task_id.clone().unwrap_or_default()} />
                        <input type="text" id="taskTitle" required=true
                               value={props.form.title.clone()}
                               oninput={field(FormField::Title)} />
                        <textarea id="taskDescription"
                                  value={props.form.description.clone()}
                                  oninput={field(FormField::Description)} />
                        <input type="time" id="taskTime"
                               value={props.form.time.clone()}
                               oninput={field(FormField::Time)} />
                        <select id="taskCategory" onchange={onchange_category}>
                            <option value="" selected={props.form.category_id.is_empty()}>{ "—" }</option>
                            { for props.categories.iter().map(|category| html! {
                                <option value={category.id.clone()}
                                        selected={category.id == props.form.category_id}>
                                    { format!("{} {}", category.icon, category.name_ua) }
                                </option>
                            }) }
                        </select>
                        <button type="submit" class="btn-primary">{ "💾" }</button>
                        { delete_button.unwrap_or_default() }
                    </form>
                </div>
            </div>
        </div>
    }
}
