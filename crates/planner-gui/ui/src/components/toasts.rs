use planner_core::Toast;
use yew::{
    Callback, Html, Properties, classes, function_component, html,
};

#[derive(Properties, PartialEq)]
pub struct ToastStackProps {
    pub toasts: Vec<(u64, Toast)>,
    pub on_dismiss: Callback<u64>,
}

#[function_component(ToastStack)]
pub fn toast_stack(props: &ToastStackProps) -> Html {
    html! {
        <div class="toast-container">
            { for props.toasts.iter().map(|(id, toast)| {
                let id = *id;
                let on_dismiss = props.on_dismiss.clone();
                html! {
                    <div key={id}
                         class={classes!("toast", toast.level.css_class())}
                         onclick={move |_| on_dismiss.emit(id)}>
                        { toast.to_string() }
                    </div>
                }
            }) }
        </div>
    }
}
