mod app;
mod components;
mod model;
mod surface;

use planner_core::dates::Locale;
use url::Url;

fn main() {
  console_error_panic_hook::set_once();
  wasm_tracing::set_as_global_default();

  tracing::info!(
    "starting planner frontend"
  );

  let Some(window) = web_sys::window()
  else {
    tracing::error!("no window");
    return;
  };
  let Some(document) = window.document()
  else {
    tracing::error!("no document");
    return;
  };
  let Some(mount) =
    document.get_element_by_id("app")
  else {
    tracing::error!(
      "missing #app mount element"
    );
    return;
  };

  // the backend serves this page, so its origin is the API base
  let origin = window
    .location()
    .origin()
    .unwrap_or_default();
  let api_base = match Url::parse(&origin)
  {
    | Ok(url) => url,
    | Err(err) => {
      tracing::error!(%origin, error = %err, "unusable page origin");
      return;
    }
  };

  let locale = document
    .document_element()
    .and_then(|root| {
      root.get_attribute("lang")
    })
    .and_then(|lang| {
      lang.parse::<Locale>().ok()
    })
    .unwrap_or_default();

  yew::Renderer::<app::App>::with_root_and_props(
    mount,
    app::AppProps {
      api_base,
      locale
    }
  )
  .render();
}
