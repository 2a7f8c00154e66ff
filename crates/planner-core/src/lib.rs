pub mod api;
pub mod dates;
pub mod drag;
pub mod error;
pub mod http;
pub mod memory;
pub mod messages;
pub mod modal;
pub mod notify;
pub mod panel;
pub mod render;

#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "cli")]
pub mod commands;
#[cfg(feature = "cli")]
pub mod config;
#[cfg(feature = "cli")]
pub mod terminal;

pub use api::PlannerApi;
pub use drag::DragDropController;
pub use error::{ApiError, ErrorKind};
pub use http::HttpPlanner;
pub use memory::MemoryPlanner;
pub use modal::{ModalController, ModalEvent, ModalState};
pub use notify::{Notifier, Toast, ToastLevel};
pub use panel::{Outcome, PanelState, PanelView, Tab, TaskPanel};
pub use render::{TaskRenderer, TaskRow};

#[cfg(feature = "cli")]
#[tracing::instrument(skip_all)]
pub fn run(
  raw_args: Vec<std::ffi::OsString>
) -> anyhow::Result<()> {
  use anyhow::Context;
  use clap::Parser;
  use tracing::{
    debug,
    info
  };

  let pre =
    cli::preprocess_args(&raw_args)?;
  let cli = cli::GlobalCli::parse_from(
    pre.cleaned_args
  );

  cli::init_tracing(
    cli.verbose,
    cli.quiet
  )?;

  info!(
    verbose = cli.verbose,
    quiet = cli.quiet,
    "starting planner CLI"
  );
  debug!(?pre.rc_overrides, "preprocessed rc overrides");

  let mut cfg = config::Config::load(
    cli.plannerrc.as_deref()
  )?;
  cfg.apply_overrides(
    pre.rc_overrides.into_iter().chain(
      cli
        .rc_overrides
        .into_iter()
        .map(|kv| (kv.key, kv.value))
    )
  );

  let base_url = cli
    .url
    .clone()
    .unwrap_or_else(|| cfg.api_url());
  let api = HttpPlanner::new(&base_url)
    .with_context(|| {
      format!(
        "invalid backend url: {base_url}"
      )
    })?;
  let locale = cfg.locale()?;

  let (html, assume_yes) =
    match &cli.command {
      | cli::Command::Tasks {
        html,
        ..
      } => (*html, false),
      | cli::Command::Delete {
        yes,
        ..
      } => (false, *yes),
      | _ => (false, false)
    };
  let surface =
    terminal::TerminalSurface::new(
      &cfg,
      locale.messages()
    )?
    .with_html(html)
    .with_assume_yes(assume_yes);

  let panel =
    TaskPanel::new(api, &surface, &surface)
      .with_locale(locale)
      .with_confirmation(
        cfg.confirm_deletes()?
      );

  let runtime =
    tokio::runtime::Builder::new_current_thread()
      .enable_all()
      .build()
      .context(
        "failed to start async runtime"
      )?;
  runtime.block_on(commands::dispatch(
    &panel,
    cli.command
  ))?;

  info!("done");
  Ok(())
}
