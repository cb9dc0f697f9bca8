pub mod cli;
pub mod clock;
pub mod commands;
pub mod config;
pub mod date_key;
pub mod datemath;
pub mod grid;
pub mod labels;
pub mod navigator;
pub mod note;
pub mod note_index;
pub mod notebook;
pub mod render;
pub mod store;

use std::ffi::OsString;
use std::io::Write;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use tracing::{
  debug,
  info
};

#[tracing::instrument(skip_all)]
pub fn run(
  raw_args: Vec<OsString>
) -> anyhow::Result<()> {
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
    "starting daybook"
  );
  debug!(
    overrides = ?pre.rc_overrides,
    "preprocessed rc overrides"
  );

  let mut cfg = config::Config::load(
    cli.config.as_deref()
  )?;
  cfg.apply_overrides(
    pre.rc_overrides.into_iter().chain(
      cli
        .rc_overrides
        .into_iter()
        .map(|kv| (kv.key, kv.value))
    )
  );
  cfg.validate().context(
    "invalid setting on the command line"
  )?;

  let data_dir =
    config::resolve_data_dir(
      &cfg,
      cli.data.as_deref()
    )
    .context(
      "failed to resolve data \
       directory"
    )?;

  let store =
    store::NoteStore::open(&data_dir)
      .with_context(|| {
        format!(
          "failed to open note store \
           at {}",
          data_dir.display()
        )
      })?;

  let renderer =
    render::Renderer::new(&cfg)?;
  let session = commands::Session {
    store:    &store,
    cfg:      &cfg,
    renderer: &renderer,
    clock:    clock::Clock::from_config(
      &cfg
    ),
    now:      Utc::now()
  };

  let mut out = std::io::stdout().lock();

  commands::show_onboarding_once(
    &store,
    &renderer,
    &mut out,
    cli.skip_onboarding
  )?;

  commands::dispatch(
    &session,
    &mut out,
    cli.command
  )?;
  out.flush()?;

  info!("done");
  Ok(())
}
