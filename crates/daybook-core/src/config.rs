//! Daybook settings.
//!
//! Settings live in a line-based rc file
//! (`key = value`, `#` comments,
//! `include <path>`) and can be overridden
//! from the command line. Every key
//! daybook understands has a typed
//! accessor; [`Config::validate`] runs
//! them all so a bad value is reported
//! at startup instead of mid-render.

use std::collections::HashMap;
use std::fs;
use std::path::{
  Path,
  PathBuf
};

use anyhow::{
  Context,
  anyhow,
  bail
};
use chrono_tz::Tz;
use tracing::{
  debug,
  info,
  warn
};

use crate::clock::parse_timezone;
use crate::labels::Language;
use crate::navigator::ViewType;

pub const DATA_LOCATION: &str =
  "data.location";
pub const DEFAULT_VIEW: &str =
  "default.view";
pub const COLOR: &str = "color";
pub const LANG: &str = "lang";
pub const TIMEZONE: &str = "timezone";

const KNOWN_KEYS: [&str; 5] = [
  DATA_LOCATION,
  DEFAULT_VIEW,
  COLOR,
  LANG,
  TIMEZONE
];

const RC_ENV_VAR: &str = "DAYBOOKRC";
const RC_FILE_NAME: &str = ".daybookrc";
const MAX_INCLUDE_DEPTH: usize = 8;

#[derive(Debug, Clone)]
pub struct Config {
  values:      HashMap<String, String>,
  pub sources: Vec<PathBuf>
}

impl Default for Config {
  fn default() -> Self {
    let values = [
      (DATA_LOCATION, "~/.daybook"),
      (DEFAULT_VIEW, "day"),
      (COLOR, "on"),
      (LANG, "en")
    ]
    .into_iter()
    .map(|(k, v)| {
      (k.to_string(), v.to_string())
    })
    .collect();

    Self {
      values,
      sources: vec![]
    }
  }
}

enum RcLine<'a> {
  Blank,
  Include(&'a str),
  Setting(&'a str, &'a str)
}

impl Config {
  /// Defaults, then the rc file, then
  /// validation.
  #[tracing::instrument(skip(explicit))]
  pub fn load(
    explicit: Option<&Path>
  ) -> anyhow::Result<Self> {
    let mut cfg = Self::default();

    match locate_rc(explicit) {
      | Some(path) => {
        info!(rc = %path.display(), "reading daybookrc");
        cfg.read_rc(&path, 0)?;
      }
      | None => {
        debug!(
          "no daybookrc; built-in \
           settings only"
        );
      }
    }

    cfg.validate()?;
    Ok(cfg)
  }

  /// Applies `key=value` pairs from the
  /// command line. Keys may carry an
  /// `rc.` prefix. Call
  /// [`Config::validate`] afterwards.
  pub fn apply_overrides<I>(
    &mut self,
    overrides: I
  ) where
    I: IntoIterator<
      Item = (String, String)
    >
  {
    for (key, value) in overrides {
      let key = key
        .strip_prefix("rc.")
        .unwrap_or(key.as_str());
      debug!(key, value = %value, "command-line override");
      self.set(key, &value);
    }
  }

  pub fn validate(
    &self
  ) -> anyhow::Result<()> {
    self.default_view()?;
    self.language()?;
    self.color_enabled()?;
    Ok(())
  }

  pub fn get(
    &self,
    key: &str
  ) -> Option<&str> {
    self.values.get(key).map(String::as_str)
  }

  pub fn data_location(&self) -> PathBuf {
    expand_home(Path::new(
      self
        .get(DATA_LOCATION)
        .unwrap_or("~/.daybook")
    ))
  }

  pub fn default_view(
    &self
  ) -> anyhow::Result<ViewType> {
    let raw =
      self.get(DEFAULT_VIEW).unwrap_or("day");
    ViewType::from_key(raw).ok_or_else(
      || {
        anyhow!(
          "{DEFAULT_VIEW} must be one of \
           year, month, week or day; got \
           {raw:?}"
        )
      }
    )
  }

  pub fn language(
    &self
  ) -> anyhow::Result<Language> {
    let raw = self.get(LANG).unwrap_or("en");
    Language::from_key(raw).ok_or_else(
      || {
        anyhow!(
          "{LANG} must be en or tr; got \
           {raw:?}"
        )
      }
    )
  }

  /// Whether colour is wanted at all;
  /// the renderer still checks for a
  /// terminal.
  pub fn color_enabled(
    &self
  ) -> anyhow::Result<bool> {
    let raw = self.get(COLOR).unwrap_or("on");
    parse_switch(raw).ok_or_else(|| {
      anyhow!(
        "{COLOR} must be on or off; got \
         {raw:?}"
      )
    })
  }

  /// Configured zone, if any. An
  /// unknown zone id is logged and
  /// treated as unset.
  pub fn timezone(&self) -> Option<Tz> {
    self.get(TIMEZONE).and_then(|raw| {
      parse_timezone(raw, "config:timezone")
    })
  }

  fn set(&mut self, key: &str, value: &str) {
    if !KNOWN_KEYS.contains(&key) {
      warn!(key, "unknown setting; ignored by daybook");
    }
    self
      .values
      .insert(key.to_string(), value.to_string());
  }

  fn read_rc(
    &mut self,
    path: &Path,
    depth: usize
  ) -> anyhow::Result<()> {
    if depth > MAX_INCLUDE_DEPTH {
      bail!(
        "includes nested deeper than \
         {MAX_INCLUDE_DEPTH} at {}",
        path.display()
      );
    }

    let path = expand_home(path);
    let text = fs::read_to_string(&path)
      .with_context(|| {
        format!(
          "failed to read {}",
          path.display()
        )
      })?;
    self.sources.push(path.clone());

    for (idx, raw) in
      text.lines().enumerate()
    {
      match parse_rc_line(raw) {
        | Some(RcLine::Blank) => {}
        | Some(RcLine::Include(target)) => {
          let target =
            include_target(&path, target);
          if target.is_file() {
            self
              .read_rc(&target, depth + 1)?;
          } else {
            warn!(include = %target.display(), "missing include skipped");
          }
        }
        | Some(RcLine::Setting(key, value)) => {
          self.set(key, value);
        }
        | None => {
          bail!(
            "{}:{}: expected `key = value` \
             or `include <path>`, got {raw:?}",
            path.display(),
            idx + 1
          );
        }
      }
    }

    Ok(())
  }
}

/// Data directory from `--data` or
/// `data.location`, created if missing.
#[tracing::instrument(skip_all)]
pub fn resolve_data_dir(
  cfg: &Config,
  explicit: Option<&Path>
) -> anyhow::Result<PathBuf> {
  let dir = explicit
    .map(Path::to_path_buf)
    .unwrap_or_else(|| cfg.data_location());

  fs::create_dir_all(&dir).with_context(
    || {
      format!(
        "failed to create {}",
        dir.display()
      )
    }
  )?;
  Ok(dir)
}

/// `--config`, then `$DAYBOOKRC`
/// (`/dev/null` disables), then
/// `~/.daybookrc` when it exists.
fn locate_rc(
  explicit: Option<&Path>
) -> Option<PathBuf> {
  if let Some(path) = explicit {
    return Some(path.to_path_buf());
  }

  if let Ok(env_path) =
    std::env::var(RC_ENV_VAR)
  {
    return (env_path != "/dev/null")
      .then(|| PathBuf::from(env_path));
  }

  dirs::home_dir()
    .map(|home| home.join(RC_FILE_NAME))
    .filter(|path| path.is_file())
}

fn parse_rc_line(
  raw: &str
) -> Option<RcLine<'_>> {
  let line = raw
    .split('#')
    .next()
    .unwrap_or_default()
    .trim();

  if line.is_empty() {
    return Some(RcLine::Blank);
  }
  if let Some(target) =
    line.strip_prefix("include ")
  {
    let target = target.trim();
    return (!target.is_empty())
      .then_some(RcLine::Include(target));
  }

  let (key, value) = line.split_once('=')?;
  let key = key.trim();
  (!key.is_empty())
    .then(|| RcLine::Setting(key, value.trim()))
}

fn include_target(
  including: &Path,
  target: &str
) -> PathBuf {
  let target = expand_home(Path::new(target));
  if target.is_absolute() {
    return target;
  }
  including
    .parent()
    .unwrap_or_else(|| Path::new("."))
    .join(target)
}

fn expand_home(path: &Path) -> PathBuf {
  match (path.strip_prefix("~"), dirs::home_dir()) {
    | (Ok(rest), Some(home)) => home.join(rest),
    | _ => path.to_path_buf()
  }
}

fn parse_switch(raw: &str) -> Option<bool> {
  match raw
    .trim()
    .to_ascii_lowercase()
    .as_str()
  {
    | "on" | "yes" | "true" | "1" => {
      Some(true)
    }
    | "off" | "no" | "false" | "0" => {
      Some(false)
    }
    | _ => None
  }
}
