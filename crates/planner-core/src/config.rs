use std::collections::BTreeMap;
use std::fs;
use std::path::{
  Path,
  PathBuf
};

use anyhow::{
  Context,
  anyhow
};
use tracing::{
  debug,
  info,
  trace,
  warn
};

use crate::dates::Locale;

pub const DEFAULT_API_URL: &str =
  "http://127.0.0.1:5000";

/// Every key a plannerrc may set.
pub const KEYS: [&str; 4] = [
  "api.url", "locale", "confirm",
  "color"
];

#[derive(Debug, Clone)]
pub struct Config {
  values: BTreeMap<&'static str, String>,
  pub loaded_files: Vec<PathBuf>
}

fn known_key(
  raw: &str
) -> Option<&'static str> {
  KEYS
    .iter()
    .copied()
    .find(|key| *key == raw)
}

/// `on`/`off` style switch; anything else is a config error.
fn parse_switch(
  key: &str,
  raw: &str
) -> anyhow::Result<bool> {
  match raw
    .trim()
    .to_ascii_lowercase()
    .as_str()
  {
    | "on" | "yes" | "true" | "1" => {
      Ok(true)
    }
    | "off" | "no" | "false" | "0" => {
      Ok(false)
    }
    | other => {
      Err(anyhow!(
        "invalid {key} setting: {other}"
      ))
    }
  }
}

impl Config {
  /// Built-in defaults, no file read.
  pub fn defaults() -> Self {
    let values = KEYS
      .iter()
      .copied()
      .zip([
        DEFAULT_API_URL,
        "uk",
        "on",
        "on"
      ])
      .map(|(key, value)| {
        (key, value.to_string())
      })
      .collect();
    Config {
      values,
      loaded_files: vec![]
    }
  }

  #[tracing::instrument(skip(
    plannerrc_override
  ))]
  pub fn load(
    plannerrc_override: Option<&Path>
  ) -> anyhow::Result<Self> {
    let mut cfg = Self::defaults();

    let plannerrc =
      resolve_plannerrc_path(
        plannerrc_override
      )?;
    if let Some(path) = plannerrc {
      info!(plannerrc = %path.display(), "loading plannerrc");
      cfg.load_file(&path)?;
    } else {
      debug!(
        "no plannerrc found; using \
         defaults"
      );
    }

    Ok(cfg)
  }

  /// `--rc` and `rc.key=value` overrides. Unknown keys are reported and
  /// skipped.
  #[tracing::instrument(skip(
    self, overrides
  ))]
  pub fn apply_overrides<I>(
    &mut self,
    overrides: I
  ) where
    I: IntoIterator<
      Item = (String, String)
    >
  {
    for (k, v) in overrides {
      let raw =
        k.strip_prefix("rc.").unwrap_or(k.as_str());
      match known_key(raw) {
        | Some(key) => {
          debug!(key, value = %v, "applying override");
          self.values.insert(key, v);
        }
        | None => {
          warn!(key = raw, "unknown override; skipping")
        }
      }
    }
  }

  fn value(&self, key: &str) -> &str {
    self
      .values
      .get(key)
      .map(String::as_str)
      .unwrap_or_default()
  }

  pub fn api_url(&self) -> String {
    match self.value("api.url").trim() {
      | "" => DEFAULT_API_URL.to_string(),
      | url => url.to_string()
    }
  }

  pub fn locale(
    &self
  ) -> anyhow::Result<Locale> {
    self
      .value("locale")
      .parse::<Locale>()
      .map_err(|e| anyhow!("{e}"))
  }

  pub fn confirm_deletes(
    &self
  ) -> anyhow::Result<bool> {
    parse_switch(
      "confirm",
      self.value("confirm")
    )
  }

  pub fn color(
    &self
  ) -> anyhow::Result<bool> {
    parse_switch(
      "color",
      self.value("color")
    )
  }

  #[tracing::instrument(skip(self))]
  fn load_file(
    &mut self,
    path: &Path
  ) -> anyhow::Result<()> {
    let text =
      fs::read_to_string(path)
        .with_context(|| {
          format!(
            "failed to read {}",
            path.display()
          )
        })?;

    if self
      .loaded_files
      .iter()
      .any(|seen| seen == path)
    {
      warn!(file = %path.display(), "plannerrc included twice; skipping");
      return Ok(());
    }
    self
      .loaded_files
      .push(path.to_path_buf());

    let base_dir = path
      .parent()
      .unwrap_or_else(|| Path::new("."));

    for (line_num, raw_line) in
      text.lines().enumerate()
    {
      let mut line = raw_line.trim();
      if line.is_empty()
        || line.starts_with('#')
      {
        continue;
      }

      // a `#` inside a value such as `#FF5733` is not a comment
      if let Some((before, _)) =
        line.split_once(" #")
      {
        line = before.trim();
      }

      if let Some(include) =
        line.strip_prefix("include ")
      {
        let include_path =
          base_dir.join(include.trim());
        debug!(
            file = %path.display(),
            include = %include_path.display(),
            line = line_num + 1,
            "processing include"
        );
        if include_path.exists() {
          self
            .load_file(&include_path)?;
        } else {
          warn!(include = %include_path.display(), "include file does not exist; skipping");
        }
        continue;
      }

      let (k, v) = line
        .split_once('=')
        .ok_or_else(|| {
          anyhow!(
            "invalid config line \
             {}:{}: {}",
            path.display(),
            line_num + 1,
            raw_line
          )
        })?;

      let value = v.trim().to_string();
      match known_key(k.trim()) {
        | Some(key) => {
          trace!(key, value = %value, "loaded config key");
          self.values.insert(key, value);
        }
        | None => {
          warn!(
            file = %path.display(),
            line = line_num + 1,
            key = k.trim(),
            "unknown plannerrc key; skipping"
          )
        }
      }
    }

    Ok(())
  }
}

#[tracing::instrument(skip(
  override_path
))]
fn resolve_plannerrc_path(
  override_path: Option<&Path>
) -> anyhow::Result<Option<PathBuf>> {
  if let Some(path) = override_path {
    return Ok(Some(path.to_path_buf()));
  }

  if let Ok(env_path) =
    std::env::var("PLANNERRC")
  {
    if env_path == "/dev/null" {
      return Ok(None);
    }
    return Ok(Some(PathBuf::from(
      env_path
    )));
  }

  let Some(home) = dirs::home_dir()
  else {
    warn!(
      "cannot determine home \
       directory"
    );
    return Ok(None);
  };
  let candidate =
    home.join(".plannerrc");
  Ok(candidate
    .exists()
    .then_some(candidate))
}

#[cfg(test)]
mod tests {
  use std::io::Write;

  use super::*;

  #[test]
  fn defaults_without_file() {
    let cfg = Config::defaults();
    assert_eq!(
      cfg.api_url(),
      DEFAULT_API_URL
    );
    assert_eq!(
      cfg.locale().expect("locale"),
      Locale::Uk
    );
    assert!(
      cfg.confirm_deletes().expect("confirm")
    );
    assert!(cfg.color().expect("color"));
  }

  #[test]
  fn reads_file_with_includes_and_comments()
  {
    let dir = tempfile::tempdir()
      .expect("tempdir");
    let extra = dir.path().join("extra.rc");
    fs::write(&extra, "locale = en\n")
      .expect("write include");

    let main = dir.path().join("plannerrc");
    let mut file = fs::File::create(&main)
      .expect("create rc");
    writeln!(
      file,
      "# planner settings\napi.url = \
       http://planner.local:8080 # lan \
       box\nconfirm = off\ninclude \
       extra.rc"
    )
    .expect("write rc");

    let cfg = Config::load(Some(&main))
      .expect("load");
    assert_eq!(
      cfg.api_url(),
      "http://planner.local:8080"
    );
    assert!(
      !cfg.confirm_deletes().expect("confirm")
    );
    assert_eq!(
      cfg.locale().expect("locale"),
      Locale::En
    );
    assert_eq!(cfg.loaded_files.len(), 2);
  }

  #[test]
  fn overrides_win_over_file_values() {
    let mut cfg = Config::defaults();
    cfg.apply_overrides([
      (
        "rc.locale".to_string(),
        "en".to_string()
      ),
      (
        "report.next".to_string(),
        "ignored".to_string()
      )
    ]);
    assert_eq!(
      cfg.locale().expect("locale"),
      Locale::En
    );
    assert!(!cfg.values.contains_key("report.next"));
  }

  #[test]
  fn switches_are_strict() {
    let mut cfg = Config::defaults();
    cfg.apply_overrides([(
      "color".to_string(),
      "sometimes".to_string()
    )]);
    assert!(cfg.color().is_err());
  }

  #[test]
  fn rejects_lines_without_equals() {
    let dir = tempfile::tempdir()
      .expect("tempdir");
    let path = dir.path().join("bad.rc");
    fs::write(&path, "api.url\n")
      .expect("write rc");
    assert!(
      Config::load(Some(&path)).is_err()
    );
  }
}
