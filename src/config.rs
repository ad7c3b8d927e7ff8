//! freqstrip configuration persistence (rc-style, one setting per line)
//!
//! Each line reads `freqstrip <key> <value>`. Saved to
//! `$XDG_CONFIG_HOME/freqstrip/freqstriprc`, falling back to
//! `~/.config/freqstrip/freqstriprc`.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, warn};

use crate::format::{FormatTemplate, DEFAULT_LABEL_LEN};

/// Leading keyword of every persisted line.
pub const CONFIG_KEYWORD: &str = "freqstrip";

/// Upper bound for `scroll_threshold`, in columns.
pub const MAX_SCROLL_THRESHOLD: usize = 1024;

/// Default sysfs CPU topology root.
pub const DEFAULT_SYSFS_ROOT: &str = "/sys/devices/system/cpu";

/// Get the default config file path.
pub fn default_config_path() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;
    Some(base.join("freqstrip").join("freqstriprc"))
}

/// Settings shared by the sampler, the formatter and the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreqConfig {
    pub text_format: FormatTemplate,
    pub update_interval_ms: u64,
    /// Act on every Nth timer tick only.
    pub tick_decimation: u64,
    /// Extra columns a label must leave free before it stops scrolling.
    pub scroll_threshold: usize,
    pub row_height: usize,
    pub center_labels: bool,
    /// Label buffer size, terminator slot included.
    pub label_len: usize,
}

impl Default for FreqConfig {
    fn default() -> Self {
        Self {
            text_format: FormatTemplate::default(),
            update_interval_ms: 1000,
            tick_decimation: 1,
            scroll_threshold: 0,
            row_height: 1,
            center_labels: true,
            label_len: DEFAULT_LABEL_LEN,
        }
    }
}

impl FreqConfig {
    pub fn template(&self) -> &FormatTemplate {
        &self.text_format
    }

    pub fn set_template(&mut self, template: impl Into<String>) {
        self.text_format = FormatTemplate::new(template);
    }

    pub fn set_update_interval_ms(&mut self, ms: u64) {
        self.update_interval_ms = ms.clamp(100, 10_000);
    }

    pub fn set_tick_decimation(&mut self, n: u64) {
        self.tick_decimation = n.clamp(1, 100);
    }

    /// Load config from file, returning defaults if it is missing or unreadable.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => {
                debug!("loaded config from {}", path.display());
                Self::parse(&content)
            }
            Err(e) => {
                debug!("no config at {} ({}), using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse config text. Unknown keys and bad values are skipped.
    pub fn parse(content: &str) -> Self {
        let mut cfg = Self::default();

        for line in content.lines() {
            let line = line.trim_start();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some(rest) = line.strip_prefix(CONFIG_KEYWORD) else {
                continue;
            };
            let rest = rest.trim_start();
            // Exactly one separator after the key; the value is kept verbatim.
            let (key, value) = match rest.find(char::is_whitespace) {
                Some(i) => {
                    let sep = rest[i..].chars().next().map_or(0, char::len_utf8);
                    (&rest[..i], &rest[i + sep..])
                }
                None => (rest, ""),
            };
            match key {
                // Verbatim, so templates may carry inner and trailing spaces.
                "text_format" => cfg.set_template(value.trim_end_matches(['\r', '\n'])),
                "update_interval_ms" => {
                    if let Ok(v) = value.trim().parse::<u64>() {
                        cfg.set_update_interval_ms(v);
                    }
                }
                "tick_decimation" => {
                    if let Ok(v) = value.trim().parse::<u64>() {
                        cfg.set_tick_decimation(v);
                    }
                }
                "scroll_threshold" => {
                    if let Ok(v) = value.trim().parse::<usize>() {
                        cfg.scroll_threshold = v.min(MAX_SCROLL_THRESHOLD);
                    }
                }
                "row_height" => {
                    if let Ok(v) = value.trim().parse::<usize>() {
                        cfg.row_height = v.clamp(1, 4);
                    }
                }
                "center_labels" => cfg.center_labels = value.trim() == "1",
                _ => warn!("ignoring unknown config key {:?}", key),
            }
        }

        cfg
    }

    /// Render the config file contents.
    pub fn render(&self) -> String {
        let b = |v: bool| if v { "1" } else { "0" };
        let mut lines = vec![
            "# freqstrip configuration file".to_string(),
            format!("# saved {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S")),
            String::new(),
        ];
        lines.push(format!("{} text_format {}", CONFIG_KEYWORD, self.text_format));
        lines.push(format!("{} update_interval_ms {}", CONFIG_KEYWORD, self.update_interval_ms));
        lines.push(format!("{} tick_decimation {}", CONFIG_KEYWORD, self.tick_decimation));
        lines.push(format!("{} scroll_threshold {}", CONFIG_KEYWORD, self.scroll_threshold));
        lines.push(format!("{} row_height {}", CONFIG_KEYWORD, self.row_height));
        lines.push(format!("{} center_labels {}", CONFIG_KEYWORD, b(self.center_labels)));
        lines.join("\n") + "\n"
    }

    /// Save config to file, creating the parent directory if needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
        }

        let mut file = fs::File::create(path)
            .with_context(|| format!("Failed to create config file {}", path.display()))?;
        file.write_all(self.render().as_bytes())
            .with_context(|| format!("Failed to write config file {}", path.display()))?;

        debug!("saved config to {}", path.display());
        Ok(())
    }
}
