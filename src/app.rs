use std::path::PathBuf;

use chrono::{DateTime, Local};
use log::{error, info};

use crate::config::FreqConfig;
use crate::system::measure::TerminalMeasure;
use crate::system::sampler::Sampler;

/// Which view/mode the app is currently in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Normal,
    Help,
    EditFormat, // F2: free-text entry for the label template
}

/// Main application state
pub struct App {
    pub mode: AppMode,
    pub should_quit: bool,
    pub paused: bool, // z: freeze sampling

    pub config: FreqConfig,
    pub config_path: Option<PathBuf>,
    pub sampler: Sampler,
    pub measure: TerminalMeasure,

    // Format entry buffer (F2), applied on Enter
    pub format_input: String,

    // Strip geometry, updated from the terminal each frame
    pub strip_width: usize,

    pub cpu_brand: String,
    pub last_sample: Option<DateTime<Local>>,
    pub status: Option<String>,

    // Timer ticks delivered to the sampler
    pub tick: u64,
}

impl App {
    pub fn new(config: FreqConfig, config_path: Option<PathBuf>, sysfs_root: PathBuf) -> Self {
        Self {
            mode: AppMode::Normal,
            should_quit: false,
            paused: false,
            config,
            config_path,
            sampler: Sampler::new(sysfs_root),
            measure: TerminalMeasure,
            format_input: String::new(),
            strip_width: 0,
            cpu_brand: String::new(),
            last_sample: None,
            status: None,
            tick: 0,
        }
    }

    /// Create/reconfigure: rediscover online CPUs and rebuild label slots.
    pub fn reconfigure(&mut self) {
        self.sampler.activate(&self.config, &self.measure);
        self.status = Some(format!(
            "{} CPUs online",
            self.sampler.online().map_or(0, |s| s.len())
        ));
    }

    /// Timer tick from the event loop.
    pub fn on_tick(&mut self) {
        if self.paused {
            return;
        }
        self.tick += 1;
        if self
            .sampler
            .tick(&self.config, &self.measure, self.strip_width)
            .is_some()
        {
            self.last_sample = Some(Local::now());
        }
    }

    pub fn begin_format_edit(&mut self) {
        self.format_input = self.config.template().to_string();
        self.mode = AppMode::EditFormat;
    }

    /// Apply the edited template. Slots are rebuilt since the width hint
    /// depends on the template.
    pub fn apply_format_edit(&mut self) {
        self.config.set_template(std::mem::take(&mut self.format_input));
        info!("label template set to {:?}", self.config.template().as_str());
        self.mode = AppMode::Normal;
        self.reconfigure();
        self.on_tick_now();
    }

    pub fn cancel_format_edit(&mut self) {
        self.format_input.clear();
        self.mode = AppMode::Normal;
    }

    /// Force an immediate sample regardless of pause, e.g. after a template change.
    fn on_tick_now(&mut self) {
        let paused = std::mem::replace(&mut self.paused, false);
        self.on_tick();
        self.paused = paused;
    }

    pub fn save_config(&mut self) {
        let Some(path) = self.config_path.clone() else {
            self.status = Some("No config path available".to_string());
            return;
        };
        match self.config.save(&path) {
            Ok(()) => {
                self.status = Some(format!("Saved {}", path.display()));
            }
            Err(e) => {
                error!("{:#}", e);
                self.status = Some(format!("Save failed: {}", e));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn app_with(online: &str, freqs: &[(usize, &str)]) -> (TempDir, App) {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("online"), online).unwrap();
        for (cpu, content) in freqs {
            let dir = tmp.path().join(format!("cpu{}", cpu)).join("cpufreq");
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join("scaling_cur_freq"), content).unwrap();
        }
        let cfg_path = tmp.path().join("rc");
        let mut app = App::new(FreqConfig::default(), Some(cfg_path), tmp.path().to_path_buf());
        app.strip_width = 30;
        (tmp, app)
    }

    #[test]
    fn test_tick_fills_labels() {
        let (_tmp, mut app) = app_with("0-1", &[(0, "900000\n"), (1, "2000000\n")]);
        app.reconfigure();
        app.on_tick();

        let texts: Vec<&str> = app.sampler.labels().iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["CPU0: 900 MHz", "CPU1: 2.00 GHz"]);
        assert!(app.last_sample.is_some());
    }

    #[test]
    fn test_paused_tick_keeps_old_labels() {
        let (tmp, mut app) = app_with("0", &[(0, "900000\n")]);
        app.reconfigure();
        app.on_tick();
        app.paused = true;
        fs::write(tmp.path().join("cpu0/cpufreq/scaling_cur_freq"), "1200000\n").unwrap();
        app.on_tick();
        assert_eq!(app.sampler.labels()[0].text, "CPU0: 900 MHz");
    }

    #[test]
    fn test_format_edit_applies_and_cancels() {
        let (_tmp, mut app) = app_with("0", &[(0, "2500000\n")]);
        app.reconfigure();

        app.begin_format_edit();
        assert_eq!(app.format_input, "$L: $F");
        app.format_input = "#$N $g".to_string();
        app.apply_format_edit();
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.sampler.labels()[0].text, "#0 2.50");

        app.begin_format_edit();
        app.format_input.push('!');
        app.cancel_format_edit();
        assert_eq!(app.config.template().as_str(), "#$N $g");
    }

    #[test]
    fn test_save_config_writes_file() {
        let (tmp, mut app) = app_with("0", &[]);
        app.config.set_template("$M");
        app.save_config();
        let saved = FreqConfig::load(&tmp.path().join("rc"));
        assert_eq!(saved.template().as_str(), "$M");
    }
}
