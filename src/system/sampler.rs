//! Tick-driven sampling: topology discovery on (re)activation, then one
//! frequency read and one formatted label per online CPU each acted tick.

use std::path::PathBuf;

use log::{debug, info};

use crate::config::FreqConfig;
use crate::format::format_label;
use crate::system::frequency::{read_frequency_khz, FrequencySample};
use crate::system::measure::TextMeasure;
use crate::system::topology::{discover_online_cpus, LogicalCpu, OnlineSet};

/// Sample used to size a label slot: the widest frequency a CPU will report.
const WIDTH_SAMPLE: FrequencySample = FrequencySample::Khz(88_888_000);

/// Horizontal position of a label inside the strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Label fits; drawn starting at column `x` (0 when centering is off).
    Centered { x: usize },
    /// Label is too wide; drawn starting at column `x`, which marches
    /// leftwards from the right edge and may go negative.
    Scrolling { x: isize },
}

/// One display slot, overwritten every acted tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuLabel {
    pub cpu: LogicalCpu,
    /// First terminal row of this slot, relative to the strip.
    pub row: usize,
    pub text: String,
    /// Rendered width of the widest label this slot should expect.
    pub width_hint: usize,
    pub placement: Placement,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SamplerState {
    Uninitialized,
    Active { online: OnlineSet },
}

pub struct Sampler {
    root: PathBuf,
    state: SamplerState,
    labels: Vec<CpuLabel>,
    /// Ticks seen since activation, acted on or not.
    ticks: u64,
    /// Marquee cursor shared by all scrolling labels, `0..2 * width`.
    scroll: usize,
}

impl Sampler {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            state: SamplerState::Uninitialized,
            labels: Vec::new(),
            ticks: 0,
            scroll: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, SamplerState::Active { .. })
    }

    pub fn online(&self) -> Option<&OnlineSet> {
        match &self.state {
            SamplerState::Active { online } => Some(online),
            SamplerState::Uninitialized => None,
        }
    }

    /// Labels from the most recent acted tick.
    pub fn labels(&self) -> &[CpuLabel] {
        &self.labels
    }

    /// Panel (re)creation: rediscover topology and lay out one slot per CPU.
    pub fn activate(&mut self, config: &FreqConfig, measure: &dyn TextMeasure) {
        let online = discover_online_cpus(&self.root);
        if online.is_empty() {
            info!("no online cpus found under {}", self.root.display());
        } else {
            info!("sampling {} cpus: {:?}", online.len(), online.as_slice());
        }

        let template = config.template();
        self.labels = online
            .iter()
            .enumerate()
            .map(|(i, cpu)| {
                let widest = format_label(cpu, WIDTH_SAMPLE, template, config.label_len);
                CpuLabel {
                    cpu,
                    row: i * config.row_height,
                    text: String::new(),
                    width_hint: measure.text_width(&widest),
                    placement: Placement::Centered { x: 0 },
                }
            })
            .collect();

        self.state = SamplerState::Active { online };
        self.ticks = 0;
        self.scroll = 0;
    }

    /// Number of terminal rows the laid-out slots need.
    pub fn rows_needed(&self, config: &FreqConfig) -> usize {
        self.labels.len() * config.row_height
    }

    /// One timer tick. Returns the refreshed labels, or `None` if the sampler
    /// is not active or this tick is skipped by decimation.
    pub fn tick(
        &mut self,
        config: &FreqConfig,
        measure: &dyn TextMeasure,
        panel_width: usize,
    ) -> Option<&[CpuLabel]> {
        if !self.is_active() {
            return None;
        }

        let tick = self.ticks;
        self.ticks = self.ticks.wrapping_add(1);
        if tick % config.tick_decimation.max(1) != 0 {
            return None;
        }

        if panel_width > 0 {
            self.scroll = (self.scroll + 1) % (2 * panel_width);
        }

        let template = config.template();
        for slot in self.labels.iter_mut() {
            let sample = read_frequency_khz(&self.root, slot.cpu);
            slot.text = format_label(slot.cpu, sample, template, config.label_len);
            let width = measure.text_width(&slot.text);
            slot.placement = place(width, panel_width, self.scroll, config);
        }
        debug!("tick {}: {:?}", tick, self.labels.iter().map(|l| &l.text).collect::<Vec<_>>());

        Some(self.labels.as_slice())
    }
}

/// Center (or left-align) a label that fits, otherwise scroll it.
fn place(width: usize, panel_width: usize, scroll: usize, config: &FreqConfig) -> Placement {
    if width.saturating_add(config.scroll_threshold) > panel_width {
        return Placement::Scrolling {
            x: panel_width as isize - scroll as isize,
        };
    }
    if config.center_labels {
        Placement::Centered {
            x: (panel_width - width) / 2,
        }
    } else {
        Placement::Centered { x: 0 }
    }
}
