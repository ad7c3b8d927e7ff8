//! Label template mini-language.
//!
//! A template is copied verbatim except for `$`-directives:
//!
//! ```text
//!   $L  CPU label ("CPU3")        $N  bare CPU id
//!   $F  auto-scaled MHz/GHz       $M  MHz with unit     $m  bare MHz
//!   $G  GHz with unit             $g  bare GHz
//!   $$  literal '$'               $x  literal 'x' for any other x
//! ```

use std::fmt;

use crate::system::frequency::FrequencySample;
use crate::system::topology::LogicalCpu;

pub const DEFAULT_TEMPLATE: &str = "$L: $F";

/// Label buffer size; one slot is reserved for the terminator, leaving 31
/// visible characters.
pub const DEFAULT_LABEL_LEN: usize = 32;

/// Directive reference shown in the help popup and `--help-format`.
pub const DIRECTIVE_HELP: &[(&str, &str)] = &[
    ("$L", "CPU label, e.g. CPU0"),
    ("$N", "CPU number, e.g. 0"),
    ("$F", "frequency, MHz below 1 GHz, GHz above"),
    ("$M", "frequency in MHz, e.g. 2400 MHz"),
    ("$m", "frequency in MHz without unit"),
    ("$G", "frequency in GHz, e.g. 2.40 GHz"),
    ("$g", "frequency in GHz without unit"),
    ("$$", "a literal $"),
];

const KHZ_PER_MHZ: u64 = 1_000;
const KHZ_PER_GHZ: u64 = 1_000_000;

/// User-configurable label template. Empty means unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatTemplate(String);

impl FormatTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        let template = template.into();
        if template.is_empty() {
            Self::default()
        } else {
            Self(template)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for FormatTemplate {
    fn default() -> Self {
        Self(DEFAULT_TEMPLATE.to_string())
    }
}

impl fmt::Display for FormatTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Output sink that silently drops everything past `max_len - 1` chars.
struct BoundedLabel {
    out: String,
    room: usize,
}

impl BoundedLabel {
    fn new(max_len: usize) -> Self {
        let room = max_len.saturating_sub(1);
        Self {
            out: String::with_capacity(room),
            room,
        }
    }

    fn push(&mut self, c: char) {
        if self.room > 0 {
            self.out.push(c);
            self.room -= 1;
        }
    }

    fn push_str(&mut self, s: &str) {
        for c in s.chars() {
            if self.room == 0 {
                break;
            }
            self.push(c);
        }
    }

    fn is_full(&self) -> bool {
        self.room == 0
    }
}

enum ScanState {
    Copying,
    AfterDollar,
}

fn mhz(khz: u64) -> String {
    (khz / KHZ_PER_MHZ).to_string()
}

fn ghz(khz: u64) -> String {
    format!("{:.2}", khz as f64 * 1e-6)
}

/// Expand a single directive character, or `None` if it is not one.
fn expand(directive: char, cpu: LogicalCpu, sample: FrequencySample) -> Option<String> {
    let khz = sample.khz();
    let text = match directive {
        'L' => format!("CPU{}", cpu),
        'N' => cpu.to_string(),
        'F' => match khz {
            None => "N/A MHz".to_string(),
            Some(v) if v < KHZ_PER_GHZ => format!("{} MHz", mhz(v)),
            Some(v) => format!("{} GHz", ghz(v)),
        },
        'M' => match khz {
            None => "N/A MHz".to_string(),
            Some(v) => format!("{} MHz", mhz(v)),
        },
        'm' => khz.map_or_else(|| "N/A".to_string(), mhz),
        'G' => match khz {
            None => "N/A GHz".to_string(),
            Some(v) => format!("{} GHz", ghz(v)),
        },
        'g' => khz.map_or_else(|| "N/A".to_string(), ghz),
        _ => return None,
    };
    Some(text)
}

/// Render `template` for one CPU sample, bounded to `max_len - 1` characters.
pub fn format_label(
    cpu: LogicalCpu,
    sample: FrequencySample,
    template: &FormatTemplate,
    max_len: usize,
) -> String {
    let mut label = BoundedLabel::new(max_len);
    let mut state = ScanState::Copying;

    for c in template.as_str().chars() {
        if label.is_full() {
            break;
        }
        state = match state {
            ScanState::Copying if c == '$' => ScanState::AfterDollar,
            ScanState::Copying => {
                label.push(c);
                ScanState::Copying
            }
            ScanState::AfterDollar => {
                match expand(c, cpu, sample) {
                    Some(text) => label.push_str(&text),
                    None => label.push(c),
                }
                ScanState::Copying
            }
        };
    }

    label.out
}

/// Help text listing every directive, one per line.
pub fn directive_help() -> String {
    DIRECTIVE_HELP
        .iter()
        .map(|(d, desc)| format!("  {}  {}", d, desc))
        .collect::<Vec<_>>()
        .join("\n")
}
