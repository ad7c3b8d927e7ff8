//! Per-CPU current scaling frequency, read live from cpufreq.

use std::fs;
use std::io;
use std::num::ParseIntError;
use std::path::{Path, PathBuf};

use log::trace;
use thiserror::Error;

use crate::system::topology::LogicalCpu;

/// One point sample of a CPU's clock, in kilohertz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrequencySample {
    Khz(u64),
    Unavailable,
}

impl FrequencySample {
    pub fn khz(self) -> Option<u64> {
        match self {
            FrequencySample::Khz(v) => Some(v),
            FrequencySample::Unavailable => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum FrequencyError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed frequency {content:?} in {path}: {source}")]
    Parse {
        path: PathBuf,
        content: String,
        #[source]
        source: ParseIntError,
    },
}

/// Path of the scaling frequency file for `cpu` under the topology root.
pub fn frequency_path(root: &Path, cpu: LogicalCpu) -> PathBuf {
    root.join(format!("cpu{}", cpu))
        .join("cpufreq")
        .join("scaling_cur_freq")
}

/// Read and parse the frequency file, surfacing the reason on failure.
pub fn try_read_frequency_khz(root: &Path, cpu: LogicalCpu) -> Result<u64, FrequencyError> {
    let path = frequency_path(root, cpu);
    let content = fs::read_to_string(&path).map_err(|source| FrequencyError::Io {
        path: path.clone(),
        source,
    })?;
    content
        .trim()
        .parse::<u64>()
        .map_err(|source| FrequencyError::Parse {
            path,
            content: content.trim().to_string(),
            source,
        })
}

/// Read the live frequency of `cpu`. Any failure becomes `Unavailable`.
pub fn read_frequency_khz(root: &Path, cpu: LogicalCpu) -> FrequencySample {
    match try_read_frequency_khz(root, cpu) {
        Ok(khz) => FrequencySample::Khz(khz),
        Err(e) => {
            trace!("cpu{}: {}", cpu, e);
            FrequencySample::Unavailable
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_freq(root: &Path, cpu: LogicalCpu, content: &str) {
        let dir = root.join(format!("cpu{}", cpu)).join("cpufreq");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("scaling_cur_freq"), content).unwrap();
    }

    #[test]
    fn test_path_layout() {
        let p = frequency_path(Path::new("/sys/devices/system/cpu"), 3);
        assert_eq!(p, PathBuf::from("/sys/devices/system/cpu/cpu3/cpufreq/scaling_cur_freq"));
    }

    #[test]
    fn test_reads_khz_with_newline() {
        let tmp = TempDir::new().unwrap();
        write_freq(tmp.path(), 1, "3200000\n");
        assert_eq!(read_frequency_khz(tmp.path(), 1), FrequencySample::Khz(3_200_000));
    }

    #[test]
    fn test_missing_source_is_unavailable() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(read_frequency_khz(tmp.path(), 0), FrequencySample::Unavailable);
        assert!(matches!(
            try_read_frequency_khz(tmp.path(), 0),
            Err(FrequencyError::Io { .. })
        ));
    }

    #[test]
    fn test_malformed_content_is_unavailable() {
        let tmp = TempDir::new().unwrap();
        write_freq(tmp.path(), 2, "fast\n");
        assert_eq!(read_frequency_khz(tmp.path(), 2), FrequencySample::Unavailable);
        assert!(matches!(
            try_read_frequency_khz(tmp.path(), 2),
            Err(FrequencyError::Parse { .. })
        ));

        write_freq(tmp.path(), 3, "");
        assert_eq!(read_frequency_khz(tmp.path(), 3), FrequencySample::Unavailable);

        write_freq(tmp.path(), 4, "-5");
        assert_eq!(read_frequency_khz(tmp.path(), 4), FrequencySample::Unavailable);
    }

    #[test]
    fn test_repeated_reads_agree() {
        let tmp = TempDir::new().unwrap();
        write_freq(tmp.path(), 0, "1800000\n");
        let first = read_frequency_khz(tmp.path(), 0);
        let second = read_frequency_khz(tmp.path(), 0);
        assert_eq!(first, second);
    }

    #[test]
    fn test_rereads_live_value() {
        let tmp = TempDir::new().unwrap();
        write_freq(tmp.path(), 0, "800000\n");
        assert_eq!(read_frequency_khz(tmp.path(), 0).khz(), Some(800_000));
        write_freq(tmp.path(), 0, "2400000\n");
        assert_eq!(read_frequency_khz(tmp.path(), 0).khz(), Some(2_400_000));
    }
}
