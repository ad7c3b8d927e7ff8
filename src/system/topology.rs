//! Online-CPU discovery from the kernel's cpulist encoding.
//!
//! The `online` file under the CPU topology root holds a comma separated
//! list of single ids and inclusive ranges, e.g. `0-3,6` or `0,2,4-7`.

use std::fs;
use std::path::Path;

use log::{debug, warn};

/// Hard upper bound on the logical CPUs the strip will show.
pub const MAX_CPUS: usize = 8;

/// Identifier of one schedulable CPU, always `< MAX_CPUS`.
pub type LogicalCpu = usize;

/// Ordered, duplicate-free list of online CPUs, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OnlineSet {
    cpus: Vec<LogicalCpu>,
}

impl OnlineSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a CPU unless it is out of range or already present.
    fn insert(&mut self, cpu: u64) {
        if cpu >= MAX_CPUS as u64 {
            return;
        }
        let cpu = cpu as LogicalCpu;
        if !self.cpus.contains(&cpu) {
            self.cpus.push(cpu);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = LogicalCpu> + '_ {
        self.cpus.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.cpus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cpus.is_empty()
    }

    pub fn as_slice(&self) -> &[LogicalCpu] {
        &self.cpus
    }
}

/// Scanner over the cpulist grammar. Only digits, `,` and `-` matter;
/// every other byte is skipped.
#[derive(Default)]
struct CpulistScanner {
    pending: Option<u64>,
    range_start: Option<u64>,
    set: OnlineSet,
}

impl CpulistScanner {
    fn digit(&mut self, d: u64) {
        let value = self.pending.unwrap_or(0);
        self.pending = Some(value.saturating_mul(10).saturating_add(d));
    }

    fn dash(&mut self) {
        match (self.range_start, self.pending) {
            // `a-b-c`: close `a-b`, then `b` opens the next range.
            (Some(_), Some(end)) => {
                self.flush();
                self.range_start = Some(end);
            }
            // A dash with nothing before it starts no range.
            (_, Some(start)) => {
                self.pending = None;
                self.range_start = Some(start);
            }
            (_, None) => {}
        }
    }

    fn flush(&mut self) {
        match (self.range_start.take(), self.pending.take()) {
            (Some(start), Some(end)) => {
                // Members past the bound would be rejected anyway.
                let last = end.min(MAX_CPUS as u64 - 1);
                for cpu in start..=last {
                    self.set.insert(cpu);
                }
            }
            // A range missing its end keeps its start as a single id.
            (None, Some(cpu)) | (Some(cpu), None) => self.set.insert(cpu),
            (None, None) => {}
        }
    }

    fn finish(mut self) -> OnlineSet {
        self.flush();
        self.set
    }
}

/// Parse a cpulist string into an [`OnlineSet`].
///
/// Garbage input yields an empty set, never an error.
pub fn parse_online_cpus(cpulist: &str) -> OnlineSet {
    let mut scanner = CpulistScanner::default();
    for c in cpulist.chars() {
        match c {
            '0'..='9' => scanner.digit(u64::from(c as u8 - b'0')),
            '-' => scanner.dash(),
            ',' => scanner.flush(),
            _ => {}
        }
    }
    scanner.finish()
}

/// Read `<root>/online` and parse it. An unreadable source gives an empty set.
pub fn discover_online_cpus(root: &Path) -> OnlineSet {
    let path = root.join("online");
    match fs::read_to_string(&path) {
        Ok(content) => {
            let set = parse_online_cpus(&content);
            debug!("online cpus from {}: {:?}", path.display(), set.as_slice());
            set
        }
        Err(e) => {
            warn!("cannot read {}: {}", path.display(), e);
            OnlineSet::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::TempDir;

    fn ids(s: &str) -> Vec<LogicalCpu> {
        parse_online_cpus(s).as_slice().to_vec()
    }

    #[test]
    fn test_range_then_single() {
        assert_eq!(ids("0-1,3"), vec![0, 1, 3]);
    }

    #[test]
    fn test_singles_then_range() {
        assert_eq!(ids("0,2,4-6"), vec![0, 2, 4, 5, 6]);
    }

    #[test]
    fn test_kernel_trailing_newline() {
        assert_eq!(ids("0-7\n"), vec![0, 1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_out_of_range_dropped() {
        assert_eq!(ids("0,8,9,3"), vec![0, 3]);
        assert_eq!(ids("6-15"), vec![6, 7]);
        assert_eq!(ids("10-12"), Vec::<LogicalCpu>::new());
    }

    #[test]
    fn test_duplicates_keep_first_seen_order() {
        assert_eq!(ids("3,1-3,0,1"), vec![3, 1, 2, 0]);
    }

    #[test]
    fn test_empty_and_garbage() {
        assert!(parse_online_cpus("").is_empty());
        assert!(parse_online_cpus("none\n").is_empty());
        assert!(parse_online_cpus(",,--,").is_empty());
    }

    #[test]
    fn test_dangling_dash_keeps_start() {
        assert_eq!(ids("0,1-"), vec![0, 1]);
        assert_eq!(ids("2-,5"), vec![2, 5]);
        assert_eq!(ids("-3"), vec![3]);
    }

    #[test]
    fn test_chained_ranges() {
        assert_eq!(ids("0-2-4"), vec![0, 1, 2, 3, 4]);
        assert_eq!(ids("1--3"), vec![1, 2, 3]);
        assert_eq!(ids("6-7-1"), vec![6, 7]);
    }

    #[test]
    fn test_reversed_range_contributes_nothing() {
        assert_eq!(ids("5-2,1"), vec![1]);
    }

    #[test]
    fn test_huge_number_saturates_and_is_rejected() {
        assert_eq!(ids("99999999999999999999999,2"), vec![2]);
    }

    #[test]
    fn test_stray_characters_ignored() {
        assert_eq!(ids(" 0 - 2 , 4 "), vec![0, 1, 2, 4]);
    }

    #[test]
    fn test_discover_reads_online_file() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("online"), "0-1,3\n").unwrap();

        let set = discover_online_cpus(tmp.path());
        assert_eq!(set.as_slice(), &[0, 1, 3]);
    }

    #[test]
    fn test_discover_missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(discover_online_cpus(tmp.path()).is_empty());
    }

    proptest! {
        #[test]
        fn prop_parse_is_bounded_and_unique(input in "[0-9,\\- a-z]{0,40}") {
            let set = parse_online_cpus(&input);
            let cpus = set.as_slice();
            prop_assert!(cpus.len() <= MAX_CPUS);
            for (i, cpu) in cpus.iter().enumerate() {
                prop_assert!(*cpu < MAX_CPUS);
                prop_assert!(!cpus[i + 1..].contains(cpu));
            }
        }

        #[test]
        fn prop_single_range_is_ascending(a in 0usize..MAX_CPUS, b in 0usize..MAX_CPUS) {
            let (lo, hi) = (a.min(b), a.max(b));
            let expected: Vec<LogicalCpu> = (lo..=hi).collect();
            prop_assert_eq!(ids(&format!("{}-{}", lo, hi)), expected);
        }
    }
}
