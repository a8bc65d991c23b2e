//! Debouncing of raw "score above threshold" flags into cut events.
//!
//! Detectors flag every frame whose score crosses their threshold. A brief
//! flash produces a short run of flagged frames, and a hard cut followed
//! quickly by another produces two runs. In [`FilterMode::Merge`] runs that
//! begin less than `length` frames after the previous flagged frame are
//! merged, and a single cut is emitted once the merged region is at least
//! `length` frames long and the flags have dropped again.

/// How nearby flagged frames are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    Merge,
    /// Reserved. Selecting it is a programming error and panics.
    Suppress,
}

#[derive(Debug, Clone)]
pub struct FlashFilter {
    mode: FilterMode,
    length: u64,
    last_above: Option<u64>,
    merge_start: Option<u64>,
    merge_enabled: bool,
    merge_triggered: bool,
}

impl FlashFilter {
    pub fn new(mode: FilterMode, length: u64) -> Self {
        Self {
            mode,
            length,
            last_above: None,
            merge_start: None,
            merge_enabled: false,
            merge_triggered: false,
        }
    }

    /// Feeds one frame. Returns the frame number of a cut when one is emitted.
    ///
    /// # Panics
    ///
    /// Panics if the filter was built with [`FilterMode::Suppress`].
    pub fn filter(&mut self, frame_num: u64, above_threshold: bool) -> Option<u64> {
        if self.last_above.is_none() {
            self.last_above = Some(frame_num);
        }
        match self.mode {
            FilterMode::Merge => self.filter_merge(frame_num, above_threshold),
            FilterMode::Suppress => {
                panic!("FilterMode::Suppress is not supported by FlashFilter")
            }
        }
    }

    fn filter_merge(&mut self, frame_num: u64, above_threshold: bool) -> Option<u64> {
        let last_above = self.last_above.unwrap_or(frame_num);
        let min_length_met = frame_num.saturating_sub(last_above) >= self.length;
        if above_threshold {
            self.last_above = Some(frame_num);
        }

        if self.merge_triggered {
            let last_above = self.last_above.unwrap_or(frame_num);
            let merge_start = self.merge_start.unwrap_or(last_above);
            let num_merged = last_above.saturating_sub(merge_start);
            if min_length_met && !above_threshold && num_merged >= self.length {
                self.merge_triggered = false;
                return Some(last_above);
            }
            return None;
        }

        if !above_threshold {
            return None;
        }

        if min_length_met {
            self.merge_enabled = true;
            return Some(frame_num);
        }

        if self.merge_enabled {
            self.merge_triggered = true;
            self.merge_start = Some(frame_num);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(filter: &mut FlashFilter, flags: &[bool]) -> Vec<u64> {
        flags
            .iter()
            .enumerate()
            .filter_map(|(i, &above)| filter.filter(i as u64, above))
            .collect()
    }

    #[test]
    fn test_isolated_runs_each_emit_a_cut() {
        let mut filter = FlashFilter::new(FilterMode::Merge, 3);
        let mut flags = vec![false; 20];
        flags[5] = true;
        flags[12] = true;
        assert_eq!(run(&mut filter, &flags), vec![5, 12]);
    }

    #[test]
    fn test_flag_too_close_to_start_is_dropped() {
        let mut filter = FlashFilter::new(FilterMode::Merge, 3);
        let flags = [false, true, false, false, false, false];
        assert!(run(&mut filter, &flags).is_empty());
    }

    #[test]
    fn test_cut_then_close_flags_collapse_onto_last_flag() {
        let mut filter = FlashFilter::new(FilterMode::Merge, 3);
        let mut flags = vec![false; 16];
        for i in [5, 6, 7, 9, 10] {
            flags[i] = true;
        }
        // Frame 5 is a cut on its own. Frames 6..=10 keep re-triggering
        // within the minimum length and collapse onto the last flagged frame.
        assert_eq!(run(&mut filter, &flags), vec![5, 10]);
    }

    #[test]
    fn test_two_short_runs_after_a_cut_merge_into_one() {
        let mut filter = FlashFilter::new(FilterMode::Merge, 4);
        let mut flags = vec![false; 24];
        // A cut at 10, then two short runs: 12..=13 and 15..=16.
        for i in [10, 12, 13, 15, 16] {
            flags[i] = true;
        }
        assert_eq!(run(&mut filter, &flags), vec![10, 16]);
    }

    #[test]
    fn test_zero_length_passes_every_flag() {
        let mut filter = FlashFilter::new(FilterMode::Merge, 0);
        let flags = [false, true, true, false, true];
        assert_eq!(run(&mut filter, &flags), vec![1, 2, 4]);
    }

    #[test]
    #[should_panic(expected = "Suppress")]
    fn test_suppress_mode_panics() {
        let mut filter = FlashFilter::new(FilterMode::Suppress, 3);
        filter.filter(0, true);
    }
}
