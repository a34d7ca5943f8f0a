use std::fmt;

use crate::model::WatchStatus;

/// Watched-percentage milestones that trigger a progress report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Threshold {
    Quarter,
    Half,
    ThreeQuarters,
    Full,
}

impl Threshold {
    /// Milestones in ascending order.
    pub const ALL: [Threshold; 4] = [
        Threshold::Quarter,
        Threshold::Half,
        Threshold::ThreeQuarters,
        Threshold::Full,
    ];

    #[must_use]
    pub fn percent(self) -> u32 {
        match self {
            Threshold::Quarter => 25,
            Threshold::Half => 50,
            Threshold::ThreeQuarters => 75,
            Threshold::Full => 100,
        }
    }

    /// Status carried by the report sent when this milestone is crossed.
    #[must_use]
    pub fn report_status(self) -> WatchStatus {
        match self {
            Threshold::Full => WatchStatus::Completed,
            _ => WatchStatus::InProgress,
        }
    }

    fn bit(self) -> u8 {
        match self {
            Threshold::Quarter => 0b0001,
            Threshold::Half => 0b0010,
            Threshold::ThreeQuarters => 0b0100,
            Threshold::Full => 0b1000,
        }
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

/// Milestones already reported for the current lecture load. Only grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ThresholdSet(u8);

impl ThresholdSet {
    #[must_use]
    pub fn new() -> Self {
        Self(0)
    }

    #[must_use]
    pub fn contains(self, threshold: Threshold) -> bool {
        self.0 & threshold.bit() != 0
    }

    /// Mark a milestone. Returns `false` if it was already marked.
    pub fn insert(&mut self, threshold: Threshold) -> bool {
        let fresh = !self.contains(threshold);
        self.0 |= threshold.bit();
        fresh
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(self) -> impl Iterator<Item = Threshold> {
        Threshold::ALL.into_iter().filter(move |t| self.contains(*t))
    }
}
