//! Sections: titled regions with a patchable status badge and progress bar

use super::block::BlockId;
use crate::SectionStatus;

/// Handle to a section opened on a builder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SectionHandle(pub(crate) BlockId);

impl SectionHandle {
    pub fn block_id(self) -> BlockId {
        self.0
    }
}

/// Opening block of a section. Status, category and progress may change
/// after the block was appended, whether or not the section is closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionBlock {
    /// Sequential number used for the DOM id (`section-N`)
    pub seq: usize,
    pub title: String,
    pub status: SectionStatus,
    /// Color marker; follows the status once the status has been set
    pub category: String,
    /// 0..=100
    pub progress: u8,
    pub collapsible: bool,
    /// Initial visibility of the body when collapsible
    pub collapsed: bool,
}

impl SectionBlock {
    pub(crate) fn new(seq: usize, title: String, collapsible: bool, collapsed: bool) -> Self {
        let status = SectionStatus::Running;
        Self {
            seq,
            title,
            status,
            category: status.as_str().to_string(),
            progress: 0,
            collapsible,
            collapsed: collapsible && collapsed,
        }
    }

    pub fn dom_id(&self) -> String {
        format!("section-{}", self.seq)
    }

    /// Replace the badge and the category marker
    pub fn set_status(&mut self, status: SectionStatus) {
        self.status = status;
        self.category = status.as_str().to_string();
    }

    /// Set the bar width, clamped to 0..=100
    pub fn set_progress(&mut self, percent: i32) {
        self.progress = clamp_percent(percent);
    }

    /// At 100% the bar drops its animation and is hidden by the stylesheet
    pub fn is_complete(&self) -> bool {
        self.progress == 100
    }
}

/// Closing block matching a [`SectionBlock`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionEnd {
    pub collapsible: bool,
}

pub fn clamp_percent(percent: i32) -> u8 {
    percent.clamp(0, 100) as u8
}


#[cfg(test)]
mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn clamp_stays_in_range(p in any::<i32>()) {
            let c = clamp_percent(p);
            prop_assert!(c <= 100);
            if (0..=100).contains(&p) {
                prop_assert_eq!(c as i32, p);
            }
        }
    }
}
