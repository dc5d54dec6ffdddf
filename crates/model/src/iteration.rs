//! Latest iteration of a solution. Older iterations are not modeled.

use serde::{Deserialize, Serialize};

/// Test evaluation status reported by the remote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestsStatus {
    NotQueued,
    Queued,
    Passed,
    Failed,
    Errored,
    Exceptioned,
    Cancelled,
}

/// The most recent durable, test-evaluated version of a solution.
/// Exists only once the solution has been iterated.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Iteration {
    pub tests_status: TestsStatus,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub num_essential_automated_comments: u32,
    #[serde(default)]
    pub num_actionable_automated_comments: u32,
    #[serde(default)]
    pub num_non_actionable_automated_comments: u32,
}

impl Iteration {
    /// Tests ran and passed
    #[must_use]
    pub fn passing(&self) -> bool {
        self.tests_status == TestsStatus::Passed
    }

    /// Tests ran and did not pass. False while queued or not queued.
    #[must_use]
    pub fn failing(&self) -> bool {
        matches!(
            self.tests_status,
            TestsStatus::Failed
                | TestsStatus::Errored
                | TestsStatus::Exceptioned
                | TestsStatus::Cancelled
        )
    }
}
