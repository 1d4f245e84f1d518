use serde::{Deserialize, Serialize};

use crate::domain::cluster::{PodSummary, ResourceCondition};

/// Containers restarting more than this many times are flagged.
pub const RESTART_THRESHOLD: u32 = 5;

/// Phase every healthy pod reports.
const RUNNING_PHASE: &str = "Running";

/// What is wrong, with the observed value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum IssueKind {
    NotRunning {
        status: String,
        conditions: Vec<ResourceCondition>,
    },
    HighRestartCount {
        restart_count: u32,
    },
}

/// A problem found on a pod.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub pod: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
    #[serde(flatten)]
    pub kind: IssueKind,
}

impl Issue {
    pub fn is_not_running(&self) -> bool {
        matches!(self.kind, IssueKind::NotRunning { .. })
    }

    pub fn is_high_restart_count(&self) -> bool {
        matches!(self.kind, IssueKind::HighRestartCount { .. })
    }
}

/// Applies both detection rules to every pod, in pod order.
///
/// A pod whose phase is not `Running` yields one issue. Each container
/// with a restart count above [`RESTART_THRESHOLD`] yields one more.
pub fn detect_issues(pods: &[PodSummary]) -> Vec<Issue> {
    let mut issues = Vec::new();

    for pod in pods {
        if pod.status != RUNNING_PHASE {
            issues.push(Issue {
                pod: pod.name.clone(),
                container: None,
                kind: IssueKind::NotRunning {
                    status: pod.status.clone(),
                    conditions: pod.conditions.clone(),
                },
            });
        }

        for container in &pod.containers {
            if container.restart_count > RESTART_THRESHOLD {
                issues.push(Issue {
                    pod: pod.name.clone(),
                    container: Some(container.name.clone()),
                    kind: IssueKind::HighRestartCount {
                        restart_count: container.restart_count,
                    },
                });
            }
        }
    }

    issues
}
