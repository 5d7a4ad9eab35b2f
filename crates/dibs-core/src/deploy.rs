//! Per-application deploy queues.
//!
//! Each application carries a FIFO waiting list plus a single active-deploy
//! slot. Both live in one composite record so a queue-to-active transition
//! is a single read-modify-write against the brain, never two independent
//! key updates.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Queue state for one application.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AppSlot {
    /// Users waiting to deploy, FIFO. Duplicates are allowed.
    #[serde(default)]
    pub waiting: Vec<String>,
    /// The user currently deploying, if any. Set only by promoting the head
    /// of `waiting`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<String>,
}

/// All application queues, keyed by application name.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeployQueues {
    apps: BTreeMap<String, AppSlot>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScheduleOutcome {
    /// The caller is now (or still) at the head of the queue.
    NextUp,
    Scheduled,
    UnknownApp,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UnscheduleOutcome {
    Removed,
    NothingScheduled,
    UnknownApp,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    /// Someone is already deploying this application.
    Ongoing(String),
    /// The caller is not the head of the queue; carries the actual head.
    NotYourTurn(String),
    NothingScheduled,
    UnknownApp,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClearOutcome {
    /// The active slot was cleared; carries the new head of the queue.
    Cleared { next: Option<String> },
    NoOngoing,
    /// The active deploy belongs to someone else.
    OwnedBy(String),
    UnknownApp,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NextOutcome {
    Next(String),
    NothingScheduled,
    UnknownApp,
}

/// Read-only view for `deploy status`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueueStatus {
    pub waiting: Vec<String>,
    pub active: Option<String>,
}

impl DeployQueues {
    /// Insert empty queues for any configured applications missing from the
    /// record. Existing queues are left untouched. Returns how many were
    /// added.
    pub fn seed(&mut self, apps: &[String]) -> usize {
        let mut added = 0;
        for app in apps {
            if !self.apps.contains_key(app) {
                self.apps.insert(app.clone(), AppSlot::default());
                added += 1;
            }
        }
        added
    }

    pub fn slot(&self, app: &str) -> Option<&AppSlot> {
        self.apps.get(app)
    }

    pub fn schedule(&mut self, app: &str, user: &str) -> ScheduleOutcome {
        let Some(slot) = self.apps.get_mut(app) else {
            return ScheduleOutcome::UnknownApp;
        };

        slot.waiting.push(user.to_string());
        if slot.waiting.first().map(String::as_str) == Some(user) {
            ScheduleOutcome::NextUp
        } else {
            ScheduleOutcome::Scheduled
        }
    }

    /// Remove the caller's first occurrence from the waiting list.
    pub fn unschedule(&mut self, app: &str, user: &str) -> UnscheduleOutcome {
        let Some(slot) = self.apps.get_mut(app) else {
            return UnscheduleOutcome::UnknownApp;
        };

        match slot.waiting.iter().position(|u| u == user) {
            None => UnscheduleOutcome::NothingScheduled,
            Some(index) => {
                slot.waiting.remove(index);
                UnscheduleOutcome::Removed
            }
        }
    }

    /// Promote the caller to the active slot. Only the head of the queue may
    /// start, and only while nothing is ongoing.
    pub fn start(&mut self, app: &str, user: &str) -> StartOutcome {
        let Some(slot) = self.apps.get_mut(app) else {
            return StartOutcome::UnknownApp;
        };

        if let Some(holder) = &slot.active {
            return StartOutcome::Ongoing(holder.clone());
        }

        match slot.waiting.first() {
            None => StartOutcome::NothingScheduled,
            Some(head) if head != user => StartOutcome::NotYourTurn(head.clone()),
            Some(_) => {
                let head = slot.waiting.remove(0);
                slot.active = Some(head);
                StartOutcome::Started
            }
        }
    }

    /// Clear the active slot if the caller holds it. The waiting list is not
    /// consumed; the returned head is informational.
    pub fn clear_active(&mut self, app: &str, user: &str) -> ClearOutcome {
        let Some(slot) = self.apps.get_mut(app) else {
            return ClearOutcome::UnknownApp;
        };

        match &slot.active {
            None => ClearOutcome::NoOngoing,
            Some(holder) if holder != user => ClearOutcome::OwnedBy(holder.clone()),
            Some(_) => {
                slot.active = None;
                ClearOutcome::Cleared {
                    next: slot.waiting.first().cloned(),
                }
            }
        }
    }

    pub fn next_user(&self, app: &str) -> NextOutcome {
        let Some(slot) = self.apps.get(app) else {
            return NextOutcome::UnknownApp;
        };

        match slot.waiting.first() {
            None => NextOutcome::NothingScheduled,
            Some(head) => NextOutcome::Next(head.clone()),
        }
    }

    pub fn status(&self, app: &str) -> Option<QueueStatus> {
        self.apps.get(app).map(|slot| QueueStatus {
            waiting: slot.waiting.clone(),
            active: slot.active.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queues(apps: &[&str]) -> DeployQueues {
        let mut q = DeployQueues::default();
        q.seed(&apps.iter().map(|a| a.to_string()).collect::<Vec<_>>());
        q
    }

    fn waiting(q: &DeployQueues, app: &str) -> Vec<String> {
        q.slot(app).unwrap().waiting.clone()
    }

    #[test]
    fn schedule_appends_to_the_tail() {
        let mut q = queues(&["alpaca"]);

        assert_eq!(q.schedule("alpaca", "A"), ScheduleOutcome::NextUp);
        assert_eq!(q.schedule("alpaca", "B"), ScheduleOutcome::Scheduled);
        assert_eq!(waiting(&q, "alpaca"), vec!["A", "B"]);
    }

    #[test]
    fn schedule_allows_duplicates() {
        let mut q = queues(&["alpaca"]);

        q.schedule("alpaca", "A");
        q.schedule("alpaca", "B");
        assert_eq!(q.schedule("alpaca", "A"), ScheduleOutcome::Scheduled);
        assert_eq!(waiting(&q, "alpaca"), vec!["A", "B", "A"]);
    }

    #[test]
    fn schedule_rejects_unknown_applications() {
        let mut q = queues(&["alpaca"]);
        assert_eq!(q.schedule("mystery", "A"), ScheduleOutcome::UnknownApp);
        assert!(q.slot("mystery").is_none());
    }

    #[test]
    fn unschedule_removes_only_the_first_occurrence() {
        let mut q = queues(&["alpaca"]);
        q.schedule("alpaca", "A");
        q.schedule("alpaca", "B");
        q.schedule("alpaca", "A");

        assert_eq!(q.unschedule("alpaca", "A"), UnscheduleOutcome::Removed);
        assert_eq!(waiting(&q, "alpaca"), vec!["B", "A"]);
    }

    #[test]
    fn unschedule_without_a_booking_changes_nothing() {
        let mut q = queues(&["alpaca"]);
        q.schedule("alpaca", "B");

        assert_eq!(
            q.unschedule("alpaca", "A"),
            UnscheduleOutcome::NothingScheduled
        );
        assert_eq!(waiting(&q, "alpaca"), vec!["B"]);
    }

    #[test]
    fn start_promotes_only_the_head() {
        let mut q = queues(&["alpaca"]);
        q.schedule("alpaca", "A");
        q.schedule("alpaca", "B");

        assert_eq!(
            q.start("alpaca", "B"),
            StartOutcome::NotYourTurn("A".to_string())
        );
        assert_eq!(q.start("alpaca", "A"), StartOutcome::Started);
        assert_eq!(q.slot("alpaca").unwrap().active.as_deref(), Some("A"));
        assert_eq!(waiting(&q, "alpaca"), vec!["B"]);
    }

    #[test]
    fn start_refuses_while_a_deploy_is_ongoing() {
        let mut q = queues(&["alpaca"]);
        q.schedule("alpaca", "A");
        q.schedule("alpaca", "B");
        q.start("alpaca", "A");

        assert_eq!(q.start("alpaca", "B"), StartOutcome::Ongoing("A".to_string()));
        assert_eq!(waiting(&q, "alpaca"), vec!["B"]);
    }

    #[test]
    fn start_with_an_empty_queue() {
        let mut q = queues(&["alpaca"]);
        assert_eq!(q.start("alpaca", "A"), StartOutcome::NothingScheduled);
    }

    #[test]
    fn clear_active_requires_the_holder() {
        let mut q = queues(&["alpaca"]);
        q.schedule("alpaca", "A");
        q.schedule("alpaca", "B");
        q.start("alpaca", "A");

        assert_eq!(
            q.clear_active("alpaca", "B"),
            ClearOutcome::OwnedBy("A".to_string())
        );
        assert_eq!(
            q.clear_active("alpaca", "A"),
            ClearOutcome::Cleared {
                next: Some("B".to_string())
            }
        );
        // Queue is informational only; clearing must not consume it.
        assert_eq!(waiting(&q, "alpaca"), vec!["B"]);
        assert_eq!(q.clear_active("alpaca", "A"), ClearOutcome::NoOngoing);
    }

    #[test]
    fn next_user_peeks_the_head() {
        let mut q = queues(&["alpaca"]);
        assert_eq!(q.next_user("alpaca"), NextOutcome::NothingScheduled);

        q.schedule("alpaca", "A");
        q.schedule("alpaca", "B");
        assert_eq!(q.next_user("alpaca"), NextOutcome::Next("A".to_string()));
        assert_eq!(q.next_user("mystery"), NextOutcome::UnknownApp);
    }

    #[test]
    fn seed_is_additive_and_idempotent() {
        let mut q = DeployQueues::default();
        let apps = vec!["alpaca".to_string(), "cream".to_string()];

        assert_eq!(q.seed(&apps), 2);
        q.schedule("alpaca", "A");
        assert_eq!(q.seed(&apps), 0);
        assert_eq!(waiting(&q, "alpaca"), vec!["A"]);
    }
}
