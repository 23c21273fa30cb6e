//! Groups a flat feedback listing by agent and evaluation.
//!
//! The backend does not enforce one record per `(evaluation, criterion)`:
//! corrections arrive as new rows. [`deduplicate`] keeps the row with the
//! largest id for each key, and [`aggregate`] builds the nested groups the
//! feedback views render, ordered so agents with the most pending items
//! come first.

use std::cmp::Reverse;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

use super::types::{FeedbackRecord, FeedbackStatus};
use crate::format::AgentLabel;

/// Bucket for records without an agent id.
pub const UNASSIGNED_AGENT: &str = "unassigned";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub pending: usize,
    pub accepted: usize,
    pub in_review: usize,
    pub total: usize,
}

impl StatusCounts {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a FeedbackRecord>) -> Self {
        let mut counts = Self::default();
        for record in records {
            counts.add(record.status);
        }
        counts
    }

    fn add(&mut self, status: FeedbackStatus) {
        match status {
            FeedbackStatus::Pending => self.pending += 1,
            FeedbackStatus::Accepted => self.accepted += 1,
            FeedbackStatus::InReview => self.in_review += 1,
        }
        self.total += 1;
    }

    pub fn get(&self, status: FeedbackStatus) -> usize {
        match status {
            FeedbackStatus::Pending => self.pending,
            FeedbackStatus::Accepted => self.accepted,
            FeedbackStatus::InReview => self.in_review,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationGroup {
    pub evaluation_id: String,
    pub counts: StatusCounts,
    /// Rounded mean of `current_performance`.
    pub performance_average: Option<i64>,
    pub records: Vec<FeedbackRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AgentGroup {
    /// Trimmed agent id, or [`UNASSIGNED_AGENT`].
    pub agent_id: String,
    /// First non-blank display name among the agent's records.
    pub agent_name: Option<String>,
    pub counts: StatusCounts,
    pub performance_average: Option<i64>,
    pub evaluations: Vec<EvaluationGroup>,
}

impl AgentGroup {
    pub fn is_unassigned(&self) -> bool {
        self.agent_id == UNASSIGNED_AGENT
    }

    pub fn records(&self) -> impl Iterator<Item = &FeedbackRecord> {
        self.evaluations.iter().flat_map(|e| e.records.iter())
    }
}

impl AgentLabel for AgentGroup {
    fn agent_id(&self) -> &str {
        &self.agent_id
    }

    fn display_name(&self) -> Option<&str> {
        self.agent_name.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum DedupKey {
    Criterion(String, String),
    /// Records missing either half of the key only collapse with
    /// themselves.
    Record(i64),
    /// No usable key and no id: only byte-identical records collapse.
    Content(String),
    /// Last resort when a keyless record cannot be serialized.
    Position(usize),
}

impl DedupKey {
    fn of(record: &FeedbackRecord, position: usize) -> Self {
        let evaluation = record.evaluation_id.trim();
        let criterion = record.criterion_name.trim();
        if !evaluation.is_empty() && !criterion.is_empty() {
            return DedupKey::Criterion(evaluation.to_string(), criterion.to_string());
        }
        if record.id != 0 {
            return DedupKey::Record(record.id);
        }
        serde_json::to_string(record)
            .map(DedupKey::Content)
            .unwrap_or(DedupKey::Position(position))
    }
}

/// One record per `(evaluation_id, criterion_name)`, the one with the
/// largest id. A replacement takes over the slot of the record it
/// replaces, so output order follows first appearance of each key.
pub fn deduplicate(records: &[FeedbackRecord]) -> Vec<FeedbackRecord> {
    let mut slots: HashMap<DedupKey, usize> = HashMap::with_capacity(records.len());
    let mut kept: Vec<FeedbackRecord> = Vec::with_capacity(records.len());

    for (position, record) in records.iter().enumerate() {
        match slots.entry(DedupKey::of(record, position)) {
            Entry::Occupied(slot) => {
                let existing = &mut kept[*slot.get()];
                if record.id > existing.id {
                    *existing = record.clone();
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(kept.len());
                kept.push(record.clone());
            }
        }
    }

    kept
}

fn performance_average(records: &[FeedbackRecord]) -> Option<i64> {
    if records.is_empty() {
        return None;
    }
    let sum: f64 = records.iter().map(|r| r.current_performance).sum();
    Some((sum / records.len() as f64).round() as i64)
}

fn agent_key(record: &FeedbackRecord) -> String {
    match record.agent_id.trim() {
        "" => UNASSIGNED_AGENT.to_string(),
        id => id.to_string(),
    }
}

/// Split `items` into buckets by key, keeping first-seen bucket order and
/// input order within each bucket.
fn bucket_by<T>(items: Vec<T>, key: impl Fn(&T) -> String) -> Vec<(String, Vec<T>)> {
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut buckets: Vec<(String, Vec<T>)> = Vec::new();

    for item in items {
        let k = key(&item);
        let slot = match slots.entry(k) {
            Entry::Occupied(slot) => *slot.get(),
            Entry::Vacant(slot) => {
                buckets.push((slot.key().clone(), Vec::new()));
                *slot.insert(buckets.len() - 1)
            }
        };
        buckets[slot].1.push(item);
    }

    buckets
}

fn evaluation_group(evaluation_id: String, records: Vec<FeedbackRecord>) -> EvaluationGroup {
    EvaluationGroup {
        evaluation_id,
        counts: StatusCounts::from_records(&records),
        performance_average: performance_average(&records),
        records,
    }
}

fn agent_group(agent_id: String, records: Vec<FeedbackRecord>) -> AgentGroup {
    let counts = StatusCounts::from_records(&records);
    let average = performance_average(&records);
    let agent_name = records.iter().find_map(|r| {
        r.agent_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
    });

    let mut evaluations: Vec<EvaluationGroup> =
        bucket_by(records, |r| r.evaluation_id.trim().to_string())
            .into_iter()
            .map(|(id, records)| evaluation_group(id, records))
            .collect();
    evaluations.sort_by_key(|e| Reverse(e.counts.pending));

    AgentGroup {
        agent_id,
        agent_name,
        counts,
        performance_average: average,
        evaluations,
    }
}

/// Deduplicate, group by agent then evaluation, derive counts, and order
/// both levels by pending count (descending, stable).
pub fn aggregate(records: &[FeedbackRecord]) -> Vec<AgentGroup> {
    let mut groups: Vec<AgentGroup> = bucket_by(deduplicate(records), agent_key)
        .into_iter()
        .map(|(agent_id, records)| agent_group(agent_id, records))
        .collect();
    groups.sort_by_key(|g| Reverse(g.counts.pending));
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        id: i64,
        evaluation: &str,
        criterion: &str,
        agent: &str,
        status: FeedbackStatus,
    ) -> FeedbackRecord {
        FeedbackRecord {
            id,
            evaluation_id: evaluation.to_string(),
            criterion_name: criterion.to_string(),
            agent_id: agent.to_string(),
            status,
            ..FeedbackRecord::default()
        }
    }

    fn sample() -> Vec<FeedbackRecord> {
        use FeedbackStatus::*;
        vec![
            record(1, "E1", "Greeting", "A2", Pending),
            record(2, "E2", "Closing", "A1", Pending),
            record(3, "E2", "Negotiation", "A1", Pending),
            record(4, "E3", "Greeting", "A1", Accepted),
            record(5, "E3", "Greeting", "A1", Pending),
            record(6, "E4", "Greeting", "", InReview),
            record(7, "E5", "Closing", "A1", Pending),
        ]
    }

    #[test]
    fn test_larger_id_wins() {
        let groups = aggregate(&[
            record(5, "E1", "Greeting", "A1", FeedbackStatus::Pending),
            record(9, "E1", "Greeting", "A1", FeedbackStatus::Accepted),
        ]);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].agent_id, "A1");
        assert_eq!(groups[0].evaluations.len(), 1);
        let records = &groups[0].evaluations[0].records;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, 9);
        assert_eq!(records[0].status, FeedbackStatus::Accepted);
    }

    #[test]
    fn test_smaller_id_after_larger_is_dropped() {
        let kept = deduplicate(&[
            record(9, "E1", "Greeting", "A1", FeedbackStatus::Accepted),
            record(5, "E1", "Greeting", "A1", FeedbackStatus::Pending),
        ]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, 9);
    }

    #[test]
    fn test_replacement_keeps_first_slot() {
        let kept = deduplicate(&[
            record(1, "E1", "Greeting", "A1", FeedbackStatus::Pending),
            record(2, "E1", "Closing", "A1", FeedbackStatus::Pending),
            record(3, "E1", "Greeting", "A1", FeedbackStatus::Accepted),
        ]);
        let ids: Vec<i64> = kept.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 2]);
    }

    #[test]
    fn test_agents_ordered_by_pending() {
        use FeedbackStatus::Pending;
        let groups = aggregate(&[
            record(1, "E1", "Greeting", "A2", Pending),
            record(2, "E2", "Greeting", "A1", Pending),
            record(3, "E2", "Closing", "A1", Pending),
            record(4, "E2", "Negotiation", "A1", Pending),
        ]);
        let order: Vec<&str> = groups.iter().map(|g| g.agent_id.as_str()).collect();
        assert_eq!(order, vec!["A1", "A2"]);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        use FeedbackStatus::Accepted;
        let groups = aggregate(&[
            record(1, "E1", "Greeting", "B", Accepted),
            record(2, "E2", "Greeting", "A", Accepted),
            record(3, "E3", "Greeting", "C", Accepted),
        ]);
        let order: Vec<&str> = groups.iter().map(|g| g.agent_id.as_str()).collect();
        assert_eq!(order, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_evaluations_ordered_by_pending_within_agent() {
        let groups = aggregate(&sample());
        let a1 = groups.iter().find(|g| g.agent_id == "A1").unwrap();
        let order: Vec<&str> = a1.evaluations.iter().map(|e| e.evaluation_id.as_str()).collect();
        // E2 has two pending; E3 and E5 one each and keep first-seen order.
        assert_eq!(order, vec!["E2", "E3", "E5"]);
    }

    #[test]
    fn test_blank_agent_goes_to_unassigned() {
        let groups = aggregate(&sample());
        let unassigned = groups.iter().find(|g| g.is_unassigned()).unwrap();
        assert_eq!(unassigned.agent_id, UNASSIGNED_AGENT);
        assert_eq!(unassigned.counts.in_review, 1);
        assert_eq!(unassigned.records().count(), 1);
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate(&[]).is_empty());
    }

    #[test]
    fn test_counts_conserved() {
        let groups = aggregate(&sample());
        let deduped = deduplicate(&sample());
        let mut total = 0;
        for group in &groups {
            let c = group.counts;
            assert_eq!(c.pending + c.accepted + c.in_review, c.total);
            assert_eq!(c.total, group.records().count());
            for evaluation in &group.evaluations {
                let e = evaluation.counts;
                assert_eq!(e.pending + e.accepted + e.in_review, evaluation.records.len());
            }
            total += c.total;
        }
        assert_eq!(total, deduped.len());
    }

    #[test]
    fn test_self_concatenation_is_idempotent() {
        let once = aggregate(&sample());
        let mut doubled = sample();
        doubled.extend(sample());
        assert_eq!(aggregate(&doubled), once);
    }

    #[test]
    fn test_repeated_runs_identical() {
        assert_eq!(aggregate(&sample()), aggregate(&sample()));
    }

    #[test]
    fn test_performance_average_rounds() {
        let mut records = vec![
            record(1, "E1", "Greeting", "A1", FeedbackStatus::Pending),
            record(2, "E1", "Closing", "A1", FeedbackStatus::Pending),
        ];
        records[0].current_performance = 70.0;
        records[1].current_performance = 75.0;
        let groups = aggregate(&records);
        assert_eq!(groups[0].performance_average, Some(73));
        assert_eq!(groups[0].evaluations[0].performance_average, Some(73));
        assert_eq!(performance_average(&[]), None);
    }

    #[test]
    fn test_records_without_key_are_not_merged() {
        let kept = deduplicate(&[
            record(1, "", "Greeting", "A1", FeedbackStatus::Pending),
            record(2, "", "Greeting", "A1", FeedbackStatus::Pending),
            record(2, "", "Greeting", "A1", FeedbackStatus::Pending),
        ]);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_records_without_id_or_key_are_all_kept() {
        let records = vec![
            record(0, "", "Greeting", "A1", FeedbackStatus::Pending),
            record(0, "", "Closing", "A2", FeedbackStatus::Pending),
            record(0, "E9", "", "A2", FeedbackStatus::Accepted),
        ];
        assert_eq!(deduplicate(&records).len(), 3);

        let doubled: Vec<_> = records.iter().chain(records.iter()).cloned().collect();
        assert_eq!(aggregate(&doubled), aggregate(&records));
        assert_eq!(aggregate(&records).len(), 2);
    }

    #[test]
    fn test_agent_name_taken_from_first_named_record() {
        let mut records = vec![
            record(1, "E1", "Greeting", "A1", FeedbackStatus::Pending),
            record(2, "E1", "Closing", "A1", FeedbackStatus::Pending),
        ];
        records[1].agent_name = Some("Bruna Lima".to_string());
        let groups = aggregate(&records);
        assert_eq!(groups[0].agent_name.as_deref(), Some("Bruna Lima"));
    }
}
