//! Sequential load-more over the paginated feedback listing.

use super::actions::{apply_optimistic, FeedbackAction};
use super::aggregate::{aggregate, deduplicate, AgentGroup, StatusCounts};
use super::query::RecordQuery;
use super::types::FeedbackRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: usize,
    pub offset: usize,
}

/// Every record fetched so far for the current filter, in arrival order.
///
/// Grouping is recomputed over the whole set on demand, so duplicates
/// split across page boundaries still collapse.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackPages {
    records: Vec<FeedbackRecord>,
    next_offset: usize,
    exhausted: bool,
    page_size: usize,
}

impl FeedbackPages {
    pub fn new(page_size: usize) -> Self {
        Self {
            records: Vec::new(),
            next_offset: 0,
            exhausted: false,
            page_size: page_size.max(1),
        }
    }

    pub fn records(&self) -> &[FeedbackRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// The next page to fetch, or `None` once the server returned an
    /// empty page.
    pub fn next_request(&self) -> Option<PageRequest> {
        (!self.exhausted).then_some(PageRequest {
            limit: self.page_size,
            offset: self.next_offset,
        })
    }

    pub fn append(&mut self, page: Vec<FeedbackRecord>) {
        if page.is_empty() {
            self.exhausted = true;
            return;
        }
        self.next_offset += page.len();
        self.records.extend(page);
    }

    /// A single request covering everything loaded so far, used to
    /// refetch after a mutation without losing scroll depth.
    pub fn refresh_request(&self) -> PageRequest {
        PageRequest {
            limit: self.next_offset.max(self.page_size),
            offset: 0,
        }
    }

    /// Replace the accumulated records with the answer to
    /// [`refresh_request`](Self::refresh_request).
    pub fn replace(&mut self, records: Vec<FeedbackRecord>) {
        self.exhausted = records.is_empty();
        self.next_offset = records.len();
        self.records = records;
    }

    /// Deduplicate first so a superseded record never resurfaces through
    /// the query, then narrow and group.
    pub fn groups(&self, query: &RecordQuery) -> Vec<AgentGroup> {
        aggregate(&query.apply(&deduplicate(&self.records)))
    }

    pub fn counts(&self) -> StatusCounts {
        StatusCounts::from_records(&deduplicate(&self.records))
    }

    pub fn patch(&mut self, id: i64, action: &FeedbackAction) -> bool {
        apply_optimistic(&mut self.records, id, action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::types::FeedbackStatus;

    fn record(id: i64, evaluation: &str, criterion: &str, status: FeedbackStatus) -> FeedbackRecord {
        FeedbackRecord {
            id,
            evaluation_id: evaluation.to_string(),
            criterion_name: criterion.to_string(),
            agent_id: "A1".to_string(),
            status,
            ..FeedbackRecord::default()
        }
    }

    #[test]
    fn test_offsets_advance_until_empty_page() {
        let mut pages = FeedbackPages::new(2);
        assert_eq!(pages.next_request(), Some(PageRequest { limit: 2, offset: 0 }));

        pages.append(vec![
            record(1, "E1", "Greeting", FeedbackStatus::Pending),
            record(2, "E1", "Closing", FeedbackStatus::Pending),
        ]);
        assert_eq!(pages.next_request(), Some(PageRequest { limit: 2, offset: 2 }));

        pages.append(vec![record(3, "E2", "Greeting", FeedbackStatus::Pending)]);
        assert_eq!(pages.next_request(), Some(PageRequest { limit: 2, offset: 3 }));

        pages.append(Vec::new());
        assert!(pages.is_exhausted());
        assert_eq!(pages.next_request(), None);
        assert_eq!(pages.records().len(), 3);
    }

    #[test]
    fn test_full_first_page_leaves_next_page_reachable() {
        let mut pages = FeedbackPages::new(3);
        let first = (1..=3)
            .map(|id| record(id, &format!("E{}", id), "Greeting", FeedbackStatus::InReview))
            .collect();
        pages.append(first);

        let next = pages.next_request().expect("a full page is never the last");
        assert_eq!(next, PageRequest { limit: 3, offset: 3 });

        pages.append(vec![record(4, "E4", "Greeting", FeedbackStatus::InReview)]);
        let in_review = RecordQuery {
            status: Some(FeedbackStatus::InReview),
            ..RecordQuery::default()
        };
        let total: usize = pages.groups(&in_review).iter().map(|g| g.counts.total).sum();
        assert_eq!(total, 4);
        assert_eq!(pages.refresh_request(), PageRequest { limit: 4, offset: 0 });
    }

    #[test]
    fn test_duplicates_across_pages_collapse() {
        let mut pages = FeedbackPages::new(1);
        pages.append(vec![record(9, "E1", "Greeting", FeedbackStatus::Accepted)]);
        pages.append(vec![record(5, "E1", "Greeting", FeedbackStatus::Pending)]);

        let groups = pages.groups(&RecordQuery::default());
        assert_eq!(groups[0].counts.total, 1);
        assert_eq!(groups[0].evaluations[0].records[0].id, 9);
        assert_eq!(pages.counts().accepted, 1);
    }

    #[test]
    fn test_query_does_not_resurrect_superseded_record() {
        let mut pages = FeedbackPages::new(10);
        pages.append(vec![
            record(5, "E1", "Greeting", FeedbackStatus::Pending),
            record(9, "E1", "Greeting", FeedbackStatus::Accepted),
        ]);
        let pending_only = RecordQuery {
            status: Some(FeedbackStatus::Pending),
            ..RecordQuery::default()
        };
        assert!(pages.groups(&pending_only).is_empty());
    }

    #[test]
    fn test_refresh_covers_loaded_depth() {
        let mut pages = FeedbackPages::new(2);
        assert_eq!(pages.refresh_request(), PageRequest { limit: 2, offset: 0 });
        pages.append(vec![
            record(1, "E1", "Greeting", FeedbackStatus::Pending),
            record(2, "E1", "Closing", FeedbackStatus::Pending),
        ]);
        pages.append(vec![
            record(3, "E2", "Greeting", FeedbackStatus::Pending),
            record(4, "E2", "Closing", FeedbackStatus::Pending),
        ]);
        assert_eq!(pages.refresh_request(), PageRequest { limit: 4, offset: 0 });

        pages.replace(vec![record(1, "E1", "Greeting", FeedbackStatus::Accepted)]);
        assert_eq!(pages.records().len(), 1);
        assert_eq!(pages.next_request(), Some(PageRequest { limit: 2, offset: 1 }));
    }

    #[test]
    fn test_patch_then_replace_is_authoritative() {
        let mut pages = FeedbackPages::new(10);
        pages.append(vec![record(1, "E1", "Greeting", FeedbackStatus::Pending)]);
        assert!(pages.patch(1, &FeedbackAction::Accept));
        assert_eq!(pages.counts().accepted, 1);

        // Server disagrees; its answer wins.
        pages.replace(vec![record(1, "E1", "Greeting", FeedbackStatus::Pending)]);
        assert_eq!(pages.counts().pending, 1);
    }
}
