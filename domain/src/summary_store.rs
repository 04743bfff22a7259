//! Retention of generated meeting summaries.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use log::*;
use tokio::sync::RwLock;

use crate::error::Error;
use crate::meeting_summary::MeetingSummary;
use crate::query::SummaryQuery;
use crate::Id;

#[async_trait]
pub trait SummaryStore: Send + Sync {
    async fn insert(&self, summary: MeetingSummary) -> Result<MeetingSummary, Error>;

    async fn find_by_id(&self, id: Id) -> Result<Option<MeetingSummary>, Error>;

    /// Summaries matching `query`, oldest first.
    async fn find(&self, query: &SummaryQuery) -> Result<Vec<MeetingSummary>, Error>;
}

/// Process-local store keyed by summary id. Contents are lost on restart.
///
/// Holds at most `capacity` summaries; inserting past the cap evicts the oldest.
pub struct InMemorySummaryStore {
    capacity: usize,
    summaries: RwLock<Summaries>,
}

#[derive(Default)]
struct Summaries {
    by_id: HashMap<Id, MeetingSummary>,
    // Insertion order, oldest at the front
    order: VecDeque<Id>,
}

impl InMemorySummaryStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            summaries: RwLock::new(Summaries::default()),
        }
    }
}

#[async_trait]
impl SummaryStore for InMemorySummaryStore {
    async fn insert(&self, summary: MeetingSummary) -> Result<MeetingSummary, Error> {
        let mut summaries = self.summaries.write().await;

        if summaries
            .by_id
            .insert(summary.id, summary.clone())
            .is_none()
        {
            summaries.order.push_back(summary.id);
        }

        while summaries.order.len() > self.capacity {
            if let Some(oldest) = summaries.order.pop_front() {
                summaries.by_id.remove(&oldest);
                debug!("Evicted meeting summary {oldest} from the in-memory store");
            }
        }

        Ok(summary)
    }

    async fn find_by_id(&self, id: Id) -> Result<Option<MeetingSummary>, Error> {
        Ok(self.summaries.read().await.by_id.get(&id).cloned())
    }

    async fn find(&self, query: &SummaryQuery) -> Result<Vec<MeetingSummary>, Error> {
        let summaries = self.summaries.read().await;
        Ok(summaries
            .order
            .iter()
            .filter_map(|id| summaries.by_id.get(id))
            .filter(|summary| query.matches(summary))
            .skip(query.offset)
            .take(query.limit)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn summary(meeting_id: &str) -> MeetingSummary {
        MeetingSummary {
            id: Id::new_v4(),
            meeting_id: meeting_id.to_string(),
            meeting_title: format!("Meeting {meeting_id}"),
            summary: Some("notes".to_string()),
            model: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_then_find_by_id() {
        let store = InMemorySummaryStore::new(100);
        let inserted = store.insert(summary("m-1")).await.unwrap();

        assert_eq!(store.find_by_id(inserted.id).await.unwrap(), Some(inserted));
        assert_eq!(store.find_by_id(Id::new_v4()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_find_paginates_after_filtering_in_insertion_order() {
        let store = InMemorySummaryStore::new(100);
        for meeting_id in ["a", "b", "a", "c", "a"] {
            store.insert(summary(meeting_id)).await.unwrap();
        }

        let query = SummaryQuery::new(Some(1), Some(1), Some("meeting_id eq a")).unwrap();
        let page = store.find(&query).await.unwrap();
        assert_eq!(page.len(), 1);

        let all_a = store
            .find(&SummaryQuery::new(None, None, Some("meeting_id eq a")).unwrap())
            .await
            .unwrap();
        assert_eq!(all_a.len(), 3);
        assert_eq!(page[0].id, all_a[1].id);

        let past_end = store
            .find(&SummaryQuery::new(Some(10), None, None).unwrap())
            .await
            .unwrap();
        assert!(past_end.is_empty());
    }

    #[tokio::test]
    async fn test_oldest_summaries_are_evicted_past_capacity() {
        let store = InMemorySummaryStore::new(2);
        let first = store.insert(summary("a")).await.unwrap();
        let second = store.insert(summary("b")).await.unwrap();
        let third = store.insert(summary("c")).await.unwrap();

        assert_eq!(store.find_by_id(first.id).await.unwrap(), None);
        assert_eq!(store.find_by_id(second.id).await.unwrap(), Some(second.clone()));
        assert_eq!(store.find_by_id(third.id).await.unwrap(), Some(third.clone()));

        let all = store
            .find(&SummaryQuery::new(None, None, None).unwrap())
            .await
            .unwrap();
        assert_eq!(all, vec![second, third]);
    }

    #[tokio::test]
    async fn test_zero_capacity_still_keeps_the_latest_summary() {
        let store = InMemorySummaryStore::new(0);
        store.insert(summary("a")).await.unwrap();
        let latest = store.insert(summary("b")).await.unwrap();

        let all = store
            .find(&SummaryQuery::new(None, None, None).unwrap())
            .await
            .unwrap();
        assert_eq!(all, vec![latest]);
    }
}
