use std::sync::Arc;

use crate::{ordered::insert_sorted_desc, topic::Topic};

/// The public topics of one calendar month, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthBucket {
    /// `YYYY-MM`
    pub month: String,
    topics: Vec<Arc<Topic>>,
}

impl MonthBucket {
    fn new(month: String) -> Self {
        Self {
            month,
            topics: Vec::new(),
        }
    }

    pub fn topics(&self) -> &[Arc<Topic>] {
        &self.topics
    }
}

/// Month buckets ordered from the most recent month back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonthIndex {
    buckets: Vec<MonthBucket>,
}

impl MonthIndex {
    pub fn buckets(&self) -> &[MonthBucket] {
        &self.buckets
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn get(&self, month: &str) -> Option<&MonthBucket> {
        self.find(month).ok().map(|pos| &self.buckets[pos])
    }

    /// File `topic` under its month, creating the bucket on first use.
    pub(crate) fn insert(&mut self, topic: &Arc<Topic>) {
        let month = topic.month_key();
        let pos = match self.find(&month) {
            Ok(pos) => pos,
            Err(_) => insert_sorted_desc(
                &mut self.buckets,
                MonthBucket::new(month),
                |bucket| bucket.month.as_str(),
            ),
        };
        insert_sorted_desc(
            &mut self.buckets[pos].topics,
            Arc::clone(topic),
            |t| &t.timestamp,
        );
    }

    // Buckets are sorted descending, so compare with the operands swapped.
    fn find(&self, month: &str) -> Result<usize, usize> {
        self.buckets
            .binary_search_by(|bucket| month.cmp(bucket.month.as_str()))
    }
}
