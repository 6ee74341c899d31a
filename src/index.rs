use std::sync::Arc;

use crate::{
    months::MonthIndex,
    ordered::insert_sorted_desc,
    tags::TagRegistry,
    topic::Topic,
};

/// The three views over one topic collection.
///
/// * every topic, newest first, protected ones included
/// * each registered tag's public topics, newest first
/// * public topics grouped by month, newest month first
///
/// A `TopicIndex` is built by [`crate::ingestion::IngestionPipeline`] and is
/// read-only to everyone else.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicIndex {
    topics: Vec<Arc<Topic>>,
    tags: TagRegistry,
    months: MonthIndex,
}

impl TopicIndex {
    /// An empty index over the tags of `registry`.
    pub fn new(registry: TagRegistry) -> Self {
        Self {
            topics: Vec::new(),
            tags: registry,
            months: MonthIndex::default(),
        }
    }

    /// A copy with the tag and month views but an empty global list.
    pub(crate) fn without_topics(&self) -> Self {
        Self {
            topics: Vec::new(),
            tags: self.tags.clone(),
            months: self.months.clone(),
        }
    }

    /// Add a topic to every view it belongs in.
    pub fn insert(&mut self, topic: Topic) -> Arc<Topic> {
        let topic = Arc::new(topic);
        insert_sorted_desc(&mut self.topics, Arc::clone(&topic), |t| {
            &t.timestamp
        });
        if topic.is_public() {
            self.tags.insert(&topic);
            self.months.insert(&topic);
        }
        topic
    }

    /// All topics, newest first.
    pub fn topics(&self) -> &[Arc<Topic>] {
        &self.topics
    }

    pub fn public_topics(&self) -> impl Iterator<Item = &Arc<Topic>> {
        self.topics.iter().filter(|t| t.is_public())
    }

    pub fn tags(&self) -> &TagRegistry {
        &self.tags
    }

    pub fn months(&self) -> &MonthIndex {
        &self.months
    }

    /// First topic, in chronological order, with this identifier.
    pub fn find(&self, id: &str) -> Option<&Arc<Topic>> {
        self.topics.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;
    use proptest::prelude::*;

    use super::*;
    use crate::{ordered::is_sorted_desc, topic::Visibility};

    fn topic(id: &str, time: &str, visibility: Visibility) -> Topic {
        Topic {
            id: id.to_string(),
            title: id.to_string(),
            timestamp: NaiveDateTime::parse_from_str(time, "%Y/%m/%d %H:%M")
                .unwrap(),
            tags: vec!["go".to_string()],
            content: String::new(),
            visibility,
        }
    }

    fn ids(topics: &[Arc<Topic>]) -> Vec<&str> {
        topics.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn ties_and_out_of_order_arrivals() {
        let mut index = TopicIndex::new(TagRegistry::new(["go"]));
        index.insert(topic("file1", "2021/01/10 10:00", Visibility::Public));
        index.insert(topic("file2", "2020/05/01 09:00", Visibility::Public));
        index.insert(topic("file3", "2021/01/10 10:00", Visibility::Public));

        assert_eq!(ids(index.topics()), vec!["file1", "file3", "file2"]);
        assert_eq!(
            ids(index.tags().get("go").unwrap().topics()),
            vec!["file1", "file3", "file2"]
        );

        let months: Vec<_> =
            index.months().buckets().iter().map(|b| b.month.as_str()).collect();
        assert_eq!(months, vec!["2021-01", "2020-05"]);
        assert_eq!(
            ids(index.months().get("2021-01").unwrap().topics()),
            vec!["file1", "file3"]
        );
        assert_eq!(
            ids(index.months().get("2020-05").unwrap().topics()),
            vec!["file2"]
        );
    }

    #[test]
    fn protected_topics_only_reach_the_global_list() {
        let mut index = TopicIndex::new(TagRegistry::new(["go"]));
        index.insert(topic("open", "2021/01/10 10:00", Visibility::Public));
        index.insert(topic("hidden", "2021/02/10 10:00", Visibility::Protected));

        assert_eq!(ids(index.topics()), vec!["hidden", "open"]);
        assert_eq!(ids(index.tags().get("go").unwrap().topics()), vec!["open"]);
        assert!(index.months().get("2021-02").is_none());
        let public: Vec<_> = index.public_topics().map(|t| t.id.as_str()).collect();
        assert_eq!(public, vec!["open"]);
    }

    #[test]
    fn find_returns_first_match() {
        let mut index = TopicIndex::default();
        index.insert(topic("dup", "2020/01/01 00:00", Visibility::Public));
        index.insert(topic("dup", "2021/01/01 00:00", Visibility::Public));
        let found = index.find("dup").unwrap();
        assert_eq!(found.timestamp.format("%Y").to_string(), "2021");
        assert!(index.find("missing").is_none());
    }

    /// One generated arrival: month, day, hour, public, tag bitmask.
    type Arrival = (u32, u32, u32, bool, u8);

    fn arrival_topic(seq: usize, arrival: &Arrival) -> Topic {
        let (month, day, hour, public, mask) = *arrival;
        let visibility = if public {
            Visibility::Public
        } else {
            Visibility::Protected
        };
        let tags = [(1u8, "go"), (2u8, "rust")]
            .into_iter()
            .filter(|&(bit, _)| mask & bit != 0)
            .map(|(_, name)| name.to_string())
            .collect();
        Topic {
            tags,
            ..topic(
                &format!("t{seq}"),
                &format!("2021/{month:02}/{day:02} {hour:02}:00"),
                visibility,
            )
        }
    }

    fn ids_where<'a>(
        expected: &[&'a Topic],
        keep: impl Fn(&Topic) -> bool,
    ) -> Vec<&'a str> {
        expected
            .iter()
            .filter(|&&t| keep(t))
            .map(|&t| t.id.as_str())
            .collect()
    }

    proptest! {
        #[test]
        fn every_view_matches_a_stable_newest_first_sort(
            arrivals in prop::collection::vec(
                (1u32..=3, 1u32..=3, 0u32..2, any::<bool>(), 0u8..4),
                0..48,
            )
        ) {
            let topics: Vec<Topic> = arrivals
                .iter()
                .enumerate()
                .map(|(seq, a)| arrival_topic(seq, a))
                .collect();

            let mut index = TopicIndex::new(TagRegistry::new(["go", "rust"]));
            for topic in &topics {
                index.insert(topic.clone());
            }

            // Vec::sort_by is stable, so ties keep arrival order.
            let mut expected: Vec<&Topic> = topics.iter().collect();
            expected.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

            prop_assert_eq!(ids(index.topics()), ids_where(&expected, |_| true));
            prop_assert!(is_sorted_desc(index.topics(), |t| &t.timestamp));

            for tag in ["go", "rust"] {
                let listed = index.tags().get(tag).unwrap().topics();
                prop_assert_eq!(
                    ids(listed),
                    ids_where(&expected, |t| {
                        t.is_public() && t.tags.iter().any(|n| n == tag)
                    })
                );
            }

            let buckets = index.months().buckets();
            prop_assert!(is_sorted_desc(buckets, |b| b.month.as_str()));
            for pair in buckets.windows(2) {
                prop_assert!(pair[0].month != pair[1].month);
            }
            for bucket in buckets {
                prop_assert!(!bucket.topics().is_empty());
                prop_assert_eq!(
                    ids(bucket.topics()),
                    ids_where(&expected, |t| {
                        t.is_public() && t.month_key() == bucket.month
                    })
                );
            }

            let bucketed: usize = buckets.iter().map(|b| b.topics().len()).sum();
            prop_assert_eq!(bucketed, index.public_topics().count());
            prop_assert_eq!(
                index.public_topics().count(),
                topics.iter().filter(|t| t.is_public()).count()
            );
        }
    }
}
