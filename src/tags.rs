use std::sync::Arc;

use crate::{ordered::insert_sorted_desc, topic::Topic};

/// A registered tag and the public topics carrying it, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagTopics {
    pub id: String,
    topics: Vec<Arc<Topic>>,
}

impl TagTopics {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            topics: Vec::new(),
        }
    }

    pub fn topics(&self) -> &[Arc<Topic>] {
        &self.topics
    }

    fn insert(&mut self, topic: Arc<Topic>) {
        insert_sorted_desc(&mut self.topics, topic, |t| &t.timestamp);
    }
}

/// The ordered set of known tags.
///
/// Tags are registered up front; ingestion only adds topics to them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagRegistry {
    tags: Vec<TagTopics>,
}

impl TagRegistry {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: ids.into_iter().map(TagTopics::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TagTopics> {
        self.tags.iter()
    }

    /// First registered tag with exactly this id.
    pub fn get(&self, id: &str) -> Option<&TagTopics> {
        self.tags.iter().find(|tag| tag.id == id)
    }

    /// Map header tag names onto registered tag ids.
    ///
    /// Names are matched exactly; unknown names are skipped and a name
    /// given more than once is only kept the first time.
    pub fn resolve<'a>(
        &self,
        names: impl IntoIterator<Item = &'a str>,
    ) -> Vec<String> {
        let mut resolved: Vec<String> = Vec::new();
        for name in names {
            let Some(tag) = self.get(name) else {
                continue;
            };
            if !resolved.contains(&tag.id) {
                resolved.push(tag.id.clone());
            }
        }
        resolved
    }

    /// Same tags, no topics.
    pub fn cleared(&self) -> Self {
        Self::new(self.tags.iter().map(|tag| tag.id.clone()))
    }

    /// File `topic` under every tag it carries.
    pub(crate) fn insert(&mut self, topic: &Arc<Topic>) {
        for id in &topic.tags {
            if let Some(tag) = self.tags.iter_mut().find(|tag| &tag.id == id) {
                tag.insert(Arc::clone(topic));
            }
        }
    }
}
