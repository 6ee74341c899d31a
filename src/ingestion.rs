use std::{collections::HashSet, path::Path};

use serde::Serialize;

use crate::{
    error::{Error, Result},
    header,
    index::TopicIndex,
    render::{MarkdownRenderer, Renderer},
    tags::TagRegistry,
    topic::{Topic, build_topic},
    walker,
};

/// What a rebuild keeps from the previously published index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RebuildPolicy {
    /// Every view starts empty.
    #[default]
    Fresh,
    /// Only the chronological list starts empty; tag and month views keep
    /// the topics of earlier runs and accumulate.
    KeepViews,
}

/// Counters for one ingestion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    /// Paths skipped for not being markdown.
    pub skipped: usize,
    pub topics: usize,
    pub public: usize,
    pub protected: usize,
    /// Topics whose identifier was already used earlier in the run.
    pub duplicate_ids: usize,
}

/// Reads topic files and publishes a [`TopicIndex`] over them.
///
/// A run processes one file completely before starting the next and stops
/// at the first failure. The new index is only published once every file
/// has been ingested, so a failed run leaves the previous index in place.
#[derive(Debug)]
pub struct IngestionPipeline<R = MarkdownRenderer> {
    renderer: R,
    policy: RebuildPolicy,
    index: TopicIndex,
}

impl IngestionPipeline<MarkdownRenderer> {
    pub fn new(registry: TagRegistry) -> Self {
        Self::with_renderer(registry, MarkdownRenderer)
    }
}

impl<R: Renderer> IngestionPipeline<R> {
    pub fn with_renderer(registry: TagRegistry, renderer: R) -> Self {
        Self {
            renderer,
            policy: RebuildPolicy::default(),
            index: TopicIndex::new(registry.cleared()),
        }
    }

    pub fn with_policy(mut self, policy: RebuildPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The last successfully built index.
    pub fn index(&self) -> &TopicIndex {
        &self.index
    }

    pub fn into_index(self) -> TopicIndex {
        self.index
    }

    /// Walk `root` and ingest every markdown file below it.
    pub fn ingest_dir(&mut self, root: &Path) -> Result<IngestStats> {
        let files = walker::discover_files(root)?;
        tracing::debug!(
            root = %root.display(),
            files = files.len(),
            "discovered topic files"
        );
        self.ingest(files.iter().map(|file| &file.absolute_path))
    }

    /// Rebuild the index from `paths`, in whatever order they come.
    pub fn ingest<I, P>(&mut self, paths: I) -> Result<IngestStats>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut next = self.empty_index();
        let mut stats = IngestStats::default();
        let mut seen_ids = HashSet::new();

        for path in paths {
            let path = path.as_ref();
            if !walker::is_supported(path) {
                tracing::trace!(path = %path.display(), "skipping non-markdown file");
                stats.skipped += 1;
                continue;
            }

            let topic = self.load_topic(path, next.tags())?;
            tracing::debug!(
                path = %path.display(),
                id = %topic.id,
                tags = topic.tags.len(),
                public = topic.is_public(),
                "ingested topic"
            );

            if !seen_ids.insert(topic.id.clone()) {
                tracing::warn!(
                    path = %path.display(),
                    id = %topic.id,
                    "duplicate topic identifier"
                );
                stats.duplicate_ids += 1;
            }
            if topic.is_public() {
                stats.public += 1;
            } else {
                stats.protected += 1;
            }
            stats.topics += 1;

            next.insert(topic);
        }

        tracing::info!(
            topics = stats.topics,
            public = stats.public,
            protected = stats.protected,
            months = next.months().len(),
            "topic index rebuilt"
        );
        self.index = next;
        Ok(stats)
    }

    fn empty_index(&self) -> TopicIndex {
        match self.policy {
            RebuildPolicy::Fresh => TopicIndex::new(self.index.tags().cleared()),
            RebuildPolicy::KeepViews => self.index.without_topics(),
        }
    }

    fn load_topic(&self, path: &Path, registry: &TagRegistry) -> Result<Topic> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::file_access(path, e))?;
        let (header, body) =
            header::parse(&raw).map_err(|e| Error::header(path, e))?;

        build_topic(title_of(path), header, body, registry, &self.renderer)
            .map_err(|source| Error::Rendering {
                path: path.to_path_buf(),
                source,
            })
    }
}

/// File name without its extension.
fn title_of(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

impl Default for IngestionPipeline<MarkdownRenderer> {
    fn default() -> Self {
        Self::new(TagRegistry::default())
    }
}
