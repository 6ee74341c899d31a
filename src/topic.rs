use chrono::NaiveDateTime;
use serde::Serialize;

use crate::{
    header::TopicHeader,
    render::{RenderError, Renderer},
    tags::TagRegistry,
};

/// Format of a [`Topic::month_key`].
pub const MONTH_FORMAT: &str = "%Y-%m";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    /// Listed chronologically but kept out of tag and month views.
    Protected,
}

/// One ingested document. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Topic {
    pub id: String,
    pub title: String,
    pub timestamp: NaiveDateTime,
    /// Registered tags this topic carries, in header order.
    pub tags: Vec<String>,
    /// Rendered HTML body.
    pub content: String,
    pub visibility: Visibility,
}

impl Topic {
    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    /// Calendar month of the topic, e.g. `2021-01`.
    pub fn month_key(&self) -> String {
        self.timestamp.format(MONTH_FORMAT).to_string()
    }
}

/// Assemble a [`Topic`] from a parsed header and its raw body.
///
/// Tag names that are not in `registry` are dropped. The body goes through
/// `renderer`; nothing is inserted into any index here.
pub fn build_topic<R>(
    title: String,
    header: TopicHeader,
    body: &str,
    registry: &TagRegistry,
    renderer: &R,
) -> Result<Topic, RenderError>
where
    R: Renderer + ?Sized,
{
    let tags = registry.resolve(header.tag_names());
    let content = renderer.render(body)?;

    Ok(Topic {
        id: header.id,
        title,
        timestamp: header.timestamp,
        tags,
        content,
        visibility: header.visibility,
    })
}
