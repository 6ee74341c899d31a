//! chronicler - index a folder of markdown topics by date, tag and month.
//!
//! Each topic file starts with a JSON header block, optionally fenced with
//! backticks and terminated by an empty line, followed by a markdown body:
//!
//! ````text
//! ```
//! {"URL": "hello-world", "Time": "2021/01/10 10:00", "Tag": "go,life"}
//! ```
//!
//! # Hello
//! ````
//!
//! Ingestion builds a [`TopicIndex`] with three views that stay sorted
//! newest-first no matter the order files are discovered in: every topic,
//! the public topics of each registered tag, and the public topics of each
//! calendar month.
//!
//! # Quick start
//!
//! ```no_run
//! use std::path::Path;
//!
//! use chronicler::{IngestionPipeline, TagRegistry};
//!
//! let mut pipeline = IngestionPipeline::new(TagRegistry::new(["go", "life"]));
//! pipeline.ingest_dir(Path::new("topics")).unwrap();
//!
//! for topic in pipeline.index().topics() {
//!     println!("{} {}", topic.timestamp, topic.title);
//! }
//! for month in pipeline.index().months().buckets() {
//!     println!("{}: {} topics", month.month, month.topics().len());
//! }
//! ```

pub mod config_db;
pub mod data_dir;
pub mod error;
pub mod header;
pub mod index;
pub mod ingestion;
pub mod months;
pub mod ordered;
pub mod render;
pub mod tags;
pub mod topic;
pub mod walker;

pub use config_db::ConfigDb;
pub use data_dir::{ContentRoot, DataDir};
pub use error::{Error, Result};
pub use index::TopicIndex;
pub use ingestion::{IngestionPipeline, RebuildPolicy};
pub use months::{MonthBucket, MonthIndex};
pub use render::{MarkdownRenderer, Renderer};
pub use tags::{TagRegistry, TagTopics};
pub use topic::{Topic, Visibility};
