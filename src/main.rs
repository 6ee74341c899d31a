use std::sync::Arc;

use chronicler::{
    ConfigDb,
    DataDir,
    IngestionPipeline,
    Topic,
    TopicIndex,
    data_dir::ContentRoot,
    error::{self, Error},
    ingestion::IngestStats,
};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{Cli, Command, ConfigAction, SourceArgs, TagAction};

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if let Ok(env) = std::env::var("CHRONICLER_LOG") {
        EnvFilter::new(env)
    } else if quiet {
        EnvFilter::new("warn")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() -> error::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let data_dir = DataDir::resolve(cli.data_dir.as_deref())?;
    let config_db = ConfigDb::open(&data_dir.config_db())?;

    match cli.command {
        Command::Tag { action } => match action {
            TagAction::Add { name } => tag_add(&config_db, &name)?,
            TagAction::Remove { name } => tag_remove(&config_db, &name)?,
            TagAction::List { json } => tag_list(&config_db, json)?,
        },
        Command::Config { action } => match action {
            ConfigAction::SetRoot { path } => config_set_root(&config_db, &path)?,
            ConfigAction::Show { json } => {
                config_show(&config_db, &data_dir, json)?
            }
        },
        Command::Build(args) => {
            let (index, stats) = load_index(&config_db, &args.source)?;
            if args.json {
                print_json(&stats)?;
            } else {
                print_stats(&index, &stats);
            }
        }
        Command::List(args) => {
            let (index, _) = load_index(&config_db, &args.source)?;
            let mut topics = select_topics(&index, &args)?;
            topics.truncate(args.count.unwrap_or(topics.len()));
            if args.json {
                let summaries: Vec<_> =
                    topics.iter().map(|t| TopicSummary::from(&***t)).collect();
                print_json(&summaries)?;
            } else if topics.is_empty() {
                println!("No topics.");
            } else {
                for topic in &topics {
                    print_topic_line(topic);
                }
            }
        }
        Command::Months(args) => {
            let (index, _) = load_index(&config_db, &args.source)?;
            let months: Vec<_> = index
                .months()
                .buckets()
                .iter()
                .map(|b| MonthSummary {
                    month: &b.month,
                    topics: b.topics().len(),
                })
                .collect();
            if args.json {
                print_json(&months)?;
            } else if months.is_empty() {
                println!("No public topics.");
            } else {
                for m in &months {
                    println!("{}\t{}", m.month, m.topics);
                }
            }
        }
        Command::Show(args) => {
            let (index, _) = load_index(&config_db, &args.source)?;
            let topic = index.find(&args.id).ok_or_else(|| Error::NotFound {
                kind: "topic",
                name: args.id.clone(),
            })?;
            if args.json {
                print_json(&**topic)?;
            } else {
                print_topic_line(topic);
                println!();
                print!("{}", topic.content);
            }
        }
        Command::Completions(args) => args.generate(),
    }

    Ok(())
}

#[derive(Serialize)]
struct TopicSummary<'a> {
    id: &'a str,
    title: &'a str,
    timestamp: String,
    tags: &'a [String],
    visibility: chronicler::Visibility,
}

impl<'a> From<&'a Topic> for TopicSummary<'a> {
    fn from(topic: &'a Topic) -> Self {
        Self {
            id: &topic.id,
            title: &topic.title,
            timestamp: topic
                .timestamp
                .format(chronicler::header::TIME_FORMAT)
                .to_string(),
            tags: &topic.tags,
            visibility: topic.visibility,
        }
    }
}

#[derive(Serialize)]
struct MonthSummary<'a> {
    month: &'a str,
    topics: usize,
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> error::Result<()> {
    let out = serde_json::to_string_pretty(value)
        .map_err(|e| Error::Config(format!("cannot encode output: {e}")))?;
    println!("{out}");
    Ok(())
}

fn print_topic_line(topic: &Topic) {
    let marker = if topic.is_public() { "" } else { " (protected)" };
    println!(
        "{}\t{}\t{}\t[{}]{marker}",
        topic.timestamp.format(chronicler::header::TIME_FORMAT),
        topic.id,
        topic.title,
        topic.tags.join(","),
    );
}

fn print_stats(index: &TopicIndex, stats: &IngestStats) {
    println!(
        "Indexed {} topics ({} public, {} protected)",
        stats.topics, stats.public, stats.protected
    );
    if stats.duplicate_ids > 0 {
        println!("Duplicate identifiers: {}", stats.duplicate_ids);
    }
    if stats.skipped > 0 {
        println!("Skipped files: {}", stats.skipped);
    }
    println!("Months: {}", index.months().len());
    for tag in index.tags().iter() {
        println!("  {}: {}", tag.id, tag.topics().len());
    }
}

/// Resolve the content root and run one full ingestion over it.
fn load_index(
    config_db: &ConfigDb,
    source: &SourceArgs,
) -> error::Result<(TopicIndex, IngestStats)> {
    let root = ContentRoot::resolve(source.root.as_deref(), config_db)?;
    tracing::debug!(
        root = %root.path.display(),
        origin = ?root.origin,
        "content root"
    );

    let mut pipeline = IngestionPipeline::new(config_db.tag_registry()?);
    let stats = pipeline.ingest_dir(&root.path)?;
    Ok((pipeline.into_index(), stats))
}

fn select_topics<'a>(
    index: &'a TopicIndex,
    args: &cli::ListArgs,
) -> error::Result<Vec<&'a Arc<Topic>>> {
    if let Some(tag) = &args.tag {
        let tag = index.tags().get(tag).ok_or_else(|| Error::NotFound {
            kind: "tag",
            name: tag.clone(),
        })?;
        return Ok(tag.topics().iter().collect());
    }
    if let Some(month) = &args.month {
        return Ok(index
            .months()
            .get(month)
            .map(|bucket| bucket.topics().iter().collect())
            .unwrap_or_default());
    }
    if args.public {
        return Ok(index.public_topics().collect());
    }
    Ok(index.topics().iter().collect())
}

fn tag_add(config_db: &ConfigDb, name: &str) -> error::Result<()> {
    if config_db.add_tag(name)? {
        println!("Added tag '{name}'");
    } else {
        println!("Tag '{name}' is already registered");
    }
    Ok(())
}

fn tag_remove(config_db: &ConfigDb, name: &str) -> error::Result<()> {
    if !config_db.remove_tag(name)? {
        return Err(Error::NotFound {
            kind: "tag",
            name: name.to_string(),
        });
    }
    println!("Removed tag '{name}'");
    Ok(())
}

fn tag_list(config_db: &ConfigDb, json: bool) -> error::Result<()> {
    let tags = config_db.list_tags()?;
    if json {
        print_json(&tags)?;
    } else if tags.is_empty() {
        println!("No tags registered.");
    } else {
        for tag in &tags {
            println!("{tag}");
        }
    }
    Ok(())
}

fn config_set_root(
    config_db: &ConfigDb,
    path: &std::path::Path,
) -> error::Result<()> {
    let root = ContentRoot::store(config_db, path)?;
    println!("Content root set to {}", root.path.display());
    Ok(())
}

fn config_show(
    config_db: &ConfigDb,
    data_dir: &DataDir,
    json: bool,
) -> error::Result<()> {
    let root = ContentRoot::stored(config_db)?;
    let tags = config_db.list_tags()?;

    if json {
        print_json(&serde_json::json!({
            "data_dir": data_dir.root().display().to_string(),
            "data_dir_origin": data_dir.origin(),
            "content_root": root.map(|r| r.path.display().to_string()),
            "tags": tags,
        }))?;
    } else {
        println!(
            "Data directory: {} (from {:?})",
            data_dir.root().display(),
            data_dir.origin()
        );
        match root {
            Some(root) => println!("Content root: {}", root.path.display()),
            None => println!("Content root: (not set)"),
        }
        println!("Tags: {}", tags.join(", "));
    }
    Ok(())
}
