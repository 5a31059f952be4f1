// src/main.rs
use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use notion_content::{
    archive_posts, build_source, build_toc, chunked_records, deliver, ensure_delivered,
    extract_text, feed_items, is_searchable, latest_posts, load_post_contents, load_record_map,
    measure_record_map, post_record, read_posts, render_archive, render_rss, render_search_hits,
    render_toc_outline, sanitize_report, search_posts, AppError, Command, CommandLineInput, ContentSource,
    DeliveryTarget, OutputFormat, OutputPlan, OutputReport, PageJob, PageRef, PipelineConfig,
    Post, RecordMap, RecordMapSource, ResultComposer, ResultDelivery,
};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Sets up logging configuration.
///
/// Console output goes to stderr so results can be piped from stdout.
fn setup_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let log_file_path = std::env::temp_dir().join("notion_content.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    let stderr_appender = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("stderr")
                .appender("file")
                .build(log_level),
        )?;

    log4rs::init_config(config)?;
    log::info!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

/// Runs the configured command: load, compose, deliver.
async fn execute_pipeline(config: &PipelineConfig) -> Result<(), AppError> {
    let source = build_source(&config.source).await?;
    let pipeline = ContentPipeline {
        config,
        source: source.as_deref(),
    };

    let rendered = pipeline.compose().await?;
    let report = pipeline.deliver(rendered)?;
    pipeline.report_completion(&report);
    Ok(())
}

/// Orchestrates one run of the command-line tool.
struct ContentPipeline<'a> {
    config: &'a PipelineConfig,
    source: Option<&'a dyn RecordMapSource>,
}

impl ContentPipeline<'_> {
    fn wants_json(&self) -> bool {
        self.config.format == OutputFormat::Json
    }

    fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, AppError> {
        Ok(serde_json::to_string_pretty(value)?)
    }

    /// Loads the page of `job` and logs what it contains in verbose mode.
    async fn load_page(&self, job: &PageJob) -> Result<(PageRef, RecordMap), AppError> {
        let record_map = self.record_map(job).await?;
        let page = PageRef::new(job.target_id());
        if self.config.verbose {
            let stats = measure_record_map(&page, &record_map);
            log::info!(
                "Page {}: {} entries, {} valid, {} reachable, {} dangling, depth {}",
                page.id,
                stats.total_entries,
                stats.valid_blocks,
                stats.reachable_blocks,
                stats.dangling_references,
                stats.deepest_nesting
            );
        }
        Ok((page, record_map))
    }

    /// Reads posts and, when a source is configured, fills in missing bodies.
    async fn load_posts_with_bodies(
        &self,
        path: &Path,
        keep: impl Fn(&Post) -> bool,
    ) -> Result<Vec<Post>, AppError> {
        let posts: Vec<Post> = self.posts(path).await?.into_iter().filter(keep).collect();
        match self.source {
            Some(source) => Ok(load_post_contents(source, posts, self.config.concurrency).await),
            None => {
                log::debug!("No record-map source; using post bodies as given");
                Ok(posts)
            }
        }
    }

    async fn compose_sanitize(&self, file: &Path) -> Result<String, AppError> {
        let json = tokio::fs::read_to_string(file).await?;
        let record_map =
            RecordMap::from_json_str(&json).map_err(|source| AppError::JsonParseError {
                path: file.to_path_buf(),
                source,
            })?;
        let report = sanitize_report(&record_map);
        if !report.dropped.is_empty() {
            eprintln!(
                "Dropped {} block entries without identity: {}",
                report.dropped.len(),
                report.dropped.join(", ")
            );
        }
        Self::to_json(&report.record_map)
    }

    /// Reports completion to the user on stderr.
    fn report_completion(&self, report: &OutputReport) {
        for completed in &report.completed {
            match &completed.operation {
                DeliveryTarget::WriteFile { path, .. } => {
                    eprintln!("✓ Saved to {}", path.display());
                }
                DeliveryTarget::CopyToClipboard { .. } => {
                    eprintln!("✓ Copied to clipboard");
                }
                DeliveryTarget::PrintToStdout { .. } => {}
            }
        }
    }
}

#[async_trait::async_trait]
impl ContentSource for ContentPipeline<'_> {
    async fn record_map(&self, job: &PageJob) -> Result<RecordMap, AppError> {
        load_record_map(job, self.source).await
    }

    async fn posts(&self, path: &Path) -> Result<Vec<Post>, AppError> {
        read_posts(path).await
    }
}

#[async_trait::async_trait]
impl ResultComposer for ContentPipeline<'_> {
    async fn compose(&self) -> Result<String, AppError> {
        match &self.config.command {
            Command::Text(job) => {
                let (page, record_map) = self.load_page(job).await?;
                let text = extract_text(&page, &record_map);
                if self.wants_json() {
                    Self::to_json(&serde_json::json!({ "id": page.id, "text": text }))
                } else {
                    Ok(text)
                }
            }
            Command::Toc(job) => {
                let (page, record_map) = self.load_page(job).await?;
                let toc = build_toc(&page, &record_map);
                if self.wants_json() {
                    Self::to_json(&toc)
                } else {
                    render_toc_outline(&toc)
                }
            }
            Command::Stats(job) => {
                let (page, record_map) = self.load_page(job).await?;
                Self::to_json(&measure_record_map(&page, &record_map))
            }
            Command::Sanitize { file } => self.compose_sanitize(file).await,
            Command::Search { posts, keyword } => {
                let candidates = self
                    .load_posts_with_bodies(posts, |post| {
                        post.is_published()
                            && (post.is_type("Post") || post.is_type("Page"))
                            && post.has_slug()
                    })
                    .await?;
                let hits = search_posts(&candidates, keyword);
                log::info!("{} of {} posts match '{}'", hits.len(), candidates.len(), keyword);
                if self.wants_json() {
                    Self::to_json(&hits)
                } else {
                    render_search_hits(&hits)
                }
            }
            Command::Index {
                posts,
                chunk_size,
                whole,
            } => {
                let indexed_at = chrono::Utc::now();
                if *whole {
                    let posts = self.load_posts_with_bodies(posts, is_searchable).await?;
                    let records: Vec<_> = posts
                        .iter()
                        .map(|post| post_record(post, indexed_at))
                        .collect();
                    Self::to_json(&records)
                } else {
                    let posts = self
                        .load_posts_with_bodies(posts, |post| {
                            post.has_slug() && post.is_published()
                        })
                        .await?;
                    Self::to_json(&chunked_records(&posts, *chunk_size, indexed_at))
                }
            }
            Command::Archive { posts } => {
                let posts = self.posts(posts).await?;
                let groups = archive_posts(&posts);
                if self.wants_json() {
                    Self::to_json(&groups)
                } else {
                    render_archive(&groups)
                }
            }
            Command::Feed {
                posts,
                settings,
                count,
            } => {
                let latest = latest_posts(&self.posts(posts).await?, *count);
                let latest = match self.source {
                    Some(source) => {
                        load_post_contents(source, latest, self.config.concurrency).await
                    }
                    None => latest,
                };
                let items = feed_items(&latest, &settings.link);
                if self.wants_json() {
                    Self::to_json(&items)
                } else {
                    render_rss(settings, &items, chrono::Utc::now())
                }
            }
        }
    }
}

impl ResultDelivery for ContentPipeline<'_> {
    fn deliver(&self, rendered: String) -> Result<OutputReport, AppError> {
        let mut plan = OutputPlan::new();
        if let Some(path) = &self.config.output_file {
            plan = plan.with_operation(DeliveryTarget::WriteFile {
                path: path.clone(),
                content: rendered.clone(),
            });
        }
        if self.config.clipboard {
            plan = plan.with_operation(DeliveryTarget::CopyToClipboard {
                content: rendered.clone(),
            });
        }
        if plan.is_empty() {
            plan = plan.with_operation(DeliveryTarget::PrintToStdout { content: rendered });
        }
        ensure_delivered(deliver(plan))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose)?;

    let config = PipelineConfig::resolve(cli)?;

    execute_pipeline(&config).await?;

    Ok(())
}
