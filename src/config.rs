// src/config.rs
use crate::constants::{LATEST_POST_COUNT, MAX_LOAD_CONCURRENCY};
use crate::error::AppError;
use crate::feed::FeedSettings;
use crate::types::{PageId, ValidationError};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

/// Upper bound accepted for `--concurrency`.
const MAX_CONCURRENCY_FLAG: usize = 32;

/// Parsed command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    #[command(subcommand)]
    pub command: CommandInput,

    /// Output file for the result (optional)
    #[arg(short, long, global = true)]
    pub output_file: Option<String>,

    /// Copy the result to the clipboard
    #[arg(short = 'b', long, global = true, default_value_t = false)]
    pub clipboard: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Directory of record-map files named `<page-id>.json`
    #[arg(short = 'd', long, global = true)]
    pub record_maps: Option<String>,

    /// Fetch record maps from Notion instead of a directory
    #[arg(long, global = true, default_value_t = false)]
    pub remote: bool,

    /// Disable response caching (always fetch fresh data)
    #[arg(long, global = true, default_value_t = false)]
    pub no_cache: bool,

    /// Cache TTL in seconds (default: 300 = 5 minutes)
    #[arg(long, global = true, default_value_t = 300)]
    pub cache_ttl: u64,

    /// Number of pages loaded concurrently (default: auto, max 32)
    #[arg(long, global = true)]
    pub concurrency: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum CommandInput {
    /// Print the flattened text of a page
    Text {
        /// Record-map JSON file, or a page id / Notion URL
        input: String,
        /// Page whose content to walk when the map holds several
        #[arg(long)]
        page_id: Option<String>,
    },
    /// Print the table of contents of a page
    Toc {
        /// Record-map JSON file, or a page id / Notion URL
        input: String,
        #[arg(long)]
        page_id: Option<String>,
    },
    /// Print block-graph statistics for a page
    Stats {
        /// Record-map JSON file, or a page id / Notion URL
        input: String,
        #[arg(long)]
        page_id: Option<String>,
    },
    /// Drop block entries without identity and print the cleaned map
    Sanitize {
        /// Record-map JSON file
        file: String,
    },
    /// Search posts by keyword in metadata and body
    Search {
        /// JSON array of post metadata
        posts: String,
        keyword: String,
    },
    /// Build search-index records for posts
    Index {
        /// JSON array of post metadata
        posts: String,
        /// Characters per chunk
        #[arg(long, default_value_t = crate::constants::INDEX_CHUNK_CHARS)]
        chunk_size: usize,
        /// One truncated record per searchable post instead of chunks
        #[arg(long, default_value_t = false)]
        whole: bool,
    },
    /// Group published posts by month
    Archive {
        /// JSON array of post metadata
        posts: String,
    },
    /// Build an RSS 2.0 feed of the latest posts
    Feed {
        /// JSON array of post metadata
        posts: String,
        /// Site root that post slugs are appended to
        #[arg(long)]
        link: String,
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Path under the site root for the channel link
        #[arg(long)]
        sub_path: Option<String>,
        #[arg(long)]
        language: Option<String>,
        #[arg(long)]
        author: Option<String>,
        /// Number of posts in the feed
        #[arg(long, default_value_t = LATEST_POST_COUNT)]
        count: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Where a single page's record map comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordMapInput {
    File(PathBuf),
    Page(PageId),
}

impl RecordMapInput {
    /// An existing file is read directly; anything else must be a page id.
    fn resolve(input: &str) -> Result<Self, AppError> {
        let path = Path::new(input);
        if path.is_file() {
            return Ok(RecordMapInput::File(path.to_path_buf()));
        }
        Ok(RecordMapInput::Page(PageId::parse(input)?))
    }
}

/// A single-page job: what to read and which page inside it to walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageJob {
    pub input: RecordMapInput,
    pub page_id: Option<PageId>,
}

impl PageJob {
    fn resolve(input: &str, page_id: Option<&str>) -> Result<Self, AppError> {
        Ok(Self {
            input: RecordMapInput::resolve(input)?,
            page_id: page_id.map(PageId::parse).transpose()?,
        })
    }

    /// Id of the page to walk: explicit, else the requested page, else the
    /// file stem (record-map files are usually named after their page).
    pub fn target_id(&self) -> String {
        if let Some(id) = &self.page_id {
            return id.to_hyphenated();
        }
        match &self.input {
            RecordMapInput::Page(id) => id.to_hyphenated(),
            RecordMapInput::File(path) => path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default(),
        }
    }
}

/// Validated command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Text(PageJob),
    Toc(PageJob),
    Stats(PageJob),
    Sanitize { file: PathBuf },
    Search { posts: PathBuf, keyword: String },
    Index { posts: PathBuf, chunk_size: usize, whole: bool },
    Archive { posts: PathBuf },
    Feed {
        posts: PathBuf,
        settings: FeedSettings,
        count: usize,
    },
}

/// How record maps for page ids are obtained.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceSettings {
    pub record_map_dir: Option<PathBuf>,
    pub remote: bool,
    pub token_v2: Option<String>,
    pub api_base: Option<String>,
    pub no_cache: bool,
    pub cache_ttl: u64,
}

impl SourceSettings {
    /// Whether page ids can be resolved at all.
    pub fn is_configured(&self) -> bool {
        self.remote || self.record_map_dir.is_some()
    }
}

/// Resolved pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub command: Command,
    pub output_file: Option<PathBuf>,
    pub clipboard: bool,
    pub format: OutputFormat,
    pub verbose: bool,
    pub source: SourceSettings,
    pub concurrency: usize,
}

impl PipelineConfig {
    /// Resolves a complete pipeline configuration from CLI input and environment.
    pub fn resolve(cli: CommandLineInput) -> Result<Self, AppError> {
        let command = match cli.command {
            CommandInput::Text { input, page_id } => {
                Command::Text(PageJob::resolve(&input, page_id.as_deref())?)
            }
            CommandInput::Toc { input, page_id } => {
                Command::Toc(PageJob::resolve(&input, page_id.as_deref())?)
            }
            CommandInput::Stats { input, page_id } => {
                Command::Stats(PageJob::resolve(&input, page_id.as_deref())?)
            }
            CommandInput::Sanitize { file } => Command::Sanitize {
                file: PathBuf::from(file),
            },
            CommandInput::Search { posts, keyword } => {
                let keyword = keyword.trim().to_string();
                if keyword.is_empty() {
                    return Err(ValidationError::EmptyField("keyword").into());
                }
                Command::Search {
                    posts: PathBuf::from(posts),
                    keyword,
                }
            }
            CommandInput::Index {
                posts,
                chunk_size,
                whole,
            } => {
                if chunk_size == 0 {
                    return Err(ValidationError::OutOfBounds {
                        value: 0,
                        min: 1,
                        max: usize::MAX,
                    }
                    .into());
                }
                Command::Index {
                    posts: PathBuf::from(posts),
                    chunk_size,
                    whole,
                }
            }
            CommandInput::Archive { posts } => Command::Archive {
                posts: PathBuf::from(posts),
            },
            CommandInput::Feed {
                posts,
                link,
                title,
                description,
                sub_path,
                language,
                author,
                count,
            } => {
                let link = link.trim().to_string();
                if link.is_empty() {
                    return Err(ValidationError::EmptyField("link").into());
                }
                if count == 0 {
                    return Err(ValidationError::OutOfBounds {
                        value: 0,
                        min: 1,
                        max: usize::MAX,
                    }
                    .into());
                }
                Command::Feed {
                    posts: PathBuf::from(posts),
                    settings: FeedSettings {
                        title,
                        description,
                        link,
                        sub_path,
                        language,
                        author,
                    },
                    count,
                }
            }
        };

        let source = SourceSettings {
            record_map_dir: cli.record_maps.map(PathBuf::from),
            remote: cli.remote,
            token_v2: non_empty_env("NOTION_TOKEN_V2"),
            api_base: non_empty_env("NOTION_API_BASE"),
            no_cache: cli.no_cache,
            cache_ttl: cli.cache_ttl,
        };

        if let Command::Text(job) | Command::Toc(job) | Command::Stats(job) = &command {
            if matches!(job.input, RecordMapInput::Page(_)) && !source.is_configured() {
                return Err(AppError::MissingConfiguration(
                    "a page id needs --record-maps <DIR> or --remote".to_string(),
                ));
            }
        }

        Ok(PipelineConfig {
            command,
            output_file: cli.output_file.map(PathBuf::from),
            clipboard: cli.clipboard,
            format: cli.format,
            verbose: cli.verbose,
            source,
            concurrency: resolve_concurrency(cli.concurrency)?,
        })
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn resolve_concurrency(requested: Option<usize>) -> Result<usize, ValidationError> {
    match requested {
        None => Ok(num_cpus::get().clamp(1, MAX_LOAD_CONCURRENCY)),
        Some(n) if (1..=MAX_CONCURRENCY_FLAG).contains(&n) => Ok(n),
        Some(n) => Err(ValidationError::OutOfBounds {
            value: n,
            min: 1,
            max: MAX_CONCURRENCY_FLAG,
        }),
    }
}
