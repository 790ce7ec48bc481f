//! OptiBot engine: article fetching, decoding, the background load runner and help center ingest.
mod article_file;
mod convert;
mod decode;
mod directory;
mod engine;
mod fetch;
mod help_center;
mod ingest;
mod loader;
mod persist;
mod slug;
mod types;

pub use article_file::{article_title, build_article_document, content_hash, ArticleMeta};
pub use convert::{clean_article_html, Converter, Html2MdConverter};
pub use decode::{decode_text, DecodeError, DecodedText};
pub use directory::DirectoryFetcher;
pub use engine::{EngineError, EngineHandle};
pub use fetch::{
    ChannelEventSink, EventSink, FetchSettings, Fetcher, ReqwestFetcher, DEFAULT_EXTENSION,
};
pub use help_center::{ArticlePage, HelpCenterArticle, HelpCenterClient};
pub use ingest::{
    ingest_articles, run_ingest, ArticleChange, IngestError, IngestReport, IngestSettings,
    DEFAULT_USER_AGENT,
};
pub use loader::load_articles;
pub use persist::{ensure_output_dir, ArticleStore, PersistError};
pub use slug::slugify;
pub use types::{ArticleSource, EngineEvent, FailureKind, FetchError, LoadReport};
