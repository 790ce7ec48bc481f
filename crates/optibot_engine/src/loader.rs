use futures_util::future::join_all;
use optibot_logging::{bot_info, bot_warn};

use crate::fetch::{EventSink, Fetcher};
use crate::{EngineEvent, LoadReport};

/// Fetch every identifier concurrently and report each outcome as it lands.
///
/// A failed article is logged and skipped; it never aborts its siblings. The
/// returned future resolves once every attempt has settled, after
/// [`EngineEvent::LoadSettled`] has been emitted.
pub async fn load_articles(
    fetcher: &dyn Fetcher,
    identifiers: &[String],
    sink: &dyn EventSink,
) -> LoadReport {
    let attempts = identifiers.iter().map(|identifier| async move {
        match fetcher.fetch(identifier).await {
            Ok(content) => {
                sink.emit(EngineEvent::ArticleLoaded {
                    identifier: identifier.clone(),
                    content,
                });
                Ok(identifier.clone())
            }
            Err(error) => {
                bot_warn!("Load error: {} ({})", identifier, error);
                sink.emit(EngineEvent::ArticleFailed {
                    identifier: identifier.clone(),
                    error,
                });
                Err(identifier.clone())
            }
        }
    });

    let mut report = LoadReport::default();
    for outcome in join_all(attempts).await {
        match outcome {
            Ok(identifier) => report.loaded.push(identifier),
            Err(identifier) => report.failed.push(identifier),
        }
    }

    bot_info!(
        "Loaded {} articles ({} failed)",
        report.loaded.len(),
        report.failed.len()
    );
    sink.emit(EngineEvent::LoadSettled(report.clone()));
    report
}
