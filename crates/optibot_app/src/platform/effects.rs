use std::sync::mpsc;
use std::sync::Arc;

use optibot_core::{Effect, Msg};
use optibot_engine::{
    ArticleSource, EngineError, EngineEvent, EngineHandle, EventSink, FetchSettings,
};
use optibot_logging::bot_info;

use super::app::AppEvent;

/// Executes core effects against the engine.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(
        source: ArticleSource,
        settings: FetchSettings,
        events: mpsc::Sender<AppEvent>,
    ) -> Result<Self, EngineError> {
        bot_info!("Article source: {}", source);
        let fetcher = source.into_fetcher(settings);
        let engine = EngineHandle::new(fetcher, Arc::new(MsgSink { tx: events }))?;
        Ok(Self { engine })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::LoadArticles { identifiers } => self.engine.load(identifiers),
            }
        }
    }
}

/// Forwards engine events to the main loop as core messages.
struct MsgSink {
    tx: mpsc::Sender<AppEvent>,
}

impl EventSink for MsgSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(AppEvent::Core(map_event(event)));
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::ArticleLoaded {
            identifier,
            content,
        } => Msg::ArticleLoaded {
            identifier,
            content,
        },
        EngineEvent::ArticleFailed { identifier, .. } => Msg::ArticleFailed { identifier },
        EngineEvent::LoadSettled(_) => Msg::LoadSettled,
    }
}
