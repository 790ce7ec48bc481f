use std::io;
use std::sync::{mpsc, Arc};
use std::thread;

use optibot_logging::{bot_debug, bot_info};

use crate::fetch::{EventSink, Fetcher};
use crate::loader::load_articles;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] io::Error),
    #[error("failed to spawn engine thread: {0}")]
    Thread(#[source] io::Error),
}

enum EngineCommand {
    Load { identifiers: Vec<String> },
}

/// Runs article loads on a background tokio runtime.
///
/// Events are delivered to the sink given at construction, from runtime
/// worker threads. Dropping the handle stops the runtime.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(fetcher: Arc<dyn Fetcher>, sink: Arc<dyn EventSink>) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("optibot-engine")
            .build()
            .map_err(EngineError::Runtime)?;
        let (cmd_tx, cmd_rx) = mpsc::channel();

        thread::Builder::new()
            .name("optibot-engine-cmd".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let fetcher = fetcher.clone();
                    let sink = sink.clone();
                    runtime.spawn(async move {
                        handle_command(fetcher.as_ref(), command, sink.as_ref()).await;
                    });
                }
                bot_debug!("Engine command channel closed");
            })
            .map_err(EngineError::Thread)?;

        Ok(Self { cmd_tx })
    }

    pub fn load(&self, identifiers: Vec<String>) {
        bot_info!("Loading {} articles", identifiers.len());
        let _ = self.cmd_tx.send(EngineCommand::Load { identifiers });
    }
}

async fn handle_command(fetcher: &dyn Fetcher, command: EngineCommand, sink: &dyn EventSink) {
    match command {
        EngineCommand::Load { identifiers } => {
            load_articles(fetcher, &identifiers, sink).await;
        }
    }
}
