use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;

use chrono::Local;
use clap::Parser;
use optibot_core::{update, ChatState, LoadPhase, Msg};
use optibot_logging::{bot_debug, bot_info, bot_warn};

use super::cli::{Cli, Command};
use super::config::{self, AppConfig};
use super::effects::EffectRunner;
use super::ingest;
use super::logging;
use super::ui::render::TranscriptRenderer;

const QUIT_COMMAND: &str = "/quit";

/// Everything the main loop reacts to.
pub enum AppEvent {
    Core(Msg),
    /// One line typed by the user.
    Input(String),
    /// `/quit` or end of input.
    Quit,
}

pub fn run_app() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::initialize(cli.log);

    let config = config::load(cli.config.as_deref())?.with_articles_dir(cli.articles_dir);

    match cli.command {
        Some(Command::Ingest(args)) => ingest::run(config.ingest, &args),
        None => run_chat(config),
    }
}

fn run_chat(config: AppConfig) -> anyhow::Result<()> {
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    let runner = EffectRunner::new(config.source, config.fetch, event_tx.clone())?;
    spawn_input_reader(event_tx);

    let renderer = TranscriptRenderer::new(Box::new(|| Local::now().format("%H:%M:%S").to_string()));
    let mut session = Session::new(ChatState::new(config.chat), runner, renderer);

    let mut stdout = io::stdout();
    session.dispatch(Msg::SessionStarted, &mut stdout)?;

    while let Ok(event) = event_rx.recv() {
        match event {
            AppEvent::Core(msg) => session.dispatch(msg, &mut stdout)?,
            AppEvent::Input(line) => session.pending_input.push_back(line),
            AppEvent::Quit => session.quit_requested = true,
        }
        session.drain_pending_input(&mut stdout)?;
        if session.finished() {
            break;
        }
    }

    bot_info!(
        "Session ended after {} messages",
        session.state.transcript().len()
    );
    Ok(())
}

/// Owns the chat state for one run of the app.
struct Session {
    state: ChatState,
    runner: EffectRunner,
    renderer: TranscriptRenderer,
    /// Lines typed before the articles finished loading; replayed once ready.
    pending_input: VecDeque<String>,
    quit_requested: bool,
}

impl Session {
    fn new(state: ChatState, runner: EffectRunner, renderer: TranscriptRenderer) -> Self {
        Self {
            state,
            runner,
            renderer,
            pending_input: VecDeque::new(),
            quit_requested: false,
        }
    }

    fn dispatch(&mut self, msg: Msg, out: &mut dyn Write) -> io::Result<()> {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.enqueue(effects);

        if self.state.consume_dirty() {
            self.renderer.render(&self.state.view(), out)?;
        }
        Ok(())
    }

    fn drain_pending_input(&mut self, out: &mut dyn Write) -> io::Result<()> {
        if self.state.phase() != LoadPhase::Ready {
            return Ok(());
        }
        while let Some(line) = self.pending_input.pop_front() {
            bot_debug!("Submitting input ({} chars)", line.chars().count());
            self.dispatch(Msg::InputChanged(line), out)?;
            self.dispatch(Msg::MessageSubmitted, out)?;
        }
        Ok(())
    }

    fn finished(&self) -> bool {
        self.quit_requested
            && self.pending_input.is_empty()
            && self.state.phase() == LoadPhase::Ready
    }
}

fn spawn_input_reader(tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) if line.trim() == QUIT_COMMAND => break,
                Ok(line) => {
                    if tx.send(AppEvent::Input(line)).is_err() {
                        return;
                    }
                }
                Err(err) => {
                    bot_warn!("Failed to read input: {}", err);
                    break;
                }
            }
        }
        let _ = tx.send(AppEvent::Quit);
    });
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::mpsc;
    use std::time::Duration;

    use optibot_core::{Author, ChatMessage, ChatSettings, ChatState, LoadPhase, Msg};
    use optibot_engine::{ArticleSource, FetchSettings};
    use tempfile::TempDir;

    use super::{AppEvent, EffectRunner, Session, TranscriptRenderer};

    fn start_session(dir: &TempDir, articles: &[&str]) -> (Session, mpsc::Receiver<AppEvent>) {
        let (tx, rx) = mpsc::channel();
        let runner = EffectRunner::new(
            ArticleSource::Directory {
                root: dir.path().to_path_buf(),
            },
            FetchSettings::default(),
            tx,
        )
        .unwrap();
        let settings = ChatSettings {
            articles: articles.iter().map(|s| s.to_string()).collect(),
            greeting: "Ready.".to_string(),
            ..ChatSettings::default()
        };
        let renderer = TranscriptRenderer::new(Box::new(|| "00:00:00".to_string()));
        (Session::new(ChatState::new(settings), runner, renderer), rx)
    }

    fn wait_until_ready(session: &mut Session, rx: &mpsc::Receiver<AppEvent>, out: &mut Vec<u8>) {
        session.dispatch(Msg::SessionStarted, out).unwrap();
        while session.state.phase() != LoadPhase::Ready {
            match rx.recv_timeout(Duration::from_secs(5)) {
                Ok(AppEvent::Core(msg)) => session.dispatch(msg, out).unwrap(),
                Ok(_) => {}
                Err(err) => panic!("load never settled: {err}"),
            }
        }
    }

    #[test]
    fn missing_article_still_greets_and_other_is_searchable() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("youtube.md"),
            "# How to add a YouTube video\n\nArticle URL: https://example.com/yt\n\nHow do I add a YouTube video? Paste the link.",
        )
        .unwrap();
        fs::write(dir.path().join("playlists.md"), "# Playlists\n\nAssign assets.").unwrap();

        let (mut session, rx) = start_session(&dir, &["youtube", "missing", "playlists"]);
        let mut out = Vec::new();
        wait_until_ready(&mut session, &rx, &mut out);

        assert_eq!(session.state.knowledge().len(), 2);
        assert_eq!(
            session.state.transcript().messages(),
            &[ChatMessage::bot("Ready.")]
        );

        session
            .pending_input
            .push_back("How do I add a YouTube video?".to_string());
        session.pending_input.push_back("   ".to_string());
        session.drain_pending_input(&mut out).unwrap();

        let messages = session.state.transcript().messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1], ChatMessage::user("How do I add a YouTube video?"));
        assert_eq!(messages[2].author, Author::Bot);
        assert_eq!(messages[2].text.matches("**Article URL:**").count(), 1);
        assert!(messages[2].text.contains("https://example.com/yt"));

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("[00:00:00] You:\n    How do I add a YouTube video?\n"));
    }

    #[test]
    fn quit_waits_for_pending_input() {
        let dir = TempDir::new().unwrap();
        let (mut session, rx) = start_session(&dir, &[]);
        session.quit_requested = true;
        session.pending_input.push_back("hello".to_string());
        assert!(!session.finished());

        let mut out = Vec::new();
        wait_until_ready(&mut session, &rx, &mut out);
        session.drain_pending_input(&mut out).unwrap();
        assert!(session.finished());
    }
}
