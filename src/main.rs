//! DSA Chat - terminal front end
//!
//! Reads questions and slash commands from stdin and renders the widget
//! state on stdout. Logs go to stderr.

use dsa_chat::command::{help_text, parse_command, ChatCommand};
use dsa_chat::runtime::ProductionController;
use dsa_chat::{
    spawn_chat, CannedResponder, ChatConfig, ChatController, ChatSnapshot, ChatUpdate,
    ClipboardKind, ClipboardSink, Intent, MemoryClipboard, Message, SystemClipboard,
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = ChatConfig::from_env();
    tracing::info!(
        response_delay_ms = %config.response_delay.as_millis(),
        copy_feedback_ms = %config.copy_feedback_window.as_millis(),
        clipboard = ?config.clipboard,
        "Starting DSA chat"
    );

    let generator = CannedResponder::from_config(&config);
    let clipboard = select_clipboard(config.clipboard);
    let controller: ProductionController = ChatController::new(config, generator, clipboard);

    let mut shown = controller.snapshot();
    let (handle, task) = spawn_chat(controller);
    let mut updates = handle.subscribe();

    println!("Type a question, or /help for commands.");
    render_log(&shown.log);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_command(&line) {
                    None if line.trim().is_empty() => {}
                    None => handle.send(Intent::Submit(line)).await?,
                    Some(ChatCommand::Quit) => break,
                    Some(ChatCommand::Help) => println!("{}", help_text()),
                    Some(ChatCommand::State) => println!("{}", serde_json::to_string_pretty(&shown)?),
                    Some(ChatCommand::Invalid(message)) => println!("! {message}"),
                    Some(command) => {
                        if let Some(intent) = command.intent() {
                            handle.send(intent).await?;
                        }
                    }
                }
            }
            update = updates.recv() => match update {
                Ok(ChatUpdate::Snapshot(snapshot)) => {
                    render_update(&shown, &snapshot);
                    shown = snapshot;
                }
                Ok(ChatUpdate::Rejected { message }) => println!("! {message}"),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Renderer fell behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    drop(handle);
    task.await?;
    Ok(())
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "dsa_chat=info".into());

    let (json, text) = if std::env::var_os("DSA_CHAT_LOG_JSON").is_some() {
        let layer = tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(false)
            .with_span_list(false)
            .with_writer(std::io::stderr);
        (Some(layer), None)
    } else {
        let layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
        (None, Some(layer))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(text)
        .init();
}

fn select_clipboard(kind: ClipboardKind) -> Arc<dyn ClipboardSink> {
    match kind {
        ClipboardKind::Memory => Arc::new(MemoryClipboard::new()),
        ClipboardKind::System => match SystemClipboard::probe() {
            Ok(clipboard) => Arc::new(clipboard),
            Err(e) => {
                tracing::warn!(error = %e, "System clipboard unavailable, copying in memory");
                Arc::new(MemoryClipboard::new())
            }
        },
    }
}

// ============================================================================
// Rendering
// ============================================================================

fn render_update(previous: &ChatSnapshot, current: &ChatSnapshot) {
    if current.log.starts_with(&previous.log) {
        for (index, message) in current.log.iter().enumerate().skip(previous.log.len()) {
            render_message(index, message);
        }
    } else {
        println!("--- conversation ---");
        render_log(&current.log);
    }

    if current.awaiting_response && !previous.awaiting_response {
        println!("Thinking...");
    }
    if current.last_copied_index.is_some() && current.last_copied_index != previous.last_copied_index {
        println!("Response copied to clipboard!");
    }
    if current.history_visible && !previous.history_visible {
        render_history(&current.history_titles);
    }
}

fn render_log(log: &[Message]) {
    for (index, message) in log.iter().enumerate() {
        render_message(index, message);
    }
}

fn render_message(index: usize, message: &Message) {
    let who = if message.is_user() { "You" } else { "Bot" };
    if message.is_copyable() {
        println!("[{index}] {who}: {}  (/copy {index})", message.text());
    } else {
        println!("[{index}] {who}: {}", message.text());
    }
}

fn render_history(titles: &[String]) {
    if titles.is_empty() {
        println!("No previous conversations available");
        return;
    }
    println!("Past conversations:");
    for (index, title) in titles.iter().enumerate() {
        println!("  {index}. {title}");
    }
}
