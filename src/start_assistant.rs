//! Startup helpers for the terminal assistant.
//!
//! Reads lines from stdin, sends plain text to the reply service and maps
//! slash commands onto the widget controller.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;

use crate::assistant::core::config::AssistantConfig;
use crate::assistant::reply::http::HttpReplyService;
use crate::assistant::turn_manager::{PendingSend, SendOutcome};
use crate::assistant::widget::WidgetController;
use crate::console::{Command, HELP, parse_command};

/// Run the console assistant.
///
/// # Returns
/// `ExitCode::SUCCESS` when stdin closes or `/quit` is entered, `1` on failure.
#[must_use]
pub fn run() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting tourney assistant v{}", env!("CARGO_PKG_VERSION"));

    let config = match AssistantConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {e}");
            return ExitCode::from(1);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to create runtime: {e}");
            return ExitCode::from(1);
        }
    };

    if let Err(e) = rt.block_on(run_console(config)) {
        tracing::error!("Console error: {e:#}");
        return ExitCode::from(1);
    }

    ExitCode::SUCCESS
}

/// Drive the widget from stdin until it closes or the user quits.
///
/// # Errors
/// Returns an error if the reply client cannot be built or stdin fails.
#[allow(clippy::print_stdout)]
pub async fn run_console(config: AssistantConfig) -> anyhow::Result<()> {
    let service = HttpReplyService::new(&config.reply).context("building reply client")?;
    tracing::info!("Reply endpoint: {}", service.endpoint());
    let mut widget = WidgetController::from_config(Arc::new(service), &config);

    print_suggestions(&widget);
    println!("Type a question, or /help for commands.");

    drive_console(&mut widget, BufReader::new(tokio::io::stdin())).await
}

/// Apply every line of `input` to `widget`.
///
/// Returns once the input ends or `/quit` is read, after outstanding
/// replies have been printed.
///
/// # Errors
/// Returns an error if reading `input` fails.
pub async fn drive_console<R>(widget: &mut WidgetController, input: R) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    widget.open();
    let mut sends = JoinSet::new();

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await.context("reading input")? {
        while sends.try_join_next().is_some() {}
        match parse_command(&line) {
            Command::Quit => break,
            command => apply(widget, command, &mut sends),
        }
    }

    if !sends.is_empty() {
        tracing::debug!(outstanding = sends.len(), "waiting for replies before exit");
    }
    while sends.join_next().await.is_some() {}

    widget.close();
    Ok(())
}

#[allow(clippy::print_stdout)]
fn apply(widget: &mut WidgetController, command: Command, sends: &mut JoinSet<()>) {
    match command {
        Command::Message(text) => {
            widget.set_input(text);
            let pending = widget.submit_input();
            dispatch(widget, pending, sends);
        }
        Command::Pick(index) => {
            if index >= widget.suggestions().len() {
                println!("No suggestion at position {}.", index + 1);
                return;
            }
            let pending = widget.send_suggestion(index);
            dispatch(widget, pending, sends);
        }
        Command::NewChat => {
            widget.new_chat();
            println!("Started a new conversation.");
        }
        Command::History => print_history(widget),
        Command::Open(position) => {
            let Some(entry) = widget.history_entries().into_iter().nth(position) else {
                println!("No conversation at position {}.", position + 1);
                return;
            };
            match widget.select_history(entry.index) {
                Ok(()) => print_transcript(widget),
                Err(e) => println!("{e}"),
            }
        }
        Command::ClearHistory => {
            widget.clear_history();
            println!("History cleared.");
        }
        Command::Suggestions => print_suggestions(widget),
        Command::Language(language) => {
            widget.set_language(language);
            println!("Language: {language}");
        }
        Command::Detail(level) => {
            widget.set_detail_level(level);
            println!("Detail level: {level}");
        }
        Command::Advanced => {
            widget.toggle_advanced_mode();
            println!("Advanced mode: {}", on_off(widget.settings().advanced_mode));
        }
        Command::Voice => {
            widget.toggle_voice_input();
            println!("Voice input: {}", on_off(widget.settings().voice_input_active));
        }
        Command::Help => println!("{HELP}"),
        Command::Invalid(reason) => println!("{reason} (try /help)"),
        Command::Empty | Command::Quit => {}
    }
}

#[allow(clippy::print_stdout)]
fn dispatch(widget: &WidgetController, pending: Option<PendingSend>, sends: &mut JoinSet<()>) {
    let Some(pending) = pending else {
        if widget.is_sending() {
            println!("Still waiting for the previous reply.");
        }
        return;
    };
    sends.spawn(async move {
        match pending.settle().await {
            SendOutcome::Replied { reply, .. } => println!("assistant> {reply}"),
            SendOutcome::Rejected { error, .. } => {
                println!("Failed to get a reply: {error}");
            }
        }
    });
}

#[allow(clippy::print_stdout)]
fn print_history(widget: &WidgetController) {
    let entries = widget.history_entries();
    if entries.is_empty() {
        println!("No archived conversations.");
        return;
    }
    for (position, entry) in entries.iter().enumerate() {
        let started = entry
            .started_at
            .map_or_else(|| "-".to_string(), |at| at.format("%Y-%m-%d %H:%M").to_string());
        println!(
            "{:>3}. {} ({} turns, {started})",
            position + 1,
            entry.title,
            entry.turn_count,
        );
    }
}

#[allow(clippy::print_stdout)]
fn print_transcript(widget: &WidgetController) {
    for turn in widget.active_turns() {
        println!("you> {}", turn.message());
        if turn.is_pending() {
            println!("assistant> (no reply)");
        } else {
            println!("assistant> {}", turn.reply());
        }
    }
}

#[allow(clippy::print_stdout)]
fn print_suggestions(widget: &WidgetController) {
    for (position, suggestion) in widget.suggestions().iter().enumerate() {
        println!("{:>3}. {suggestion}", position + 1);
    }
}

const fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}
