// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `aula shell` command implementation.
//!
//! An interactive REPL with readline history. Every line is one turn in the
//! same conversation until `/new` starts another.

use aula_agent::TurnRequest;
use aula_config::model::AulaConfig;
use aula_core::{AulaError, Role};
use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::history::print_transcript;
use crate::runtime::Runtime;

/// Who is chatting, about whom, and in which conversation.
#[derive(Debug, Clone)]
pub struct ShellSession {
    pub user: String,
    pub student: String,
    pub period: String,
    pub conversation: Option<String>,
}

/// What a REPL line asks for.
#[derive(Debug, PartialEq, Eq)]
enum ShellCommand<'a> {
    Quit,
    New,
    History,
    Ask(&'a str),
    Skip,
}

fn parse_line(line: &str) -> ShellCommand<'_> {
    match line.trim() {
        "" => ShellCommand::Skip,
        "/quit" | "/exit" => ShellCommand::Quit,
        "/new" => ShellCommand::New,
        "/history" => ShellCommand::History,
        text => ShellCommand::Ask(text),
    }
}

/// Runs the `aula shell` interactive REPL.
pub async fn run_shell(config: AulaConfig, mut session: ShellSession) -> Result<(), AulaError> {
    let runtime = Runtime::start(&config).await?;

    let mut rl = DefaultEditor::new()
        .map_err(|e| AulaError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", "aula shell".bold().green());
    println!(
        "student {} in {}. Type {} for a new conversation, {} to exit.\n",
        session.student.cyan(),
        session.period.cyan(),
        "/new".yellow(),
        "/quit".yellow()
    );

    let prompt = format!("{}> ", "aula".green());
    loop {
        let line = match rl.readline(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        };

        match parse_line(&line) {
            ShellCommand::Skip => continue,
            ShellCommand::Quit => break,
            ShellCommand::New => {
                session.conversation = None;
                println!("{}", "started a new conversation".dimmed());
            }
            ShellCommand::History => match &session.conversation {
                Some(id) => match runtime.orchestrator.history(&session.user, id).await {
                    Ok(messages) => print_transcript(&messages),
                    Err(e) => eprintln!("{}: {e}", "error".red()),
                },
                None => println!("{}", "no messages yet".dimmed()),
            },
            ShellCommand::Ask(text) => {
                let _ = rl.add_history_entry(text);
                let mut request = TurnRequest::new(
                    session.user.as_str(),
                    session.student.as_str(),
                    session.period.as_str(),
                    text,
                );
                request.conversation_id = session.conversation.clone();

                match runtime.orchestrator.handle_turn(request).await {
                    Ok(reply) => {
                        session.conversation = Some(reply.conversation_id);
                        println!("{} {}\n", Role::Assistant.as_ref().blue().bold(), reply.answer);
                    }
                    Err(e) => eprintln!("{}: {e}", "error".red()),
                }
            }
        }
    }

    runtime.shutdown().await?;
    println!("{}", "goodbye".dimmed());
    Ok(())
}
