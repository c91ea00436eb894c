// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Aula - an academic assistant chatbot.
//!
//! This is the binary entry point.

mod history;
mod runtime;
mod seed;
mod shell;

use std::path::PathBuf;

use aula_agent::TurnRequest;
use clap::{Parser, Subcommand};
use colored::Colorize;

/// Aula - academic assistant for grades, attendance and schedules.
#[derive(Parser, Debug)]
#[command(name = "aula", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask one question and print the answer.
    Ask {
        /// Student whose records the assistant may use.
        #[arg(long)]
        student: String,
        /// Academic period; defaults to `academic.default_period`.
        #[arg(long)]
        period: Option<String>,
        /// Continue an existing conversation.
        #[arg(long)]
        conversation: Option<String>,
        /// Conversation owner.
        #[arg(long, default_value = runtime::LOCAL_USER)]
        user: String,
        /// The question.
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Launch an interactive REPL that keeps one conversation.
    Shell {
        #[arg(long)]
        student: String,
        #[arg(long)]
        period: Option<String>,
        #[arg(long)]
        conversation: Option<String>,
        #[arg(long, default_value = runtime::LOCAL_USER)]
        user: String,
    },
    /// Print a conversation transcript, or list conversations when none is given.
    History {
        conversation: Option<String>,
        #[arg(long, default_value = runtime::LOCAL_USER)]
        user: String,
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Create demo courses, grades, absences and classes for a student.
    Seed {
        #[arg(long)]
        student: String,
        #[arg(long)]
        period: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => aula_config::load_and_validate_path(path),
        None => aula_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            aula_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    runtime::init_tracing(&config.agent.log_level);

    let result = match cli.command {
        Commands::Ask {
            student,
            period,
            conversation,
            user,
            text,
        } => {
            let period = period.unwrap_or_else(|| config.academic.default_period.clone());
            let mut request = TurnRequest::new(user, student, period, text.join(" "));
            request.conversation_id = conversation;
            runtime::run_ask(config, request).await
        }
        Commands::Shell {
            student,
            period,
            conversation,
            user,
        } => {
            let period = period.unwrap_or_else(|| config.academic.default_period.clone());
            shell::run_shell(config, shell::ShellSession {
                user,
                student,
                period,
                conversation,
            })
            .await
        }
        Commands::History {
            conversation,
            user,
            json,
        } => history::run_history(config, &user, conversation.as_deref(), json).await,
        Commands::Seed { student, period } => seed::run_seed(config, student, period).await,
    };

    if let Err(e) = result {
        eprintln!("{}: {e}", "error".red());
        std::process::exit(1);
    }
}
