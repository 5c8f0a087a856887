// SPDX-FileCopyrightText: 2026 CRM Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `crm chat` interactive REPL.

use colored::Colorize;
use crm_agent::{ArchiveOutcome, ProcessOutcome};
use crm_core::CrmError;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::app::App;

pub async fn run_chat(app: &App, contact_id: i64) -> Result<(), CrmError> {
    let mut agent = app.agent();
    let Some(contact) = agent.start(contact_id).await? else {
        eprintln!("{}", format!("contact {contact_id} not found").yellow());
        return Ok(());
    };

    let mut rl = DefaultEditor::new()
        .map_err(|e| CrmError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", contact.header().bold().green());
    println!("Type {} to exit, {} for the current context.\n", "/quit".yellow(), "/context".yellow());

    let prompt = format!("{}> ", app.config.agent.name.green());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed == "/quit" || trimmed == "/exit" {
                    break;
                }
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                if trimmed == "/context" {
                    print_context(&agent.current_context());
                    continue;
                }

                match agent.process(trimmed).await {
                    Ok(outcome) => print_outcome(&outcome),
                    Err(e) => eprintln!("{}: {e}", "error".red()),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }
    Ok(())
}

fn print_outcome(outcome: &ProcessOutcome) {
    println!("{}\n", outcome.response);
    let mut notes = vec![format!("{} interactions stored", outcome.total_interactions)];
    if outcome.knowledge_found {
        notes.push(format!("{} knowledge sources", outcome.knowledge_sources));
    }
    match &outcome.archive {
        ArchiveOutcome::NotNeeded => {}
        ArchiveOutcome::Archived(n) => notes.push(format!("archived {n}")),
        ArchiveOutcome::Failed(reason) => {
            eprintln!("{}: {reason}", "archive failed".yellow());
        }
    }
    println!("{}", notes.join(" · ").dimmed());
}

fn print_context(snapshot: &crm_memory::ContextSnapshot) {
    for turn in &snapshot.turns {
        println!("{} {}", "you:".dimmed(), turn.message);
        println!("{} {}", "bot:".dimmed(), turn.response);
    }
    if let Some(summary) = &snapshot.summary {
        println!("{} {summary}", "summary:".dimmed());
    }
}
