// SPDX-FileCopyrightText: 2026 CRM Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-shot subcommands: contacts, knowledge, history.

use colored::Colorize;
use crm_core::types::NewContact;
use crm_core::{CrmError, Metadata};
use serde_json::Value;

use crate::app::App;

pub async fn add_contact(
    app: &App,
    name: String,
    email: Option<String>,
    company: Option<String>,
    status: String,
) -> Result<(), CrmError> {
    let id = app
        .storage
        .create_contact(&NewContact {
            name,
            email,
            company,
            status,
        })
        .await?;
    println!("{} contact {id}", "created".green());
    Ok(())
}

pub async fn list_contacts(app: &App) -> Result<(), CrmError> {
    let contacts = app.storage.list_contacts().await?;
    if contacts.is_empty() {
        println!("{}", "no contacts".dimmed());
    }
    for c in contacts {
        println!(
            "{:>4}  {}  {}  {}  {}",
            c.id,
            c.name.bold(),
            c.company.as_deref().unwrap_or("-"),
            c.email.as_deref().unwrap_or("-"),
            c.status.cyan()
        );
    }
    Ok(())
}

pub async fn add_knowledge(app: &App, content: &str, meta: &[String]) -> Result<(), CrmError> {
    let metadata = parse_metadata(meta)?;
    match app.knowledge().add(content, metadata).await? {
        Some(id) => println!("{} document {id}", "stored".green()),
        None => println!(
            "{}",
            "not stored: no embedding available (check embedding API key)".yellow()
        ),
    }
    Ok(())
}

pub async fn search_knowledge(app: &App, query: &str, limit: usize) -> Result<(), CrmError> {
    let results = app
        .knowledge()
        .search(query, limit, app.config.memory.similarity_threshold)
        .await?;
    if results.is_empty() {
        println!("{}", "no matching documents".dimmed());
    }
    for doc in results {
        println!("[{:.3}] #{} {}", doc.similarity, doc.id, doc.content);
    }
    Ok(())
}

pub async fn show_history(app: &App, contact_id: i64) -> Result<(), CrmError> {
    let Some(history) = app.long_term().history(contact_id).await? else {
        println!("{}", format!("contact {contact_id} not found").yellow());
        return Ok(());
    };

    println!("{}", history.contact.header().bold());
    if history.recently_contacted {
        println!("{}", "contacted within the last day".dimmed());
    }

    println!("\n{}", "Interactions".underline());
    for i in &history.interactions {
        println!("{}  {}", i.created_at.dimmed(), i.message);
        if let Some(response) = &i.response {
            println!("    {}", response.cyan());
        }
    }

    println!("\n{}", "Summaries".underline());
    for s in &history.summaries {
        println!("{}  {}", s.created_at.dimmed(), s.summary);
    }
    Ok(())
}

/// Parses `key=value` pairs. Values that parse as JSON keep their type.
fn parse_metadata(pairs: &[String]) -> Result<Metadata, CrmError> {
    let mut metadata = Metadata::new();
    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| CrmError::Config(format!("metadata `{pair}` is not key=value")))?;
        let value = serde_json::from_str(value).unwrap_or_else(|_| Value::from(value));
        metadata.insert(key.trim().to_string(), value);
    }
    Ok(metadata)
}
