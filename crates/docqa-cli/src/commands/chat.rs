//! Interactive question/answer loop.

use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use docqa_application::SessionGate;
use docqa_core::reference::Reference;
use docqa_core::session::{AuthStatus, ChatMessage, MessageRole};

pub async fn run(gate: &SessionGate) -> Result<()> {
    if gate.startup().await? != AuthStatus::Authenticated {
        println!("Not logged in. Run `docqa login` first.");
        return Ok(());
    }

    println!("{}", "Ask away. Type /help for commands, /quit to leave.".dimmed());

    let mut rl = DefaultEditor::new()?;
    loop {
        let line = match rl.readline("you> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        let _ = rl.add_history_entry(input);

        if let Some(command) = input.strip_prefix('/') {
            if !handle_command(gate, command).await? {
                break;
            }
            continue;
        }

        ask(gate, input).await?;
    }

    Ok(())
}

/// Dispatches a slash command. Returns `false` when the loop should end.
async fn handle_command(gate: &SessionGate, command: &str) -> Result<bool> {
    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };

    match name {
        "quit" | "exit" => return Ok(false),
        "help" => print_help(),
        "sources" => show_sources(gate).await,
        "source" => {
            if arg.is_empty() {
                println!("Usage: /source <document name>");
            } else {
                show_source(gate, arg).await;
            }
        }
        "saved" => show_saved(gate).await,
        "delete" => match arg.parse::<i64>() {
            Ok(id) => delete_saved(gate, id).await,
            Err(_) => println!("Usage: /delete <id> (ids are listed by /saved)"),
        },
        other => println!("Unknown command: /{other}. Type /help."),
    }

    Ok(true)
}

async fn ask(gate: &SessionGate, question: &str) -> Result<()> {
    let chat = match gate.chat().await {
        Ok(chat) => chat,
        Err(err) => {
            eprintln!("{}", err.user_message().red());
            return Ok(());
        }
    };

    let before = chat.messages().await.len();
    if let Err(err) = chat.ask(question).await {
        eprintln!("{}", err.user_message().red());
        return Ok(());
    }

    // Everything appended by this ask, minus our own echoed question.
    for message in chat.messages().await.iter().skip(before) {
        if message.role == MessageRole::Bot {
            render_bot(message);
        }
    }

    Ok(())
}

fn render_bot(message: &ChatMessage) {
    println!("{} {}", "bot>".green().bold(), message.text);
    if message.has_sources() {
        println!("{}", "     (/sources shows where this came from)".dimmed());
    }
}

async fn show_sources(gate: &SessionGate) {
    let (chat, references) = match (gate.chat().await, gate.references().await) {
        (Ok(chat), Ok(references)) => (chat, references),
        _ => {
            eprintln!("{}", "You must be logged in.".red());
            return;
        }
    };

    let Some(question_id) = chat.last_question_id().await else {
        println!("No answer with sources yet.");
        return;
    };

    match references.load_by_question(question_id).await {
        Ok(refs) => render_references(&refs),
        Err(err) => eprintln!("{}", err.user_message().red()),
    }
}

async fn show_source(gate: &SessionGate, source: &str) {
    let references = match gate.references().await {
        Ok(references) => references,
        Err(err) => {
            eprintln!("{}", err.user_message().red());
            return;
        }
    };

    match references.load_by_source(source).await {
        Ok(refs) => render_references(&refs),
        Err(err) => eprintln!("{}", err.user_message().red()),
    }
}

async fn show_saved(gate: &SessionGate) {
    let chat = match gate.chat().await {
        Ok(chat) => chat,
        Err(err) => {
            eprintln!("{}", err.user_message().red());
            return;
        }
    };

    match chat.saved().await {
        Ok(saved) if saved.is_empty() => println!("Nothing saved yet."),
        Ok(saved) => {
            for exchange in saved {
                println!("{} {}", format!("[{}]", exchange.id).yellow(), exchange.question);
                println!("     {}", exchange.answer.dimmed());
            }
        }
        Err(err) => eprintln!("{}", err.user_message().red()),
    }
}

async fn delete_saved(gate: &SessionGate, id: i64) {
    let chat = match gate.chat().await {
        Ok(chat) => chat,
        Err(err) => {
            eprintln!("{}", err.user_message().red());
            return;
        }
    };

    match chat.delete_saved(id).await {
        Ok(()) => println!("Deleted saved exchange {id}."),
        Err(err) => eprintln!("{}", err.user_message().red()),
    }
}

fn render_references(references: &[Reference]) {
    if references.is_empty() {
        println!("No references found.");
        return;
    }
    for reference in references {
        println!("{}", reference.document_name.cyan().bold());
        for snippet in &reference.snippets {
            println!("  - {snippet}");
        }
    }
}

fn print_help() {
    println!("/sources         show the evidence behind the latest answer");
    println!("/source <name>   show everything from a named document");
    println!("/saved           list exchanges saved on the server");
    println!("/delete <id>     delete a saved exchange");
    println!("/quit            leave the chat");
}
