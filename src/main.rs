//! # Folio
//!
//! Command-line shell around the Folio session engine. It plays the part of
//! the editor UI: feeding keystrokes, saves and tab operations into a
//! [`Session`] and rendering the tab strip.

use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::*;
use folio_session::{
    DocumentId, DocumentPatch, NewDocument, OpenedFile, Session, SessionConfig,
    SessionConfigBuilder,
};
use stress_test::{stress_test_scaling, stress_test_sessions};
use tracing_subscriber::EnvFilter;


// ─── CLI ───────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Multi-document editor session engine (debounced undo, dirty tracking)")]
#[command(version)]
struct Cli {
    /// Debounce window in milliseconds
    #[arg(long, global = true, default_value_t = folio_session::DEBOUNCE_MS)]
    debounce_ms: u64,

    /// Undo checkpoints kept per document
    #[arg(long, global = true, default_value_t = folio_session::MAX_HISTORY_SIZE)]
    max_history: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk through undo/redo, tabs and dirty tracking step by step
    Demo,
    /// Type words in real time and show how keystrokes coalesce into undo steps
    Typing {
        /// Number of words to type
        #[arg(long, default_value_t = 5)]
        words: usize,
        /// Delay between keystrokes in milliseconds
        #[arg(long, default_value_t = 40)]
        keystroke_ms: u64,
        /// Pause after each word in milliseconds
        #[arg(long, default_value_t = 400)]
        pause_ms: u64,
    },
    /// Drive several windows with random edits and tab transfers
    Stress {
        #[arg(long, default_value_t = 4)]
        windows: usize,
        #[arg(long, default_value_t = 1000)]
        edits: usize,
        #[arg(long, default_value_t = 3)]
        documents: usize,
        #[arg(long, default_value_t = 100)]
        transfers: usize,
        #[arg(long, default_value_t = 1)]
        seed: u64,
    },
    /// Repeat the stress test at growing window counts
    Scaling {
        #[arg(long, default_value_t = 20)]
        max_windows: usize,
        #[arg(long, default_value_t = 5)]
        step: usize,
        #[arg(long, default_value_t = 1)]
        seed: u64,
    },
}

// ─── Rendering ─────────────────────────────────────────────────────────────

fn render_tabs<C: folio_session::Clock>(session: &Session<C>) {
    let active = session.active_tab_id();
    let tabs: Vec<String> = session
        .documents()
        .iter()
        .map(|doc| {
            let marker = if doc.is_dirty() { " ●" } else { "" };
            let label = format!("{}{}", doc.name, marker);
            if &doc.id == active {
                format!("[{}]", label).bold().green().to_string()
            } else {
                format!(" {} ", label).dimmed().to_string()
            }
        })
        .collect();

    println!("  tabs: {}", tabs.join(" "));
    let doc = session.active_doc();
    println!(
        "  {} {:?}  undo={} redo={}  edited {}",
        "content:".cyan(),
        doc.content,
        yes_no(session.can_undo()),
        yes_no(session.can_redo()),
        doc.modified_at.format("%H:%M:%S").to_string().dimmed(),
    );
}

fn yes_no(flag: bool) -> ColoredString {
    if flag {
        "yes".green()
    } else {
        "no".red()
    }
}

fn step(title: &str) {
    println!("\n{} {}", "▶".yellow(), title.bold());
}

// ─── Commands ──────────────────────────────────────────────────────────────

fn run_demo(config: SessionConfig) {
    let clock = folio_session::ManualClock::new();
    let mut session = Session::with_clock(config, clock.clone());
    let debounce = session.config().debounce;
    let default_id = session.active_tab_id().clone();

    step("Start with the default document holding saved text \"X\"");
    session.update_existing_document(&default_id, DocumentPatch::new().content("X"));
    session.mark_document_saved(&default_id);
    render_tabs(&session);

    step("Type a burst: \"Y\", \"Yo\", \"Yol\" inside one debounce window");
    for text in ["Y", "Yo", "Yol"] {
        session.update_content(text);
        clock.advance(debounce / 4);
    }
    render_tabs(&session);

    step("Undo restores the pre-burst content in one step");
    session.undo();
    render_tabs(&session);

    step("Redo brings the burst back");
    session.redo();
    render_tabs(&session);
    clock.advance(debounce);

    step("Open a second document D1; its history is separate");
    let d1 = session.add_document(NewDocument::new().id("D1").name("D1").content("scratch"));
    render_tabs(&session);

    step("Open a file from disk, then open it again");
    let outcome = session.open_file(OpenedFile::new("notes.md", "/tmp/notes.md", "# Notes"));
    println!("  first open:  {:?}", outcome);
    let outcome = session.open_file(OpenedFile::new("notes.md", "/tmp/notes.md", "# Notes"));
    println!("  second open: {:?}", outcome);
    render_tabs(&session);

    step("Move the last tab to the front");
    let last = session.documents().len() - 1;
    session.reorder_documents(last, 0);
    render_tabs(&session);

    step("Close D1, then save the default document");
    session.close_tab(&d1);
    session.set_active_tab_id(&default_id);
    session.mark_document_saved(&default_id);
    render_tabs(&session);

    let unsaved: Vec<String> = session
        .dirty_document_ids()
        .iter()
        .map(ToString::to_string)
        .collect();
    println!("  unsaved: {}", unsaved.join(", ").yellow());

    step("Close everything; a fresh default document remains");
    let ids: Vec<DocumentId> = session.documents().iter().map(|d| d.id.clone()).collect();
    for id in ids {
        session.close_tab(&id);
    }
    render_tabs(&session);
}

async fn run_typing(config: SessionConfig, words: usize, keystroke_ms: u64, pause_ms: u64) {
    let mut session = Session::new(config);
    let vocabulary = ["lorem", "ipsum", "dolor", "sit", "amet", "consectetur"];

    step(&format!(
        "Typing {} words, {}ms per key, {}ms pause between words",
        words, keystroke_ms, pause_ms
    ));

    let mut text = String::new();
    let mut sealed = 0;
    for i in 0..words {
        let word = vocabulary[i % vocabulary.len()];
        if !text.is_empty() {
            text.push(' ');
        }
        for c in word.chars() {
            text.push(c);
            session.update_content(text.clone());
            tokio::time::sleep(Duration::from_millis(keystroke_ms)).await;
        }
        tokio::time::sleep(Duration::from_millis(pause_ms)).await;
        if let Some(deadline) = session.next_timer_deadline() {
            tokio::time::sleep_until(deadline.into()).await;
        }
        sealed += session.fire_due_timers().len();
    }

    render_tabs(&session);
    let id = session.active_tab_id().clone();
    println!(
        "  {} undo steps for {} keystrokes ({} windows sealed)",
        session.undo_depth(&id).to_string().bold(),
        text.chars().filter(|c| !c.is_whitespace()).count(),
        sealed
    );

    step("Undo word by word");
    while session.undo() {
        println!("  {:?}", session.active_doc().content);
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("folio=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = SessionConfigBuilder::new()
        .debounce_ms(cli.debounce_ms)
        .max_history(cli.max_history)
        .build();

    match cli.command {
        Commands::Demo => run_demo(config),
        Commands::Typing {
            words,
            keystroke_ms,
            pause_ms,
        } => run_typing(config, words, keystroke_ms, pause_ms).await,
        Commands::Stress {
            windows,
            edits,
            documents,
            transfers,
            seed,
        } => {
            let stats = stress_test_sessions(&config, windows, edits, documents, transfers, seed).await;
            stats.print();
        }
        Commands::Scaling {
            max_windows,
            step,
            seed,
        } => stress_test_scaling(&config, max_windows, step, seed).await,
    }

    println!("\n{}", "✓ Done".green());
}
