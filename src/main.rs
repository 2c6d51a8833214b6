//! chatguru - Yoga Sutra guide on the command line
//!
//! USAGE:
//!   chatguru ask "<question>" [--user <email>]   # one question, one answer
//!   chatguru sutras                              # list bundled sutras
//!   chatguru sutra <chapter.verse>               # show one sutra
//!   chatguru daily                               # sutra of the day
//!   chatguru doctor                              # check config, key, network
//!   chatguru config set <key> <value>            # non-interactive config

use anyhow::{Context, Result};
use std::sync::Arc;

use chatguru::config::{self, Config};
use chatguru::profile::SpiritualProfile;
use chatguru::store::{FileStore, ProfileStore};
use chatguru::sutras::{parse_reference, Sutra};
use chatguru::{client, ChatClient, Guru, KnowledgeBase, ReplyKind};

// ═══════════════════════════════════════════════════════════════
// CLI
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, PartialEq)]
enum Command {
    Ask { question: String, user: Option<String> },
    Sutras,
    Sutra { reference: String },
    Daily,
    Doctor,
    ConfigSet { key: String, value: String },
    Help,
}

fn parse_args(args: &[String]) -> Command {
    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        return Command::Help;
    }

    match args[0].as_str() {
        "ask" => {
            let mut user = None;
            let mut words = Vec::new();
            let mut i = 1;
            while i < args.len() {
                match args[i].as_str() {
                    "--user" | "-u" => {
                        i += 1;
                        user = args.get(i).cloned();
                    }
                    s => words.push(s.to_string()),
                }
                i += 1;
            }
            Command::Ask { question: words.join(" "), user }
        }
        "sutras" => Command::Sutras,
        "sutra" => Command::Sutra {
            reference: args.get(1).cloned().unwrap_or_default(),
        },
        "daily" => Command::Daily,
        "doctor" => Command::Doctor,
        "config" if args.get(1).map(|s| s.as_str()) == Some("set") => Command::ConfigSet {
            key: args.get(2).cloned().unwrap_or_default(),
            value: args.get(3).cloned().unwrap_or_default(),
        },
        _ => Command::Help,
    }
}

fn print_help() {
    println!(r#"chatguru - Yoga Sutra guide

USAGE:
    chatguru ask "<question>" [--user <email>]   # one question, one answer
    chatguru sutras                              # list bundled sutras
    chatguru sutra <chapter.verse>               # show one sutra (1.2 or 1-2)
    chatguru daily                               # sutra of the day
    chatguru doctor                              # check config, key, network
    chatguru config set <key> <value>            # set config value

CONFIG KEYS:
    key, api_base, classifier_model, answer_model, port, data_dir

CONFIG:
    ~/.config/chatguru/config.json      API key, models, port
    ~/.local/state/chatguru/users/      Profiles and chat history

ENVIRONMENT:
    OPENAI_API_KEY / OPENROUTER_API_KEY   Override API key from config
    CHATGURU_API_BASE                     Override API base URL
    CHATGURU_PORT                         Override server port
    CHATGURU_DATA_DIR                     Override profile/history directory
    RUST_LOG                              Log filter (default: info)
"#);
}

// ═══════════════════════════════════════════════════════════════
// MAIN
// ═══════════════════════════════════════════════════════════════

#[tokio::main]
async fn main() -> Result<()> {
    chatguru::init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match parse_args(&args) {
        Command::Help => {
            print_help();
            Ok(())
        }
        Command::Ask { question, user } => run_ask(&question, user.as_deref()).await,
        Command::Sutras => run_sutras(),
        Command::Sutra { reference } => run_sutra(&reference),
        Command::Daily => run_daily(),
        Command::Doctor => run_doctor().await,
        Command::ConfigSet { key, value } => run_config_set(&key, &value),
    }
}

// ═══════════════════════════════════════════════════════════════
// COMMANDS
// ═══════════════════════════════════════════════════════════════

async fn run_ask(question: &str, user: Option<&str>) -> Result<()> {
    let question = question.trim();
    if question.is_empty() {
        anyhow::bail!("Question is required: chatguru ask \"<question>\"");
    }

    let cfg = Config::load_with_env()?;
    let api_key = cfg.require_api_key()?;

    let profile = match user {
        Some(email) => FileStore::new(cfg.users_dir()?)
            .get(email)
            .await?
            .with_context(|| format!("No profile stored for {}", email))?
            .spiritual_profile,
        None => SpiritualProfile::default(),
    };

    let kb = Arc::new(KnowledgeBase::bundled()?);
    let answerer = ChatClient::new(&cfg.api_base, api_key, &cfg.answer_model);
    let classifier = answerer.with_model(&cfg.classifier_model);
    let guru = Guru::new(kb, Arc::new(classifier), Arc::new(answerer));

    let reply = guru.respond(question, &profile).await;

    println!("{}\n", reply.response);
    if reply.kind == ReplyKind::Guidance && !reply.sutra_references.is_empty() {
        println!("Cited: {}", reply.sutra_references.join(", "));
    }
    if !reply.relevant_sutras.is_empty() {
        println!("\nRelated sutras:");
        for s in &reply.relevant_sutras {
            println!("  {:<5} {}", s.reference(), s.translation);
        }
    }
    Ok(())
}

fn run_sutras() -> Result<()> {
    let kb = KnowledgeBase::bundled()?;
    for s in kb.entries() {
        println!("{:<5} {}", s.reference(), s.translation);
    }
    Ok(())
}

fn run_sutra(reference: &str) -> Result<()> {
    let kb = KnowledgeBase::bundled()?;
    let (chapter, verse) = parse_reference(reference)
        .with_context(|| format!("Invalid sutra reference '{}', expected e.g. 2.47", reference))?;
    let sutra = kb
        .find(chapter, verse)
        .with_context(|| format!("Sutra {} is not in the collection", reference))?;
    print_sutra(sutra);
    Ok(())
}

fn run_daily() -> Result<()> {
    let kb = KnowledgeBase::bundled()?;
    let day = chrono::Utc::now().timestamp().div_euclid(86_400) as u64;
    let sutra = kb.daily(day).context("No sutras available")?;
    print_sutra(sutra);
    Ok(())
}

fn print_sutra(s: &Sutra) {
    println!("Sutra {}\n", s.reference());
    println!("  {}", s.sanskrit);
    println!("  {}\n", s.transliteration);
    println!("{}\n", s.translation);
    println!("{}\n", s.commentary);
    println!("Practice: {}", s.practical_application);
    println!("Keywords: {}", s.keywords.join(", "));
}

async fn run_doctor() -> Result<()> {
    println!("chatguru doctor\n");

    let cfg = Config::load_with_env()?;
    println!("[✓] Config: {}", config::config_path()?.display());

    let has_key = cfg.api_key.is_some();
    println!("[{}] API key: {}",
        if has_key { "✓" } else { "✗" },
        if has_key { "configured" } else { "missing" }
    );

    match KnowledgeBase::bundled() {
        Ok(kb) => println!("[✓] Sutras: {} loaded", kb.len()),
        Err(e) => println!("[✗] Sutras: {}", e),
    }

    println!("[✓] Models: {} (answers), {} (scope check)", cfg.answer_model, cfg.classifier_model);
    println!("[✓] Data: {}", cfg.users_dir()?.display());

    print!("[?] Network: checking...");
    match client::check_connectivity(&cfg.api_base).await {
        Ok(()) => println!("\r[✓] Network: {} reachable         ", cfg.api_base),
        Err(e) => println!("\r[✗] Network: {}", e),
    }

    Ok(())
}

fn run_config_set(key: &str, value: &str) -> Result<()> {
    let mut cfg = Config::load()?;
    cfg.set(key, value)?;
    cfg.save()?;
    println!("{} saved to {}", key, config::config_path()?.display());
    Ok(())
}
