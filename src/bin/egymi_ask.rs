//! One-shot command line client for the four EGYMI Compass queries.

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use egymi_compass::handlers::{knowledge_query, quick_topics, regulation_query, user_message};
use egymi_compass::models::{Answer, Query};
use egymi_compass::{Config, RegulationAdvisor, regulations};

#[derive(Parser, Debug)]
#[command(
    name = "egymi-ask",
    version,
    about = "Regulation analysis and lookup for EGYMI institutions"
)]
struct Args {
    /// Print the answer as JSON instead of formatted text
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyse a regulation text or question
    Analyze { text: Vec<String> },
    /// Digest of recent education-law changes
    Changes,
    /// Knowledge-base question, or a quick topic with --topic
    Ask {
        question: Vec<String>,
        /// Quick topic number (see `topics`)
        #[arg(long)]
        topic: Option<usize>,
    },
    /// Current text of one regulation
    Law {
        law_id: String,
        #[arg(long)]
        title: Option<String>,
    },
    /// List the core regulation catalog
    Laws,
    /// List the knowledge tab's quick topics
    Topics,
}

/// The query a command submits; `None` for the listing commands.
fn to_query(command: &Command) -> Option<egymi_compass::Result<Query>> {
    match command {
        Command::Analyze { text } => Some(Ok(Query::analysis(text.join(" ")))),
        Command::Changes => Some(Ok(Query::latest_changes())),
        Command::Ask { question, topic } => Some(knowledge_query(&question.join(" "), *topic)),
        Command::Law { law_id, title } => Some(Ok(regulation_query(law_id, title.as_deref()))),
        Command::Laws | Command::Topics => None,
    }
}

fn print_listing(command: &Command) {
    match command {
        Command::Topics => {
            for topic in quick_topics() {
                println!("{}. {}", topic.number.to_string().cyan(), topic.question);
            }
        }
        _ => {
            for reg in regulations::catalog() {
                println!("{}  {}", reg.id.bright_yellow(), reg.title);
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let query = match to_query(&args.command) {
        None => {
            print_listing(&args.command);
            return Ok(ExitCode::SUCCESS);
        }
        Some(Ok(query)) => query,
        Some(Err(e)) => {
            eprintln!("{} {}", "✗".red(), e.to_string().as_str().red());
            return Ok(ExitCode::FAILURE);
        }
    };

    let config = Config::load();
    let advisor = RegulationAdvisor::new(&config);
    let kind = query.kind;

    eprintln!("{} {}", "⏳".cyan(), format!("{kind}...").as_str().dimmed());
    match advisor.ask(&query).await {
        Ok(answer) if args.json => {
            println!("{}", serde_json::to_string_pretty(&answer)?);
            Ok(ExitCode::SUCCESS)
        }
        Ok(answer) => {
            render(&answer);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            tracing::debug!("Query failed: {}", e);
            eprintln!("{} {}", "✗".red(), user_message(kind, &e).as_str().red());
            Ok(ExitCode::FAILURE)
        }
    }
}

fn render(answer: &Answer) {
    if let Some(institutional) = &answer.institutional_analysis {
        println!("{}", "Intézményi elemzés".bold().bright_yellow());
        println!("{institutional}\n");
    }
    println!("{}", answer.text);

    if !answer.sources.is_empty() {
        println!("\n{}", "Források".bold());
        for (i, source) in answer.sources.iter().enumerate() {
            println!(
                "  {}. {} {}",
                (i + 1).to_string().cyan(),
                source.title,
                source.uri.dimmed()
            );
        }
    }
    println!(
        "\n{}",
        "Tájékoztató jellegű válasz, nem minősül jogi tanácsadásnak.".dimmed()
    );
}
