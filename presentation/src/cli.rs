use anyhow::{bail, Context};
use application::rag_service::RagService;
use application::session::{Session, SessionState};
use clap::Parser;
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Input};
use domain::models::{Answer, Document};
use domain::session::Role;
use infrastructure::config::Config;
use shared::confirmation::ask_confirmation;
use shared::types::Result;
use shared::utils::{is_supported_file, preview};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "documind")]
#[command(about = "Ask questions about a PDF using a local Ollama model")]
pub struct Cli {
    /// PDF to load before answering
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Print the retrieved passages under each answer
    #[arg(long)]
    pub show_sources: bool,

    /// Question to answer once and exit (requires --file)
    #[arg(trailing_var_arg = true)]
    pub question: Vec<String>,
}

/// One line of interactive input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Load(PathBuf),
    Clear,
    Reset,
    History,
    Help,
    Exit,
    Ask(String),
    Empty,
    Invalid(String),
}

impl ChatCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Empty;
        }
        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            return Self::Exit;
        }
        let Some(rest) = line.strip_prefix('/') else {
            return Self::Ask(line.to_string());
        };
        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };
        match name.to_ascii_lowercase().as_str() {
            "load" if arg.is_empty() => Self::Invalid("usage: /load <file.pdf>".to_string()),
            "load" => Self::Load(PathBuf::from(arg)),
            "clear" => Self::Clear,
            "reset" => Self::Reset,
            "history" => Self::History,
            "help" => Self::Help,
            "exit" | "quit" => Self::Exit,
            other => Self::Invalid(format!("unknown command /{}", other)),
        }
    }
}

pub struct CliApp {
    rag_service: RagService,
    session: Session,
    show_sources: bool,
}

impl CliApp {
    pub fn new(config: &Config) -> Result<Self> {
        let rag_service =
            RagService::from_config(config).context("Failed to set up the document pipeline")?;
        Ok(Self {
            rag_service,
            session: Session::new("local"),
            show_sources: false,
        })
    }

    pub async fn run(&mut self, cli: Cli) -> Result<()> {
        self.show_sources = cli.show_sources;
        let question = cli.question.join(" ");

        if let Some(path) = &cli.file {
            self.handle_load(path).await?;
        }

        if !question.trim().is_empty() {
            if cli.file.is_none() {
                bail!("A one-shot question needs a document; pass --file <PDF>");
            }
            return self.handle_ask(&question).await;
        }

        self.handle_chat().await
    }

    async fn handle_chat(&mut self) -> Result<()> {
        println!("{}", "DocuMind - your document research assistant".bold());
        print_help();
        loop {
            let prompt = match self.session.document() {
                Some(info) => format!("Ask about {}", info.filename),
                None => "Ask".to_string(),
            };
            let input: String = Input::with_theme(&ColorfulTheme::default())
                .with_prompt(prompt)
                .allow_empty(true)
                .interact_text()?;

            let outcome = match ChatCommand::parse(&input) {
                ChatCommand::Empty => Ok(()),
                ChatCommand::Exit => break,
                ChatCommand::Help => {
                    print_help();
                    Ok(())
                }
                ChatCommand::Invalid(msg) => {
                    println!("{}", msg.yellow());
                    Ok(())
                }
                ChatCommand::Load(path) => self.handle_load(&path).await,
                ChatCommand::Clear => {
                    self.rag_service.clear_history(&mut self.session);
                    println!("{}", "Chat history cleared.".green());
                    Ok(())
                }
                ChatCommand::Reset => self.handle_reset(),
                ChatCommand::History => {
                    self.print_history();
                    Ok(())
                }
                ChatCommand::Ask(question) => self.handle_ask(&question).await,
            };
            // Failures are shown and the user may resubmit.
            if let Err(e) = outcome {
                println!("{}", format!("Error: {:#}", e).red());
            }
        }
        Ok(())
    }

    async fn handle_load(&mut self, path: &Path) -> Result<()> {
        if !is_supported_file(path) {
            bail!("Only PDF documents are supported: {}", path.display());
        }
        let bytes =
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document.pdf".to_string());

        println!("{}", format!("Processing {}...", filename).cyan());
        let report = self
            .rag_service
            .ingest(&mut self.session, Document::new(filename, bytes))
            .await?;
        println!(
            "{}",
            format!(
                "Document processed: {} chunks from {} characters ({:.1}s). Ask your questions below.",
                report.chunk_count,
                report.characters,
                report.elapsed.as_secs_f32()
            )
            .green()
        );
        Ok(())
    }

    async fn handle_ask(&mut self, question: &str) -> Result<()> {
        if self.session.state() == SessionState::Empty {
            println!(
                "{}",
                "No document loaded; answering without context. Use /load <file.pdf>.".yellow()
            );
        }
        eprintln!("{}", "Analyzing document...".dimmed());
        let answer = self.rag_service.ask(&mut self.session, question).await?;
        self.print_answer(&answer);
        Ok(())
    }

    fn handle_reset(&mut self) -> Result<()> {
        if ask_confirmation("Discard the document and chat history?", false)? {
            self.rag_service.reset(&mut self.session);
            println!("{}", "Session reset.".green());
        }
        Ok(())
    }

    fn print_answer(&self, answer: &Answer) {
        println!("{} {}", "assistant:".blue().bold(), answer.text);
        if self.show_sources {
            for hit in &answer.sources {
                let origin = format!(
                    "[{} @{} {:.3}]",
                    hit.chunk.source, hit.chunk.start, hit.score
                );
                println!("  {} {}", origin.dimmed(), preview(&hit.chunk.text, 80));
            }
        }
    }

    fn print_history(&self) {
        let messages = self.session.messages();
        if messages.is_empty() {
            println!("{}", "No messages yet.".dimmed());
            return;
        }
        for message in messages {
            let label = match message.role {
                Role::User => "user:".green().bold(),
                Role::Assistant => "assistant:".blue().bold(),
            };
            println!("{} {}", label, message.content);
        }
    }
}

fn print_help() {
    println!(
        "{}",
        "Commands: /load <file.pdf>, /clear (chat only), /reset (document and chat), /history, /help, exit"
            .dimmed()
    );
}
