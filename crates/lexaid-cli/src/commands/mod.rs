mod analyze;
mod check;
mod consult;
mod doctor;
mod draft;
mod export;
mod statutes;

use std::io::{IsTerminal, Read, Write};
use std::path::Path;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use lexaid_agent::ChatClient;
use lexaid_core::{compliance::CaseType, config::Config};
use lexaid_domains::documents::{DraftPreferences, DraftedDocument};
use serde::Serialize;

use crate::cli::{Cli, Command, DocumentArgs, InputArgs};

pub use check::check;
pub use doctor::doctor;
pub use export::export;
pub use statutes::statutes;

/// Settings shared by every subcommand.
pub struct Ctx {
    pub config: Config,
    pub json: bool,
}

impl Ctx {
    pub fn new(mut config: Config, cli: &Cli) -> Self {
        if let Some(url) = &cli.gateway {
            config.gateway_url = url.trim_end_matches('/').to_string();
        }
        if let Some(model) = &cli.model {
            config.model = model.clone();
        }
        Self {
            config,
            json: cli.json,
        }
    }

    fn client(&self) -> Result<ChatClient> {
        ChatClient::from_config(&self.config)
    }
}

pub async fn run(cli: Cli) -> Result<ExitCode> {
    let ctx = Ctx::new(Config::from_env()?, &cli);
    let mut out = std::io::stdout();
    let passed = match cli.command {
        Command::Analyze(args) => analyze::run(&ctx, args, &mut out).await.map(|()| true),
        Command::Draft(args) => draft::run(&ctx, args, &mut out).await.map(|()| true),
        Command::Statutes(args) => statutes(&ctx, args, &mut out).await.map(|()| true),
        Command::Consult(args) => consult::run(&ctx, args, &mut out).await.map(|()| true),
        Command::Check(args) => check(&ctx, args, &mut out),
        Command::Export(args) => export(&ctx, args, &mut out).map(|()| true),
        Command::Doctor => doctor(&ctx, &mut out).await,
    }?;
    Ok(if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn write_json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn parse_case_type(raw: Option<&str>) -> Result<Option<CaseType>> {
    raw.filter(|s| !s.trim().is_empty())
        .map(str::parse)
        .transpose()
}

/// `--details`, then `--file`, then piped stdin.
fn read_input(input: &InputArgs) -> Result<String> {
    if let Some(text) = &input.details {
        return Ok(text.clone());
    }
    if let Some(path) = &input.file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()));
    }
    let mut stdin = std::io::stdin();
    if stdin.is_terminal() {
        bail!("no case details given (use --details, --file or pipe them on stdin)");
    }
    let mut text = String::new();
    stdin.read_to_string(&mut text).context("reading stdin")?;
    Ok(text)
}

/// A document to check or export, from a file or the last draft.
struct LoadedDocument {
    content: String,
    is_html: bool,
    title: Option<String>,
    template_id: Option<String>,
    case_type: Option<CaseType>,
    preferences: DraftPreferences,
}

fn load_document(config: &Config, args: &DocumentArgs) -> Result<LoadedDocument> {
    if let Some(path) = &args.path {
        return Ok(LoadedDocument {
            content: std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?,
            is_html: args.html_input,
            title: title_from_path(path),
            template_id: None,
            case_type: None,
            preferences: DraftPreferences::default(),
        });
    }
    let last = config.last_document_path();
    let Some(doc) = DraftedDocument::load(&last)? else {
        bail!("no document given and nothing drafted yet (run `lexaid draft` first)");
    };
    Ok(LoadedDocument {
        content: doc.content,
        is_html: false,
        title: Some(doc.title),
        template_id: Some(doc.template_id),
        case_type: doc.case_type,
        preferences: doc.preferences,
    })
}

fn title_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
