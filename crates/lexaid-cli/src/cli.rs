use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "lexaid", about = "Legal assistant: case analysis, drafting, statutes, consultation", version)]
pub struct Cli {
    /// Print machine-readable JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Gateway base URL (overrides LEXAID_GATEWAY).
    #[arg(long, global = true, value_name = "URL")]
    pub gateway: Option<String>,

    /// Model id (overrides LEXAID_MODEL).
    #[arg(long, global = true)]
    pub model: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze a case from the plaintiff's or defendant's side.
    Analyze(AnalyzeArgs),
    /// Draft a legal document from a template.
    Draft(DraftArgs),
    /// Look up statutes by keyword.
    Statutes(StatutesArgs),
    /// Multi-turn legal consultation.
    Consult(ConsultArgs),
    /// Run the structural compliance checks on a document.
    Check(CheckArgs),
    /// Export a document as .docx or printable HTML.
    Export(ExportArgs),
    /// Show configuration and whether the upstream credential is set.
    Doctor,
}

/// Case text from a flag, a file, or piped stdin.
#[derive(Args, Debug, Default)]
pub struct InputArgs {
    /// Case details as text.
    #[arg(long, value_name = "TEXT", conflicts_with = "file")]
    pub details: Option<String>,

    /// Read case details from a file.
    #[arg(long, short = 'f', value_name = "PATH")]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Case category id (see --list).
    #[arg(long, short = 'c', default_value = "contract")]
    pub category: String,

    #[arg(long, short = 'p', value_enum, default_value_t = Side::Plaintiff)]
    pub perspective: Side,

    /// List case categories and suggested materials, then exit.
    #[arg(long)]
    pub list: bool,

    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Plaintiff,
    Defendant,
}

#[derive(Args, Debug)]
pub struct DraftArgs {
    /// Template id: civil_complaint, civil_response, appeal, evidence_list,
    /// counter_suit, settlement_agreement.
    #[arg(long, short = 't', default_value = "civil_complaint")]
    pub template: String,

    #[arg(long)]
    pub plaintiff: Option<String>,

    #[arg(long)]
    pub defendant: Option<String>,

    /// Case type for the extra checks: loan, labor, finance, insurance.
    #[arg(long)]
    pub case_type: Option<String>,

    #[arg(long)]
    pub court: Option<String>,

    #[arg(long)]
    pub case_number: Option<String>,

    /// Do not ask for statute citations.
    #[arg(long)]
    pub no_cite_law: bool,

    /// Do not ask for case citations.
    #[arg(long)]
    pub no_cite_cases: bool,

    /// Do not ask for an evidence list.
    #[arg(long)]
    pub no_evidence: bool,

    /// 正式, 稳健 or 通俗.
    #[arg(long, default_value = "正式")]
    pub tone: String,

    /// Also write the document text to this file.
    #[arg(long, short = 'o', value_name = "PATH")]
    pub out: Option<PathBuf>,

    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Args, Debug)]
pub struct StatutesArgs {
    #[arg(required_unless_present = "categories")]
    pub keyword: Option<String>,

    /// List the statute browsing categories, then exit.
    #[arg(long, conflicts_with = "keyword")]
    pub categories: bool,
}

#[derive(Args, Debug)]
pub struct ConsultArgs {
    /// Ask one question and exit instead of starting the prompt.
    #[arg(long, short = 'm')]
    pub message: Option<String>,

    /// Forget the stored conversation before starting.
    #[arg(long)]
    pub fresh: bool,
}

/// Common switches for commands that read a document.
#[derive(Args, Debug, Default)]
pub struct DocumentArgs {
    /// Document file. Defaults to the last drafted document.
    pub path: Option<PathBuf>,

    /// Treat the file as HTML rather than Markdown/plain text.
    #[arg(long)]
    pub html_input: bool,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub doc: DocumentArgs,

    /// Template id used for the check and the autofilled title.
    #[arg(long, short = 't')]
    pub template: Option<String>,

    #[arg(long)]
    pub case_type: Option<String>,

    /// Skip the statute citation check.
    #[arg(long)]
    pub no_cite_law: bool,

    /// Skip the evidence list check.
    #[arg(long)]
    pub no_evidence: bool,

    /// Print the document with placeholder sections added for failed checks.
    #[arg(long)]
    pub autofill: bool,

    /// Write the autofilled document here instead of stdout.
    #[arg(long, short = 'o', value_name = "PATH", requires = "autofill")]
    pub out: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    /// Word document.
    Docx,
    /// Printable HTML page.
    Html,
    /// Plain-text legal layout as an HTML fragment.
    Legal,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Docx => "docx",
            Self::Html | Self::Legal => "html",
        }
    }
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    #[command(flatten)]
    pub doc: DocumentArgs,

    #[arg(long, value_enum, default_value_t = ExportFormat::Docx)]
    pub format: ExportFormat,

    /// Document title; defaults to the drafted document's title.
    #[arg(long)]
    pub title: Option<String>,

    /// Output file; defaults to `<title>.<ext>` in the current directory.
    #[arg(long, short = 'o', value_name = "PATH")]
    pub out: Option<PathBuf>,
}
