use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use ethics_review::app::{App, RunRequest};
use ethics_review::config::Config;
use ethics_review::models::ReportFormat;
use ethics_review::utils::logging;

#[derive(Parser)]
#[command(name = "ethics-review")]
#[command(about = "Classify ethics submission documents and generate an AI-assisted review report")]
struct Args {
    /// Submitted documents (PDF or plain text)
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Applicant name shown in the report
    #[arg(short, long, default_value = "")]
    name: String,

    /// Report format: txt, docx or pdf (defaults to the configured format)
    #[arg(short, long)]
    format: Option<ReportFormat>,

    /// Output file path (auto-generated in the output directory if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Reference documents folder (overrides configuration)
    #[arg(short, long)]
    references: Option<PathBuf>,

    /// Path to config file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the run outcome as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // 加载配置
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(dir) = args.references {
        config.reference_docs_dir = dir;
    }
    config.verbose_logging |= args.verbose;

    // 初始化日志
    logging::init(config.verbose_logging);

    let app = App::initialize(config)?;
    let request = RunRequest {
        uploads: args.files,
        applicant: args.name,
        format: args.format,
        output: args.output,
    };

    match app.run(request).await {
        Ok(outcome) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                println!("{}", outcome.artifact_path.display());
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("{}", e.user_message());
            Ok(ExitCode::FAILURE)
        }
    }
}
