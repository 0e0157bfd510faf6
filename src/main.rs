use clap::{Args, Parser, Subcommand};
use std::process::ExitCode;
use tabcopy::checklist::ChecklistUi;
use tabcopy::delivery::{
    write_summary_json, ClipboardSink, DeliveryOutcome, LogNotifier, StdoutSink, SystemClipboard,
};
use tabcopy::logger::initialize_logger;
use tabcopy::metrics::DEFAULT_LINE_LIMIT;
use tabcopy::{copy_all_open_documents, copy_selected_documents, CopyConfig, CopyError, FileDocumentSource};
use tokio::io::BufReader;
use tracing::error;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    #[command(subcommand)]
    cmd: SubCommands,
}

#[derive(Subcommand, Debug, Clone)]
enum SubCommands {
    /// Copy every open file
    All(CopyArgs),
    /// Pick the files to copy from a checklist
    Select(CopyArgs),
}

#[derive(Args, Debug, Clone)]
struct CopyArgs {
    /// Files, directories or glob patterns making up the open working set
    #[arg(required = true)]
    files: Vec<String>,
    #[arg(short = 'l', long, env = "TABCOPY_LINE_LIMIT", default_value_t = DEFAULT_LINE_LIMIT)]
    line_limit: usize,
    #[arg(long, help = "Write the result to stdout instead of the clipboard")]
    stdout: bool,
    #[arg(long, help = "Print the copy summary as JSON (to stderr when used with --stdout)")]
    json: bool,
}

impl CopyArgs {
    fn config(&self) -> CopyConfig {
        CopyConfig {
            line_limit: self.line_limit,
            use_stdout: self.stdout,
            json: self.json,
        }
    }
}

fn open_sink(config: &CopyConfig) -> Result<Box<dyn ClipboardSink>, CopyError> {
    if config.use_stdout {
        Ok(Box::new(StdoutSink::new(std::io::stdout())))
    } else {
        Ok(Box::new(SystemClipboard::new()?))
    }
}

async fn run(cmd: SubCommands) -> Result<Option<DeliveryOutcome>, CopyError> {
    let (args, interactive) = match cmd {
        SubCommands::All(args) => (args, false),
        SubCommands::Select(args) => (args, true),
    };
    let config = args.config();
    let source = FileDocumentSource::new(args.files);
    let mut sink = open_sink(&config)?;
    let notifier = LogNotifier;

    let outcome = if interactive {
        let ui = ChecklistUi::new(BufReader::new(tokio::io::stdin()), std::io::stderr());
        copy_selected_documents(&source, &config, sink.as_mut(), &notifier, ui).await?
    } else {
        Some(copy_all_open_documents(&source, &config, sink.as_mut(), &notifier).await?)
    };

    if config.json {
        if let Some(outcome) = &outcome {
            write_summary_json(
                outcome,
                config.use_stdout,
                &mut std::io::stdout(),
                &mut std::io::stderr(),
            )?;
        }
    }
    Ok(outcome)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli_args = CliArgs::parse();
    initialize_logger();

    match run(cli_args.cmd).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Error copying files: {}", e);
            ExitCode::FAILURE
        }
    }
}
