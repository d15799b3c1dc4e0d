use crate::report::{run_credit_evaluate, run_credit_report, CreditEvaluateArgs, CreditReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use flick_credit::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Flick Credit",
    about = "Track store credit (fiado) balances, due dates and late interest",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Evaluate customer credit from the command line
    Credit {
        #[command(subcommand)]
        command: CreditCommand,
    },
}

#[derive(Subcommand, Debug)]
enum CreditCommand {
    /// Portfolio report for a CSV export or the customer API
    Report(CreditReportArgs),
    /// Evaluate a single balance against a payment term
    Evaluate(CreditEvaluateArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Credit {
            command: CreditCommand::Report(args),
        } => run_credit_report(args).await,
        Command::Credit {
            command: CreditCommand::Evaluate(args),
        } => run_credit_evaluate(args),
    }
}
