use crate::server;
use crate::simulate::{print_screens, run_simulation, ScreensArgs, SimulateArgs};
use clap::{Args, Parser, Subcommand};
use hive_ussd::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Hive USSD",
    about = "Serve and exercise the Bee Cover USSD menu from the command line",
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
    /// Answer a single gateway callback locally and print the wire reply
    Simulate(SimulateArgs),
    /// Print every screen of the catalog for one language
    Screens(ScreensArgs),
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
        Command::Simulate(args) => run_simulation(args).await,
        Command::Screens(args) => print_screens(args),
    }
}
