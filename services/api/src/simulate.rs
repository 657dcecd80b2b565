use crate::infra::{build_ussd_service, parse_language};
use clap::Args;
use hive_ussd::config::AppConfig;
use hive_ussd::error::AppError;
use hive_ussd::ussd::{Language, ScreenCatalog, UssdRequest};

#[derive(Args, Debug)]
pub(crate) struct SimulateArgs {
    /// Cumulative `*`-joined answer history, exactly as the gateway would send it
    #[arg(long, default_value = "")]
    pub(crate) text: String,
    /// Caller MSISDN used for the payment hand-off
    #[arg(long, default_value = "+254700000000")]
    pub(crate) phone: String,
    /// Gateway session identifier
    #[arg(long, default_value = "cli-simulation")]
    pub(crate) session_id: String,
    /// USSD service code the caller dialled
    #[arg(long, default_value = "*384#")]
    pub(crate) service_code: String,
    /// Ignore any configured scoring credential and quote from the local formula
    #[arg(long)]
    pub(crate) offline: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ScreensArgs {
    /// Catalog language: en or sw
    #[arg(long, default_value = "en", value_parser = parse_language)]
    pub(crate) language: Language,
}

pub(crate) async fn run_simulation(args: SimulateArgs) -> Result<(), AppError> {
    let SimulateArgs {
        text,
        phone,
        session_id,
        service_code,
        offline,
    } = args;

    let mut config = AppConfig::load()?;
    if offline {
        config.scoring.api_token = None;
    }

    let service = build_ussd_service(&config.scoring)?;
    let request = UssdRequest {
        session_id,
        service_code,
        phone_number: phone,
        text,
    };

    let reply = service.handle(&request).await;
    println!("{reply}");
    Ok(())
}

pub(crate) fn print_screens(args: ScreensArgs) -> Result<(), AppError> {
    let catalog = ScreenCatalog::standard()?;
    println!("Screen catalog ({})", args.language);
    for screen in catalog.screens(args.language) {
        println!("\n[step {}] {:?}", screen.step, screen.kind);
        println!("{}", screen.text);
    }
    Ok(())
}
