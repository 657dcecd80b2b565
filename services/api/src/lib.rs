mod cli;
mod infra;
mod routes;
mod server;
mod simulate;

use hive_ussd::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
