mod cli;
mod infra;
mod report;
mod routes;
mod server;

use flick_credit::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
