mod cli;
mod infra;
mod report;
mod routes;
mod server;

use clan_sync::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
