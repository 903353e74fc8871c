mod cli;
mod demo;
mod infra;
mod routes;
mod server;

use dt_benchmark::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
