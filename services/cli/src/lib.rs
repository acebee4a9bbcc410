mod cli;
mod commands;
mod infra;

use camp_eval::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
