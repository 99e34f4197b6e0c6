use clap::Parser;
use routekeeper::adapter::inbound::cli::command::Cli;
use routekeeper::adapter::inbound::cli::{dispatch, operator, output};
use routekeeper::error::ErrorResponse;
use routekeeper::infrastructure::operator::entry::Operator;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let _ = rustls::crypto::ring::default_provider().install_default();
    let _ = operator::install(Box::new(Operator::new()));

    let cli = Cli::parse();
    if let Err(e) = dispatch::execute(cli).await {
        let response = ErrorResponse::from(&e);
        output::error(&format!("{e} ({})", response.error_code));
        std::process::exit(1);
    }
}
