use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use udpxfer::cli::ServerArgs;
use udpxfer::net::DatagramEndpoint;
use udpxfer::session;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = ServerArgs::parse();

    if !args.input_file.is_file() {
        tracing::error!(path = %args.input_file.display(), "input file does not exist, aborting");
        return ExitCode::FAILURE;
    }

    let endpoint = match DatagramEndpoint::bind_server(args.server_ip, args.broadcast_port) {
        Ok(endpoint) => endpoint,
        Err(e) => {
            tracing::error!(error = %e, "could not bind server socket");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        ip = %args.server_ip,
        port = args.broadcast_port,
        file = %args.input_file.display(),
        "server started, waiting for a client"
    );

    match session::serve_client(&endpoint, &args.input_file) {
        Ok(()) => {
            tracing::info!("transfer complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "transfer failed");
            ExitCode::FAILURE
        }
    }
}
