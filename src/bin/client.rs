use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use udpxfer::cli::ClientArgs;
use udpxfer::net::DatagramEndpoint;
use udpxfer::session;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = ClientArgs::parse();

    let endpoint = match DatagramEndpoint::bind_client(args.client_ip, args.client_port) {
        Ok(endpoint) => endpoint,
        Err(e) => {
            tracing::error!(error = %e, "could not bind client socket");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        server_ip = %args.server_ip,
        broadcast_port = args.broadcast_port,
        output = %args.output_file.display(),
        "client started, connecting to server"
    );

    match session::receive_file(&endpoint, args.server_ip, args.broadcast_port, &args.output_file) {
        Ok(()) => {
            tracing::info!(path = %args.output_file.display(), "file received successfully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "transfer failed");
            ExitCode::FAILURE
        }
    }
}
