//! Positional CLI surface for the two binaries.

use std::net::Ipv4Addr;
use std::path::PathBuf;

use clap::Parser;

fn default_ip() -> Ipv4Addr {
    crate::constants::DEFAULT_IP.parse().unwrap()
}

/// `server <broadcast_port> <input_file> [server_ip]`
#[derive(Debug, Parser)]
#[command(version, about = "Serve a file over the Go-Back-N UDP transfer protocol")]
pub struct ServerArgs {
    pub broadcast_port: u16,
    pub input_file: PathBuf,
    #[arg(default_value_t = default_ip())]
    pub server_ip: Ipv4Addr,
}

/// `client <client_port> <broadcast_port> <output_file> [server_ip] [client_ip]`
#[derive(Debug, Parser)]
#[command(version, about = "Receive a file over the Go-Back-N UDP transfer protocol")]
pub struct ClientArgs {
    pub client_port: u16,
    pub broadcast_port: u16,
    pub output_file: PathBuf,
    #[arg(default_value_t = default_ip())]
    pub server_ip: Ipv4Addr,
    #[arg(default_value_t = default_ip())]
    pub client_ip: Ipv4Addr,
}
