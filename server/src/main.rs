mod network;

use clap::Parser;
use network::DiscoveryServer;
use protocol::{ProtocolRevision, ServerDescriptor};

/// Main-method of the application.
/// Parses command-line arguments, binds the UDP socket and serves
/// discovery queries until interrupted.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Command line arguments
    #[derive(Parser, Debug)]
    #[clap(author, version, about)]
    struct Args {
        /// Server IP address to bind to
        #[clap(short = 'H', long, default_value = "0.0.0.0")]
        host: String,
        /// UDP port to listen on and advertise
        #[clap(short, long, default_value = "4534")]
        port: u16,
        /// Display name shown in server browsers
        #[clap(short, long, default_value = "Unnamed Server")]
        name: String,
        /// Hostname to advertise; empty makes clients use the sender IP
        #[clap(long, default_value = "")]
        hostname: String,
        /// Wire revision of the long info reply (0.2.8 or 0.2.9)
        #[clap(short, long, default_value = "0.2.9")]
        revision: ProtocolRevision,
    }

    env_logger::init();

    let args = Args::parse();

    let descriptor = ServerDescriptor::new(&args.name, &args.hostname, args.port);
    let address = format!("{}:{}", args.host, args.port);
    let server = DiscoveryServer::bind(&address, descriptor, args.revision).await?;

    // Handle shutdown gracefully
    tokio::select! {
        result = server.run() => {
            if let Err(e) = result {
                eprintln!("Server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            println!("Received Ctrl+C, shutting down gracefully...");
        }
    }

    Ok(())
}
