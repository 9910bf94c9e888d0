use clap::Parser;
use log::info;
use server::network::RelayServer;
use shared::{DEFAULT_PATH, DEFAULT_PORT};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server IP address to bind to
    #[arg(short = 'H', long, default_value = "0.0.0.0")]
    host: String,

    /// Server port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Path clients upgrade on
    #[arg(long, default_value = DEFAULT_PATH)]
    path: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let address = format!("{}:{}", args.host, args.port);

    let server = RelayServer::bind(&address, &args.path).await?;
    info!(
        "Server started on ws://{}{}",
        server.local_addr()?,
        server.path()
    );

    tokio::select! {
        result = server.run() => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}
