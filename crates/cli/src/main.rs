use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "menubot")]
#[command(about = "Menubot CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version
    Version,

    /// Run the webhook gateway. Requires TWILIO_NUMBER, TWILIO_SID and TWILIO_TOKEN (env or config).
    Gateway {
        /// Config file path (default: MENUBOT_CONFIG_PATH or ~/.menubot/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,

        /// HTTP port (default from config or 5000)
        #[arg(long, short)]
        port: Option<u16>,
    },

    /// Print the reply the bot would send for a message, without sending anything.
    Reply {
        /// Incoming message text
        text: String,
    },
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Version) => {
            println!("menubot {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Gateway { config, port }) => {
            if let Err(e) = run_gateway(config, port).await {
                log::error!("gateway failed: {:#}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Reply { text }) => {
            let table = menubot::dispatch::ReplyTable::default();
            println!("{}", table.classify(&text));
        }
        None => {
            println!("Run with --help for usage");
        }
    }
}

async fn run_gateway(
    config_path: Option<std::path::PathBuf>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    let mut config = menubot::config::load_config(config_path)?;
    if let Some(p) = port {
        config.gateway.port = p;
    }
    let credentials = menubot::config::resolve_credentials(&config)?;
    log::info!("starting gateway on {}:{}", config.gateway.bind, config.gateway.port);
    menubot::gateway::run_gateway_with_credentials(config, credentials).await
}
