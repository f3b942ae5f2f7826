use std::sync::Arc;

use allocation::api::{
    API_URL_ENV, ApiConfig, AssetDefaultsLoader, DEFAULT_API_URL, DEFAULT_DEFAULTS_PATH,
    HttpTransport, SimulationClient, Transport,
};
use allocation::ui::{Console, Effect, Event, UiController};
use clap::{Parser, Subcommand};
use tokio::io::BufReader;

#[derive(Parser, Debug)]
#[command(
    name = "allocation",
    about = "Configure a retirement portfolio and run it through the simulation service"
)]
struct Cli {
    #[arg(long, global = true, env = API_URL_ENV, default_value = DEFAULT_API_URL)]
    api_url: String,
    #[arg(
        long,
        global = true,
        default_value = DEFAULT_DEFAULTS_PATH,
        help = "Path of the asset defaults endpoint, e.g. /assets for a plain name list"
    )]
    defaults_path: String,
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive session (default)
    Shell,
    /// Load defaults, apply edits, submit once and print the result
    Simulate {
        #[arg(
            long = "weight",
            value_name = "ASSET=PERCENT",
            help = "Weight override in percent; may be repeated"
        )]
        weights: Vec<String>,
    },
    /// Print the default allocation
    Defaults,
    /// Check that the simulation service is reachable
    Health,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    allocation::logging::init_logging(&cli.log_level);

    let config = ApiConfig::new(&cli.api_url).with_defaults_path(&cli.defaults_path);
    let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new());
    let loader = AssetDefaultsLoader::new(config.clone(), transport.clone());
    let client = SimulationClient::new(config, transport);

    let outcome = match cli.command.unwrap_or(Command::Shell) {
        Command::Shell => run_shell(loader, client).await,
        Command::Simulate { weights } => run_once(loader, client, &weights).await,
        Command::Defaults => print_defaults(loader).await,
        Command::Health => client
            .health()
            .await
            .map(|status| println!("{status}"))
            .map_err(|e| e.to_string()),
    };

    if let Err(e) = outcome {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run_shell(loader: AssetDefaultsLoader, client: SimulationClient) -> Result<(), String> {
    let mut console = Console::new(loader, client);
    let input = BufReader::new(tokio::io::stdin());
    let mut output = tokio::io::stdout();
    console
        .run(input, &mut output)
        .await
        .map_err(|e| format!("terminal I/O failed: {e}"))
}

fn parse_override(raw: &str) -> Result<(String, String), String> {
    let Some((asset, value)) = raw.split_once('=') else {
        return Err(format!("--weight expects ASSET=PERCENT, got `{raw}`"));
    };
    Ok((asset.trim().to_string(), value.trim().to_string()))
}

async fn run_once(
    loader: AssetDefaultsLoader,
    client: SimulationClient,
    overrides: &[String],
) -> Result<(), String> {
    let mut controller = UiController::new();
    controller.handle(Event::DefaultsLoaded(loader.load().await));
    if controller.portfolio().is_empty() {
        return Err("asset defaults could not be loaded".to_string());
    }

    for raw in overrides {
        let (asset, value) = parse_override(raw)?;
        if controller.portfolio().weight(&asset).is_none() {
            return Err(format!("unknown asset `{asset}`"));
        }
        controller.handle(Event::WeightEdited { asset, raw: value });
    }

    match controller.handle(Event::SubmitRequested) {
        Effect::Simulate(request) => {
            let outcome = client.send(request).await;
            let failed = outcome.is_err();
            controller.handle(Event::SimulationResolved(outcome));
            print!("{}", controller.view());
            if failed {
                return Err("simulation request failed".to_string());
            }
            Ok(())
        }
        Effect::Alert(message) => Err(message.to_string()),
        Effect::None => Err("a simulation is already running".to_string()),
    }
}

async fn print_defaults(loader: AssetDefaultsLoader) -> Result<(), String> {
    let defaults = loader.load().await.map_err(|e| e.to_string())?;
    for (asset, pct) in defaults.weights() {
        println!("{asset}\t{pct:.2}%");
    }
    Ok(())
}
