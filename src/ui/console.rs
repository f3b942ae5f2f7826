use std::fmt;
use std::future::Future;
use std::pin::Pin;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use super::controller::{Effect, Event, UiController, View};
use crate::api::{AssetDefaultsLoader, ClientError, SimulationClient};
use crate::core::{FULL_ALLOCATION, SimulationResult};

const HELP: &str = "\
Commands:
  set <asset> <percent>   change one asset's weight
  submit                  run the simulation
  show                    print the form again
  help                    this text
  quit                    leave once any running simulation has finished
";

type Pending = Pin<Box<dyn Future<Output = Result<SimulationResult, ClientError>>>>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Set { asset: String, raw: String },
    Submit,
    Show,
    Help,
    Quit,
    Blank,
    Unknown(String),
}

fn parse_command(line: &str) -> Command {
    let mut parts = line.trim().splitn(3, char::is_whitespace);
    let Some(word) = parts.next().filter(|w| !w.is_empty()) else {
        return Command::Blank;
    };
    match word.to_ascii_lowercase().as_str() {
        "set" => match parts.next() {
            Some(asset) => Command::Set {
                asset: asset.to_string(),
                raw: parts.next().unwrap_or("").trim().to_string(),
            },
            None => Command::Unknown(line.trim().to_string()),
        },
        "submit" | "run" => Command::Submit,
        "show" | "ls" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        _ => Command::Unknown(line.trim().to_string()),
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fields.is_empty() {
            writeln!(f, "No assets loaded.")?;
            return Ok(());
        }

        let width = self
            .fields
            .iter()
            .map(|field| field.label.len())
            .max()
            .unwrap_or(0);
        writeln!(f, "Portfolio (%)")?;
        for field in &self.fields {
            writeln!(f, "  {:<width$}  {:>7}", field.label, field.text)?;
        }

        let total: f64 = self.fields.iter().map(|field| field.value).sum();
        let status = if self.loading {
            "simulating..."
        } else if self.submit_enabled {
            "ready to submit"
        } else {
            "submit disabled"
        };
        writeln!(
            f,
            "  {:<width$}  {:>7.2}  / {FULL_ALLOCATION:.0} ({status})",
            "total", total
        )?;

        for line in &self.results {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Line-driven front end around [`UiController`].
pub struct Console {
    loader: AssetDefaultsLoader,
    client: SimulationClient,
    controller: UiController,
}

impl Console {
    pub fn new(loader: AssetDefaultsLoader, client: SimulationClient) -> Self {
        Self {
            loader,
            client,
            controller: UiController::new(),
        }
    }

    pub fn controller(&self) -> &UiController {
        &self.controller
    }

    pub async fn mount(&mut self) {
        let outcome = self.loader.load().await;
        self.controller.handle(Event::DefaultsLoaded(outcome));
    }

    pub async fn run<R, W>(&mut self, input: R, output: &mut W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        self.mount().await;
        if self.controller.view().fields.is_empty() {
            write_out(output, "Could not load asset defaults; nothing to edit.\n").await?;
        } else {
            write_out(output, &self.controller.view().to_string()).await?;
        }

        let mut lines = input.lines();
        let mut pending: Option<Pending> = None;
        let mut reading = true;

        while reading || pending.is_some() {
            tokio::select! {
                outcome = wait(&mut pending), if pending.is_some() => {
                    pending = None;
                    let failed = outcome.is_err();
                    self.controller.handle(Event::SimulationResolved(outcome));
                    if failed {
                        write_out(output, "Simulation failed; previous results kept.\n").await?;
                    }
                    write_out(output, &self.controller.view().to_string()).await?;
                }
                line = lines.next_line(), if reading => {
                    let Some(line) = line? else {
                        reading = false;
                        continue;
                    };
                    match parse_command(&line) {
                        Command::Set { asset, raw } => {
                            if self.controller.portfolio().weight(&asset).is_none() {
                                write_out(output, &format!("Unknown asset: {asset}\n")).await?;
                                continue;
                            }
                            self.controller.handle(Event::WeightEdited { asset, raw });
                            write_out(output, &self.controller.view().to_string()).await?;
                        }
                        Command::Submit => match self.controller.handle(Event::SubmitRequested) {
                            Effect::Simulate(request) => {
                                let client = self.client.clone();
                                pending = Some(Box::pin(async move { client.send(request).await }));
                                write_out(output, "Simulating...\n").await?;
                            }
                            Effect::Alert(message) => {
                                write_out(output, &format!("{message}\n")).await?;
                            }
                            Effect::None => {
                                write_out(output, "A simulation is already running.\n").await?;
                            }
                        },
                        Command::Show => {
                            write_out(output, &self.controller.view().to_string()).await?;
                        }
                        Command::Help => write_out(output, HELP).await?,
                        Command::Quit => reading = false,
                        Command::Blank => {}
                        Command::Unknown(text) => {
                            write_out(output, &format!("Unknown command: {text} (try `help`)\n"))
                                .await?;
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

async fn wait(pending: &mut Option<Pending>) -> Result<SimulationResult, ClientError> {
    match pending {
        Some(fut) => fut.await,
        None => std::future::pending().await,
    }
}

async fn write_out<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> std::io::Result<()> {
    output.write_all(text.as_bytes()).await?;
    output.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::ScriptedTransport;
    use crate::api::{ApiConfig, TransportError};
    use crate::ui::Field;
    use serde_json::json;
    use std::sync::Arc;
    use tokio::io::BufReader;

    fn console_with(transport: Arc<ScriptedTransport>) -> Console {
        let config = ApiConfig::new("http://svc");
        Console::new(
            AssetDefaultsLoader::new(config.clone(), transport.clone()),
            SimulationClient::new(config, transport),
        )
    }

    async fn run_script(console: &mut Console, script: &str) -> String {
        let mut output = Vec::new();
        console
            .run(BufReader::new(script.as_bytes()), &mut output)
            .await
            .expect("console run");
        String::from_utf8(output).expect("utf8 output")
    }

    #[test]
    fn parse_command_understands_set() {
        assert_eq!(
            parse_command("set VFINX 60"),
            Command::Set {
                asset: "VFINX".to_string(),
                raw: "60".to_string(),
            }
        );
        assert_eq!(
            parse_command("  SET VFINX  "),
            Command::Set {
                asset: "VFINX".to_string(),
                raw: String::new(),
            }
        );
    }

    #[test]
    fn parse_command_other_words() {
        assert_eq!(parse_command("submit"), Command::Submit);
        assert_eq!(parse_command("show"), Command::Show);
        assert_eq!(parse_command("quit"), Command::Quit);
        assert_eq!(parse_command("   "), Command::Blank);
        assert_eq!(parse_command("set"), Command::Unknown("set".to_string()));
        assert_eq!(parse_command("fly"), Command::Unknown("fly".to_string()));
    }

    #[test]
    fn view_renders_fields_and_results() {
        let view = View {
            fields: vec![
                Field {
                    label: "VBMFX".to_string(),
                    value: 40.0,
                    text: "40.00".to_string(),
                },
                Field {
                    label: "VFINX".to_string(),
                    value: 60.0,
                    text: "60.00".to_string(),
                },
            ],
            submit_enabled: true,
            loading: false,
            results: vec!["Success Rate: 95.00%".to_string()],
        };
        let text = view.to_string();
        assert!(text.contains("VBMFX    40.00"));
        assert!(text.contains("ready to submit"));
        assert!(text.contains("Success Rate: 95.00%"));
    }

    #[tokio::test]
    async fn full_session_prints_results() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .reply(Ok(json!({"VFINX": 0.5, "VBMFX": 0.5})))
                .reply(Ok(json!({"success_rate": 0.95, "median_final_balance": 1000000}))),
        );
        let mut console = console_with(transport.clone());

        let output = run_script(&mut console, "set VFINX 60\nset VBMFX 40\nsubmit\n").await;

        assert!(output.contains("Success Rate: 95.00%"), "{output}");
        assert!(output.contains("Median Final Balance: $1,000,000.00"), "{output}");
        let sent = transport.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(
            sent[1].body,
            Some(json!({"assets": {"VFINX": 0.6, "VBMFX": 0.4}}))
        );
        assert!(!console.controller().is_loading());
    }

    #[tokio::test]
    async fn invalid_weights_alert_and_send_nothing() {
        let transport =
            Arc::new(ScriptedTransport::new().reply(Ok(json!({"VFINX": 0.5, "VBMFX": 0.5}))));
        let mut console = console_with(transport.clone());

        let output = run_script(&mut console, "set VFINX 50\nset VBMFX 40\nsubmit\n").await;

        assert!(
            output.lines().any(|l| l == "Portfolio weights must sum to 100%."),
            "{output}"
        );
        assert_eq!(transport.sent().len(), 1);
    }

    #[tokio::test]
    async fn failed_defaults_leave_empty_form() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .reply(Err(TransportError::Network("connection refused".to_string()))),
        );
        let mut console = console_with(transport);

        let output = run_script(&mut console, "show\n").await;

        assert!(output.contains("nothing to edit"), "{output}");
        assert!(output.contains("No assets loaded."), "{output}");
        assert!(console.controller().view().fields.is_empty());
        assert_eq!(console.controller().diagnostics().len(), 1);
    }

    #[tokio::test]
    async fn failed_simulation_keeps_session_alive() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .reply(Ok(json!({"VFINX": 0.5, "VBMFX": 0.5})))
                .reply(Err(TransportError::Status {
                    status: 500,
                    detail: "boom".to_string(),
                })),
        );
        let mut console = console_with(transport);

        let output = run_script(&mut console, "submit\n").await;

        assert!(output.contains("Simulation failed"), "{output}");
        assert!(!output.contains("Success Rate"), "{output}");
        assert!(!console.controller().is_loading());
        assert!(console.controller().view().submit_enabled);
    }

    #[tokio::test]
    async fn unknown_asset_is_reported() {
        let transport =
            Arc::new(ScriptedTransport::new().reply(Ok(json!({"VFINX": 0.5, "VBMFX": 0.5}))));
        let mut console = console_with(transport);

        let output = run_script(&mut console, "set GOLD 10\n").await;
        assert!(output.contains("Unknown asset: GOLD"), "{output}");
    }
}
