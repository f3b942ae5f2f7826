use crate::api::ClientError;
use crate::core::{
    PortfolioState, SimulationRequest, SimulationResult, WEIGHTS_MUST_SUM_MESSAGE, is_valid,
    result_lines,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Phase {
    Empty,
    Editing,
    Submitting,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    DefaultsLoaded(Result<PortfolioState, ClientError>),
    WeightEdited { asset: String, raw: String },
    SubmitRequested,
    SimulationResolved(Result<SimulationResult, ClientError>),
}

/// What the driver has to do after an event.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Alert(&'static str),
    Simulate(SimulationRequest),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub label: String,
    pub value: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub fields: Vec<Field>,
    pub submit_enabled: bool,
    pub loading: bool,
    pub results: Vec<String>,
}

/// Owns the form state and decides every transition. Performs no I/O.
#[derive(Debug, Default)]
pub struct UiController {
    portfolio: PortfolioState,
    result: Option<SimulationResult>,
    loading: bool,
    loaded: bool,
    diagnostics: Vec<String>,
}

impl UiController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        if self.loading {
            Phase::Submitting
        } else if self.loaded {
            Phase::Editing
        } else {
            Phase::Empty
        }
    }

    pub fn portfolio(&self) -> &PortfolioState {
        &self.portfolio
    }

    pub fn result(&self) -> Option<&SimulationResult> {
        self.result.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    pub fn submit_enabled(&self) -> bool {
        self.phase() == Phase::Editing && is_valid(&self.portfolio)
    }

    pub fn handle(&mut self, event: Event) -> Effect {
        match event {
            Event::DefaultsLoaded(outcome) => {
                self.on_defaults(outcome);
                Effect::None
            }
            Event::WeightEdited { asset, raw } => {
                self.portfolio.set_weight(&asset, &raw);
                Effect::None
            }
            Event::SubmitRequested => self.on_submit(),
            Event::SimulationResolved(outcome) => {
                self.on_resolved(outcome);
                Effect::None
            }
        }
    }

    pub fn view(&self) -> View {
        let fields = self
            .portfolio
            .weights()
            .iter()
            .map(|(asset, weight)| Field {
                label: asset.clone(),
                value: *weight,
                text: format!("{weight:.2}"),
            })
            .collect();
        View {
            fields,
            submit_enabled: self.submit_enabled(),
            loading: self.loading,
            results: result_lines(self.result.as_ref()),
        }
    }

    fn on_defaults(&mut self, outcome: Result<PortfolioState, ClientError>) {
        match outcome {
            Ok(portfolio) => {
                self.portfolio = portfolio;
                self.loaded = true;
            }
            Err(err) => self.record("failed to load asset defaults", &err),
        }
    }

    fn on_submit(&mut self) -> Effect {
        if self.loading {
            tracing::debug!("submit ignored while a simulation is in flight");
            return Effect::None;
        }
        if !is_valid(&self.portfolio) {
            tracing::info!(total = self.portfolio.total(), "submission rejected");
            return Effect::Alert(WEIGHTS_MUST_SUM_MESSAGE);
        }
        self.loading = true;
        Effect::Simulate(self.portfolio.to_request())
    }

    fn on_resolved(&mut self, outcome: Result<SimulationResult, ClientError>) {
        if !self.loading {
            tracing::warn!("dropping simulation response with no submission pending");
            return;
        }
        self.loading = false;
        match outcome {
            Ok(result) => self.result = Some(result),
            Err(err) => self.record("simulation request failed", &err),
        }
    }

    fn record(&mut self, context: &str, err: &ClientError) {
        tracing::error!(error = %err, "{context}");
        self.diagnostics.push(format!("{context}: {err}"));
    }
}
