use std::io::{self, BufRead, Write};

use serde::Serialize;
use tracing::debug;

use gendercast_core::{
    extract_gender_features, GenderCastError, Prediction, PredictionSource, Result,
};

use crate::adapter::ClassifierAdapter;
use crate::config::ShellConfig;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Result of one predict request.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// The name as classified: truncated and trimmed.
    pub name: String,
    pub result: Result<Prediction>,
}

#[derive(Serialize)]
struct OutcomeRecord<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<PredictionSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn render(&self, emoji: bool) -> String {
        match &self.result {
            Ok(prediction) => {
                let label = prediction.label.as_str();
                let icon = match (emoji, label) {
                    (true, "male") => "👦 ",
                    (true, "female") => "👧 ",
                    _ => "",
                };
                let mut line = format!(
                    "Predicted gender for \"{}\": {}{}",
                    self.name,
                    icon,
                    label.to_uppercase()
                );
                if prediction.source == PredictionSource::Heuristic {
                    line.push_str(" (heuristic stand-in, not a model prediction)");
                }
                line
            }
            Err(GenderCastError::EmptyInput) => "Input cannot be empty. Type a name.".to_string(),
            Err(GenderCastError::ModelUnavailable { reason }) => {
                format!("Prediction unavailable: {reason}")
            }
            Err(GenderCastError::ClassifierFailure(message)) => {
                format!("Prediction failed: {message}")
            }
            Err(other) => format!("Prediction failed: {other}"),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        let record = match &self.result {
            Ok(prediction) => OutcomeRecord {
                name: &self.name,
                label: Some(prediction.label.as_str()),
                source: Some(prediction.source),
                error: None,
            },
            Err(err) => OutcomeRecord {
                name: &self.name,
                label: None,
                source: None,
                error: Some(err.to_string()),
            },
        };

        serde_json::to_value(record).unwrap_or(serde_json::Value::Null)
    }
}

/// Counts from an interactive session.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub requests: usize,
    pub predicted: usize,
}

/// The request path: validate, extract, classify, render.
pub struct Shell {
    adapter: ClassifierAdapter,
    config: ShellConfig,
}

impl Shell {
    pub fn new(adapter: ClassifierAdapter, config: ShellConfig) -> Self {
        Self { adapter, config }
    }

    pub fn adapter(&self) -> &ClassifierAdapter {
        &self.adapter
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    /// Empty or whitespace-only input never reaches the classifier.
    pub fn predict(&self, input: &str) -> Outcome {
        let name = self.config.normalize_input(input);

        if name.is_empty() {
            return Outcome {
                name,
                result: Err(GenderCastError::EmptyInput),
            };
        }

        let features = extract_gender_features(&name);
        let result = self.adapter.classify(&features);
        debug!(name = %name, ok = result.is_ok(), "predict request");

        Outcome { name, result }
    }

    /// Predicts many names. Output order matches input order.
    pub fn predict_batch(&self, inputs: &[String]) -> Vec<Outcome> {
        #[cfg(feature = "parallel")]
        {
            inputs.par_iter().map(|input| self.predict(input)).collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            inputs.iter().map(|input| self.predict(input)).collect()
        }
    }

    pub fn render(&self, outcome: &Outcome) -> String {
        outcome.render(self.config.emoji)
    }

    /// Reads one name per line until EOF, answering each.
    pub fn run_interactive<R: BufRead, W: Write>(
        &self,
        mut input: R,
        mut output: W,
    ) -> io::Result<SessionSummary> {
        let mut summary = SessionSummary::default();
        let mut line = String::new();

        if let Some(reason) = self.adapter.unavailable_reason() {
            if self.adapter.is_fallback() {
                writeln!(
                    output,
                    "Warning: no trained model ({reason}); answers come from a heuristic stand-in."
                )?;
            } else {
                writeln!(output, "Warning: no trained model ({reason}).")?;
            }
        }

        loop {
            write!(output, "Enter a name: ")?;
            output.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                writeln!(output)?;
                break;
            }

            let outcome = self.predict(&line);
            summary.requests += 1;
            if outcome.is_success() {
                summary.predicted += 1;
            }
            writeln!(output, "{}", self.render(&outcome))?;
        }

        Ok(summary)
    }
}
