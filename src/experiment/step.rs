use crate::foundation::error::{CircuitarError, CircuitarResult};

/// Terminal reference of the form `componentId[.pin]`, e.g. `R1.2` or `V1`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct TerminalRef(pub String);

impl TerminalRef {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Component id with any pin suffix removed.
    pub fn component(&self) -> &str {
        match self.0.split_once('.') {
            Some((base, _pin)) => base,
            None => &self.0,
        }
    }

    pub fn pin(&self) -> Option<&str> {
        self.0.split_once('.').map(|(_, pin)| pin)
    }
}

impl std::fmt::Display for TerminalRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One authored teaching step.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawStep", into = "RawStep")]
pub enum ExperimentStep {
    /// Reveal a component overlay.
    ShowComponent {
        target: String,
        text: Option<String>,
    },
    /// Draw a wire between two terminals.
    Connect {
        from: TerminalRef,
        to: TerminalRef,
        text: Option<String>,
    },
    /// Any other step; carries display text only.
    Info { action: String, text: Option<String> },
}

impl ExperimentStep {
    pub fn show(target: impl Into<String>) -> Self {
        Self::ShowComponent {
            target: target.into(),
            text: None,
        }
    }

    pub fn connect(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::Connect {
            from: TerminalRef::new(from),
            to: TerminalRef::new(to),
            text: None,
        }
    }

    pub fn info(action: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Info {
            action: action.into(),
            text: Some(text.into()),
        }
    }

    /// Authored text, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::ShowComponent { text, .. }
            | Self::Connect { text, .. }
            | Self::Info { text, .. } => text.as_deref(),
        }
    }

    /// Authored text, or a generated description for steps without one.
    pub fn display_text(&self) -> String {
        if let Some(t) = self.text() {
            return t.to_string();
        }
        match self {
            Self::ShowComponent { target, .. } => format!("Show {target}"),
            Self::Connect { from, to, .. } => {
                format!("Connect {} -> {}", from.component(), to.component())
            }
            Self::Info { action, .. } => action.clone(),
        }
    }

    pub fn validate(&self) -> CircuitarResult<()> {
        match self {
            Self::ShowComponent { target, .. } if target.trim().is_empty() => Err(
                CircuitarError::validation("show_component step has an empty target"),
            ),
            Self::Connect { from, to, .. }
                if from.component().is_empty() || to.component().is_empty() =>
            {
                Err(CircuitarError::validation(format!(
                    "connect step has an empty terminal ('{from}' -> '{to}')"
                )))
            }
            _ => Ok(()),
        }
    }
}

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
struct RawStep {
    #[serde(alias = "type")]
    action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

const SHOW_COMPONENT: &str = "show_component";
const CONNECT: &str = "connect";

impl TryFrom<RawStep> for ExperimentStep {
    type Error = String;

    fn try_from(raw: RawStep) -> Result<Self, Self::Error> {
        match raw.action.as_str() {
            SHOW_COMPONENT => {
                let target = raw
                    .target
                    .ok_or_else(|| "show_component step is missing 'target'".to_string())?;
                Ok(Self::ShowComponent {
                    target,
                    text: raw.text,
                })
            }
            CONNECT => match (raw.from, raw.to) {
                (Some(from), Some(to)) => Ok(Self::Connect {
                    from: TerminalRef(from),
                    to: TerminalRef(to),
                    text: raw.text,
                }),
                _ => Err("connect step needs both 'from' and 'to'".to_string()),
            },
            _ => Ok(Self::Info {
                action: raw.action,
                text: raw.text,
            }),
        }
    }
}

impl From<ExperimentStep> for RawStep {
    fn from(step: ExperimentStep) -> Self {
        match step {
            ExperimentStep::ShowComponent { target, text } => Self {
                action: SHOW_COMPONENT.to_string(),
                target: Some(target),
                text,
                ..Self::default()
            },
            ExperimentStep::Connect { from, to, text } => Self {
                action: CONNECT.to_string(),
                from: Some(from.0),
                to: Some(to.0),
                text,
                ..Self::default()
            },
            ExperimentStep::Info { action, text } => Self {
                action,
                text,
                ..Self::default()
            },
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/experiment/step.rs"]
mod tests;
