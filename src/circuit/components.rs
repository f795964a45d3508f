use crate::foundation::error::{CircuitarError, CircuitarResult};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Ideal DC voltage source.
pub struct VoltageSource {
    /// Component id, e.g. `V1`.
    pub name: String,
    /// Terminal voltage in volts.
    pub voltage: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Ideal resistor.
pub struct Resistor {
    /// Component id, e.g. `R1`.
    pub name: String,
    /// Resistance in ohms.
    pub resistance: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// LED modelled as a fixed forward-voltage drop with a current rating.
pub struct Led {
    /// Component id, e.g. `LED1`.
    pub name: String,
    /// Forward voltage while conducting, in volts.
    pub forward_voltage: f64,
    /// Maximum safe current in amps.
    pub max_current: f64,
}

impl VoltageSource {
    pub fn new(name: impl Into<String>, voltage: f64) -> Self {
        Self {
            name: name.into(),
            voltage,
        }
    }

    pub fn validate(&self) -> CircuitarResult<()> {
        check_name(&self.name)?;
        check_finite(&self.name, "voltage", self.voltage)
    }
}

impl Resistor {
    pub fn new(name: impl Into<String>, resistance: f64) -> Self {
        Self {
            name: name.into(),
            resistance,
        }
    }

    pub fn validate(&self) -> CircuitarResult<()> {
        check_name(&self.name)?;
        check_finite(&self.name, "resistance", self.resistance)
    }
}

impl Led {
    pub fn new(name: impl Into<String>, forward_voltage: f64, max_current: f64) -> Self {
        Self {
            name: name.into(),
            forward_voltage,
            max_current,
        }
    }

    pub fn validate(&self) -> CircuitarResult<()> {
        check_name(&self.name)?;
        check_finite(&self.name, "forward_voltage", self.forward_voltage)?;
        check_finite(&self.name, "max_current", self.max_current)
    }
}

fn check_name(name: &str) -> CircuitarResult<()> {
    if name.trim().is_empty() {
        return Err(CircuitarError::validation("component name must be non-empty"));
    }
    Ok(())
}

// Non-positive resistances are solver policy, not a validation failure.
fn check_finite(name: &str, field: &str, v: f64) -> CircuitarResult<()> {
    if !v.is_finite() {
        return Err(CircuitarError::validation(format!(
            "component '{name}' has non-finite {field}"
        )));
    }
    Ok(())
}
