use std::collections::BTreeSet;

use crate::{
    circuit::components::{Led, Resistor, VoltageSource},
    foundation::error::{CircuitarError, CircuitarResult},
};

/// Single source with resistors and LEDs all in series.
///
/// Element order carries no electrical meaning but is kept for display.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SeriesCircuit {
    pub source: VoltageSource,
    #[serde(default)]
    pub resistors: Vec<Resistor>,
    #[serde(default)]
    pub leds: Vec<Led>,
}

impl SeriesCircuit {
    pub fn new(source: VoltageSource) -> Self {
        Self {
            source,
            resistors: Vec::new(),
            leds: Vec::new(),
        }
    }

    pub fn with_resistor(mut self, resistor: Resistor) -> Self {
        self.resistors.push(resistor);
        self
    }

    pub fn with_led(mut self, led: Led) -> Self {
        self.leds.push(led);
        self
    }

    pub fn total_series_resistance(&self) -> f64 {
        self.resistors.iter().map(|r| r.resistance).sum()
    }

    pub fn total_led_drop(&self) -> f64 {
        self.leds.iter().map(|l| l.forward_voltage).sum()
    }

    /// Component ids in display order: source, resistors, LEDs.
    pub fn component_ids(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.source.name.as_str())
            .chain(self.resistors.iter().map(|r| r.name.as_str()))
            .chain(self.leds.iter().map(|l| l.name.as_str()))
    }

    pub fn validate(&self) -> CircuitarResult<()> {
        self.source.validate()?;
        for r in &self.resistors {
            r.validate()?;
        }
        for l in &self.leds {
            l.validate()?;
        }

        let mut seen = BTreeSet::new();
        for id in self.component_ids() {
            if !seen.insert(id) {
                return Err(CircuitarError::validation(format!(
                    "duplicate component id '{id}'"
                )));
            }
        }
        Ok(())
    }
}
