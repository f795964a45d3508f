use crate::circuit::series::SeriesCircuit;

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
/// Operating state of one LED after solving.
pub enum LedStatus {
    /// No current flows (LED drops exceed supply, or no resistance in the loop).
    Off,
    /// Conducting at or below the rated maximum.
    Safe { current: f64 },
    /// Conducting above the rated maximum.
    Overcurrent { current: f64 },
}

impl LedStatus {
    /// Short tag without the numeric current.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Off => "OFF (insufficient voltage)",
            Self::Safe { .. } => "ON (safe)",
            Self::Overcurrent { .. } => "ON but OVERCURRENT",
        }
    }

    pub fn is_on(self) -> bool {
        !matches!(self, Self::Off)
    }
}

impl std::fmt::Display for LedStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Off => f.write_str("OFF (insufficient voltage)"),
            Self::Safe { current } => write!(f, "ON (I = {current:.3} A, safe)"),
            Self::Overcurrent { current } => write!(f, "ON but OVERCURRENT (I = {current:.3} A)"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct VoltageDrop {
    pub resistor: String,
    pub volts: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct LedReading {
    pub led: String,
    pub status: LedStatus,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// Electrical state of a solved [`SeriesCircuit`].
///
/// `voltage_drops` and `led_status` keep the circuit's element order.
pub struct SolveResult {
    pub supply_voltage: f64,
    pub total_resistance: f64,
    pub total_led_drop: f64,
    pub available_resistor_voltage: f64,
    /// Loop current in amps, shared by every element.
    pub current: f64,
    pub voltage_drops: Vec<VoltageDrop>,
    pub led_status: Vec<LedReading>,
}

impl SolveResult {
    pub fn voltage_drop(&self, resistor: &str) -> Option<f64> {
        self.voltage_drops
            .iter()
            .find(|d| d.resistor == resistor)
            .map(|d| d.volts)
    }

    pub fn led_status(&self, led: &str) -> Option<LedStatus> {
        self.led_status
            .iter()
            .find(|r| r.led == led)
            .map(|r| r.status)
    }

    pub fn is_conducting(&self) -> bool {
        self.current > 0.0
    }
}

/// Solve a single-source DC series circuit.
///
/// LEDs are fixed forward-voltage drops; whatever voltage remains is split across the resistors
/// by Ohm's law. When the LEDs need at least the full supply, or the loop has no positive
/// resistance, no current flows and every LED is reported off with no resistor drops.
#[tracing::instrument(skip(circuit), fields(source = %circuit.source.name))]
pub fn solve(circuit: &SeriesCircuit) -> SolveResult {
    let supply_voltage = circuit.source.voltage;
    let total_led_drop = circuit.total_led_drop();
    let total_resistance = circuit.total_series_resistance();

    if total_led_drop >= supply_voltage || total_resistance <= 0.0 {
        tracing::debug!(
            supply_voltage,
            total_led_drop,
            total_resistance,
            "series circuit does not conduct"
        );
        return SolveResult {
            supply_voltage,
            total_resistance,
            total_led_drop,
            available_resistor_voltage: (supply_voltage - total_led_drop).max(0.0),
            current: 0.0,
            voltage_drops: Vec::new(),
            led_status: circuit
                .leds
                .iter()
                .map(|led| LedReading {
                    led: led.name.clone(),
                    status: LedStatus::Off,
                })
                .collect(),
        };
    }

    let available_resistor_voltage = supply_voltage - total_led_drop;
    let current = available_resistor_voltage / total_resistance;

    let voltage_drops = circuit
        .resistors
        .iter()
        .map(|r| VoltageDrop {
            resistor: r.name.clone(),
            volts: current * r.resistance,
        })
        .collect();

    let led_status = circuit
        .leds
        .iter()
        .map(|led| LedReading {
            led: led.name.clone(),
            status: if current <= led.max_current {
                LedStatus::Safe { current }
            } else {
                LedStatus::Overcurrent { current }
            },
        })
        .collect();

    SolveResult {
        supply_voltage,
        total_resistance,
        total_led_drop,
        available_resistor_voltage,
        current,
        voltage_drops,
        led_status,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/circuit/solver.rs"]
mod tests;
