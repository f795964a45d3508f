/// Component family inferred from a component id, used to pick a sprite asset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub enum ComponentKind {
    Led,
    Ground,
    Transistor,
    Diode,
    Capacitor,
    Gpio,
    /// Any other id, keyed by its first character (`V1` -> `V`, `R1` -> `R`).
    Prefix(char),
}

/// Ordered prefix rules; the first match wins.
const PREFIX_RULES: [(&str, ComponentKind); 6] = [
    ("LED", ComponentKind::Led),
    ("GND", ComponentKind::Ground),
    ("Q", ComponentKind::Transistor),
    ("D", ComponentKind::Diode),
    ("C", ComponentKind::Capacitor),
    ("GPIO", ComponentKind::Gpio),
];

impl ComponentKind {
    /// Classify a component id. Returns `None` for an empty id.
    pub fn classify(component_id: &str) -> Option<Self> {
        for (prefix, kind) in PREFIX_RULES {
            if component_id.starts_with(prefix) {
                return Some(kind);
            }
        }
        component_id.chars().next().map(Self::Prefix)
    }

    /// Asset tag: `LED`, `GND`, `Q`, `D`, `C`, `GPIO`, or the prefix character.
    pub fn tag(self) -> String {
        match self {
            Self::Led => "LED".to_string(),
            Self::Ground => "GND".to_string(),
            Self::Transistor => "Q".to_string(),
            Self::Diode => "D".to_string(),
            Self::Capacitor => "C".to_string(),
            Self::Gpio => "GPIO".to_string(),
            Self::Prefix(c) => c.to_string(),
        }
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.tag())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/classify.rs"]
mod tests;
