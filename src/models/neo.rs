use std::fmt;

use super::Extra;

/// A near-Earth object as read from the NEO table.
#[derive(Debug, Clone, PartialEq)]
pub struct NearEarthObject {
    /// Primary designation, unique across the table (e.g. `433`, `2000 SG344`)
    pub designation: String,
    /// IAU name; empty when the body is unnamed
    pub name: String,
    /// Diameter in km; `None` when unknown
    pub diameter: Option<f64>,
    pub hazardous: bool,
    pub extra: Extra,
    /// Indices of this object's approaches, filled in by the database link step
    pub approaches: Vec<usize>,
}

impl NearEarthObject {
    pub fn new(
        designation: impl Into<String>,
        name: impl Into<String>,
        diameter: Option<f64>,
        hazardous: bool,
        extra: Extra,
    ) -> Self {
        Self {
            designation: designation.into(),
            name: name.into(),
            diameter,
            hazardous,
            extra,
            approaches: Vec::new(),
        }
    }

    /// `Some(name)` unless the name is empty.
    pub fn name(&self) -> Option<&str> {
        if self.name.is_empty() {
            None
        } else {
            Some(&self.name)
        }
    }

    /// `"433 (Eros)"`, or just the designation for unnamed bodies.
    pub fn fullname(&self) -> String {
        match self.name() {
            Some(name) => format!("{} ({})", self.designation, name),
            None => self.designation.clone(),
        }
    }
}

impl fmt::Display for NearEarthObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NEO {} has a diameter of ", self.fullname())?;
        match self.diameter {
            Some(d) => write!(f, "{:.3} km", d)?,
            None => write!(f, "unknown size")?,
        }
        let not = if self.hazardous { "" } else { "not " };
        write!(f, " and is {}potentially hazardous.", not)
    }
}
