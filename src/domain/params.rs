//! The fixed mix-design parameter schema and the `ParameterSet` snapshot type.
//!
//! The schema is a closed set of 13 fields:
//!
//! - three scalar mix properties (`RAP_PERCENT`, `AC`, `GSB`)
//! - ten gradation fields, one per sieve, ordered coarsest (19mm) to finest (0.075mm)
//!
//! Each field carries an inclusive range and a default. The range is the
//! acceptance contract used by `validate`; the default seeds every new session.

use std::fmt;
use std::str::FromStr;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Which logical group a field belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldGroup {
    /// Scalar physical properties of the mix.
    Mix,
    /// Percent passing at a fixed sieve size.
    Gradation,
}

impl FieldGroup {
    pub fn title(self) -> &'static str {
        match self {
            FieldGroup::Mix => "Mix Design",
            FieldGroup::Gradation => "Gradation (% Passing)",
        }
    }
}

/// A field identifier of the parameter schema.
///
/// The declaration order is significant: it is the wire order of the request
/// body and, for the gradation group, the coarse-to-fine chart order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    RapPercent,
    Ac,
    Gsb,
    Pass19,
    Pass12_5,
    Pass9_5,
    Pass4_75,
    Pass2_36,
    Pass1_18,
    Pass0_6,
    Pass0_3,
    Pass0_15,
    Pass0_075,
}

/// Sieve metadata for a gradation field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sieve {
    /// Axis label, e.g. `"4.75mm"`.
    pub label: &'static str,
    /// Nominal opening in millimetres.
    pub size_mm: f64,
}

/// Static description of one field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    /// Wire key (`"PASS_4_75"`).
    pub key: &'static str,
    /// Human-readable form label.
    pub label: &'static str,
    pub group: FieldGroup,
    /// Inclusive lower bound.
    pub min: f64,
    /// Inclusive upper bound.
    pub max: f64,
    pub default: f64,
    /// Increment used by the interactive form's arrow keys.
    pub step: f64,
}

const fn mix(key: &'static str, label: &'static str, min: f64, max: f64, default: f64, step: f64) -> FieldSpec {
    FieldSpec {
        key,
        label,
        group: FieldGroup::Mix,
        min,
        max,
        default,
        step,
    }
}

const fn pass(key: &'static str, label: &'static str, min: f64, max: f64, default: f64) -> FieldSpec {
    FieldSpec {
        key,
        label,
        group: FieldGroup::Gradation,
        min,
        max,
        default,
        step: 0.1,
    }
}

const fn sieve(label: &'static str, size_mm: f64) -> Sieve {
    Sieve { label, size_mm }
}

/// Schema table, indexed by `Field as usize`.
static SPECS: [FieldSpec; Field::COUNT] = [
    mix("RAP_PERCENT", "RAP Percentage (%)", 0.0, 100.0, 10.0, 0.1),
    mix("AC", "Asphalt Content (%)", 3.0, 8.0, 5.0, 0.01),
    mix("GSB", "Gsb", 2.0, 3.0, 2.65, 0.001),
    pass("PASS_19", "19mm Sieve (%)", 90.0, 100.0, 95.0),
    pass("PASS_12_5", "12.5mm Sieve (%)", 70.0, 95.0, 85.0),
    pass("PASS_9_5", "9.5mm Sieve (%)", 55.0, 85.0, 70.0),
    pass("PASS_4_75", "4.75mm Sieve (%)", 35.0, 65.0, 50.0),
    pass("PASS_2_36", "2.36mm Sieve (%)", 20.0, 45.0, 30.0),
    pass("PASS_1_18", "1.18mm Sieve (%)", 12.0, 35.0, 20.0),
    pass("PASS_0_6", "0.6mm Sieve (%)", 8.0, 25.0, 15.0),
    pass("PASS_0_3", "0.3mm Sieve (%)", 5.0, 18.0, 10.0),
    pass("PASS_0_15", "0.15mm Sieve (%)", 3.0, 12.0, 5.0),
    pass("PASS_0_075", "0.075mm Sieve (%)", 2.0, 8.0, 3.0),
];

/// Sieve openings, indexed like `Field::GRADATION`.
pub static SIEVES: [Sieve; Field::GRADATION.len()] = [
    sieve("19mm", 19.0),
    sieve("12.5mm", 12.5),
    sieve("9.5mm", 9.5),
    sieve("4.75mm", 4.75),
    sieve("2.36mm", 2.36),
    sieve("1.18mm", 1.18),
    sieve("0.6mm", 0.6),
    sieve("0.3mm", 0.3),
    sieve("0.15mm", 0.15),
    sieve("0.075mm", 0.075),
];

impl Field {
    pub const COUNT: usize = 13;

    /// All fields in declaration (wire) order.
    pub const ALL: [Field; Field::COUNT] = [
        Field::RapPercent,
        Field::Ac,
        Field::Gsb,
        Field::Pass19,
        Field::Pass12_5,
        Field::Pass9_5,
        Field::Pass4_75,
        Field::Pass2_36,
        Field::Pass1_18,
        Field::Pass0_6,
        Field::Pass0_3,
        Field::Pass0_15,
        Field::Pass0_075,
    ];

    pub const MIX: [Field; 3] = [Field::RapPercent, Field::Ac, Field::Gsb];

    /// Gradation fields, coarsest sieve first.
    pub const GRADATION: [Field; 10] = [
        Field::Pass19,
        Field::Pass12_5,
        Field::Pass9_5,
        Field::Pass4_75,
        Field::Pass2_36,
        Field::Pass1_18,
        Field::Pass0_6,
        Field::Pass0_3,
        Field::Pass0_15,
        Field::Pass0_075,
    ];

    pub fn spec(self) -> &'static FieldSpec {
        &SPECS[self as usize]
    }

    pub fn key(self) -> &'static str {
        self.spec().key
    }

    pub fn label(self) -> &'static str {
        self.spec().label
    }

    pub fn group(self) -> FieldGroup {
        self.spec().group
    }

    pub fn min(self) -> f64 {
        self.spec().min
    }

    pub fn max(self) -> f64 {
        self.spec().max
    }

    pub fn default_value(self) -> f64 {
        self.spec().default
    }

    pub fn step(self) -> f64 {
        self.spec().step
    }

    /// Sieve opening for a gradation field; `None` for the mix fields.
    pub fn sieve(self) -> Option<Sieve> {
        Field::GRADATION.iter().position(|&f| f == self).map(|i| SIEVES[i])
    }

    /// Number of decimals worth showing for this field's step size.
    pub fn display_precision(self) -> usize {
        let step = self.step();
        if step >= 1.0 {
            0
        } else {
            (-step.log10()).round() as usize
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown field '{0}' (expected one of RAP_PERCENT, AC, GSB, PASS_19 ... PASS_0_075)")]
pub struct UnknownField(pub String);

impl FromStr for Field {
    type Err = UnknownField;

    /// Parse a wire key, case-insensitively (`"pass_4_75"` -> `Field::Pass4_75`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Field::ALL
            .into_iter()
            .find(|f| f.key().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownField(trimmed.to_string()))
    }
}

/// A complete snapshot of every field's value.
///
/// The set is total over the schema: there is no way to express a missing
/// field. Committed values are range-checked by the store; a `ParameterSet`
/// itself is a plain value and is freely copied into requests and charts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterSet {
    values: [f64; Field::COUNT],
}

impl ParameterSet {
    /// The session-start defaults.
    pub fn defaults() -> Self {
        let mut values = [0.0; Field::COUNT];
        for field in Field::ALL {
            values[field as usize] = field.default_value();
        }
        Self { values }
    }

    pub fn get(&self, field: Field) -> f64 {
        self.values[field as usize]
    }

    /// Iterate `(field, value)` pairs in wire order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, f64)> + '_ {
        Field::ALL.into_iter().map(|f| (f, self.values[f as usize]))
    }

    /// Copy with one field replaced. Only the store calls this, after validation.
    pub(crate) fn with(mut self, field: Field, value: f64) -> Self {
        self.values[field as usize] = value;
        self
    }
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Serialize for ParameterSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Field::COUNT))?;
        for (field, value) in self.iter() {
            map.serialize_entry(field.key(), &value)?;
        }
        map.end()
    }
}
