use super::error::EngineError;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How a bracket turns a property value into duty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub enum BracketMode {
    /// Base amount plus the rate on every dollar from the bracket floor upward
    #[default]
    Marginal,
    /// Rate applied to the entire value, base is ignored
    FlatRate,
}

/// A contiguous, inclusive range of property values with its own duty formula.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RateBracket {
    /// Inclusive lower bound (whole dollars)
    #[schemars(with = "f64")]
    pub lower: Decimal,
    /// Inclusive upper bound, omitted or null for the open top bracket
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub upper: Option<Decimal>,
    /// Rate as a fraction, e.g. 0.06 for 6%
    #[schemars(with = "f64")]
    pub rate: Decimal,
    /// Duty accumulated by the brackets below this one
    #[serde(default)]
    #[schemars(with = "f64")]
    pub base: Decimal,
    #[serde(default)]
    pub mode: BracketMode,
    /// Describes the band when it is the applicable band of a discount table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl RateBracket {
    pub fn marginal(lower: Decimal, upper: Option<Decimal>, rate: Decimal, base: Decimal) -> Self {
        RateBracket {
            lower,
            upper,
            rate,
            base,
            mode: BracketMode::Marginal,
            note: None,
        }
    }

    pub fn flat(lower: Decimal, upper: Option<Decimal>, rate: Decimal) -> Self {
        RateBracket {
            lower,
            upper,
            rate,
            base: Decimal::ZERO,
            mode: BracketMode::FlatRate,
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Whole-dollar bounds are inclusive. A fractional value between `upper`
    /// and the next bracket's `lower` belongs to the next bracket.
    pub fn contains(&self, value: Decimal) -> bool {
        value > self.lower - Decimal::ONE && self.upper.is_none_or(|upper| value <= upper)
    }

    /// The value above which marginal duty accrues, one below the inclusive
    /// lower bound so the bracket's first dollar is taxed. For a bracket
    /// starting at zero this is -1.
    pub fn excess_floor(&self) -> Decimal {
        self.lower - Decimal::ONE
    }

    /// Unrounded duty for a value inside this bracket.
    pub fn duty(&self, value: Decimal) -> Decimal {
        match self.mode {
            BracketMode::Marginal => self.base + (value - self.excess_floor()) * self.rate,
            BracketMode::FlatRate => value * self.rate,
        }
    }
}

/// An ordered, validated sequence of brackets.
///
/// An unrestricted table covers every non-negative value. A restricted table
/// ends at its ceiling and values above it are simply not in the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateTable {
    name: String,
    brackets: Vec<RateBracket>,
    ceiling: Option<Decimal>,
}

impl RateTable {
    pub fn unrestricted(name: &str, brackets: Vec<RateBracket>) -> Result<Self, EngineError> {
        Self::new(name, brackets, None)
    }

    pub fn restricted(
        name: &str,
        brackets: Vec<RateBracket>,
        ceiling: Decimal,
    ) -> Result<Self, EngineError> {
        Self::new(name, brackets, Some(ceiling))
    }

    fn new(
        name: &str,
        brackets: Vec<RateBracket>,
        ceiling: Option<Decimal>,
    ) -> Result<Self, EngineError> {
        let integrity = |msg: String| EngineError::ConfigurationIntegrity(format!("{name} table: {msg}"));

        let first = brackets
            .first()
            .ok_or_else(|| integrity("no brackets".to_string()))?;
        if !first.lower.is_zero() {
            return Err(integrity(format!("first bracket starts at {}, not 0", first.lower)));
        }

        for (i, bracket) in brackets.iter().enumerate() {
            if bracket.rate.is_sign_negative() || bracket.base.is_sign_negative() {
                return Err(integrity(format!("bracket {} has a negative rate or base", i + 1)));
            }
            if bracket.upper.is_some_and(|upper| upper < bracket.lower) {
                return Err(integrity(format!("bracket {} ends before it starts", i + 1)));
            }
        }

        for (i, pair) in brackets.windows(2).enumerate() {
            let (prev, next) = (&pair[0], &pair[1]);
            let Some(prev_upper) = prev.upper else {
                return Err(integrity(format!("bracket {} is open but is not the last", i + 1)));
            };
            if next.lower != prev_upper + Decimal::ONE {
                return Err(integrity(format!(
                    "bracket {} starts at {} but bracket {} ends at {}",
                    i + 2,
                    next.lower,
                    i + 1,
                    prev_upper
                )));
            }
        }

        let last = brackets.last().map(|b| b.upper);
        match (ceiling, last.flatten()) {
            (None, None) => {}
            (None, Some(upper)) => {
                return Err(integrity(format!("last bracket ends at {upper}, must be open")))
            }
            (Some(ceiling), Some(upper)) if upper == ceiling => {}
            (Some(ceiling), _) => {
                return Err(integrity(format!("last bracket must end at the ceiling {ceiling}")))
            }
        }

        Ok(RateTable {
            name: name.to_string(),
            brackets,
            ceiling,
        })
    }

    pub fn brackets(&self) -> &[RateBracket] {
        &self.brackets
    }

    pub fn ceiling(&self) -> Option<Decimal> {
        self.ceiling
    }

    /// First bracket, in ascending order, containing `value`.
    pub fn lookup_bracket(&self, value: Decimal) -> Result<&RateBracket, EngineError> {
        self.brackets
            .iter()
            .find(|bracket| bracket.contains(value))
            .ok_or_else(|| {
                EngineError::ConfigurationIntegrity(format!(
                    "{} table has no bracket for {}",
                    self.name, value
                ))
            })
    }

    /// Unrounded duty on `value`, or zero when the value is outside the table.
    pub fn compute_duty(&self, value: Decimal) -> Decimal {
        match self.lookup_bracket(value) {
            Ok(bracket) => {
                log::debug!(
                    "{} bracket {}..{:?} ({:?}) for {}",
                    self.name,
                    bracket.lower,
                    bracket.upper,
                    bracket.mode,
                    value
                );
                bracket.duty(value)
            }
            Err(_) => {
                log::debug!("{} table does not cover {}", self.name, value);
                Decimal::ZERO
            }
        }
    }
}
