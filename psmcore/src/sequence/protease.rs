use std::{fmt::Display, str::FromStr};

use context_error::*;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{PsmError, PsmErrorKind};

/// The cleavage agents with a built-in cleavage rule
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub enum StandardCleavageAgent {
    /// Cleaves after K or R, but not before P
    #[default]
    Trypsin,
    /// Cleaves after K or R
    TrypsinWithoutProlineRule,
    /// Cleaves after K, R, F, Y, V, E, or L
    TrypsinPlusFVLEY,
    /// Cleaves after F, W, Y, or L
    Chymotrypsin,
    /// Cleaves after F, W, Y, L, K, or R
    ChymotrypsinAndTrypsin,
    /// Cleaves after E or D
    GluC,
    /// Cleaves after M
    CyanBr,
    /// Cleaves after R
    ArgC,
    /// Cleaves after K
    LysC,
    /// Cleaves before D
    AspN,
    /// No specificity
    NoEnzyme,
}

impl StandardCleavageAgent {
    /// All standard agents
    pub const ALL: &[Self] = &[
        Self::Trypsin,
        Self::TrypsinWithoutProlineRule,
        Self::TrypsinPlusFVLEY,
        Self::Chymotrypsin,
        Self::ChymotrypsinAndTrypsin,
        Self::GluC,
        Self::CyanBr,
        Self::ArgC,
        Self::LysC,
        Self::AspN,
        Self::NoEnzyme,
    ];

    /// The left and right residue patterns for this agent
    pub const fn patterns(self) -> (&'static str, &'static str) {
        match self {
            Self::Trypsin => ("[KR]", "[^P]"),
            Self::TrypsinWithoutProlineRule => ("[KR]", "[A-Z]"),
            Self::TrypsinPlusFVLEY => ("[KRFYVEL]", "[A-Z]"),
            Self::Chymotrypsin => ("[FWYL]", "[A-Z]"),
            Self::ChymotrypsinAndTrypsin => ("[FWYLKR]", "[A-Z]"),
            Self::GluC => ("[ED]", "[A-Z]"),
            Self::CyanBr => ("[M]", "[A-Z]"),
            Self::ArgC => ("[R]", "[A-Z]"),
            Self::LysC => ("[K]", "[A-Z]"),
            Self::AspN => ("[A-Z]", "[D]"),
            Self::NoEnzyme => (".", "."),
        }
    }

    /// The cleavage rule for this agent
    /// # Panics
    /// If the built-in patterns are not valid regular expressions.
    pub fn rule(self) -> CleavageRule {
        let (left, right) = self.patterns();
        CleavageRule {
            left: Regex::new(&anchored(left)).unwrap(),
            right: Regex::new(&anchored(right)).unwrap(),
            left_pattern: left.to_string(),
            right_pattern: right.to_string(),
            nonspecific: self == Self::NoEnzyme,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Trypsin => "Trypsin",
            Self::TrypsinWithoutProlineRule => "TrypsinWithoutProlineRule",
            Self::TrypsinPlusFVLEY => "TrypsinPlusFVLEY",
            Self::Chymotrypsin => "Chymotrypsin",
            Self::ChymotrypsinAndTrypsin => "ChymotrypsinAndTrypsin",
            Self::GluC => "GluC",
            Self::CyanBr => "CyanBr",
            Self::ArgC => "ArgC",
            Self::LysC => "LysC",
            Self::AspN => "AspN",
            Self::NoEnzyme => "NoEnzyme",
        }
    }
}

impl Display for StandardCleavageAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for StandardCleavageAgent {
    type Err = PsmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s
            .trim()
            .to_ascii_lowercase()
            .replace(['-', '_', ' ', '/'], "");
        match normalised.as_str() {
            "trypsin" => Ok(Self::Trypsin),
            "trypsinwithoutprolinerule" | "trypsinp" | "trypsinnoprolinerule" => {
                Ok(Self::TrypsinWithoutProlineRule)
            }
            "trypsinplusfvley" | "trypplusfvley" => Ok(Self::TrypsinPlusFVLEY),
            "chymotrypsin" => Ok(Self::Chymotrypsin),
            "chymotrypsinandtrypsin" | "chymoandtrypsin" => Ok(Self::ChymotrypsinAndTrypsin),
            "gluc" | "v8akagluc" | "v8e" => Ok(Self::GluC),
            "cyanbr" | "cnbr" => Ok(Self::CyanBr),
            "argc" | "endoargc" => Ok(Self::ArgC),
            "lysc" | "endolysc" => Ok(Self::LysC),
            "aspn" | "endoaspn" => Ok(Self::AspN),
            "noenzyme" | "nonspecific" | "unspecific" | "none" => Ok(Self::NoEnzyme),
            _ => Err(BoxedError::new(
                PsmErrorKind::InvalidParameters,
                "Unknown cleavage agent",
                format!(
                    "The cleavage agent is not known, use one of: {}",
                    Self::ALL.iter().map(|a| a.name()).collect::<Vec<_>>().join(", ")
                ),
                Context::show(s.to_string()),
            )),
        }
    }
}

fn anchored(pattern: &str) -> String {
    format!("^(?:{pattern})$")
}

/// A cleavage rule, two patterns that each match a single residue. The `left` pattern matches
/// the residue before the cleavage site, the `right` pattern the residue after it.
#[derive(Clone, Debug)]
pub struct CleavageRule {
    left: Regex,
    right: Regex,
    left_pattern: String,
    right_pattern: String,
    nonspecific: bool,
}

impl CleavageRule {
    /// Create a custom cleavage rule from two regular expressions
    /// # Errors
    /// If either of the patterns is not a valid regular expression.
    pub fn new(left: &str, right: &str) -> Result<Self, PsmError> {
        let compile = |pattern: &str, side: &str| {
            Regex::new(&anchored(pattern)).map_err(|err| {
                BoxedError::new(
                    PsmErrorKind::InvalidParameters,
                    "Invalid cleavage rule",
                    format!("The {side} residue pattern is not a valid regular expression: {err}"),
                    Context::show(pattern.to_string()),
                )
            })
        };
        Ok(Self {
            left: compile(left, "left")?,
            right: compile(right, "right")?,
            left_pattern: left.to_string(),
            right_pattern: right.to_string(),
            nonspecific: false,
        })
    }

    /// Check if the enzyme would cut between these two residues
    pub fn matches(&self, before: char, after: char) -> bool {
        let mut buffer = [0; 4];
        let before = before.to_ascii_uppercase();
        let after = after.to_ascii_uppercase();
        self.left.is_match(before.encode_utf8(&mut buffer))
            && self.right.is_match(after.encode_utf8(&mut buffer))
    }

    /// The pattern for the residue before the cleavage site
    pub fn left_pattern(&self) -> &str {
        &self.left_pattern
    }

    /// The pattern for the residue after the cleavage site
    pub fn right_pattern(&self) -> &str {
        &self.right_pattern
    }

    /// If this rule has no specificity at all
    pub const fn is_nonspecific(&self) -> bool {
        self.nonspecific
    }
}

impl PartialEq for CleavageRule {
    fn eq(&self, other: &Self) -> bool {
        self.left_pattern == other.left_pattern
            && self.right_pattern == other.right_pattern
            && self.nonspecific == other.nonspecific
    }
}

/// The enzyme as specified in search engine parameters
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum EnzymeSpecification {
    /// A standard cleavage agent
    Standard(StandardCleavageAgent),
    /// A custom cleavage rule
    Custom {
        /// The pattern for the residue before the cleavage site
        left: String,
        /// The pattern for the residue after the cleavage site
        right: String,
    },
}

impl Default for EnzymeSpecification {
    fn default() -> Self {
        Self::Standard(StandardCleavageAgent::Trypsin)
    }
}

impl EnzymeSpecification {
    /// Build the cleavage rule
    /// # Errors
    /// If a custom pattern is not a valid regular expression.
    pub fn rule(&self) -> Result<CleavageRule, PsmError> {
        match self {
            Self::Standard(agent) => Ok(agent.rule()),
            Self::Custom { left, right } => CleavageRule::new(left, right),
        }
    }
}
