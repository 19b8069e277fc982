//! Customization types and placements

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while parsing a type or placement name.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The customization type is not one of `text`, `image` or `combo`.
    #[error("unknown customization type: {0}")]
    UnknownType(String),

    /// The placement is not one of `front`, `back`, `both` or `any`.
    #[error("unknown placement: {0}")]
    UnknownPlacement(String),
}

/// What is being printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomizationType {
    /// Printed text.
    Text,

    /// Printed image.
    Image,

    /// Text and image printed together.
    Combo,
}

impl CustomizationType {
    /// Every customization type, in grid order.
    pub const ALL: [Self; 3] = [Self::Text, Self::Image, Self::Combo];

    /// Wire name of the type.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Combo => "combo",
        }
    }
}

impl fmt::Display for CustomizationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CustomizationType {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "image" => Ok(Self::Image),
            "combo" => Ok(Self::Combo),
            _ => Err(ParseError::UnknownType(value.to_string())),
        }
    }
}

/// Where a customization is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    /// Front side only.
    Front,

    /// Back side only.
    Back,

    /// Front and back.
    Both,

    /// Placement-independent price, used by combos.
    Any,
}

impl Placement {
    /// Every placement, in grid order.
    pub const ALL: [Self; 4] = [Self::Front, Self::Back, Self::Both, Self::Any];

    /// Resolves a front/back flag pair. Both flags set resolves to [`Placement::Both`].
    pub const fn from_flags(front: bool, back: bool) -> Option<Self> {
        match (front, back) {
            (true, true) => Some(Self::Both),
            (true, false) => Some(Self::Front),
            (false, true) => Some(Self::Back),
            (false, false) => None,
        }
    }

    /// Wire name of the placement.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Back => "back",
            Self::Both => "both",
            Self::Any => "any",
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Placement {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "front" => Ok(Self::Front),
            "back" => Ok(Self::Back),
            "both" => Ok(Self::Both),
            "any" => Ok(Self::Any),
            _ => Err(ParseError::UnknownPlacement(value.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn from_flags_prefers_both() {
        assert_eq!(Placement::from_flags(true, true), Some(Placement::Both));
        assert_eq!(Placement::from_flags(true, false), Some(Placement::Front));
        assert_eq!(Placement::from_flags(false, true), Some(Placement::Back));
        assert_eq!(Placement::from_flags(false, false), None);
    }

    #[test]
    fn parses_case_insensitively() -> TestResult {
        assert_eq!("Front".parse::<Placement>()?, Placement::Front);
        assert_eq!(" COMBO ".parse::<CustomizationType>()?, CustomizationType::Combo);

        Ok(())
    }

    #[test]
    fn rejects_unknown_names() {
        assert_eq!(
            "sleeve".parse::<Placement>(),
            Err(ParseError::UnknownPlacement("sleeve".to_string()))
        );
        assert_eq!(
            "embroidery".parse::<CustomizationType>(),
            Err(ParseError::UnknownType("embroidery".to_string()))
        );
    }

    #[test]
    fn serializes_lowercase() -> TestResult {
        assert_eq!(serde_json::to_string(&Placement::Both)?, "\"both\"");
        assert_eq!(serde_json::to_string(&CustomizationType::Image)?, "\"image\"");

        Ok(())
    }
}
