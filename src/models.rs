use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Unisex,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Unisex];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Unisex => "unisex",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Unisex => "Unisex",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Confident,
    Relaxed,
    Romantic,
    Edgy,
    Professional,
    Casual,
}

impl Mood {
    pub const ALL: [Mood; 6] = [
        Mood::Confident,
        Mood::Relaxed,
        Mood::Romantic,
        Mood::Edgy,
        Mood::Professional,
        Mood::Casual,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Confident => "confident",
            Mood::Relaxed => "relaxed",
            Mood::Romantic => "romantic",
            Mood::Edgy => "edgy",
            Mood::Professional => "professional",
            Mood::Casual => "casual",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mood::Confident => "Confident",
            Mood::Relaxed => "Relaxed",
            Mood::Romantic => "Romantic",
            Mood::Edgy => "Edgy",
            Mood::Professional => "Professional",
            Mood::Casual => "Casual",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownChoice {
    pub kind: &'static str,
    pub value: String,
}

impl FromStr for Gender {
    type Err = UnknownChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gender::ALL
            .into_iter()
            .find(|g| g.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownChoice { kind: "gender", value: s.to_string() })
    }
}

impl FromStr for Mood {
    type Err = UnknownChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mood::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownChoice { kind: "mood", value: s.to_string() })
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct GenerateRequest {
    pub gender: Gender,
    pub mood: Mood,
}

/// A single outfit recommendation. `image_prompt` only lives server-side and is
/// never written back out to clients.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Outfit {
    pub title: String,
    pub description: String,
    pub tips: String,
    #[serde(default, skip_serializing)]
    pub image_prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct GenerateResponse {
    pub outfits: Vec<Outfit>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}
