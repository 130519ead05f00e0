use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "https://storage.beyondcdn.com/";

/// Storage region, selecting the API hostname for a storage zone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Region {
    #[default]
    #[serde(rename = "de")]
    Falkenstein,
    #[serde(rename = "ny")]
    NewYork,
    #[serde(rename = "la")]
    LosAngeles,
    #[serde(rename = "sg")]
    Singapore,
    #[serde(rename = "syd")]
    Sydney,
    #[serde(rename = "uk")]
    UnitedKingdom,
    #[serde(rename = "se")]
    Stockholm,
}

impl Region {
    /// Look up a region by its short code. Unknown codes fall back to the
    /// default region.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "ny" => Region::NewYork,
            "la" => Region::LosAngeles,
            "sg" => Region::Singapore,
            "syd" => Region::Sydney,
            "uk" => Region::UnitedKingdom,
            "se" => Region::Stockholm,
            _ => Region::Falkenstein,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Region::Falkenstein => "de",
            Region::NewYork => "ny",
            Region::LosAngeles => "la",
            Region::Singapore => "sg",
            Region::Sydney => "syd",
            Region::UnitedKingdom => "uk",
            Region::Stockholm => "se",
        }
    }

    /// Base URL of the storage API, always ending in `/`.
    pub fn base_url(&self) -> &'static str {
        match self {
            Region::NewYork => "https://ny.storage.beyondcdn.com/",
            Region::LosAngeles => "https://la.storage.beyondcdn.com/",
            Region::Singapore => "https://sg.storage.beyondcdn.com/",
            Region::Sydney => "https://syd.storage.beyondcdn.com/",
            Region::UnitedKingdom => "https://uk.storage.beyondcdn.com/",
            Region::Stockholm => "https://se.storage.beyondcdn.com/",
            Region::Falkenstein => DEFAULT_BASE_URL,
        }
    }
}
