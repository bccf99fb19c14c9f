use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the two simulated markets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Venue {
    #[serde(rename = "NSE")]
    Nse,
    Quidax,
}

impl Venue {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Nse => "NSE",
            Self::Quidax => "Quidax",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Nse => "Nigeria Stock Exchange",
            Self::Quidax => "Quidax",
        }
    }

    pub fn is_crypto(self) -> bool {
        matches!(self, Self::Quidax)
    }
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static venue tile held by the dashboard store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExchangeInfo {
    pub id: &'static str,
    pub venue: Venue,
    pub name: &'static str,
    pub status: &'static str,
    pub volume: f64,
    pub change: f64,
}

pub fn exchange_directory() -> Vec<ExchangeInfo> {
    vec![
        ExchangeInfo {
            id: "nse",
            venue: Venue::Nse,
            name: Venue::Nse.display_name(),
            status: "active",
            volume: 1_250_000_000.0,
            change: 2.45,
        },
        ExchangeInfo {
            id: "quidax",
            venue: Venue::Quidax,
            name: Venue::Quidax.display_name(),
            status: "active",
            volume: 850_000_000.0,
            change: -1.23,
        },
    ]
}
