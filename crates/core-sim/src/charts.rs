use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Portfolio,
    Roi,
}

impl ChartKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Portfolio => "portfolio",
            Self::Roi => "roi",
        }
    }

    pub fn series_label(self) -> &'static str {
        match self {
            Self::Portfolio => "Portfolio Value",
            Self::Roi => "ROI %",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum ChartPeriod {
    #[serde(rename = "6M")]
    SixMonths,
    #[default]
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "3Y")]
    ThreeYears,
    #[serde(rename = "ALL")]
    All,
}

impl ChartPeriod {
    pub const ALL_PERIODS: [ChartPeriod; 4] = [
        ChartPeriod::SixMonths,
        ChartPeriod::OneYear,
        ChartPeriod::ThreeYears,
        ChartPeriod::All,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::SixMonths => "6M",
            Self::OneYear => "1Y",
            Self::ThreeYears => "3Y",
            Self::All => "ALL",
        }
    }
}

impl fmt::Display for ChartPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown chart period `{0}`, expected one of 6M, 1Y, 3Y, ALL")]
pub struct UnknownPeriod(pub String);

impl FromStr for ChartPeriod {
    type Err = UnknownPeriod;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL_PERIODS
            .into_iter()
            .find(|period| period.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| UnknownPeriod(value.to_owned()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: &'static str,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub kind: ChartKind,
    pub period: ChartPeriod,
    pub label: &'static str,
    pub points: Vec<ChartPoint>,
}

impl ChartSeries {
    fn baked(kind: ChartKind, period: ChartPeriod, labels: &[&'static str], values: &[f64]) -> Self {
        Self {
            kind,
            period,
            label: kind.series_label(),
            points: labels
                .iter()
                .zip(values)
                .map(|(&label, &value)| ChartPoint { label, value })
                .collect(),
        }
    }

    /// `(min, max)` over the finite points, `None` when there are none.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        self.points
            .iter()
            .map(|point| point.value)
            .filter(|value| value.is_finite())
            .fold(None, |acc, value| match acc {
                None => Some((value, value)),
                Some((min, max)) => Some((min.min(value), max.max(value))),
            })
    }
}

const MONTHS_H2: [&str; 6] = ["Jul", "Aug", "Sep", "Oct", "Nov", "Dec"];
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
const YEARS_3: [&str; 3] = ["2021", "2022", "2023"];
const YEARS_ALL: [&str; 5] = ["2019", "2020", "2021", "2022", "2023"];

fn period_labels(period: ChartPeriod) -> &'static [&'static str] {
    match period {
        ChartPeriod::SixMonths => &MONTHS_H2,
        ChartPeriod::OneYear => &MONTHS,
        ChartPeriod::ThreeYears => &YEARS_3,
        ChartPeriod::All => &YEARS_ALL,
    }
}

fn baked_values(kind: ChartKind, period: ChartPeriod) -> &'static [f64] {
    match (kind, period) {
        (ChartKind::Portfolio, ChartPeriod::SixMonths) => {
            &[1_250_000.0, 1_320_000.0, 1_280_000.0, 1_410_000.0, 1_380_000.0, 1_450_000.0]
        }
        (ChartKind::Portfolio, ChartPeriod::OneYear) => &[
            1_000_000.0,
            1_050_000.0,
            980_000.0,
            1_120_000.0,
            1_080_000.0,
            1_150_000.0,
            1_250_000.0,
            1_320_000.0,
            1_280_000.0,
            1_410_000.0,
            1_380_000.0,
            1_450_000.0,
        ],
        (ChartKind::Portfolio, ChartPeriod::ThreeYears) => &[800_000.0, 1_200_000.0, 1_450_000.0],
        (ChartKind::Portfolio, ChartPeriod::All) => {
            &[600_000.0, 750_000.0, 800_000.0, 1_200_000.0, 1_450_000.0]
        }
        (ChartKind::Roi, ChartPeriod::SixMonths) => &[2.8, 4.2, -1.5, 6.8, 3.2, 5.1],
        (ChartKind::Roi, ChartPeriod::OneYear) => {
            &[3.2, 2.1, -2.8, 4.5, 1.8, 3.9, 2.8, 4.2, -1.5, 6.8, 3.2, 5.1]
        }
        (ChartKind::Roi, ChartPeriod::ThreeYears) => &[18.5, -8.2, 24.7],
        (ChartKind::Roi, ChartPeriod::All) => &[12.3, 8.9, 18.5, -8.2, 24.7],
    }
}

/// Pre-baked series for every chart and period. Not derived from live data.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLibrary {
    series: Vec<ChartSeries>,
}

impl Default for ChartLibrary {
    fn default() -> Self {
        let series = [ChartKind::Portfolio, ChartKind::Roi]
            .into_iter()
            .flat_map(|kind| {
                ChartPeriod::ALL_PERIODS.into_iter().map(move |period| {
                    ChartSeries::baked(kind, period, period_labels(period), baked_values(kind, period))
                })
            })
            .collect();

        Self { series }
    }
}

impl ChartLibrary {
    pub fn get(&self, kind: ChartKind, period: ChartPeriod) -> Option<&ChartSeries> {
        self.series
            .iter()
            .find(|series| series.kind == kind && series.period == period)
    }
}
