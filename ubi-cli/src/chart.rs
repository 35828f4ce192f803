//! Declarative chart description for a [`SweepSeries`].
//!
//! The description names its series, axes and annotations and carries
//! plain `f64` values, so any plotting library can render it from the JSON
//! form without knowing about the engine.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use ubi_core::{PolicyConfig, SweepSeries, evaluate};

use crate::report::{format_currency, format_percent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesKind {
    Bar,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub title: String,
    pub tick_step: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub kind: SeriesKind,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    /// Per-point baseline for bars stacked on another series.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub x: f64,
    pub y: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub series: Vec<Series>,
    pub annotations: Vec<Annotation>,
}

fn to_f64(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}

fn floor_annotation(config: &PolicyConfig) -> Annotation {
    let at_zero = evaluate(Decimal::ZERO, config);
    Annotation {
        x: 0.0,
        y: to_f64(at_zero.net_benefit_total),
        text: format!(
            "Creating the income floor: with no employment income the full UBI of {} is kept",
            format_currency(at_zero.net_ubi_benefit)
        ),
    }
}

fn knee_annotation(config: &PolicyConfig) -> Annotation {
    let threshold = config.clawback_threshold();
    let at_knee = evaluate(threshold, config);
    Annotation {
        x: to_f64(threshold),
        y: to_f64(at_knee.net_income),
        text: format!(
            "Medium to high earners unaffected: at {} the UBI is completely clawed back",
            format_currency(threshold)
        ),
    }
}

/// Builds the three-series comparison chart for `series`.
///
/// * net earned income (no UBI)
/// * net final income (net earned income plus net UBI)
/// * net UBI, stacked on net earned income
pub fn build_chart(series: &SweepSeries<'_>) -> ChartSpec {
    let config = series.config();
    let points = series.points();

    let x: Vec<f64> = points.iter().map(|p| to_f64(p.income)).collect();
    let net_income: Vec<f64> = points.iter().map(|p| to_f64(p.result.net_income)).collect();
    let net_total: Vec<f64> = points
        .iter()
        .map(|p| to_f64(p.result.net_benefit_total))
        .collect();
    let net_ubi: Vec<f64> = points
        .iter()
        .map(|p| to_f64(p.result.net_ubi_benefit))
        .collect();

    ChartSpec {
        title: format!("Annual UBI income effects ({})", config.name()),
        x_axis: Axis {
            title: "Gross employment earned income $".to_string(),
            tick_step: to_f64(series.step()),
        },
        y_axis: Axis {
            title: "Income $".to_string(),
            tick_step: 20_000.0,
        },
        series: vec![
            Series {
                name: "Net earned income (gross income less personal income tax, no UBI)"
                    .to_string(),
                kind: SeriesKind::Bar,
                x: x.clone(),
                y: net_income.clone(),
                base: None,
            },
            Series {
                name: "Net final income (net earned income plus UBI)".to_string(),
                kind: SeriesKind::Bar,
                x: x.clone(),
                y: net_total,
                base: None,
            },
            Series {
                name: format!(
                    "UBI (clawed back at {} of gross earned income)",
                    format_percent(config.clawback_rate())
                ),
                kind: SeriesKind::Bar,
                x,
                y: net_ubi,
                base: Some(net_income),
            },
        ],
        annotations: vec![floor_annotation(config), knee_annotation(config)],
    }
}
