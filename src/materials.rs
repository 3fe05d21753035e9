//! Hardware quantities derived from drawn fiber and CTO counts.
//!
//! All quantities are fixed linear ratios: cable gets a reserve margin, one
//! suspension set per pole span and one reserve loop per loop spacing. CTO
//! routes are cascades of unbalanced splitters: every pass-through box taps
//! 5 % of the signal and the last box splits what is left 50/50.

use serde::Serialize;

use crate::survey::{Pop, Survey};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MaterialParams {
    /// Extra cable for slack, sag and splicing, as a fraction.
    pub reserve_margin: f64,
    /// Metres between poles.
    pub pole_spacing: f64,
    /// Metres between technical reserve loops.
    pub loop_spacing: f64,
}

impl Default for MaterialParams {
    fn default() -> Self {
        MaterialParams {
            reserve_margin: 0.10,
            pole_spacing: 40.0,
            loop_spacing: 500.0,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Materials {
    pub pop: String,
    pub fiber: f64,
    pub cable: f64,
    pub suspension_sets: u64,
    pub reserve_loops: u64,
    pub cto_boxes: u64,
    pub splitters_5_95: u64,
    pub splitters_50_50: u64,
}

/// Splitters for one route with `boxes` CTOs: `(5/95, 50/50)`.
pub fn splitters(boxes: usize) -> (u64, u64) {
    match boxes {
        0 => (0, 0),
        n => (n as u64 - 1, 1),
    }
}

/// Spans of `spacing` metres needed to cover `length`.
pub fn spans(length: f64, spacing: f64) -> u64 {
    if length <= 0.0 || spacing <= 0.0 {
        return 0;
    }
    // float noise such as 55.000000001 must not cost an extra span
    (length / spacing - 1e-9).ceil() as u64
}

impl Materials {
    pub fn for_pop(pop: &Pop, params: &MaterialParams) -> Materials {
        let fiber = pop.fiber_length();
        let cable = fiber * (1.0 + params.reserve_margin);
        let (splitters_5_95, splitters_50_50) = pop
            .ctos
            .iter()
            .flat_map(|group| group.routes.iter())
            .map(|route| splitters(route.boxes))
            .fold((0, 0), |(a, b), (x, y)| (a + x, b + y));
        Materials {
            pop: pop.name.clone(),
            fiber,
            cable,
            suspension_sets: spans(cable, params.pole_spacing),
            reserve_loops: spans(cable, params.loop_spacing),
            cto_boxes: pop.box_count() as u64,
            splitters_5_95,
            splitters_50_50,
        }
    }
}

pub fn materials(survey: &Survey, params: &MaterialParams) -> Vec<Materials> {
    survey
        .pops()
        .map(|pop| Materials::for_pop(pop, params))
        .collect()
}

pub fn totals(lines: &[Materials]) -> Materials {
    lines.iter().fold(
        Materials {
            pop: "Total".to_string(),
            ..Default::default()
        },
        |mut acc, m| {
            acc.fiber += m.fiber;
            acc.cable += m.cable;
            acc.suspension_sets += m.suspension_sets;
            acc.reserve_loops += m.reserve_loops;
            acc.cto_boxes += m.cto_boxes;
            acc.splitters_5_95 += m.splitters_5_95;
            acc.splitters_50_50 += m.splitters_50_50;
            acc
        },
    )
}
