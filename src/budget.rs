use serde::Serialize;

use crate::survey::Survey;

/// Pricing for the self-supporting 2FO AS80 drop cable.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BudgetParams {
    /// R$ per metre of cable.
    pub cable_cost: f64,
    /// Connectors, splice boxes, fasteners: fraction of the cable cost.
    pub overhead: f64,
}

impl Default for BudgetParams {
    fn default() -> Self {
        BudgetParams {
            cable_cost: 10.0,
            overhead: 0.20,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BudgetLine {
    pub pop: String,
    pub metres: f64,
    pub cable: f64,
    pub other: f64,
    pub total: f64,
}

impl BudgetLine {
    pub fn new(pop: &str, metres: f64, params: &BudgetParams) -> Self {
        let cable = metres * params.cable_cost;
        let other = cable * params.overhead;
        BudgetLine {
            pop: pop.to_string(),
            metres,
            cable,
            other,
            total: cable + other,
        }
    }
}

/// One line per POP that has fiber drawn.
pub fn budget(survey: &Survey, params: &BudgetParams) -> Vec<BudgetLine> {
    survey
        .pops()
        .filter(|pop| pop.fiber_length() > 0.0)
        .map(|pop| BudgetLine::new(&pop.name, pop.fiber_length(), params))
        .collect()
}

pub fn totals(lines: &[BudgetLine]) -> BudgetLine {
    lines.iter().fold(
        BudgetLine {
            pop: "Total".to_string(),
            metres: 0.0,
            cable: 0.0,
            other: 0.0,
            total: 0.0,
        },
        |mut acc, l| {
            acc.metres += l.metres;
            acc.cable += l.cable;
            acc.other += l.other;
            acc.total += l.total;
            acc
        },
    )
}

/// `R$ 1,234.56`
pub fn money(value: f64) -> String {
    format!("R$ {}", grouped(value, 2))
}

/// Thousands-separated decimal with a fixed number of places.
pub fn grouped(value: f64, places: usize) -> String {
    let s = format!("{:.*}", places, value.abs());
    let (int, frac) = match s.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (s.as_str(), None),
    };
    let mut out = String::new();
    for (i, ch) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(frac) = frac {
        out.push('.');
        out.push_str(frac);
    }
    if value < 0.0 && out.chars().any(|c| c != '0' && c != '.' && c != ',') {
        out.insert(0, '-');
    }
    out
}
