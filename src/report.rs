//! Reshapes a [`Survey`] into numbered tables with per-folder subtotals and
//! a grand total, the way project managers read them.

use std::collections::BTreeMap;

use clap::ValueEnum;
use serde::Serialize;

use crate::budget::{self, BudgetParams, money};
use crate::classify::RouteStatus;
use crate::error::{Error, Result};
use crate::materials::{self, MaterialParams};
use crate::progress::completion;
use crate::survey::{Pop, Survey};

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Cell {
    Empty,
    Text(String),
    Count(u64),
    Metres(f64),
    Percent(f64),
    Money(f64),
}

impl Cell {
    pub fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    pub fn render(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Count(n) => n.to_string(),
            Cell::Metres(m) => budget::grouped(*m, 0),
            Cell::Percent(p) => format!("{:.1}%", p),
            Cell::Money(v) => money(*v),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    Data,
    Subtotal,
    Total,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Row {
    pub id: Option<usize>,
    pub kind: RowKind,
    pub cells: Vec<Cell>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Table {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(title: &str, headers: &[&str]) -> Table {
        Table {
            title: title.to_string(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a data row, numbered from 1.
    pub fn push(&mut self, cells: Vec<Cell>) {
        let id = self.rows.iter().filter(|r| r.kind == RowKind::Data).count() + 1;
        self.rows.push(Row {
            id: Some(id),
            kind: RowKind::Data,
            cells,
        });
    }

    pub fn push_subtotal(&mut self, cells: Vec<Cell>) {
        self.rows.push(Row {
            id: None,
            kind: RowKind::Subtotal,
            cells,
        });
    }

    pub fn push_total(&mut self, cells: Vec<Cell>) {
        self.rows.push(Row {
            id: None,
            kind: RowKind::Total,
            cells,
        });
    }

    pub fn data_rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(|r| r.kind == RowKind::Data)
    }

    pub fn total(&self) -> Option<&Row> {
        self.rows.iter().find(|r| r.kind == RowKind::Total)
    }
}

/// Report sections, in the order they are printed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Section {
    Summary,
    Partners,
    Links,
    Status,
    Completion,
    Gpon,
    Pops,
    Budget,
    Materials,
    Cities,
}

impl Section {
    pub fn all() -> Vec<Section> {
        Section::value_variants().to_vec()
    }
}

#[derive(Clone, Debug, Default)]
pub struct ReportOptions {
    pub sections: Vec<Section>,
    /// Restricts the POP detail tables to one POP.
    pub pop: Option<String>,
    pub budget: BudgetParams,
    pub materials: MaterialParams,
}

pub fn build(survey: &Survey, options: &ReportOptions) -> Result<Vec<Table>> {
    let sections = if options.sections.is_empty() {
        Section::all()
    } else {
        options.sections.clone()
    };
    let mut tables = Vec::new();
    for section in sections {
        match section {
            Section::Summary => tables.push(summary(survey)),
            Section::Partners => {
                if survey.partner_folders().any(|l| !l.routes.is_empty()) {
                    tables.push(partner_routes(survey));
                }
            }
            Section::Links => tables.push(link_fiber(survey)),
            Section::Status => tables.extend(status(survey)),
            Section::Completion => tables.push(completion_table(survey)),
            Section::Gpon => tables.push(gpon_dashboard(survey)),
            Section::Pops => tables.extend(pop_detail(survey, options.pop.as_deref())?),
            Section::Budget => tables.push(budget_table(survey, &options.budget)),
            Section::Materials => tables.push(materials_table(survey, &options.materials)),
            Section::Cities => tables.push(cities(survey)),
        }
    }
    Ok(tables)
}

pub fn summary(survey: &Survey) -> Table {
    let mut table = Table::new("Resumo", &["Item", "Valor"]);
    let rows = [
        ("Pastas LINK", Cell::Count(survey.link_folders().count() as u64)),
        (
            "Pastas LINK PARCEIROS",
            Cell::Count(survey.partner_folders().count() as u64),
        ),
        ("Distância total (m)", Cell::Metres(survey.total_distance())),
        ("Cidades", Cell::Count(survey.cities.len() as u64)),
        ("POPs", Cell::Count(survey.pops().count() as u64)),
    ];
    for (item, value) in rows {
        table.push(vec![Cell::text(item), value]);
    }
    if let Some(bbox) = survey.bbox() {
        table.push(vec![
            Cell::text("Extensão"),
            Cell::Text(format!(
                "lat {:.5}..{:.5}, lon {:.5}..{:.5}",
                bbox.min.lat, bbox.max.lat, bbox.min.lon, bbox.max.lon
            )),
        ]);
    }
    table
}

/// Folder / route / distance rows, then one subtotal per folder (sorted by
/// name) and the grand total.
pub fn route_table<'a>(
    title: &str,
    route_header: &str,
    rows: impl IntoIterator<Item = (&'a str, &'a str, f64)>,
) -> Table {
    let mut table = Table::new(title, &["Pasta", route_header, "Distância (m)"]);
    let mut subtotals: BTreeMap<&str, f64> = BTreeMap::new();
    let mut total = 0.0;
    for (folder, route, distance) in rows {
        table.push(vec![
            Cell::text(folder),
            Cell::text(route),
            Cell::Metres(distance),
        ]);
        *subtotals.entry(folder).or_default() += distance;
        total += distance;
    }
    for (folder, subtotal) in subtotals {
        table.push_subtotal(vec![
            Cell::text(folder),
            Cell::text("Subtotal"),
            Cell::Metres(subtotal),
        ]);
    }
    table.push_total(vec![Cell::text("Total"), Cell::Empty, Cell::Metres(total)]);
    table
}

pub fn partner_routes(survey: &Survey) -> Table {
    let rows = survey
        .partner_folders()
        .flat_map(|l| l.routes.iter())
        .map(|r| (r.folder.as_str(), r.name.as_str(), r.distance));
    route_table("ROTAS LINK PARCEIROS", "Rota", rows)
}

/// Planned routes folder by folder, then in-progress, then completed.
pub fn link_fiber(survey: &Survey) -> Table {
    let rows = [
        RouteStatus::Planned,
        RouteStatus::InProgress,
        RouteStatus::Completed,
    ]
    .into_iter()
    .flat_map(|status| survey.routes_with(status))
    .map(|r| (r.folder.as_str(), r.name.as_str(), r.distance));
    route_table(
        "Quantidade de Fibra Ótica projetada - LINK",
        "ROTAS LINK",
        rows,
    )
}

/// Rotas em andamento / concluídas; empty lists produce no table.
pub fn status(survey: &Survey) -> Vec<Table> {
    let mut tables = Vec::new();
    for (status, title) in [
        (RouteStatus::InProgress, "Rotas em Andamento"),
        (RouteStatus::Completed, "Rotas Concluídas"),
    ] {
        if survey.routes_with(status).next().is_none() {
            continue;
        }
        let rows = survey
            .routes_with(status)
            .map(|r| (r.folder.as_str(), r.name.as_str(), r.distance));
        tables.push(route_table(title, "Rota", rows));
    }
    tables
}

pub fn completion_table(survey: &Survey) -> Table {
    let mut table = Table::new(
        "Porcentagem Concluída",
        &["Pasta", "Concluído (%)", "Não Concluído (%)"],
    );
    for c in completion(survey) {
        table.push(vec![
            Cell::Text(c.folder.clone()),
            Cell::Percent(c.percent),
            Cell::Percent(c.remaining()),
        ]);
    }
    table
}

pub fn gpon_dashboard(survey: &Survey) -> Table {
    let mut table = Table::new(
        "GPON - Análise Rotas, CTO'S, Fibra Ótica",
        &["POP", "Rotas", "CTO'S", "Fibra Ótica (metros)"],
    );
    let (mut routes, mut boxes, mut fiber) = (0, 0, 0.0);
    for pop in survey.pops() {
        table.push(vec![
            Cell::Text(pop.name.clone()),
            Cell::Count(pop.route_count() as u64),
            Cell::Count(pop.box_count() as u64),
            Cell::Metres(pop.fiber_length()),
        ]);
        routes += pop.route_count() as u64;
        boxes += pop.box_count() as u64;
        fiber += pop.fiber_length();
    }
    table.push_total(vec![
        Cell::text("Total"),
        Cell::Count(routes),
        Cell::Count(boxes),
        Cell::Metres(fiber),
    ]);
    table
}

/// Routes per CTO group and boxes per route, for one POP or all of them.
pub fn pop_detail(survey: &Survey, pop: Option<&str>) -> Result<Vec<Table>> {
    let (pops, scope): (Vec<&Pop>, String) = match pop {
        Some(name) => {
            let found = survey
                .find_pop(name)
                .ok_or_else(|| Error::UnknownPop(name.to_string()))?;
            (vec![found], name.to_string())
        }
        None => (survey.pops().collect(), "TODOS os POPs".to_string()),
    };

    let mut per_project = Table::new(
        &format!("Quantidade de Rotas por projeto - {}", scope),
        &["Projeto", "Rotas"],
    );
    let mut per_route = Table::new(
        &format!("Rotas e CTO'S - {}", scope),
        &["Projeto", "Rota", "CTO'S"],
    );
    let (mut routes, mut boxes) = (0, 0);
    for group in pops.iter().flat_map(|p| p.ctos.iter()) {
        per_project.push(vec![
            Cell::Text(group.name.clone()),
            Cell::Count(group.routes.len() as u64),
        ]);
        routes += group.routes.len() as u64;
        for route in &group.routes {
            per_route.push(vec![
                Cell::Text(group.name.clone()),
                Cell::Text(route.name.clone()),
                Cell::Count(route.boxes as u64),
            ]);
            boxes += route.boxes as u64;
        }
    }
    per_project.push_total(vec![Cell::text("Total"), Cell::Count(routes)]);
    per_route.push_total(vec![Cell::text("Total"), Cell::Empty, Cell::Count(boxes)]);
    Ok(vec![per_project, per_route])
}

pub fn budget_table(survey: &Survey, params: &BudgetParams) -> Table {
    let overhead = format!("Outros Materiais ({:.0}%) (R$)", params.overhead * 100.0);
    let mut table = Table::new(
        "Orçamento de Materiais para o Projeto",
        &[
            "POP",
            "Cabo (metros)",
            "Cabo Autossustentado 2FO AS80 (R$)",
            overhead.as_str(),
            "Valor Total (R$)",
        ],
    );
    let lines = budget::budget(survey, params);
    for l in &lines {
        table.push(budget_cells(l));
    }
    table.push_total(budget_cells(&budget::totals(&lines)));
    table
}

fn budget_cells(l: &budget::BudgetLine) -> Vec<Cell> {
    vec![
        Cell::Text(l.pop.clone()),
        Cell::Metres(l.metres),
        Cell::Money(l.cable),
        Cell::Money(l.other),
        Cell::Money(l.total),
    ]
}

pub fn materials_table(survey: &Survey, params: &MaterialParams) -> Table {
    let mut table = Table::new(
        "Quantitativo de Materiais",
        &[
            "POP",
            "Fibra (m)",
            "Cabo c/ reserva (m)",
            "Conjuntos de suspensão",
            "Reservas técnicas",
            "CTO'S",
            "Splitter 5/95",
            "Splitter 50/50",
        ],
    );
    let lines = materials::materials(survey, params);
    for m in &lines {
        table.push(material_cells(m));
    }
    table.push_total(material_cells(&materials::totals(&lines)));
    table
}

fn material_cells(m: &materials::Materials) -> Vec<Cell> {
    vec![
        Cell::Text(m.pop.clone()),
        Cell::Metres(m.fiber),
        Cell::Metres(m.cable),
        Cell::Count(m.suspension_sets),
        Cell::Count(m.reserve_loops),
        Cell::Count(m.cto_boxes),
        Cell::Count(m.splitters_5_95),
        Cell::Count(m.splitters_50_50),
    ]
}

pub fn cities(survey: &Survey) -> Table {
    let mut table = Table::new("Cidades", &["Cidade", "Latitude", "Longitude"]);
    for city in &survey.cities {
        table.push(vec![
            Cell::Text(city.name.clone()),
            Cell::Text(format!("{:.5}", city.point.lat)),
            Cell::Text(format!("{:.5}", city.point.lon)),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::LineStyle;
    use crate::survey::{CtoGroup, CtoRoute, Fiber, GponFolder, LinkFolder, Route};

    fn route(folder: &str, name: &str, distance: f64, status: RouteStatus) -> Route {
        Route {
            folder: folder.to_string(),
            name: name.to_string(),
            distance,
            status,
            color: "blue".to_string(),
            line_style: status.line_style(),
            coordinates: Vec::new(),
        }
    }

    fn link(name: &str, partner: bool, routes: Vec<Route>) -> LinkFolder {
        LinkFolder {
            name: name.to_string(),
            partner,
            routes,
        }
    }

    fn sample() -> Survey {
        Survey {
            links: vec![
                link(
                    "LINK B",
                    false,
                    vec![
                        route("LINK B", "b1", 100.0, RouteStatus::Planned),
                        route("LINK B", "b2", 50.0, RouteStatus::Completed),
                    ],
                ),
                link(
                    "LINK A",
                    false,
                    vec![
                        route("LINK A", "a1", 200.0, RouteStatus::InProgress),
                        route("LINK A", "a2", 10.0, RouteStatus::Planned),
                    ],
                ),
                link(
                    "LINK PARCEIROS",
                    true,
                    vec![route("LINK PARCEIROS", "p1", 999.0, RouteStatus::Planned)],
                ),
            ],
            cities: Vec::new(),
            gpon: vec![GponFolder {
                name: "GPON".to_string(),
                pops: vec![
                    Pop {
                        gpon: "GPON".to_string(),
                        name: "POP 1".to_string(),
                        ctos: vec![CtoGroup {
                            name: "CTO'S 1".to_string(),
                            routes: vec![
                                CtoRoute {
                                    name: "R1".to_string(),
                                    boxes: 3,
                                },
                                CtoRoute {
                                    name: "R2".to_string(),
                                    boxes: 4,
                                },
                            ],
                        }],
                        fibers: vec![Fiber {
                            name: "f".to_string(),
                            distance: 800.0,
                            coordinates: Vec::new(),
                        }],
                    },
                    Pop {
                        gpon: "GPON".to_string(),
                        name: "POP 2".to_string(),
                        ctos: Vec::new(),
                        fibers: Vec::new(),
                    },
                ],
            }],
        }
    }

    fn texts(row: &Row) -> Vec<String> {
        row.cells.iter().map(Cell::render).collect()
    }

    #[test]
    fn test_link_fiber_order_and_subtotals() {
        let table = link_fiber(&sample());
        let routes: Vec<String> = table.data_rows().map(|r| texts(r)[1].clone()).collect();
        assert_eq!(routes, vec!["b1", "a2", "a1", "b2"]);
        let ids: Vec<Option<usize>> = table.data_rows().map(|r| r.id).collect();
        assert_eq!(ids, vec![Some(1), Some(2), Some(3), Some(4)]);

        let subtotals: Vec<Vec<String>> = table
            .rows
            .iter()
            .filter(|r| r.kind == RowKind::Subtotal)
            .map(texts)
            .collect();
        assert_eq!(
            subtotals,
            vec![
                vec!["LINK A", "Subtotal", "210"],
                vec!["LINK B", "Subtotal", "150"],
            ]
        );
        assert_eq!(table.total().unwrap().cells[2], Cell::Metres(360.0));
        assert_eq!(table.rows.last().unwrap().kind, RowKind::Total);
    }

    #[test]
    fn test_partner_table() {
        let survey = sample();
        let table = partner_routes(&survey);
        assert_eq!(table.data_rows().count(), 1);
        assert_eq!(table.total().unwrap().cells[2], Cell::Metres(999.0));
    }

    #[test]
    fn test_status_tables() {
        let tables = status(&sample());
        let titles: Vec<&str> = tables.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Rotas em Andamento", "Rotas Concluídas"]);
        assert_eq!(tables[0].total().unwrap().cells[2], Cell::Metres(200.0));

        let planned_only = Survey {
            links: vec![link(
                "LINK",
                false,
                vec![route("LINK", "r", 1.0, RouteStatus::Planned)],
            )],
            ..Default::default()
        };
        assert!(status(&planned_only).is_empty());
    }

    #[test]
    fn test_gpon_dashboard() {
        let table = gpon_dashboard(&sample());
        let rows: Vec<Vec<String>> = table.rows.iter().map(texts).collect();
        assert_eq!(
            rows,
            vec![
                vec!["POP 1", "2", "7", "800"],
                vec!["POP 2", "0", "0", "0"],
                vec!["Total", "2", "7", "800"],
            ]
        );
    }

    #[test]
    fn test_pop_detail() {
        let survey = sample();
        let tables = pop_detail(&survey, Some("POP 1")).unwrap();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].total().unwrap().cells[1], Cell::Count(2));
        assert_eq!(tables[1].data_rows().count(), 2);
        assert_eq!(tables[1].total().unwrap().cells[2], Cell::Count(7));

        let all = pop_detail(&survey, None).unwrap();
        assert!(all[0].title.ends_with("TODOS os POPs"));

        assert!(matches!(
            pop_detail(&survey, Some("POP 9")),
            Err(Error::UnknownPop(name)) if name == "POP 9"
        ));
    }

    #[test]
    fn test_budget_table() {
        let table = budget_table(&sample(), &BudgetParams::default());
        assert_eq!(table.headers[3], "Outros Materiais (20%) (R$)");
        assert_eq!(table.data_rows().count(), 1);
        let total = texts(table.total().unwrap());
        assert_eq!(total, vec!["Total", "800", "R$ 8,000.00", "R$ 1,600.00", "R$ 9,600.00"]);
    }

    #[test]
    fn test_build_sections() {
        let survey = sample();
        let options = ReportOptions {
            sections: vec![Section::Gpon, Section::Completion],
            ..Default::default()
        };
        let tables = build(&survey, &options).unwrap();
        let titles: Vec<&str> = tables.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["GPON - Análise Rotas, CTO'S, Fibra Ótica", "Porcentagem Concluída"]
        );
        let everything = build(&survey, &ReportOptions::default()).unwrap();
        assert!(everything.len() > tables.len());
    }
}
