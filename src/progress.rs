use serde::Serialize;

use crate::classify::RouteStatus;
use crate::survey::Survey;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Completion {
    pub folder: String,
    pub total: f64,
    pub completed: f64,
    pub percent: f64,
}

impl Completion {
    pub fn remaining(&self) -> f64 {
        100.0 - self.percent
    }
}

/// Share of each link folder's fiber that sits under a completed folder.
pub fn completion(survey: &Survey) -> Vec<Completion> {
    survey
        .link_folders()
        .map(|link| {
            let total = link.distance();
            let completed = link.distance_with(RouteStatus::Completed);
            let percent = if total > 0.0 {
                completed / total * 100.0
            } else {
                0.0
            };
            Completion {
                folder: link.name.clone(),
                total,
                completed,
                percent,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::LineStyle;
    use crate::survey::{LinkFolder, Route};

    fn route(distance: f64, status: RouteStatus) -> Route {
        Route {
            folder: "LINK".to_string(),
            name: "r".to_string(),
            distance,
            status,
            color: "blue".to_string(),
            line_style: LineStyle::Solid,
            coordinates: Vec::new(),
        }
    }

    #[test]
    fn test_completion() {
        let survey = Survey {
            links: vec![
                LinkFolder {
                    name: "LINK A".to_string(),
                    partner: false,
                    routes: vec![
                        route(300.0, RouteStatus::Completed),
                        route(100.0, RouteStatus::InProgress),
                        route(600.0, RouteStatus::Planned),
                    ],
                },
                LinkFolder {
                    name: "LINK VAZIO".to_string(),
                    partner: false,
                    routes: Vec::new(),
                },
                LinkFolder {
                    name: "LINK PARCEIROS".to_string(),
                    partner: true,
                    routes: vec![route(500.0, RouteStatus::Planned)],
                },
            ],
            ..Default::default()
        };
        let c = completion(&survey);
        assert_eq!(c.len(), 2);
        assert_eq!(c[0].folder, "LINK A");
        assert_eq!(c[0].total, 1000.0);
        assert_eq!(c[0].completed, 300.0);
        assert!((c[0].percent - 30.0).abs() < 1e-9);
        assert!((c[0].remaining() - 70.0).abs() < 1e-9);
        assert_eq!(c[1].percent, 0.0);
        assert_eq!(c[1].remaining(), 100.0);
    }
}
