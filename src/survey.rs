//! Single pass over the folder tree of a project file.
//!
//! Every `<Folder>` is visited in document order and handled according to the
//! tags in its name (see [`crate::classify`]). Link folders become lists of
//! routes with a status and a map style, `CIDADES` folders become city
//! markers, and `GPON` folders become POP → CTO group → route aggregates.

use std::collections::HashSet;

use roxmltree::{Document, Node};
use serde::Serialize;

use crate::classify::{FolderTags, LineStyle, RouteStatus, link_color};
use crate::distance::{parse_coordinates, route_length};
use crate::error::Result;
use crate::point::{WGS84BoundingBox, WGS84Point};
use crate::style::StyleTable;
use crate::tree::{ancestor_folders, child, child_folders, child_text, descendants, name_or};

pub const UNKNOWN_FOLDER: &str = "Desconhecido";
pub const UNKNOWN_SUBFOLDER: &str = "Subpasta Desconhecida";
pub const UNKNOWN_ROUTE: &str = "Rota Desconhecida";
pub const UNNAMED_PLACEMARK: &str = "Sem Nome";

#[derive(Clone, Debug, Serialize)]
pub struct Route {
    pub folder: String,
    pub name: String,
    pub distance: f64,
    pub status: RouteStatus,
    pub color: String,
    pub line_style: LineStyle,
    pub coordinates: Vec<WGS84Point>,
}

#[derive(Clone, Debug, Serialize)]
pub struct LinkFolder {
    pub name: String,
    pub partner: bool,
    pub routes: Vec<Route>,
}

impl LinkFolder {
    /// Planned, in-progress and completed routes together.
    pub fn distance(&self) -> f64 {
        self.routes.iter().map(|r| r.distance).sum()
    }
    pub fn distance_with(&self, status: RouteStatus) -> f64 {
        self.routes
            .iter()
            .filter(|r| r.status == status)
            .map(|r| r.distance)
            .sum()
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct City {
    pub name: String,
    pub point: WGS84Point,
}

/// A route folder below a CTO'S group and the number of boxes it holds.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CtoRoute {
    pub name: String,
    pub boxes: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CtoGroup {
    pub name: String,
    pub routes: Vec<CtoRoute>,
}

impl CtoGroup {
    pub fn boxes(&self) -> usize {
        self.routes.iter().map(|r| r.boxes).sum()
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Fiber {
    pub name: String,
    pub distance: f64,
    pub coordinates: Vec<WGS84Point>,
}

#[derive(Clone, Debug, Serialize)]
pub struct Pop {
    pub gpon: String,
    pub name: String,
    pub ctos: Vec<CtoGroup>,
    pub fibers: Vec<Fiber>,
}

impl Pop {
    pub fn route_count(&self) -> usize {
        self.ctos.iter().map(|c| c.routes.len()).sum()
    }
    pub fn box_count(&self) -> usize {
        self.ctos.iter().map(|c| c.boxes()).sum()
    }
    pub fn fiber_length(&self) -> f64 {
        self.fibers.iter().map(|f| f.distance).sum()
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct GponFolder {
    pub name: String,
    pub pops: Vec<Pop>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct Survey {
    pub links: Vec<LinkFolder>,
    pub cities: Vec<City>,
    pub gpon: Vec<GponFolder>,
}

impl Survey {
    pub fn from_document(doc: &Document, styles: &StyleTable) -> Result<Survey> {
        let mut survey = Survey::default();
        let mut registered: HashSet<String> = HashSet::new();

        for folder in descendants(doc.root_element(), "Folder") {
            let name = name_or(&folder, UNKNOWN_FOLDER);
            if registered.contains(&name) {
                log::warn!("folder {:?} already surveyed, skipping", name);
                continue;
            }
            let tags = FolderTags::of(&name);

            if tags.link {
                if inside_gpon(folder) {
                    log::trace!("link folder {:?} is part of a GPON tree", name);
                } else {
                    let link = survey_link(folder, &name, tags.partner, styles)?;
                    log::info!(
                        "link {:?}: {} routes, {:.0} m",
                        link.name,
                        link.routes.len(),
                        link.distance()
                    );
                    if !link.partner {
                        registered.insert(name.clone());
                    }
                    survey.links.push(link);
                }
            }

            if tags.cities {
                survey.cities.extend(survey_cities(folder)?);
            }

            if tags.gpon {
                survey.survey_gpon(folder, &name)?;
            }
        }

        log::info!(
            "survey: {} link folders, {} cities, {} POPs, {:.0} m of link fiber",
            survey.links.len(),
            survey.cities.len(),
            survey.pops().count(),
            survey.total_distance()
        );
        Ok(survey)
    }

    fn survey_gpon(&mut self, folder: Node, name: &str) -> Result<()> {
        let index = match self.gpon.iter().position(|g| g.name == name) {
            Some(index) => index,
            None => {
                self.gpon.push(GponFolder {
                    name: name.to_string(),
                    pops: Vec::new(),
                });
                self.gpon.len() - 1
            }
        };
        for sub in child_folders(folder) {
            let pop_name = name_or(&sub, UNKNOWN_SUBFOLDER);
            if self.gpon[index].pops.iter().any(|p| p.name == pop_name) {
                log::warn!("POP {:?} listed twice in {:?}", pop_name, name);
                continue;
            }
            let mut fibers = Vec::new();
            for placemark in descendants(sub, "Placemark") {
                let placemark_name = name_or(&placemark, UNNAMED_PLACEMARK);
                for coordinates in line_strings(placemark, &placemark_name)? {
                    fibers.push(Fiber {
                        name: placemark_name.clone(),
                        distance: route_length(&coordinates),
                        coordinates,
                    });
                }
            }
            let pop = Pop {
                gpon: name.to_string(),
                name: pop_name,
                ctos: find_cto_groups(sub),
                fibers,
            };
            log::trace!(
                "POP {:?}: {} routes, {} CTOs, {:.0} m",
                pop.name,
                pop.route_count(),
                pop.box_count(),
                pop.fiber_length()
            );
            self.gpon[index].pops.push(pop);
        }
        Ok(())
    }

    /// Sum over every link folder, partner links included.
    pub fn total_distance(&self) -> f64 {
        self.links.iter().map(|l| l.distance()).sum()
    }

    pub fn link_folders(&self) -> impl Iterator<Item = &LinkFolder> {
        self.links.iter().filter(|l| !l.partner)
    }

    pub fn partner_folders(&self) -> impl Iterator<Item = &LinkFolder> {
        self.links.iter().filter(|l| l.partner)
    }

    /// Routes of the (non-partner) link folders with the given status.
    pub fn routes_with(&self, status: RouteStatus) -> impl Iterator<Item = &Route> {
        self.link_folders()
            .flat_map(|l| l.routes.iter())
            .filter(move |r| r.status == status)
    }

    pub fn pops(&self) -> impl Iterator<Item = &Pop> {
        self.gpon.iter().flat_map(|g| g.pops.iter())
    }

    pub fn find_pop(&self, name: &str) -> Option<&Pop> {
        self.pops().find(|p| p.name == name)
    }

    /// Extent of every surveyed route, fiber and city.
    pub fn bbox(&self) -> Option<WGS84BoundingBox> {
        let routes = self
            .links
            .iter()
            .flat_map(|l| l.routes.iter())
            .flat_map(|r| r.coordinates.iter());
        let fibers = self
            .pops()
            .flat_map(|p| p.fibers.iter())
            .flat_map(|f| f.coordinates.iter());
        let cities = self.cities.iter().map(|c| &c.point);
        WGS84BoundingBox::of(routes.chain(fibers).chain(cities))
    }
}

fn inside_gpon(folder: Node) -> bool {
    ancestor_folders(folder).any(|a| FolderTags::of(&name_or(&a, UNKNOWN_FOLDER)).gpon)
}

/// Status of a placemark below `link`, taken from the status folder closest
/// to it. `None` when the placemark sits in a nested link folder, which is
/// surveyed on its own.
fn placement(placemark: Node, link: Node) -> Option<RouteStatus> {
    let mut status = None;
    for folder in ancestor_folders(placemark) {
        if folder == link {
            return Some(status.unwrap_or(RouteStatus::Planned));
        }
        let name = name_or(&folder, UNKNOWN_SUBFOLDER);
        if FolderTags::of(&name).link {
            return None;
        }
        if status.is_none() {
            status = RouteStatus::of(&name);
        }
    }
    None
}

fn survey_link(folder: Node, name: &str, partner: bool, styles: &StyleTable) -> Result<LinkFolder> {
    let folder_color = link_color(name);
    let mut routes = Vec::new();
    for placemark in descendants(folder, "Placemark") {
        let Some(mut status) = placement(placemark, folder) else {
            continue;
        };
        let placemark_name = name_or(&placemark, UNNAMED_PLACEMARK);
        let color = match child_text(&placemark, "styleUrl").and_then(|url| styles.resolve(url)) {
            Some(styled) if !partner => styled.to_string(),
            _ => folder_color.to_string(),
        };
        if partner {
            status = RouteStatus::Planned;
        }
        for coordinates in line_strings(placemark, &placemark_name)? {
            let distance = route_length(&coordinates);
            log::trace!(
                "{} / {}: {:.0} m ({:?})",
                name,
                placemark_name,
                distance,
                status
            );
            routes.push(Route {
                folder: name.to_string(),
                name: placemark_name.clone(),
                distance,
                status,
                color: color.clone(),
                line_style: status.line_style(),
                coordinates,
            });
        }
    }
    Ok(LinkFolder {
        name: name.to_string(),
        partner,
        routes,
    })
}

fn survey_cities(folder: Node) -> Result<Vec<City>> {
    let mut cities = Vec::new();
    for placemark in descendants(folder, "Placemark") {
        let Some(point) = descendants(placemark, "Point").next() else {
            continue;
        };
        let name = name_or(&placemark, UNNAMED_PLACEMARK);
        let text = child_text(&point, "coordinates").unwrap_or_default();
        if let Some(point) = parse_coordinates(text, &name)?.into_iter().next() {
            cities.push(City { name, point });
        }
    }
    Ok(cities)
}

/// Coordinates of every `<LineString>` below a placemark, `<MultiGeometry>`
/// members included.
fn line_strings(placemark: Node, name: &str) -> Result<Vec<Vec<WGS84Point>>> {
    descendants(placemark, "LineString")
        .map(|ls| {
            let text = child(&ls, "coordinates")
                .and_then(|c| c.text())
                .unwrap_or_default();
            parse_coordinates(text, name)
        })
        .collect()
}

/// CTO'S groups anywhere below a POP folder, first occurrence of each name.
/// Every folder below a group is one of its routes; each placemark below a
/// route is a terminal box.
pub fn find_cto_groups(folder: Node) -> Vec<CtoGroup> {
    let mut seen = HashSet::new();
    let mut groups = Vec::new();
    for sub in descendants(folder, "Folder") {
        let name = name_or(&sub, UNKNOWN_SUBFOLDER);
        if !FolderTags::of(&name).ctos || !seen.insert(name.clone()) {
            continue;
        }
        let routes = descendants(sub, "Folder")
            .map(|route| CtoRoute {
                name: name_or(&route, UNKNOWN_ROUTE),
                boxes: descendants(route, "Placemark").count(),
            })
            .collect();
        groups.push(CtoGroup { name, routes });
    }
    groups
}
