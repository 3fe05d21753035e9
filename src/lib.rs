//! Fiber-optic network survey from KML project files.
//!
//! A project file holds link routes between cities and GPON distribution
//! trees, organised in folders whose names follow a convention (`LINK`,
//! `LINK PARCEIROS`, `GPON`, `CTO'S`, `CIDADES`, `EM ANDAMENTO`,
//! `CONCLUÍDO`). [`analyze`] validates the file, walks the folder tree and
//! returns a [`survey::Survey`] from which [`report::build`] derives the
//! distance, progress, budget and material tables.

pub mod budget;
pub mod classify;
pub mod distance;
pub mod error;
pub mod materials;
pub mod point;
pub mod progress;
pub mod render;
pub mod report;
pub mod style;
pub mod survey;
pub mod tree;
pub mod typst;
pub mod validate;

pub use error::{Error, Result};

use crate::style::StyleTable;
use crate::survey::Survey;
use crate::validate::Inventory;

pub struct Analysis {
    pub inventory: Inventory,
    pub survey: Survey,
}

pub fn analyze(content: &str) -> Result<Analysis> {
    let (doc, inventory) = validate::load(content)?;
    let styles = StyleTable::extract(&doc);
    let survey = Survey::from_document(&doc, &styles)?;
    if let Some(bbox) = survey.bbox() {
        log::info!("survey: {}", bbox);
    }
    Ok(Analysis { inventory, survey })
}
