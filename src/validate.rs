use std::fmt;
use std::fs;
use std::panic;

use kml::Kml;
use roxmltree::Document;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::tree::is;

/// What a parsed KML document contains.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Inventory {
    pub folders: usize,
    pub placemarks: usize,
    pub line_strings: usize,
    pub points: usize,
}

impl fmt::Display for Inventory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "folders: {}, placemarks: {}, line strings: {}, points: {}",
            self.folders, self.placemarks, self.line_strings, self.points
        )
    }
}

pub fn read_file(path: &str) -> Result<String> {
    fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_string(),
        source,
    })
}

/// Parses the XML tree the survey walks. The document must be well-formed
/// and rooted at a `<kml>` element.
pub fn parse_document(content: &str) -> Result<Document<'_>> {
    let doc = Document::parse(content)?;
    let root = doc.root_element().tag_name().name();
    if root != "kml" {
        return Err(Error::NotKml(root.to_string()));
    }
    Ok(doc)
}

/// Parses and checks `content`, returning the tree and its inventory.
pub fn load(content: &str) -> Result<(Document<'_>, Inventory)> {
    let doc = parse_document(content)?;
    check_kml(content)?;
    let inventory = inventory(&doc);
    log::info!("kml: {}", inventory);
    Ok((doc, inventory))
}

/// Rejects anything that is not well-formed KML before processing starts.
pub fn validate(content: &str) -> Result<Inventory> {
    load(content).map(|(_, inventory)| inventory)
}

/// Counts the features of a parsed document by element name.
pub fn inventory(doc: &Document) -> Inventory {
    let count = |tag: &str| doc.descendants().filter(|n| is(n, tag)).count();
    Inventory {
        folders: count("Folder"),
        placemarks: count("Placemark"),
        line_strings: count("LineString"),
        points: count("Point"),
    }
}

/// Runs the kml crate's typed reader. Its errors reject the file. The reader
/// panics on a `<Point>` without coordinates, which Google Earth writes for
/// unplaced markers; such files are still surveyed.
fn check_kml(content: &str) -> Result<()> {
    match panic::catch_unwind(|| content.parse::<Kml>()) {
        Ok(Ok(_)) => Ok(()),
        Ok(Err(e)) => Err(e.into()),
        Err(_) => {
            log::warn!("kml reader gave up on this file, checked as XML only");
            Ok(())
        }
    }
}
