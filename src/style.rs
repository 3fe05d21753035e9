use std::collections::HashMap;

use roxmltree::Document;

use crate::tree::{child, child_text, descendants, is};

/// Line colours declared by `<Style>` and `<StyleMap>` elements, keyed by id.
#[derive(Clone, Debug, Default)]
pub struct StyleTable {
    styles: HashMap<String, String>,
    maps: HashMap<String, String>,
}

impl StyleTable {
    pub fn extract(doc: &Document) -> StyleTable {
        let mut table = StyleTable::default();
        let root = doc.root_element();
        for style in descendants(root, "Style") {
            let Some(id) = style.attribute("id") else {
                continue;
            };
            let Some(color) = child(&style, "LineStyle").and_then(|l| child_text(&l, "color"))
            else {
                continue;
            };
            match html_color(color) {
                Some(html) => {
                    table.styles.insert(id.to_string(), html);
                }
                None => log::warn!("style {}: ignoring colour {:?}", id, color),
            }
        }
        for map in descendants(root, "StyleMap") {
            let Some(id) = map.attribute("id") else {
                continue;
            };
            let normal = map
                .children()
                .filter(|c| is(c, "Pair"))
                .find(|pair| child_text(pair, "key") == Some("normal"))
                .and_then(|pair| child_text(&pair, "styleUrl"));
            if let Some(url) = normal {
                table
                    .maps
                    .insert(id.to_string(), url.trim_start_matches('#').to_string());
            }
        }
        log::info!(
            "styles: {} line colours, {} style maps",
            table.styles.len(),
            table.maps.len()
        );
        table
    }

    /// Colour for a `styleUrl` value such as `#line-0288D1`.
    pub fn resolve(&self, style_url: &str) -> Option<&str> {
        let id = style_url.trim().trim_start_matches('#');
        let id = self.maps.get(id).map(String::as_str).unwrap_or(id);
        self.styles.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

/// KML colours are `aabbggrr`; HTML wants `#rrggbb`.
pub fn html_color(kml_color: &str) -> Option<String> {
    let c = kml_color.trim();
    if c.len() != 8 || !c.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return None;
    }
    Some(format!("#{}{}{}", &c[6..8], &c[4..6], &c[2..4]).to_lowercase())
}
