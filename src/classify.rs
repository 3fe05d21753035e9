//! Folder classification by naming convention.
//!
//! Project files are curated by hand in Google Earth, so the only structure
//! available is the folder names: `LINK ...` for backbone links between
//! cities, `LINK PARCEIROS` for partner links, `GPON ...` for distribution
//! trees, `CTO'S` for terminal box groups and `CIDADES` for city markers.

use serde::Serialize;

/// Tags carried by a folder name. A name may match several keywords.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FolderTags {
    pub link: bool,
    pub partner: bool,
    pub gpon: bool,
    pub ctos: bool,
    pub cities: bool,
}

impl FolderTags {
    pub fn of(name: &str) -> FolderTags {
        let upper = normalize(name);
        FolderTags {
            link: upper.contains("LINK"),
            partner: upper.contains("LINK PARCEIROS"),
            gpon: upper.contains("GPON"),
            ctos: upper.contains("CTO'S"),
            cities: upper.contains("CIDADES"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteStatus {
    Planned,
    InProgress,
    Completed,
}

impl RouteStatus {
    /// Status keyword of a folder name, if any.
    pub fn of(name: &str) -> Option<RouteStatus> {
        let upper = normalize(name);
        if upper.contains("EM ANDAMENTO") {
            Some(RouteStatus::InProgress)
        } else if upper.contains("CONCLUÍDO") || upper.contains("CONCLUIDO") {
            Some(RouteStatus::Completed)
        } else {
            None
        }
    }

    pub fn line_style(&self) -> LineStyle {
        match self {
            RouteStatus::InProgress => LineStyle::Dashed,
            _ => LineStyle::Solid,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    Solid,
    Dashed,
}

/// Colour of a link folder's routes when no style overrides it.
pub fn link_color(name: &str) -> &'static str {
    let upper = normalize(name);
    if upper.contains("LINK PARCEIROS") {
        "red"
    } else if upper.contains("AMARELO") {
        "yellow"
    } else if upper.contains("VERDE") {
        "green"
    } else {
        "blue"
    }
}

fn normalize(name: &str) -> String {
    name.to_uppercase().replace(['\u{2019}', '\u{00B4}'], "'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("LINK TERESINA - PARNAÍBA", true, false, false, false, false)]
    #[case("link parceiros", true, true, false, false, false)]
    #[case("LINK PARCEIROS NORTE", true, true, false, false, false)]
    #[case("GPON ALTOS", false, false, true, false, false)]
    #[case("CTO'S", false, false, false, true, false)]
    #[case("cto’s rua 7", false, false, false, true, false)]
    #[case("CIDADES", false, false, false, false, true)]
    #[case("Cidades atendidas", false, false, false, false, true)]
    #[case("LINK CIDADES", true, false, false, false, true)]
    #[case("EM ANDAMENTO", false, false, false, false, false)]
    #[case("CTOS", false, false, false, false, false)]
    fn test_folder_tags(
        #[case] name: &str,
        #[case] link: bool,
        #[case] partner: bool,
        #[case] gpon: bool,
        #[case] ctos: bool,
        #[case] cities: bool,
    ) {
        let tags = FolderTags::of(name);
        assert_eq!(
            tags,
            FolderTags {
                link,
                partner,
                gpon,
                ctos,
                cities
            },
            "{name}"
        );
    }

    #[rstest]
    #[case("EM ANDAMENTO", Some(RouteStatus::InProgress))]
    #[case("Em andamento - lote 2", Some(RouteStatus::InProgress))]
    #[case("CONCLUÍDO", Some(RouteStatus::Completed))]
    #[case("concluído", Some(RouteStatus::Completed))]
    #[case("CONCLUIDO", Some(RouteStatus::Completed))]
    #[case("PROJETADO", None)]
    fn test_route_status(#[case] name: &str, #[case] expected: Option<RouteStatus>) {
        assert_eq!(RouteStatus::of(name), expected);
    }

    #[rstest]
    #[case("LINK PARCEIROS VERDE", "red")]
    #[case("LINK AMARELO", "yellow")]
    #[case("link verde", "green")]
    #[case("LINK TERESINA", "blue")]
    fn test_link_color(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(link_color(name), expected);
    }

    #[test]
    fn test_line_style() {
        assert_eq!(RouteStatus::InProgress.line_style(), LineStyle::Dashed);
        assert_eq!(RouteStatus::Completed.line_style(), LineStyle::Solid);
        assert_eq!(RouteStatus::Planned.line_style(), LineStyle::Solid);
    }
}
