use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("cannot read file: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("malformed XML: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("invalid KML: {0}")]
    Kml(#[from] kml::Error),
    #[error("root element is <{0}>, expected <kml>")]
    NotKml(String),
    #[error("bad coordinate tuple {tuple:?} in placemark {placemark:?}")]
    Coordinates { placemark: String, tuple: String },
    #[error("unknown POP: {0}")]
    UnknownPop(String),
    #[error("cannot serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
