use core::fmt;

use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WGS84Point {
    pub lon: f64,
    pub lat: f64,
    pub ele: Option<f64>,
}

impl WGS84Point {
    pub fn new(lon: f64, lat: f64) -> Self {
        WGS84Point {
            lon,
            lat,
            ele: None,
        }
    }
    pub fn geo(&self) -> geo::Point<f64> {
        geo::Point::new(self.lon, self.lat)
    }
}

impl fmt::Display for WGS84Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let e = match self.ele {
            Some(z) => format!("{:.1}", z),
            None => "None".to_string(),
        };
        write!(
            f,
            "wgs(lat: {:.5}, lon: {:.5}, ele: {})",
            self.lat, self.lon, e
        )
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WGS84BoundingBox {
    pub min: WGS84Point,
    pub max: WGS84Point,
}

impl WGS84BoundingBox {
    pub fn from(p1: &WGS84Point, p2: &WGS84Point) -> Self {
        let min = WGS84Point::new(p1.lon.min(p2.lon), p1.lat.min(p2.lat));
        let max = WGS84Point::new(p1.lon.max(p2.lon), p1.lat.max(p2.lat));
        Self { min, max }
    }
    pub fn of<'a>(points: impl IntoIterator<Item = &'a WGS84Point>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut ret = Self::from(first, first);
        for p in points {
            ret.extend(p);
        }
        Some(ret)
    }
    pub fn extend(&mut self, w: &WGS84Point) {
        self.min.lon = self.min.lon.min(w.lon);
        self.min.lat = self.min.lat.min(w.lat);
        self.max.lon = self.max.lon.max(w.lon);
        self.max.lat = self.max.lat.max(w.lat);
    }
    pub fn contains(&self, w: &WGS84Point) -> bool {
        w.lon >= self.min.lon
            && w.lon <= self.max.lon
            && w.lat >= self.min.lat
            && w.lat <= self.max.lat
    }
}

impl fmt::Display for WGS84BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "wgsbbox(min: {}, max: {})", self.min, self.max)
    }
}
