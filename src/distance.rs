use geo::{Distance, Geodesic};

use crate::error::{Error, Result};
use crate::point::WGS84Point;

/// Length of a polyline in whole metres, measured on the WGS84 ellipsoid.
pub fn route_length(points: &[WGS84Point]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    let total: f64 = points
        .windows(2)
        .map(|w| Geodesic.distance(w[0].geo(), w[1].geo()))
        .sum();
    total.round()
}

/// Parses the text of a `<coordinates>` element (`lon,lat[,alt]` tuples
/// separated by whitespace).
pub fn parse_coordinates(text: &str, placemark: &str) -> Result<Vec<WGS84Point>> {
    text.split_whitespace()
        .map(|tuple| parse_tuple(tuple).ok_or_else(|| bad_tuple(placemark, tuple)))
        .collect()
}

fn parse_tuple(tuple: &str) -> Option<WGS84Point> {
    let mut parts = tuple.split(',');
    let lon = parts.next()?.trim().parse::<f64>().ok()?;
    let lat = parts.next()?.trim().parse::<f64>().ok()?;
    let ele = match parts.next() {
        Some(z) if !z.trim().is_empty() => Some(z.trim().parse::<f64>().ok()?),
        _ => None,
    };
    if parts.next().is_some() || !lon.is_finite() || !lat.is_finite() {
        return None;
    }
    Some(WGS84Point { lon, lat, ele })
}

fn bad_tuple(placemark: &str, tuple: &str) -> Error {
    Error::Coordinates {
        placemark: placemark.to_string(),
        tuple: tuple.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn test_empty_and_single_point() {
        assert_eq!(route_length(&[]), 0.0);
        assert_eq!(route_length(&[WGS84Point::new(-42.8, -5.1)]), 0.0);
    }

    #[test]
    fn test_one_degree_of_meridian() {
        // 0°..1° of latitude on the WGS84 ellipsoid is 110574.4 m
        let d = route_length(&[WGS84Point::new(0.0, 0.0), WGS84Point::new(0.0, 1.0)]);
        assert!(close(d, 110574.0, 1.0), "got {d}");
    }

    #[test]
    fn test_one_degree_of_equator() {
        let d = route_length(&[WGS84Point::new(0.0, 0.0), WGS84Point::new(1.0, 0.0)]);
        assert!(close(d, 111319.0, 1.0), "got {d}");
    }

    #[test]
    fn test_sum_over_vertices() {
        let path = vec![
            WGS84Point::new(0.0, 0.0),
            WGS84Point::new(0.0, 1.0),
            WGS84Point::new(0.0, 0.0),
        ];
        let d = route_length(&path);
        assert!(close(d, 2.0 * 110574.389, 1.0), "got {d}");
    }

    #[test]
    fn test_result_is_whole_metres() {
        let path = vec![
            WGS84Point::new(-42.8016, -5.0892),
            WGS84Point::new(-42.8010, -5.0880),
            WGS84Point::new(-42.7990, -5.0871),
        ];
        let d = route_length(&path);
        assert_eq!(d, d.round());
        assert!(d > 0.0);
    }

    #[test]
    fn test_parse_coordinates() {
        let text = "\n  -42.8016,-5.0892,0 -42.8010,-5.0880\n\t-42.7990,-5.0871,12.5 ";
        let points = parse_coordinates(text, "ROTA").unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].lon, -42.8016);
        assert_eq!(points[0].lat, -5.0892);
        assert_eq!(points[0].ele, Some(0.0));
        assert_eq!(points[1].ele, None);
        assert_eq!(points[2].ele, Some(12.5));
    }

    #[test]
    fn test_parse_coordinates_empty() {
        assert!(parse_coordinates("   ", "ROTA").unwrap().is_empty());
    }

    #[test]
    fn test_parse_coordinates_rejects_garbage() {
        assert!(parse_coordinates("-42.8,-5.0 foo,bar", "ROTA").is_err());
        assert!(parse_coordinates("-42.8", "ROTA").is_err());
        assert!(parse_coordinates("-42.8,-5.0,1,2", "ROTA").is_err());
        let err = parse_coordinates("1,x", "ROTA 7").unwrap_err();
        assert!(err.to_string().contains("ROTA 7"));
    }
}
