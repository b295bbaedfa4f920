/// Mean Earth radius in km.
const EARTH_RADIUS_KM: f64 = 6371.0;

pub struct GeoHelper;

impl GeoHelper {
    /// Great-circle distance between two points on a spherical Earth,
    /// in km. Display readout only; location inversion happens elsewhere.
    pub fn great_circle_km(lat1_deg: f64, lon1_deg: f64, lat2_deg: f64, lon2_deg: f64) -> f64 {
        let lat1 = lat1_deg.to_radians();
        let lat2 = lat2_deg.to_radians();
        let dlat = (lat2_deg - lat1_deg).to_radians();
        let dlon = (lon2_deg - lon1_deg).to_radians();

        let a = (dlat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_KM * c
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_distance_for_identical_points() {
        assert_eq!(GeoHelper::great_circle_km(45.0, 70.0, 45.0, 70.0), 0.0);
    }

    #[test]
    fn quarter_meridian_is_about_ten_thousand_km() {
        let d = GeoHelper::great_circle_km(0.0, 0.0, 90.0, 0.0);
        assert!((d - 10_007.5).abs() < 5.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let forward = GeoHelper::great_circle_km(-23.7, 133.9, 46.8, 82.3);
        let backward = GeoHelper::great_circle_km(46.8, 82.3, -23.7, 133.9);
        assert!((forward - backward).abs() < 1e-9);
    }
}
