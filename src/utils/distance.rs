use crate::utils::constants::{EARTH_RADIUS, WGS84_FLATTENING, WGS84_SEMI_MAJOR_AXIS};

const MAX_ITERATIONS: usize = 200;
const CONVERGENCE_THRESHOLD: f64 = 1e-12;

/// Distance in kilometres between two points on the WGS-84 ellipsoid.
///
/// Uses Vincenty's inverse formula and falls back to the great-circle
/// distance when the iteration does not converge (nearly antipodal points).
pub fn calculate_distance(lat_1: f64, lon_1: f64, lat_2: f64, lon_2: f64) -> f64 {
    vincenty_distance(lat_1, lon_1, lat_2, lon_2)
        .unwrap_or_else(|| great_circle_distance(lat_1, lon_1, lat_2, lon_2))
}

fn vincenty_distance(lat_1: f64, lon_1: f64, lat_2: f64, lon_2: f64) -> Option<f64> {
    let a = WGS84_SEMI_MAJOR_AXIS;
    let f = WGS84_FLATTENING;
    let b = (1.0 - f) * a;

    let l = (lon_2 - lon_1).to_radians();
    let (sin_u_1, cos_u_1) = ((1.0 - f) * lat_1.to_radians().tan()).atan().sin_cos();
    let (sin_u_2, cos_u_2) = ((1.0 - f) * lat_2.to_radians().tan()).atan().sin_cos();

    let mut lambda = l;
    for _ in 0..MAX_ITERATIONS {
        let (sin_lambda, cos_lambda) = lambda.sin_cos();
        let sin_sigma = ((cos_u_2 * sin_lambda).powi(2)
            + (cos_u_1 * sin_u_2 - sin_u_1 * cos_u_2 * cos_lambda).powi(2))
        .sqrt();
        if sin_sigma == 0.0 {
            return Some(0.0);
        }
        let cos_sigma = sin_u_1 * sin_u_2 + cos_u_1 * cos_u_2 * cos_lambda;
        let sigma = sin_sigma.atan2(cos_sigma);
        let sin_alpha = cos_u_1 * cos_u_2 * sin_lambda / sin_sigma;
        let cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
        // Equatorial line: cos_sq_alpha is zero.
        let cos_2_sigma_m = if cos_sq_alpha != 0.0 {
            cos_sigma - 2.0 * sin_u_1 * sin_u_2 / cos_sq_alpha
        } else {
            0.0
        };
        let c = f / 16.0 * cos_sq_alpha * (4.0 + f * (4.0 - 3.0 * cos_sq_alpha));

        let previous_lambda = lambda;
        lambda = l
            + (1.0 - c)
                * f
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2_sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2_sigma_m.powi(2))));

        if (lambda - previous_lambda).abs() < CONVERGENCE_THRESHOLD {
            let u_sq = cos_sq_alpha * (a * a - b * b) / (b * b);
            let big_a =
                1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
            let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));
            let delta_sigma = big_b
                * sin_sigma
                * (cos_2_sigma_m
                    + big_b / 4.0
                        * (cos_sigma * (-1.0 + 2.0 * cos_2_sigma_m.powi(2))
                            - big_b / 6.0
                                * cos_2_sigma_m
                                * (-3.0 + 4.0 * sin_sigma.powi(2))
                                * (-3.0 + 4.0 * cos_2_sigma_m.powi(2))));
            return Some(b * big_a * (sigma - delta_sigma) / 1000.0);
        }
    }

    None
}

fn great_circle_distance(lat_1: f64, lon_1: f64, lat_2: f64, lon_2: f64) -> f64 {
    let lat_1_rad = lat_1.to_radians();
    let lat_2_rad = lat_2.to_radians();
    let d_lat = lat_2_rad - lat_1_rad;
    let d_lon = (lon_2 - lon_1).to_radians();

    let h = (d_lat / 2f64).sin().powi(2)
        + lat_1_rad.cos() * lat_2_rad.cos() * (d_lon / 2f64).sin().powi(2);

    2f64 * h.sqrt().min(1f64).asin() * EARTH_RADIUS
}
