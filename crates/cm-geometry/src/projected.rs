//! Projected-area factor of a seated occupant (SolarCal table).

use std::sync::OnceLock;

/// Projected-area factors sampled every 15° of azimuth (rows, 0..=180
/// relative to the occupant's front) and altitude (columns, 0..=90).
const SEATED: [[f64; 7]; 13] = [
    [0.29, 0.324, 0.305, 0.303, 0.262, 0.224, 0.177],
    [0.292, 0.328, 0.294, 0.288, 0.268, 0.227, 0.177],
    [0.288, 0.332, 0.298, 0.29, 0.264, 0.222, 0.177],
    [0.274, 0.326, 0.294, 0.289, 0.252, 0.214, 0.177],
    [0.254, 0.308, 0.28, 0.276, 0.241, 0.202, 0.177],
    [0.23, 0.282, 0.262, 0.26, 0.233, 0.193, 0.177],
    [0.216, 0.26, 0.248, 0.244, 0.22, 0.186, 0.177],
    [0.234, 0.258, 0.236, 0.227, 0.208, 0.18, 0.177],
    [0.262, 0.26, 0.224, 0.208, 0.196, 0.176, 0.177],
    [0.28, 0.26, 0.21, 0.192, 0.184, 0.17, 0.177],
    [0.298, 0.256, 0.194, 0.174, 0.168, 0.168, 0.177],
    [0.306, 0.25, 0.18, 0.156, 0.156, 0.166, 0.177],
    [0.3, 0.24, 0.168, 0.152, 0.152, 0.164, 0.177],
];

const STEP: usize = 15;

/// Integer-degree lookup, azimuth 0..=180 by altitude 0..=90.
fn table() -> &'static [[f64; 91]; 181] {
    static TABLE: OnceLock<Box<[[f64; 91]; 181]>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut out = Box::new([[0.0; 91]; 181]);
        for (az, row) in out.iter_mut().enumerate() {
            let i = (az / STEP).min(SEATED.len() - 2);
            let fa = (az - i * STEP) as f64 / STEP as f64;
            for (alt, cell) in row.iter_mut().enumerate() {
                let j = (alt / STEP).min(SEATED[0].len() - 2);
                let fb = (alt - j * STEP) as f64 / STEP as f64;
                let low = SEATED[i][j] * (1.0 - fb) + SEATED[i][j + 1] * fb;
                let high = SEATED[i + 1][j] * (1.0 - fb) + SEATED[i + 1][j + 1] * fb;
                *cell = low * (1.0 - fa) + high * fa;
            }
        }
        out
    })
}

/// Fold a solar azimuth onto the symmetric half-plane and truncate.
fn fold_azimuth(azimuth: f64) -> usize {
    let mut az = azimuth;
    while az > 180.0 {
        az -= 180.0;
    }
    while az < 0.0 {
        az += 180.0;
    }
    (az as usize).min(180)
}

fn fold_altitude(altitude: f64) -> usize {
    let alt = if altitude > 90.0 { altitude - 90.0 } else { altitude };
    (alt.max(0.0) as usize).min(90)
}

/// Projected-area factor for a sun at `altitude`/`azimuth` degrees.
pub fn projected_area_factor(altitude: f64, azimuth: f64) -> f64 {
    if !altitude.is_finite() || !azimuth.is_finite() {
        return 0.0;
    }
    table()[fold_azimuth(azimuth)][fold_altitude(altitude)]
}
