use crate::render::view::LatLng;
use std::f64::consts::PI;

pub const TILE_SIZE: f64 = 256.0;
/// Latitude at which the Web-Mercator world square ends.
pub const MAX_LATITUDE: f64 = 85.051_128_78;

/// Projects to Web-Mercator world pixels at `zoom` (origin top-left, world
/// width `256 * 2^zoom`).
pub fn world_pixel(point: LatLng, zoom: u8) -> (f64, f64) {
    let size = TILE_SIZE * 2f64.powi(zoom as i32);
    let x = (point.lon + 180.0) / 360.0 * size;
    let lat = point.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * size;
    (x, y)
}

/// Screen position of `point` in a `width x height` viewport centred on
/// `center`.
pub fn screen_pixel(
    point: LatLng,
    center: LatLng,
    zoom: u8,
    width: f64,
    height: f64,
) -> (f64, f64) {
    let (px, py) = world_pixel(point, zoom);
    let (cx, cy) = world_pixel(center, zoom);
    (px - cx + width / 2.0, py - cy + height / 2.0)
}
