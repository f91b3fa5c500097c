//! RGB to RGGB Bayer mosaic conversion.
//!
//! Samples an interleaved RGB image down to one channel per pixel in the
//! layout a RGGB sensor records, scaled into the 14-bit range above the black
//! level.

/// Largest value a 14-bit sensor sample can take.
pub const MAX_14BIT_SAMPLE: u16 = 0x3fff;

/// RGB channel recorded at (`row`, `column`) of an RGGB tile.
fn rggb_channel(row: usize, column: usize) -> usize {
    match (row & 1, column & 1) {
        (0, 0) => 0,
        (1, 1) => 2,
        _ => 1,
    }
}

/// Scales `value` in `0..=max_value` onto `black_level..=16383`.
/// Fractions are truncated.
pub fn scale_to_14bit(value: u16, max_value: u16, black_level: u16) -> u16 {
    let black_level = black_level.min(MAX_14BIT_SAMPLE);
    let span = u32::from(MAX_14BIT_SAMPLE - black_level);
    let max_value = u32::from(max_value.max(1));
    let scaled = u32::from(value).min(max_value) * span / max_value;
    scaled as u16 + black_level
}

/// Builds the RGGB mosaic of an interleaved `[R, G, B, ...]` image.
///
/// `rgb` must hold `width * height * 3` samples, each in `0..=max_value`.
pub fn rgb_to_rggb(
    width: usize,
    height: usize,
    rgb: &[u16],
    max_value: u16,
    black_level: u16,
) -> Vec<u16> {
    let mut mosaic = Vec::with_capacity(width * height);
    if width == 0 {
        return mosaic;
    }
    for (row, pixels) in rgb.chunks_exact(width * 3).take(height).enumerate() {
        for (column, pixel) in pixels.chunks_exact(3).enumerate() {
            let sample = pixel[rggb_channel(row, column)];
            mosaic.push(scale_to_14bit(sample, max_value, black_level));
        }
    }
    mosaic
}
