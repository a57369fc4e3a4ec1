use crate::image_pipeline::edges::gaussian::gaussian_blur;
use crate::image_pipeline::edges::types::{EdgeConfig, ThresholdPair};

pub(crate) const EDGE: u8 = u8::MAX;

/// tan(22.5 deg) in Q15.
const TAN_22_5_Q15: i64 = 13573;

const NOT_EDGE: u8 = 0;
const WEAK: u8 = 1;
const STRONG: u8 = 2;

struct Gradients {
    gx: Vec<i32>,
    gy: Vec<i32>,
    magnitude: Vec<i32>,
}

/// Canny edge detection on an intensity image.
///
/// Returns one byte per pixel, 255 on edges and 0 elsewhere.
pub fn canny(gray: &[u8], width: usize, height: usize, config: &EdgeConfig) -> Vec<u8> {
    debug_assert_eq!(gray.len(), width * height);

    let gradients = if config.blur {
        sobel(&gaussian_blur(gray, width, height), width, height)
    } else {
        sobel(gray, width, height)
    };
    let classes = non_max_suppression(&gradients, width, height, config.thresholds);
    hysteresis(&classes, width, height)
}

/// 3x3 Sobel derivatives with replicated borders and L1 magnitude.
fn sobel(img: &[u8], width: usize, height: usize) -> Gradients {
    let len = width * height;
    let mut gx = vec![0i32; len];
    let mut gy = vec![0i32; len];
    let mut magnitude = vec![0i32; len];

    let at = |x: usize, y: usize| img[y * width + x] as i32;

    for y in 0..height {
        let up = y.saturating_sub(1);
        let down = (y + 1).min(height - 1);
        for x in 0..width {
            let left = x.saturating_sub(1);
            let right = (x + 1).min(width - 1);

            let dx = (at(right, up) + 2 * at(right, y) + at(right, down))
                - (at(left, up) + 2 * at(left, y) + at(left, down));
            let dy = (at(left, down) + 2 * at(x, down) + at(right, down))
                - (at(left, up) + 2 * at(x, up) + at(right, up));

            let i = y * width + x;
            gx[i] = dx;
            gy[i] = dy;
            magnitude[i] = dx.abs() + dy.abs();
        }
    }

    Gradients { gx, gy, magnitude }
}

/// Keeps local maxima along the quantised gradient direction and classifies
/// them against the thresholds.
///
/// Ties go to the first neighbour (left, up), so a ridge two pixels wide with
/// equal magnitudes is thinned to one pixel.
fn non_max_suppression(
    gradients: &Gradients,
    width: usize,
    height: usize,
    thresholds: ThresholdPair,
) -> Vec<u8> {
    let magnitude = &gradients.magnitude;
    let mag_at = |x: isize, y: isize| -> i32 {
        if x < 0 || y < 0 || x >= width as isize || y >= height as isize {
            0
        } else {
            magnitude[y as usize * width + x as usize]
        }
    };

    let mut classes = vec![NOT_EDGE; magnitude.len()];
    for y in 0..height {
        for x in 0..width {
            let i = y * width + x;
            let m = magnitude[i];
            if (m as f64) < thresholds.low() {
                continue;
            }

            let (xi, yi) = (x as isize, y as isize);
            let (gx, gy) = (gradients.gx[i], gradients.gy[i]);
            let ax = gx.unsigned_abs() as i64;
            let ay = (gy.unsigned_abs() as i64) << 15;
            let tg22 = ax * TAN_22_5_Q15;
            let tg67 = tg22 + (ax << 16);

            let is_max = if ay < tg22 {
                m > mag_at(xi - 1, yi) && m >= mag_at(xi + 1, yi)
            } else if ay > tg67 {
                m > mag_at(xi, yi - 1) && m >= mag_at(xi, yi + 1)
            } else {
                let s = if (gx ^ gy) < 0 { -1 } else { 1 };
                m > mag_at(xi - s, yi - 1) && m > mag_at(xi + s, yi + 1)
            };

            if is_max {
                classes[i] = if m as f64 >= thresholds.high() { STRONG } else { WEAK };
            }
        }
    }
    classes
}

/// Promotes weak pixels 8-connected to a strong pixel, drops the rest.
fn hysteresis(classes: &[u8], width: usize, height: usize) -> Vec<u8> {
    let mut edges = vec![0u8; classes.len()];
    let mut stack: Vec<usize> = Vec::new();

    for (i, &class) in classes.iter().enumerate() {
        if class == STRONG {
            edges[i] = EDGE;
            stack.push(i);
        }
    }

    while let Some(i) = stack.pop() {
        let (x, y) = (i % width, i / width);
        for ny in y.saturating_sub(1)..=(y + 1).min(height - 1) {
            for nx in x.saturating_sub(1)..=(x + 1).min(width - 1) {
                let j = ny * width + nx;
                if classes[j] == WEAK && edges[j] == 0 {
                    edges[j] = EDGE;
                    stack.push(j);
                }
            }
        }
    }

    edges
}
