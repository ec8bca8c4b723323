const BACKGROUND: [u8; 4] = [224, 196, 180, 255];
const CREASE: [u8; 4] = [60, 40, 36, 255];

/// Axis-aligned dark bar, inclusive pixel bounds.
#[derive(Clone, Copy, Debug)]
pub struct Bar {
    pub x0: usize,
    pub x1: usize,
    pub y0: usize,
    pub y1: usize,
}

/// Generates a flat skin-toned RGBA image.
pub fn uniform_rgba(width: usize, height: usize) -> Vec<u8> {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    BACKGROUND.repeat(width * height)
}

/// Paints dark creases over a flat background.
pub fn bars_rgba(width: usize, height: usize, bars: &[Bar]) -> Vec<u8> {
    let mut img = uniform_rgba(width, height);
    for bar in bars {
        assert!(bar.x1 < width && bar.y1 < height, "bar outside the image");
        for y in bar.y0..=bar.y1 {
            for x in bar.x0..=bar.x1 {
                let o = (y * width + x) * 4;
                img[o..o + 4].copy_from_slice(&CREASE);
            }
        }
    }
    img
}

/// 200×200 palm with a heart crease across the upper third and a fate
/// crease running up the middle.
pub fn palm_rgba() -> (usize, usize, Vec<u8>) {
    let (w, h) = (200, 200);
    let heart = Bar { x0: 40, x1: 160, y0: 58, y1: 62 };
    let fate = Bar { x0: 98, x1: 102, y0: 90, y1: 190 };
    (w, h, bars_rgba(w, h, &[heart, fate]))
}
