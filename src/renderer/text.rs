use bytemuck::NoUninit;
use glam::{Vec2, vec2};
use image::{Rgba, RgbaImage};

/// Glyph cell size in the atlas, pixels.
pub const GLYPH_SIZE: u32 = 8;

/// 8×8 bitmaps for every character the overlay can emit: the "Avg X"/"Avg Y"
/// label text plus signed decimal numbers. One byte per row, MSB leftmost.
const GLYPHS: [(char, [u8; 8]); 19] = [
    (' ', [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]),
    ('-', [0x00, 0x00, 0x00, 0x7E, 0x00, 0x00, 0x00, 0x00]),
    ('.', [0x00, 0x00, 0x00, 0x00, 0x00, 0x18, 0x18, 0x00]),
    ('0', [0x3C, 0x66, 0x6E, 0x76, 0x66, 0x66, 0x3C, 0x00]),
    ('1', [0x18, 0x38, 0x18, 0x18, 0x18, 0x18, 0x7E, 0x00]),
    ('2', [0x3C, 0x66, 0x06, 0x0C, 0x18, 0x30, 0x7E, 0x00]),
    ('3', [0x3C, 0x66, 0x06, 0x1C, 0x06, 0x66, 0x3C, 0x00]),
    ('4', [0x0C, 0x1C, 0x2C, 0x4C, 0x7E, 0x0C, 0x0C, 0x00]),
    ('5', [0x7E, 0x60, 0x7C, 0x06, 0x06, 0x66, 0x3C, 0x00]),
    ('6', [0x1C, 0x30, 0x60, 0x7C, 0x66, 0x66, 0x3C, 0x00]),
    ('7', [0x7E, 0x06, 0x0C, 0x18, 0x30, 0x30, 0x30, 0x00]),
    ('8', [0x3C, 0x66, 0x66, 0x3C, 0x66, 0x66, 0x3C, 0x00]),
    ('9', [0x3C, 0x66, 0x66, 0x3E, 0x06, 0x0C, 0x38, 0x00]),
    (':', [0x00, 0x18, 0x18, 0x00, 0x18, 0x18, 0x00, 0x00]),
    ('A', [0x18, 0x3C, 0x66, 0x66, 0x7E, 0x66, 0x66, 0x00]),
    ('X', [0x66, 0x66, 0x3C, 0x18, 0x3C, 0x66, 0x66, 0x00]),
    ('Y', [0x66, 0x66, 0x3C, 0x18, 0x18, 0x18, 0x18, 0x00]),
    ('g', [0x00, 0x00, 0x3E, 0x66, 0x3E, 0x06, 0x66, 0x3C]),
    ('v', [0x00, 0x00, 0x66, 0x66, 0x66, 0x3C, 0x18, 0x00]),
];

/// One screen-space glyph instance: pixel origin (top-left) plus its atlas
/// UV rectangle.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, NoUninit)]
pub struct GlyphQuad {
    pub origin: Vec2,
    pub uv_min: Vec2,
    pub uv_max: Vec2,
}

pub fn glyph_index(c: char) -> Option<usize> {
    GLYPHS.iter().position(|&(glyph, _)| glyph == c)
}

/// Renders the embedded font into a one-row RGBA atlas. White where the
/// glyph bit is set, transparent elsewhere; the shader supplies the color.
pub fn atlas_image() -> RgbaImage {
    RgbaImage::from_fn(GLYPHS.len() as u32 * GLYPH_SIZE, GLYPH_SIZE, |x, y| {
        let (_, rows) = GLYPHS[(x / GLYPH_SIZE) as usize];
        let bit = rows[y as usize] >> (GLYPH_SIZE - 1 - x % GLYPH_SIZE) & 1;

        Rgba([0xff, 0xff, 0xff, if bit == 1 { 0xff } else { 0x00 }])
    })
}

/// Lays `text` out left to right starting at `origin` (pixels, top-left),
/// appending one quad per known character. Unknown characters still advance
/// the pen so spacing survives them.
pub fn layout(text: &str, origin: Vec2, glyph_px: Vec2, out: &mut Vec<GlyphQuad>) {
    let uv_width = 1.0 / GLYPHS.len() as f32;

    for (column, c) in text.chars().enumerate() {
        let Some(index) = glyph_index(c) else {
            continue;
        };

        out.push(GlyphQuad {
            origin: origin + vec2(column as f32 * glyph_px.x, 0.0),
            uv_min: vec2(index as f32 * uv_width, 0.0),
            uv_max: vec2((index + 1) as f32 * uv_width, 1.0),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charset_covers_the_label_formatter() {
        for value in [0.0, -0.05, 12.34, -123.45, f32::MAX] {
            for label in [format!("Avg X: {value:.2}"), format!("Avg Y: {value:.2}")] {
                for c in label.chars() {
                    assert!(glyph_index(c).is_some(), "missing glyph {c:?} in {label:?}");
                }
            }
        }
    }

    #[test]
    fn atlas_is_one_row_of_cells() {
        let atlas = atlas_image();
        assert_eq!(atlas.width(), GLYPHS.len() as u32 * GLYPH_SIZE);
        assert_eq!(atlas.height(), GLYPH_SIZE);
    }

    #[test]
    fn atlas_blanks_spaces_and_inks_digits() {
        let atlas = atlas_image();

        let space = glyph_index(' ').unwrap() as u32 * GLYPH_SIZE;
        let zero = glyph_index('0').unwrap() as u32 * GLYPH_SIZE;

        let cell_alpha = |cell: u32| {
            (0..GLYPH_SIZE)
                .flat_map(|x| (0..GLYPH_SIZE).map(move |y| (x, y)))
                .map(|(x, y)| atlas.get_pixel(cell + x, y).0[3] as u32)
                .sum::<u32>()
        };

        assert_eq!(cell_alpha(space), 0);
        assert!(cell_alpha(zero) > 0);
    }

    #[test]
    fn layout_advances_one_cell_per_character() {
        let mut quads = Vec::new();
        layout("X: 1", Vec2::ZERO, vec2(24.0, 24.0), &mut quads);

        assert_eq!(quads.len(), 4);
        for (i, quad) in quads.iter().enumerate() {
            assert_eq!(quad.origin, vec2(i as f32 * 24.0, 0.0));
        }
    }

    #[test]
    fn layout_skips_unknown_characters_without_losing_spacing() {
        let mut quads = Vec::new();
        layout("1~2", Vec2::ZERO, vec2(8.0, 8.0), &mut quads);

        assert_eq!(quads.len(), 2);
        assert_eq!(quads[1].origin, vec2(16.0, 0.0));
    }
}
