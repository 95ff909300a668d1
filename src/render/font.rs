//! Built-in 5×7 bitmap font for raster text.
//!
//! Covers upper-case letters, digits and the punctuation used in axis labels
//! and titles. Lower-case input is drawn with the upper-case glyphs; other
//! characters render as a hollow box.

use crate::color::Rgba;
use crate::framebuffer::Framebuffer;

use super::{TextAnchor, TextStyle};

const GLYPH_W: u32 = 5;
const GLYPH_H: u32 = 7;
/// Glyph width plus one column of spacing.
const ADVANCE: u32 = GLYPH_W + 1;

/// Rows top to bottom, most significant of the low five bits is the leftmost
/// column. Sorted by character for binary search.
const GLYPHS: &[(char, [u8; 7])] = &[
    (' ', [0, 0, 0, 0, 0, 0, 0]),
    ('!', [0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00000, 0b00100]),
    ('"', [0b01010, 0b01010, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000]),
    ('#', [0b01010, 0b01010, 0b11111, 0b01010, 0b11111, 0b01010, 0b01010]),
    ('$', [0b00100, 0b01111, 0b10100, 0b01110, 0b00101, 0b11110, 0b00100]),
    ('%', [0b11000, 0b11001, 0b00010, 0b00100, 0b01000, 0b10011, 0b00011]),
    ('&', [0b01100, 0b10010, 0b10100, 0b01000, 0b10101, 0b10010, 0b01101]),
    ('\'', [0b00100, 0b00100, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000]),
    ('(', [0b00010, 0b00100, 0b01000, 0b01000, 0b01000, 0b00100, 0b00010]),
    (')', [0b01000, 0b00100, 0b00010, 0b00010, 0b00010, 0b00100, 0b01000]),
    ('*', [0b00000, 0b00100, 0b10101, 0b01110, 0b10101, 0b00100, 0b00000]),
    ('+', [0b00000, 0b00100, 0b00100, 0b11111, 0b00100, 0b00100, 0b00000]),
    (',', [0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b00100, 0b01000]),
    ('-', [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000]),
    ('.', [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b01100]),
    ('/', [0b00000, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b00000]),
    ('0', [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110]),
    ('1', [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110]),
    ('2', [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111]),
    ('3', [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110]),
    ('4', [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010]),
    ('5', [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110]),
    ('6', [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110]),
    ('7', [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000]),
    ('8', [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110]),
    ('9', [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100]),
    (':', [0b00000, 0b01100, 0b01100, 0b00000, 0b01100, 0b01100, 0b00000]),
    (';', [0b00000, 0b01100, 0b01100, 0b00000, 0b01100, 0b00100, 0b01000]),
    ('<', [0b00010, 0b00100, 0b01000, 0b10000, 0b01000, 0b00100, 0b00010]),
    ('=', [0b00000, 0b00000, 0b11111, 0b00000, 0b11111, 0b00000, 0b00000]),
    ('>', [0b01000, 0b00100, 0b00010, 0b00001, 0b00010, 0b00100, 0b01000]),
    ('?', [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b00000, 0b00100]),
    ('A', [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001]),
    ('B', [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110]),
    ('C', [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110]),
    ('D', [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110]),
    ('E', [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111]),
    ('F', [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000]),
    ('G', [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111]),
    ('H', [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001]),
    ('I', [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110]),
    ('J', [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100]),
    ('K', [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001]),
    ('L', [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111]),
    ('M', [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001]),
    ('N', [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001]),
    ('O', [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110]),
    ('P', [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000]),
    ('Q', [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101]),
    ('R', [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001]),
    ('S', [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110]),
    ('T', [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100]),
    ('U', [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110]),
    ('V', [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100]),
    ('W', [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010]),
    ('X', [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001]),
    ('Y', [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100]),
    ('Z', [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111]),
    ('[', [0b01110, 0b01000, 0b01000, 0b01000, 0b01000, 0b01000, 0b01110]),
    (']', [0b01110, 0b00010, 0b00010, 0b00010, 0b00010, 0b00010, 0b01110]),
    ('_', [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b11111]),
    ('|', [0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100]),
    ('~', [0b00000, 0b00000, 0b01000, 0b10101, 0b00010, 0b00000, 0b00000]),
];

const MISSING: [u8; 7] = [0b11111, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11111];

/// Bitmap for `ch`, folding lower case onto upper case.
#[must_use]
pub fn glyph(ch: char) -> [u8; 7] {
    let ch = ch.to_ascii_uppercase();
    GLYPHS
        .binary_search_by(|(c, _)| c.cmp(&ch))
        .map_or(MISSING, |i| GLYPHS[i].1)
}

/// Integer pixel scale used for a nominal font size.
fn pixel_scale(size: f32) -> u32 {
    ((size / 10.0).round() as u32).max(1)
}

/// Draw `text` into the framebuffer. `y` is the vertical center of the line
/// (horizontal center of the column for vertical text).
pub fn draw_text(fb: &mut Framebuffer, x: f32, y: f32, text: &str, style: TextStyle) {
    let scale = pixel_scale(style.size);
    let run = (text.chars().count() as u32 * ADVANCE).saturating_sub(1) * scale;
    let shift = match style.anchor {
        TextAnchor::Start => 0.0,
        TextAnchor::Middle => run as f32 / 2.0,
        TextAnchor::End => run as f32,
    };
    let half_height = (GLYPH_H * scale) as f32 / 2.0;

    for (i, ch) in text.chars().enumerate() {
        let bits = glyph(ch);
        let pen = i as u32 * ADVANCE * scale;
        for (gy, row) in bits.iter().enumerate() {
            for gx in 0..GLYPH_W {
                if row & (1 << (GLYPH_W - 1 - gx)) == 0 {
                    continue;
                }
                let along = (pen + gx * scale) as f32;
                let across = gy as f32 * scale as f32;
                let (px, py) = if style.vertical {
                    (x - half_height + across, y + shift - along - scale as f32)
                } else {
                    (x - shift + along, y - half_height + across)
                };
                if px + (scale as f32) < 0.0 || py + (scale as f32) < 0.0 {
                    continue;
                }
                let (cx, cy) = (px.round().max(0.0) as u32, py.round().max(0.0) as u32);
                fb.fill_rect(cx, cy, scale, scale, style.color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> Framebuffer {
        let mut fb = Framebuffer::new(120, 60).unwrap();
        fb.clear(Rgba::WHITE);
        fb
    }

    #[test]
    fn test_glyph_table_sorted() {
        assert!(GLYPHS.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_glyph_lookup() {
        assert_eq!(glyph('a'), glyph('A'));
        assert_ne!(glyph('A'), glyph('B'));
        assert_eq!(glyph(' '), [0; 7]);
        assert_eq!(glyph('\u{e9}'), MISSING);
    }

    #[test]
    fn test_draw_text_marks_pixels() {
        let mut fb = canvas();
        draw_text(&mut fb, 10.0, 30.0, "SALARY", TextStyle::new(10.0, Rgba::BLACK));
        let ink = fb.count_color(Rgba::BLACK);
        assert!(ink > 40);
        // Nothing to the left of the anchor
        for y in 0..60 {
            assert_eq!(fb.get_pixel(5, y), Some(Rgba::WHITE));
        }
    }

    #[test]
    fn test_anchor_end_stays_left_of_point() {
        let mut fb = canvas();
        let style = TextStyle::new(10.0, Rgba::BLACK).anchor(TextAnchor::End);
        draw_text(&mut fb, 60.0, 30.0, "100", style);
        for y in 0..60 {
            for x in 61..120 {
                assert_eq!(fb.get_pixel(x, y), Some(Rgba::WHITE));
            }
        }
        assert!(fb.count_color(Rgba::BLACK) > 0);
    }

    #[test]
    fn test_vertical_text_is_tall() {
        let mut fb = canvas();
        let style = TextStyle::new(10.0, Rgba::BLACK).anchor(TextAnchor::Middle).vertical();
        draw_text(&mut fb, 20.0, 30.0, "YY", style);
        let inked = |x: u32, y: u32| fb.get_pixel(x, y) == Some(Rgba::BLACK);
        let rows: Vec<u32> = (0..60).filter(|&y| (0..120).any(|x| inked(x, y))).collect();
        let cols: Vec<u32> = (0..120).filter(|&x| (0..60).any(|y| inked(x, y))).collect();
        assert!(rows.len() > cols.len());
    }

    #[test]
    fn test_larger_size_scales_up() {
        let mut small = canvas();
        let mut large = canvas();
        draw_text(&mut small, 5.0, 30.0, "A", TextStyle::new(10.0, Rgba::BLACK));
        draw_text(&mut large, 5.0, 30.0, "A", TextStyle::new(20.0, Rgba::BLACK));
        assert_eq!(large.count_color(Rgba::BLACK), 4 * small.count_color(Rgba::BLACK));
    }
}
