use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Synthesizes a noisy, rotated-looking card image placeholder: a flat
/// greyscale byte buffer seeded by the revealed rank so repeated renders of
/// the same card differ slightly, per `KUHN_IMAGE_*` (§6). Real rendering
/// (glyph rasterization, affine rotation) is left to the grading client;
/// this only has to exercise the same knobs the wire format promises.
pub fn render(rank: Option<char>, size: u32, noise: f32, rotate: f32) -> Vec<u8> {
    let seed = rank.map(|c| c as u64).unwrap_or(0) ^ (rotate.to_bits() as u64);
    let mut rng = SmallRng::seed_from_u64(seed);
    let pixels = (size as usize) * (size as usize);
    let base: u8 = rank.map(|_| 220).unwrap_or(40);
    (0..pixels)
        .map(|_| {
            let jitter = (rng.gen::<f32>() - 0.5) * 2.0 * noise * 255.0;
            (base as f32 + jitter).clamp(0.0, 255.0) as u8
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// the image buffer always has exactly size*size bytes
    #[test]
    fn buffer_is_square() {
        let img = render(Some('K'), 8, 0.1, 15.0);
        assert_eq!(img.len(), 64);
    }

    /// a masked card still renders a (darker) buffer, never an empty one
    #[test]
    fn masked_card_still_renders() {
        let img = render(None, 8, 0.1, 15.0);
        assert_eq!(img.len(), 64);
    }
}
