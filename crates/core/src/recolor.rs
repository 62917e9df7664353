//! CPU reference of the recolour algorithm embedded in the blend shaders.
//!
//! Mirrors `max3`, `adj_brightness` and the per-pixel selection in the
//! rgb-mask and sprite blend templates, texel for texel. Useful for
//! pre-baking sprites on the CPU and for pinning the numeric contract of the
//! shader text in tests.
//!
//! Brightness modulation scales the remapped colour by `brightness / 0.5`,
//! so 0.5 is neutral. Channels pushed past 1.0 feed an overbright term `ob`
//! that pulls the whole colour towards white instead of clipping each
//! channel on its own.

use glam::{Vec3, Vec4};

/// Luma weights used by the crash override; the result is deliberately dark.
#[allow(clippy::excessive_precision)]
pub const CRASH_LUMA: Vec3 = Vec3::new(0.199325561523, 0.391342163085, 0.076843261718);

/// Largest of the three channels.
pub fn max3(v: Vec3) -> f32 {
    v.max_element()
}

/// Scale applied to the remapped colour. Zero and negative brightness are
/// treated as neutral rather than black.
pub fn brightness_scale(brightness: f32) -> f32 {
    if brightness > 0.0 {
        brightness / 0.5
    } else {
        1.0
    }
}

/// Scales `colour` by `brightness`, bleeding overbright channels into the
/// others so the result blows out towards white.
pub fn adj_brightness(colour: Vec3, brightness: f32) -> Vec3 {
    let adj = colour * brightness_scale(brightness);
    let ob_vec = (adj - Vec3::ONE).clamp(Vec3::ZERO, Vec3::ONE);
    let ob = (ob_vec.x + ob_vec.y + ob_vec.z) / 2.0;

    (adj + ob * (Vec3::ONE - adj)).clamp(Vec3::ZERO, Vec3::ONE)
}

/// Inputs of one blended texel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendTexel {
    /// Normalised remap index; `0.0` means the texel is not remapped.
    pub idx: f32,
    /// Secondary palette value at `idx` (sprite blend only).
    pub r: f32,
    /// Palette colour looked up for the texel.
    pub remap: Vec4,
    /// Raw colour texel.
    pub rgb: Vec4,
}

fn recolor(texel: &BlendTexel, rgb_col: Vec4) -> Vec3 {
    if texel.idx > 0.0 {
        adj_brightness(texel.remap.truncate(), max3(rgb_col.truncate()))
    } else {
        rgb_col.truncate()
    }
}

/// Output of the rgb-mask blend shader for one texel.
pub fn rgb_mask_blend(texel: &BlendTexel, rgb_mode: bool) -> Vec4 {
    let alpha = if rgb_mode { texel.rgb.w } else { texel.remap.w };
    recolor(texel, texel.rgb).extend(alpha)
}

/// Output of the sprite blend shader for one texel.
///
/// `crash_active` models the crash override compiled in with the `crash`
/// uniform set: unremapped texels turn grey before colour selection.
pub fn sprite_blend(texel: &BlendTexel, rgb_mode: bool, crash_active: bool) -> Vec4 {
    let mut rgb_col = texel.rgb;
    if crash_active && texel.idx == 0.0 {
        let grey = rgb_col.truncate().dot(CRASH_LUMA);
        rgb_col = Vec3::splat(grey).extend(rgb_col.w);
    }

    let alpha = if rgb_mode && (texel.r > 0.0 || texel.idx == 0.0) {
        rgb_col.w
    } else {
        texel.remap.w
    };
    recolor(texel, rgb_col).extend(alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::CRASH_EFFECT_STATEMENT;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-6
    }

    #[test]
    fn max3_picks_largest_channel() {
        assert_eq!(max3(Vec3::new(0.2, 0.9, 0.4)), 0.9);
        assert_eq!(max3(Vec3::ZERO), 0.0);
    }

    #[test]
    fn brightness_zero_is_neutral_not_black() {
        assert_eq!(brightness_scale(0.0), 1.0);
        assert_eq!(brightness_scale(-0.25), 1.0);
        let colour = Vec3::new(0.3, 0.6, 0.9);
        assert_eq!(adj_brightness(colour, 0.0), colour);
    }

    #[test]
    fn brightness_scale_is_linear_above_zero() {
        assert_eq!(brightness_scale(0.5), 1.0);
        assert_eq!(brightness_scale(1.0), 2.0);
        assert_eq!(brightness_scale(0.25), 0.5);
    }

    #[test]
    fn overbright_bleeds_towards_white() {
        // adj = (2, 1, 0), ob = 0.5, result before clamp = (1.5, 1.0, 0.5)
        let out = adj_brightness(Vec3::new(1.0, 0.5, 0.0), 1.0);
        assert!(approx(out, Vec3::new(1.0, 1.0, 0.5)), "got {out}");
    }

    #[test]
    fn saturated_overbright_follows_shader_formula() {
        // adj = (2, 2, 2), ob = 1.5, 2 + 1.5 * (1 - 2) = 0.5 on every channel.
        let out = adj_brightness(Vec3::ONE, 1.0);
        assert!(approx(out, Vec3::splat(0.5)), "got {out}");
    }

    #[test]
    fn dimming_never_triggers_overbright() {
        let colour = Vec3::new(0.8, 0.4, 0.2);
        let out = adj_brightness(colour, 0.25);
        assert!(approx(out, colour * 0.5), "got {out}");
    }

    fn texel(idx: f32, r: f32) -> BlendTexel {
        BlendTexel {
            idx,
            r,
            remap: Vec4::new(0.2, 0.4, 0.6, 0.25),
            rgb: Vec4::new(0.5, 0.1, 0.3, 0.75),
        }
    }

    #[test]
    fn unremapped_texel_passes_raw_colour() {
        let t = texel(0.0, 0.0);
        let out = rgb_mask_blend(&t, false);
        assert_eq!(out.truncate(), t.rgb.truncate());
        let out = sprite_blend(&t, false, false);
        assert_eq!(out.truncate(), t.rgb.truncate());
    }

    #[test]
    fn remapped_texel_uses_palette_at_texel_brightness() {
        let t = texel(0.5, 0.3);
        let expected = adj_brightness(t.remap.truncate(), 0.5);
        assert!(approx(rgb_mask_blend(&t, true).truncate(), expected));
        assert!(approx(sprite_blend(&t, true, false).truncate(), expected));
    }

    #[test]
    fn mask_blend_alpha_follows_rgb_mode() {
        let t = texel(0.5, 0.0);
        assert_eq!(rgb_mask_blend(&t, true).w, 0.75);
        assert_eq!(rgb_mask_blend(&t, false).w, 0.25);
    }

    #[test]
    fn sprite_blend_alpha_condition() {
        // rgb mode, remapped through a blank secondary index: palette alpha.
        assert_eq!(sprite_blend(&texel(0.5, 0.0), true, false).w, 0.25);
        // rgb mode, secondary index set: raw alpha.
        assert_eq!(sprite_blend(&texel(0.5, 0.3), true, false).w, 0.75);
        // rgb mode, unremapped: raw alpha.
        assert_eq!(sprite_blend(&texel(0.0, 0.0), true, false).w, 0.75);
        // palette mode: always palette alpha.
        assert_eq!(sprite_blend(&texel(0.0, 0.3), false, false).w, 0.25);
    }

    #[test]
    fn crash_greys_only_unremapped_texels() {
        let plain = texel(0.0, 0.0);
        let out = sprite_blend(&plain, true, true);
        let grey = plain.rgb.truncate().dot(CRASH_LUMA);
        assert!(approx(out.truncate(), Vec3::splat(grey)), "got {out}");
        assert_eq!(out.w, plain.rgb.w);

        let remapped = texel(0.5, 0.3);
        assert_eq!(
            sprite_blend(&remapped, true, true),
            sprite_blend(&remapped, true, false)
        );
    }

    #[test]
    fn crash_weights_match_shader_statement() {
        for weight in ["0.199325561523", "0.391342163085", "0.076843261718"] {
            assert!(CRASH_EFFECT_STATEMENT.contains(weight), "missing {weight}");
            let parsed: f32 = weight.parse().unwrap();
            assert!(
                [CRASH_LUMA.x, CRASH_LUMA.y, CRASH_LUMA.z].contains(&parsed),
                "{weight} not in CRASH_LUMA"
            );
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn unit() -> impl Strategy<Value = f32> {
            0.0_f32..=1.0
        }

        proptest! {
            #[test]
            fn neutral_brightness_is_clamp(r in unit(), g in unit(), b in unit()) {
                let c = Vec3::new(r, g, b);
                prop_assert_eq!(adj_brightness(c, 0.5), c.clamp(Vec3::ZERO, Vec3::ONE));
            }

            #[test]
            fn zero_brightness_matches_neutral(r in unit(), g in unit(), b in unit()) {
                let c = Vec3::new(r, g, b);
                prop_assert_eq!(adj_brightness(c, 0.0), adj_brightness(c, 0.5));
            }

            #[test]
            fn result_stays_in_unit_range(
                r in unit(), g in unit(), b in unit(),
                brightness in -1.0_f32..=1.0,
            ) {
                let out = adj_brightness(Vec3::new(r, g, b), brightness);
                prop_assert!(out.min_element() >= 0.0 && out.max_element() <= 1.0, "{}", out);
            }

            #[test]
            fn in_range_channels_are_never_darkened(
                r in unit(), g in unit(), b in unit(),
                brightness in 0.0_f32..=1.0,
            ) {
                let c = Vec3::new(r, g, b);
                let adj = c * brightness_scale(brightness);
                let out = adj_brightness(c, brightness);
                for i in 0..3 {
                    if adj[i] <= 1.0 {
                        prop_assert!(out[i] >= adj[i] - 1e-6, "channel {}: {} < {}", i, out[i], adj[i]);
                    }
                }
            }
        }
    }
}
