//! Placeholder resolution: `(token, profile, effects) -> text`.
//!
//! This is the compatibility matrix. Each [`Token`] maps to a spelling taken
//! from the [`Profile`] table or composed from it. An empty result means the
//! dialect needs nothing at that point; the assembler drops such lines.

use crate::error::ShaderError;
use crate::profile::{PaletteSampling, Profile};
use crate::token::Token;

/// Name of the decode helper emitted for [`PaletteSampling::Encoded2d`].
pub const PALETTE_DECODE_FUNCTION: &str = "sample_palette";

/// Statement injected at `$CRASH_EFFECT` when the effect is compiled in.
///
/// Unremapped texels of a crashed vehicle are drawn as a darkened grey
/// while the `crash` uniform is set.
pub const CRASH_EFFECT_STATEMENT: &str = "if (crash && idx == 0.0) rgb_col.rgb = vec2(dot(rgb_col.rgb, vec3(0.199325561523, 0.391342163085, 0.076843261718)), 0.0).rrr;";

/// Effect flags compiled into the assembled text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Effects {
    /// Emit the crash-effect override at `$CRASH_EFFECT`.
    pub crash: bool,
}

impl Effects {
    /// No effects compiled in.
    pub const NONE: Effects = Effects { crash: false };

    /// Returns effects with the crash override enabled or disabled.
    pub fn with_crash(mut self, crash: bool) -> Self {
        self.crash = crash;
        self
    }
}

fn unsupported(token: Token, profile: &Profile, reason: &str) -> ShaderError {
    ShaderError::UnsupportedCapability {
        token: token.name().to_string(),
        profile: profile.name.clone(),
        reason: reason.to_string(),
    }
}

/// Resolves a token to dialect-specific text.
///
/// # Errors
///
/// Returns `ShaderError::UnsupportedCapability` when the profile lacks what
/// the token needs: LOD-biased sampling for `TEXTURE_2D_LOD`, or split
/// channel writes for `FRAGCOLOR_RGB` / `FRAGCOLOR_ALPHA`.
pub fn resolve(token: Token, profile: &Profile, effects: Effects) -> Result<String, ShaderError> {
    let text = match token {
        Token::VersionDirective => profile
            .version
            .as_ref()
            .map(|v| format!("#version {v}"))
            .unwrap_or_default(),
        Token::ExtensionDirective => profile
            .lod_extension
            .as_ref()
            .map(|ext| format!("#extension {ext} : enable"))
            .unwrap_or_default(),
        Token::PrecisionDirective => profile
            .precision
            .as_ref()
            .map(|p| format!("precision {p} float;"))
            .unwrap_or_default(),
        Token::Attribute => profile.attribute.clone(),
        Token::VaryingOut => profile.varying_out.clone(),
        Token::VaryingIn => profile.varying_in.clone(),
        Token::OutputDeclaration => profile.output.declaration.clone().unwrap_or_default(),
        Token::FragColor => profile.output.target.clone(),
        Token::FragColorRgb | Token::FragColorAlpha => {
            if !profile.output.split_channels {
                return Err(unsupported(
                    token,
                    profile,
                    "colour output can only be written as a whole",
                ));
            }
            let swizzle = if token == Token::FragColorRgb { "rgb" } else { "a" };
            format!("{}.{swizzle}", profile.output.target)
        }
        Token::Texture2d => profile.texture_2d.clone(),
        Token::Texture2dLod => profile
            .texture_2d_lod
            .clone()
            .ok_or_else(|| unsupported(token, profile, "no LOD-biased 2D sampling"))?,
        Token::SamplerPalette => match profile.palette {
            PaletteSampling::Native1d { .. } => "sampler1D".to_string(),
            PaletteSampling::Encoded2d => "sampler2D".to_string(),
        },
        Token::TexturePalette => match &profile.palette {
            PaletteSampling::Native1d { function } => function.clone(),
            PaletteSampling::Encoded2d => PALETTE_DECODE_FUNCTION.to_string(),
        },
        Token::PaletteDecode => match profile.palette {
            PaletteSampling::Native1d { .. } => String::new(),
            PaletteSampling::Encoded2d => format!(
                "vec4 {PALETTE_DECODE_FUNCTION}(sampler2D tex, float idx) {{ return {}(tex, vec2((idx * 255.0 + 0.5) / 256.0, 0.5)); }}",
                profile.texture_2d
            ),
        },
        Token::PaletteLookupValue => {
            if profile.narrow_palette_lookup {
                "r".to_string()
            } else {
                "idx".to_string()
            }
        }
        Token::CrashEffect => {
            if effects.crash {
                CRASH_EFFECT_STATEMENT.to_string()
            } else {
                String::new()
            }
        }
    };

    log::trace!("resolved ${token} for '{}' to {text:?}", profile.name);
    Ok(text)
}
