//! Static shader templates.
//!
//! Each [`Template`] is an ordered list of [`Line`]s: source text that may
//! embed `$TOKEN` placeholders, or an explicit [`Line::Include`] of another
//! template. The catalogue is process-wide constant data; nothing here is
//! ever mutated.

use crate::error::ShaderError;
use crate::token::{split_line, Segment, Token};
use crate::variant::Variant;

/// Pipeline stage a template targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Vertex,
    Fragment,
}

impl Stage {
    /// Lowercase stage name, as used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Stage::Vertex => "vertex",
            Stage::Fragment => "fragment",
        }
    }
}

/// One template line.
#[derive(Debug, Clone, Copy)]
pub enum Line {
    /// Source text, possibly containing `$TOKEN` placeholders.
    Source(&'static str),
    /// A nested template, assembled once and spliced in place.
    Include(&'static Template),
}

/// A named, immutable line sequence.
#[derive(Debug)]
pub struct Template {
    pub name: &'static str,
    pub stage: Stage,
    /// Functions this template defines. When included, each must appear
    /// before its first call site in the including template.
    pub defines: &'static [&'static str],
    pub lines: &'static [Line],
}

impl Template {
    /// Returns every token referenced by this template and its includes,
    /// in order of appearance.
    ///
    /// # Errors
    ///
    /// Returns `ShaderError::UnknownToken` for a `$NAME` outside the table.
    pub fn tokens(&self) -> Result<Vec<Token>, ShaderError> {
        let mut tokens = Vec::new();
        for line in self.lines {
            match line {
                Line::Source(text) => {
                    tokens.extend(split_line(text)?.into_iter().filter_map(|s| match s {
                        Segment::Token(t) => Some(t),
                        Segment::Text(_) => None,
                    }));
                }
                Line::Include(inner) => tokens.extend(inner.tokens()?),
            }
        }
        Ok(tokens)
    }

    /// Returns the templates directly included by this one.
    pub fn includes(&self) -> impl Iterator<Item = &'static Template> + '_ {
        self.lines.iter().filter_map(|line| match line {
            Line::Include(inner) => Some(*inner),
            Line::Source(_) => None,
        })
    }
}

/// Vertex shader placing a sprite quad on screen.
pub static VERTEX_SPRITE: Template = Template {
    name: "vertex_sprite",
    stage: Stage::Vertex,
    defines: &[],
    lines: &[
        Line::Source("$VERSION_DIRECTIVE"),
        Line::Source("$PRECISION_DIRECTIVE"),
        Line::Source("uniform vec4 sprite;"),
        Line::Source("uniform vec2 screen;"),
        Line::Source("$ATTRIBUTE vec2 position, colour_uv;"),
        Line::Source("$VARYING_OUT vec2 colour_tex_uv;"),
        Line::Source("void main() {"),
        Line::Source("  vec2 size = sprite.zw / screen.xy;"),
        Line::Source("  vec2 offset = ((2.0 * sprite.xy + sprite.zw) / screen.xy - 1.0) * vec2(1.0, -1.0);"),
        Line::Source("  colour_tex_uv = colour_uv;"),
        Line::Source("  gl_Position = vec4(position * size + offset, 0.0, 1.0);"),
        Line::Source("}"),
    ],
};

/// Reads the fragment colour straight from a 32bpp texture.
pub static FRAGMENT_DIRECT: Template = Template {
    name: "fragment_direct",
    stage: Stage::Fragment,
    defines: &[],
    lines: &[
        Line::Source("$VERSION_DIRECTIVE"),
        Line::Source("$PRECISION_DIRECTIVE"),
        Line::Source("uniform sampler2D colour_tex;"),
        Line::Source("$VARYING_IN vec2 colour_tex_uv;"),
        Line::Source("$OUTPUT_DECLARATION"),
        Line::Source("void main() {"),
        Line::Source("  $FRAGCOLOR = $TEXTURE_2D(colour_tex, colour_tex_uv);"),
        Line::Source("}"),
    ],
};

/// Looks the fragment colour up in a palette from an 8bpp index texture.
pub static FRAGMENT_PALETTE: Template = Template {
    name: "fragment_palette",
    stage: Stage::Fragment,
    defines: &[],
    lines: &[
        Line::Source("$VERSION_DIRECTIVE"),
        Line::Source("$PRECISION_DIRECTIVE"),
        Line::Source("uniform sampler2D colour_tex;"),
        Line::Source("uniform $SAMPLER_PALETTE palette;"),
        Line::Source("$VARYING_IN vec2 colour_tex_uv;"),
        Line::Source("$OUTPUT_DECLARATION"),
        Line::Source("$PALETTE_DECODE"),
        Line::Source("void main() {"),
        Line::Source("  float idx = $TEXTURE_2D(colour_tex, colour_tex_uv).r;"),
        Line::Source("  $FRAGCOLOR = $TEXTURE_PALETTE(palette, idx);"),
        Line::Source("}"),
    ],
};

/// Shared recolour routines: `max3` and the overbright-correcting
/// `adj_brightness`.
pub static REMAP_FUNCTIONS: Template = Template {
    name: "remap_functions",
    stage: Stage::Fragment,
    defines: &["max3", "adj_brightness"],
    lines: &[
        Line::Source("float max3(vec3 v) {"),
        Line::Source("  return max(max(v.x, v.y), v.z);"),
        Line::Source("}"),
        Line::Source(""),
        Line::Source("vec3 adj_brightness(vec3 colour, float brightness) {"),
        Line::Source("  vec3 adj = colour * (brightness > 0.0 ? brightness / 0.5 : 1.0);"),
        Line::Source("  vec3 ob_vec = clamp(adj - 1.0, 0.0, 1.0);"),
        Line::Source("  float ob = (ob_vec.r + ob_vec.g + ob_vec.b) / 2.0;"),
        Line::Source(""),
        Line::Source("  return clamp(adj + ob * (1.0 - adj), 0.0, 1.0);"),
        Line::Source("}"),
    ],
};

/// Blends a 32bpp colour texture with a palette remap selected by a mask.
pub static FRAGMENT_RGB_MASK_BLEND: Template = Template {
    name: "fragment_rgb_mask_blend",
    stage: Stage::Fragment,
    defines: &[],
    lines: &[
        Line::Source("$VERSION_DIRECTIVE"),
        Line::Source("$EXTENSION_DIRECTIVE"),
        Line::Source("$PRECISION_DIRECTIVE"),
        Line::Source("uniform sampler2D colour_tex;"),
        Line::Source("uniform $SAMPLER_PALETTE palette;"),
        Line::Source("uniform sampler2D remap_tex;"),
        Line::Source("uniform bool rgb;"),
        Line::Source("uniform float zoom;"),
        Line::Source("$VARYING_IN vec2 colour_tex_uv;"),
        Line::Source("$OUTPUT_DECLARATION"),
        Line::Source("$PALETTE_DECODE"),
        Line::Source(""),
        Line::Include(&REMAP_FUNCTIONS),
        Line::Source(""),
        Line::Source("void main() {"),
        Line::Source("  float idx = $TEXTURE_2D_LOD(remap_tex, colour_tex_uv, zoom).r;"),
        Line::Source("  vec4 remap_col = $TEXTURE_PALETTE(palette, idx);"),
        Line::Source("  vec4 rgb_col = $TEXTURE_2D_LOD(colour_tex, colour_tex_uv, zoom);"),
        Line::Source(""),
        Line::Source("  $FRAGCOLOR_ALPHA = rgb ? rgb_col.a : remap_col.a;"),
        Line::Source("  $FRAGCOLOR_RGB = idx > 0.0 ? adj_brightness(remap_col.rgb, max3(rgb_col.rgb)) : rgb_col.rgb;"),
        Line::Source("}"),
    ],
};

/// Recolours a sprite through the remap and secondary palettes, with the
/// optional crash override.
pub static FRAGMENT_SPRITE_BLEND: Template = Template {
    name: "fragment_sprite_blend",
    stage: Stage::Fragment,
    defines: &[],
    lines: &[
        Line::Source("$VERSION_DIRECTIVE"),
        Line::Source("$EXTENSION_DIRECTIVE"),
        Line::Source("$PRECISION_DIRECTIVE"),
        Line::Source("uniform sampler2D colour_tex;"),
        Line::Source("uniform $SAMPLER_PALETTE palette;"),
        Line::Source("uniform sampler2D remap_tex;"),
        Line::Source("uniform $SAMPLER_PALETTE pal;"),
        Line::Source("uniform float zoom;"),
        Line::Source("uniform bool rgb;"),
        Line::Source("uniform bool crash;"),
        Line::Source("$VARYING_IN vec2 colour_tex_uv;"),
        Line::Source("$OUTPUT_DECLARATION"),
        Line::Source("$PALETTE_DECODE"),
        Line::Source(""),
        Line::Include(&REMAP_FUNCTIONS),
        Line::Source(""),
        Line::Source("void main() {"),
        Line::Source("  float idx = $TEXTURE_2D_LOD(remap_tex, colour_tex_uv, zoom).r;"),
        Line::Source("  float r = $TEXTURE_PALETTE(pal, idx).r;"),
        Line::Source("  vec4 remap_col = $TEXTURE_PALETTE(palette, $PALETTE_LOOKUP_VALUE);"),
        Line::Source("  vec4 rgb_col = $TEXTURE_2D_LOD(colour_tex, colour_tex_uv, zoom);"),
        Line::Source(""),
        Line::Source("  $CRASH_EFFECT"),
        Line::Source("  $FRAGCOLOR_ALPHA = rgb && (r > 0.0 || idx == 0.0) ? rgb_col.a : remap_col.a;"),
        Line::Source("  $FRAGCOLOR_RGB = idx > 0.0 ? adj_brightness(remap_col.rgb, max3(rgb_col.rgb)) : rgb_col.rgb;"),
        Line::Source("}"),
    ],
};

/// Returns the fragment template for a variant.
pub fn template_for(variant: Variant) -> &'static Template {
    match variant {
        Variant::Direct => &FRAGMENT_DIRECT,
        Variant::Palette => &FRAGMENT_PALETTE,
        Variant::RgbMaskBlend => &FRAGMENT_RGB_MASK_BLEND,
        Variant::SpriteBlend => &FRAGMENT_SPRITE_BLEND,
    }
}
