//! Shader variants, render modes, and the uniform contract of each variant.
//!
//! [`select_variant`] is pure dispatch: a closed set of render modes maps to
//! the fragment variant to assemble, the uniforms its text declares, and the
//! effect flags to compile in.

use std::fmt;

use crate::resolver::Effects;

/// Which fragment template to assemble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// 32bpp colour straight from the colour texture.
    Direct,
    /// 8bpp index looked up in the palette.
    Palette,
    /// 32bpp colour blended with a palette remap selected by a mask.
    RgbMaskBlend,
    /// Sprite recoloured through remap and secondary palettes.
    SpriteBlend,
}

/// A named external input a variant's assembled text expects to be bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniformSlot {
    /// Sprite rectangle (x, y, width, height) in pixels.
    Sprite,
    /// Screen dimensions in pixels.
    Screen,
    /// Colour (or index) texture.
    ColourTex,
    /// Palette the final colour is looked up in.
    Palette,
    /// Remap index texture.
    RemapTex,
    /// Secondary palette narrowing remap indices.
    Pal,
    /// Zoom level used as the sampling LOD.
    Zoom,
    /// Whether the pass draws rgb content.
    Rgb,
    /// Whether the crash override is active.
    Crash,
}

/// Uniforms of the sprite vertex stage, shared by every variant.
pub const VERTEX_UNIFORMS: &[UniformSlot] = &[UniformSlot::Sprite, UniformSlot::Screen];

const DIRECT_UNIFORMS: &[UniformSlot] = &[UniformSlot::ColourTex];
const PALETTE_UNIFORMS: &[UniformSlot] = &[UniformSlot::ColourTex, UniformSlot::Palette];
const RGB_MASK_BLEND_UNIFORMS: &[UniformSlot] = &[
    UniformSlot::ColourTex,
    UniformSlot::Palette,
    UniformSlot::RemapTex,
    UniformSlot::Rgb,
    UniformSlot::Zoom,
];
const SPRITE_BLEND_UNIFORMS: &[UniformSlot] = &[
    UniformSlot::ColourTex,
    UniformSlot::Palette,
    UniformSlot::RemapTex,
    UniformSlot::Pal,
    UniformSlot::Zoom,
    UniformSlot::Rgb,
    UniformSlot::Crash,
];

impl UniformSlot {
    /// GLSL identifier the uniform is declared under.
    pub fn name(self) -> &'static str {
        match self {
            UniformSlot::Sprite => "sprite",
            UniformSlot::Screen => "screen",
            UniformSlot::ColourTex => "colour_tex",
            UniformSlot::Palette => "palette",
            UniformSlot::RemapTex => "remap_tex",
            UniformSlot::Pal => "pal",
            UniformSlot::Zoom => "zoom",
            UniformSlot::Rgb => "rgb",
            UniformSlot::Crash => "crash",
        }
    }
}

impl Variant {
    /// Every variant.
    pub const ALL: [Variant; 4] = [
        Variant::Direct,
        Variant::Palette,
        Variant::RgbMaskBlend,
        Variant::SpriteBlend,
    ];

    /// Kebab-case name used on the command line and in logs.
    pub fn name(self) -> &'static str {
        match self {
            Variant::Direct => "direct",
            Variant::Palette => "palette",
            Variant::RgbMaskBlend => "rgb-mask-blend",
            Variant::SpriteBlend => "sprite-blend",
        }
    }

    /// Parses a name produced by [`Variant::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        Variant::ALL.into_iter().find(|v| v.name() == name)
    }

    /// Fragment uniforms the variant's assembled text declares.
    pub fn uniforms(self) -> &'static [UniformSlot] {
        match self {
            Variant::Direct => DIRECT_UNIFORMS,
            Variant::Palette => PALETTE_UNIFORMS,
            Variant::RgbMaskBlend => RGB_MASK_BLEND_UNIFORMS,
            Variant::SpriteBlend => SPRITE_BLEND_UNIFORMS,
        }
    }

    /// Whether the variant embeds the recolour routines.
    pub fn uses_recolor(self) -> bool {
        matches!(self, Variant::RgbMaskBlend | Variant::SpriteBlend)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Colour depth of the screen buffer being presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColourDepth {
    /// 8 bits per pixel, palette indexed.
    Bpp8,
    /// 32 bits per pixel, RGBA.
    Bpp32,
}

/// How the renderer wants a draw to be shaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderMode {
    Direct,
    Palette,
    RgbMaskBlend,
    SpriteBlend { crash: bool },
}

impl RenderMode {
    /// Picks the mode presenting a screen buffer of the given depth.
    pub fn for_colour_depth(depth: ColourDepth) -> Self {
        match depth {
            ColourDepth::Bpp8 => RenderMode::Palette,
            ColourDepth::Bpp32 => RenderMode::Direct,
        }
    }
}

/// Result of [`select_variant`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub variant: Variant,
    /// Fragment uniforms to bind; the vertex stage additionally needs
    /// [`VERTEX_UNIFORMS`].
    pub uniforms: &'static [UniformSlot],
    pub effects: Effects,
}

/// Maps a render mode to its variant, uniform slots, and effects.
pub fn select_variant(mode: RenderMode) -> Selection {
    let (variant, effects) = match mode {
        RenderMode::Direct => (Variant::Direct, Effects::NONE),
        RenderMode::Palette => (Variant::Palette, Effects::NONE),
        RenderMode::RgbMaskBlend => (Variant::RgbMaskBlend, Effects::NONE),
        RenderMode::SpriteBlend { crash } => (Variant::SpriteBlend, Effects::NONE.with_crash(crash)),
    };
    Selection {
        variant,
        uniforms: variant.uniforms(),
        effects,
    }
}
