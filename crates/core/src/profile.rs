//! Capability profiles: the spellings and features of one GLSL dialect.
//!
//! A [`Profile`] is plain data. Four built-in profiles cover the supported
//! backends (`glsl110`, `glsl150`, `gles100`, `gles300`); renderers with
//! unusual drivers can load their own from JSON via [`Profile::from_json`].
//! [`Profile::for_context`] picks a built-in from a reported GL version.

use serde::{Deserialize, Serialize};

use crate::error::ShaderError;

/// Names of the built-in profiles, in ascending capability order.
const BUILTIN_NAMES: &[&str] = &["glsl110", "glsl150", "gles100", "gles300"];

/// Shading-language family a profile belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// Desktop OpenGL GLSL.
    Desktop,
    /// OpenGL ES / WebGL GLSL ES.
    Embedded,
}

/// How a palette texture is sampled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PaletteSampling {
    /// A `sampler1D` indexed directly with the normalised palette index.
    Native1d {
        /// Sampling function, e.g. `texture1D` or `texture`.
        function: String,
    },
    /// A 256x1 `sampler2D`; the index is mapped onto texel centres by a
    /// decode helper emitted into the shader.
    Encoded2d,
}

/// Fragment output spelling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentOutput {
    /// Declaration for a user-defined output, `None` for built-in outputs.
    #[serde(default)]
    pub declaration: Option<String>,
    /// Expression naming the whole colour output.
    pub target: String,
    /// Whether `.rgb` and `.a` may be written as separate statements.
    pub split_channels: bool,
}

/// Everything the resolver needs to know about a target dialect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub dialect: Dialect,
    /// Value following `#version`, `None` when no directive may be emitted.
    #[serde(default)]
    pub version: Option<String>,
    /// Default float precision, `None` when the dialect has no qualifiers.
    #[serde(default)]
    pub precision: Option<String>,
    pub attribute: String,
    pub varying_out: String,
    pub varying_in: String,
    pub output: FragmentOutput,
    pub texture_2d: String,
    /// LOD-biased sampling function, `None` when unavailable.
    #[serde(default)]
    pub texture_2d_lod: Option<String>,
    /// Extension that must be enabled for `texture_2d_lod`.
    #[serde(default)]
    pub lod_extension: Option<String>,
    pub palette: PaletteSampling,
    /// Sprite blends look the colour up through the secondary remap palette.
    pub narrow_palette_lookup: bool,
}

impl Profile {
    /// Legacy desktop GLSL 1.10 with `GL_ARB_shader_texture_lod`.
    pub fn glsl110() -> Self {
        Self {
            name: "glsl110".to_string(),
            dialect: Dialect::Desktop,
            version: Some("110".to_string()),
            precision: None,
            attribute: "attribute".to_string(),
            varying_out: "varying".to_string(),
            varying_in: "varying".to_string(),
            output: FragmentOutput {
                declaration: None,
                target: "gl_FragData[0]".to_string(),
                split_channels: true,
            },
            texture_2d: "texture2D".to_string(),
            texture_2d_lod: Some("texture2DLod".to_string()),
            lod_extension: Some("GL_ARB_shader_texture_lod".to_string()),
            palette: PaletteSampling::Native1d {
                function: "texture1D".to_string(),
            },
            narrow_palette_lookup: true,
        }
    }

    /// Core-profile desktop GLSL 1.50 (OpenGL 3.2+).
    pub fn glsl150() -> Self {
        Self {
            name: "glsl150".to_string(),
            dialect: Dialect::Desktop,
            version: Some("150".to_string()),
            precision: None,
            attribute: "in".to_string(),
            varying_out: "out".to_string(),
            varying_in: "in".to_string(),
            output: FragmentOutput {
                declaration: Some("out vec4 colour;".to_string()),
                target: "colour".to_string(),
                split_channels: true,
            },
            texture_2d: "texture".to_string(),
            texture_2d_lod: Some("textureLod".to_string()),
            lod_extension: None,
            palette: PaletteSampling::Native1d {
                function: "texture".to_string(),
            },
            narrow_palette_lookup: true,
        }
    }

    /// GLSL ES 1.00 (OpenGL ES 2 / WebGL 1) with `GL_EXT_shader_texture_lod`.
    pub fn gles100() -> Self {
        Self {
            name: "gles100".to_string(),
            dialect: Dialect::Embedded,
            version: Some("100".to_string()),
            precision: Some("mediump".to_string()),
            attribute: "attribute".to_string(),
            varying_out: "varying".to_string(),
            varying_in: "varying".to_string(),
            output: FragmentOutput {
                declaration: None,
                target: "gl_FragColor".to_string(),
                split_channels: true,
            },
            texture_2d: "texture2D".to_string(),
            texture_2d_lod: Some("texture2DLodEXT".to_string()),
            lod_extension: Some("GL_EXT_shader_texture_lod".to_string()),
            palette: PaletteSampling::Encoded2d,
            narrow_palette_lookup: true,
        }
    }

    /// GLSL ES 3.00 (OpenGL ES 3 / WebGL 2).
    pub fn gles300() -> Self {
        Self {
            name: "gles300".to_string(),
            dialect: Dialect::Embedded,
            version: Some("300 es".to_string()),
            precision: Some("mediump".to_string()),
            attribute: "in".to_string(),
            varying_out: "out".to_string(),
            varying_in: "in".to_string(),
            output: FragmentOutput {
                declaration: Some("out vec4 colour;".to_string()),
                target: "colour".to_string(),
                split_channels: true,
            },
            texture_2d: "texture".to_string(),
            texture_2d_lod: Some("textureLod".to_string()),
            lod_extension: None,
            palette: PaletteSampling::Encoded2d,
            narrow_palette_lookup: true,
        }
    }

    /// Returns the built-in profile with the given name.
    ///
    /// Returns `ShaderError::UnknownProfile` for any other name.
    pub fn builtin(name: &str) -> Result<Self, ShaderError> {
        match name {
            "glsl110" => Ok(Self::glsl110()),
            "glsl150" => Ok(Self::glsl150()),
            "gles100" => Ok(Self::gles100()),
            "gles300" => Ok(Self::gles300()),
            _ => Err(ShaderError::UnknownProfile(name.to_string())),
        }
    }

    /// Returns the names accepted by [`Profile::builtin`].
    pub fn builtin_names() -> &'static [&'static str] {
        BUILTIN_NAMES
    }

    /// Returns every built-in profile.
    pub fn builtins() -> Vec<Self> {
        vec![
            Self::glsl110(),
            Self::glsl150(),
            Self::gles100(),
            Self::gles300(),
        ]
    }

    /// Parses and validates a profile from JSON.
    pub fn from_json(json: &str) -> Result<Self, ShaderError> {
        let profile: Profile =
            serde_json::from_str(json).map_err(|e| ShaderError::InvalidProfile(e.to_string()))?;
        profile.validate()?;
        Ok(profile)
    }

    /// Serializes the profile as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ShaderError> {
        serde_json::to_string_pretty(self).map_err(|e| ShaderError::InvalidProfile(e.to_string()))
    }

    /// Checks that required spellings are present and consistent.
    ///
    /// Embedded profiles must declare a default float precision and sample
    /// palettes through an encoded 2D texture. Optional spellings are either
    /// absent or non-empty.
    pub fn validate(&self) -> Result<(), ShaderError> {
        let required = [
            ("name", &self.name),
            ("attribute", &self.attribute),
            ("varying_out", &self.varying_out),
            ("varying_in", &self.varying_in),
            ("output.target", &self.output.target),
            ("texture_2d", &self.texture_2d),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(ShaderError::InvalidProfile(format!(
                "'{field}' must not be empty"
            )));
        }
        let optional = [
            ("version", &self.version),
            ("precision", &self.precision),
            ("texture_2d_lod", &self.texture_2d_lod),
            ("lod_extension", &self.lod_extension),
            ("output.declaration", &self.output.declaration),
        ];
        if let Some((field, _)) = optional
            .iter()
            .find(|(_, value)| value.as_deref().is_some_and(|v| v.trim().is_empty()))
        {
            return Err(ShaderError::InvalidProfile(format!(
                "'{field}' must be omitted rather than empty"
            )));
        }
        if self.dialect == Dialect::Embedded {
            if self.precision.is_none() {
                return Err(ShaderError::InvalidProfile(format!(
                    "embedded profile '{}' needs a default float precision",
                    self.name
                )));
            }
            if matches!(self.palette, PaletteSampling::Native1d { .. }) {
                return Err(ShaderError::InvalidProfile(format!(
                    "embedded profile '{}' has no 1D textures; use encoded2d palette sampling",
                    self.name
                )));
            }
        }
        if self.lod_extension.is_some() && self.texture_2d_lod.is_none() {
            return Err(ShaderError::InvalidProfile(format!(
                "'{}' names a LOD extension but no LOD sampling function",
                self.name
            )));
        }
        if let PaletteSampling::Native1d { function } = &self.palette {
            if function.trim().is_empty() {
                return Err(ShaderError::InvalidProfile(
                    "'palette.function' must not be empty".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Returns whether LOD-biased sampling is available.
    pub fn has_lod_sampling(&self) -> bool {
        self.texture_2d_lod.is_some()
    }

    /// Picks a built-in profile for a driver-reported context.
    ///
    /// `has_extension` answers whether the driver advertises a named
    /// extension. Desktop 3.2+ uses `glsl150`; older desktop contexts use
    /// `glsl110`, with LOD sampling only when an LOD extension is present.
    /// ES 3.0+ uses `gles300`; ES 2 uses `gles100`, with LOD sampling only
    /// when `GL_EXT_shader_texture_lod` is present. Contexts without GLSL
    /// support return `None`.
    pub fn for_context(
        major: u32,
        minor: u32,
        embedded: bool,
        has_extension: impl Fn(&str) -> bool,
    ) -> Option<Self> {
        let version = (major, minor);
        if embedded {
            if version >= (3, 0) {
                return Some(Self::gles300());
            }
            if version < (2, 0) {
                return None;
            }
            let profile = Self::gles100();
            return Some(if has_extension("GL_EXT_shader_texture_lod") {
                profile
            } else {
                profile.without_lod()
            });
        }

        if version >= (3, 2) {
            return Some(Self::glsl150());
        }
        if version < (2, 0) {
            return None;
        }
        let mut profile = Self::glsl110();
        if has_extension("GL_ARB_shader_texture_lod") {
            Some(profile)
        } else if has_extension("GL_ATI_shader_texture_lod") {
            profile.lod_extension = Some("GL_ATI_shader_texture_lod".to_string());
            Some(profile)
        } else {
            Some(profile.without_lod())
        }
    }

    /// Returns a copy with LOD sampling removed, renamed with a `-nolod` suffix.
    pub fn without_lod(mut self) -> Self {
        self.name = format!("{}-nolod", self.name);
        self.texture_2d_lod = None;
        self.lod_extension = None;
        self
    }
}
