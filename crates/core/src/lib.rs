#![deny(unsafe_code)]
//! Portable sprite shader assembly.
//!
//! Shader text lives in a small set of static [`Template`]s written once
//! against `$TOKEN` placeholders. Assembling a template for a [`Profile`]
//! substitutes every placeholder with the spelling that GLSL dialect and
//! version expects, splices in shared routines, and checks the result is
//! structurally sound before it ever reaches a driver.
//!
//! - [`token`] -- The closed placeholder table and line tokenizer.
//! - [`profile`] -- Target dialect/version capabilities, built-ins and JSON.
//! - [`resolver`] -- Token to text for one profile.
//! - [`template`] -- The static template store.
//! - [`assembler`] -- Expansion, substitution and structural self-checks.
//! - [`variant`] -- Render mode to variant and uniform contract.
//! - [`recolor`] -- CPU reference of the blend shaders' recolour.
//! - [`listing`] -- Numbered source listings for diagnostics.
//! - `render` -- Profile detection and program linking on a `glow`
//!   context (feature `render`).

pub mod assembler;
pub mod error;
pub mod listing;
pub mod profile;
pub mod recolor;
pub mod resolver;
pub mod template;
pub mod token;
pub mod variant;

#[cfg(feature = "render")]
pub mod render;

pub use assembler::{
    assemble, assemble_fragment, assemble_selection, assemble_vertex, is_supported, ShaderSources,
};
pub use error::ShaderError;
pub use listing::format_listing;
pub use profile::{Dialect, FragmentOutput, PaletteSampling, Profile};
pub use resolver::{resolve, Effects};
pub use template::{template_for, Line, Stage, Template};
pub use token::Token;
pub use variant::{select_variant, ColourDepth, RenderMode, Selection, UniformSlot, Variant};
