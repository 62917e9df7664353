//! Placeholder tokens and the `$NAME` template syntax.
//!
//! Template lines embed tokens as `$NAME`, where `NAME` is a run of
//! uppercase ASCII letters, digits and underscores. [`split_line`] turns a
//! line into literal text and [`Token`] segments; any name outside the
//! closed token set fails with [`ShaderError::UnknownToken`].

use crate::error::ShaderError;
use std::fmt;

/// A symbolic placeholder standing in for dialect-specific text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    /// `#version` line, or nothing.
    VersionDirective,
    /// `#extension` line enabling LOD sampling, or nothing.
    ExtensionDirective,
    /// Default float precision statement, or nothing.
    PrecisionDirective,
    /// Vertex input qualifier.
    Attribute,
    /// Vertex-to-fragment qualifier as written in the vertex stage.
    VaryingOut,
    /// Vertex-to-fragment qualifier as written in the fragment stage.
    VaryingIn,
    /// User-declared fragment output, or nothing for built-in outputs.
    OutputDeclaration,
    /// Whole fragment colour target.
    FragColor,
    /// RGB channels of the fragment colour target.
    FragColorRgb,
    /// Alpha channel of the fragment colour target.
    FragColorAlpha,
    /// Plain 2D sampling function.
    Texture2d,
    /// LOD-biased 2D sampling function.
    Texture2dLod,
    /// Sampler type holding a palette.
    SamplerPalette,
    /// Function sampling a palette at a normalised index.
    TexturePalette,
    /// Helper definition needed by [`Token::TexturePalette`], or nothing.
    PaletteDecode,
    /// Index used to look up the sprite blend colour.
    PaletteLookupValue,
    /// Crash-effect injection point.
    CrashEffect,
}

impl Token {
    /// Every token, in declaration order.
    pub const ALL: [Token; 17] = [
        Token::VersionDirective,
        Token::ExtensionDirective,
        Token::PrecisionDirective,
        Token::Attribute,
        Token::VaryingOut,
        Token::VaryingIn,
        Token::OutputDeclaration,
        Token::FragColor,
        Token::FragColorRgb,
        Token::FragColorAlpha,
        Token::Texture2d,
        Token::Texture2dLod,
        Token::SamplerPalette,
        Token::TexturePalette,
        Token::PaletteDecode,
        Token::PaletteLookupValue,
        Token::CrashEffect,
    ];

    /// The name written after `$` in template text.
    pub fn name(self) -> &'static str {
        match self {
            Token::VersionDirective => "VERSION_DIRECTIVE",
            Token::ExtensionDirective => "EXTENSION_DIRECTIVE",
            Token::PrecisionDirective => "PRECISION_DIRECTIVE",
            Token::Attribute => "ATTRIBUTE",
            Token::VaryingOut => "VARYING_OUT",
            Token::VaryingIn => "VARYING_IN",
            Token::OutputDeclaration => "OUTPUT_DECLARATION",
            Token::FragColor => "FRAGCOLOR",
            Token::FragColorRgb => "FRAGCOLOR_RGB",
            Token::FragColorAlpha => "FRAGCOLOR_ALPHA",
            Token::Texture2d => "TEXTURE_2D",
            Token::Texture2dLod => "TEXTURE_2D_LOD",
            Token::SamplerPalette => "SAMPLER_PALETTE",
            Token::TexturePalette => "TEXTURE_PALETTE",
            Token::PaletteDecode => "PALETTE_DECODE",
            Token::PaletteLookupValue => "PALETTE_LOOKUP_VALUE",
            Token::CrashEffect => "CRASH_EFFECT",
        }
    }

    /// Looks a token up by its template name.
    ///
    /// Returns `ShaderError::UnknownToken` if the name is not in the table.
    pub fn from_name(name: &str) -> Result<Self, ShaderError> {
        Token::ALL
            .iter()
            .copied()
            .find(|t| t.name() == name)
            .ok_or_else(|| ShaderError::UnknownToken(name.to_string()))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One piece of a template line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Literal shading-language text, passed through verbatim.
    Text(&'a str),
    /// A placeholder to resolve against a profile.
    Token(Token),
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_'
}

/// Splits a template line into literal text and token segments.
///
/// A line without `$` yields a single text segment (or none when empty).
pub fn split_line(line: &str) -> Result<Vec<Segment<'_>>, ShaderError> {
    let mut segments = Vec::new();
    let mut rest = line;

    while let Some(pos) = rest.find('$') {
        if pos > 0 {
            segments.push(Segment::Text(&rest[..pos]));
        }
        let after = &rest[pos + 1..];
        let len = after.find(|c: char| !is_name_char(c)).unwrap_or(after.len());
        segments.push(Segment::Token(Token::from_name(&after[..len])?));
        rest = &after[len..];
    }

    if !rest.is_empty() {
        segments.push(Segment::Text(rest));
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_token_round_trips_through_its_name() {
        for token in Token::ALL {
            assert_eq!(Token::from_name(token.name()), Ok(token));
        }
    }

    #[test]
    fn token_names_are_unique() {
        let mut names: Vec<&str> = Token::ALL.iter().map(|t| t.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Token::ALL.len());
    }

    #[test]
    fn from_name_rejects_unknown_name() {
        assert_eq!(
            Token::from_name("TEXTURE_3D"),
            Err(ShaderError::UnknownToken("TEXTURE_3D".into()))
        );
    }

    #[test]
    fn display_matches_name() {
        assert_eq!(Token::CrashEffect.to_string(), "CRASH_EFFECT");
    }

    #[test]
    fn split_line_without_tokens_is_single_text() {
        let segments = split_line("uniform vec2 screen;").unwrap();
        assert_eq!(segments, vec![Segment::Text("uniform vec2 screen;")]);
    }

    #[test]
    fn split_line_empty_has_no_segments() {
        assert!(split_line("").unwrap().is_empty());
    }

    #[test]
    fn split_line_whole_line_token() {
        let segments = split_line("$VERSION_DIRECTIVE").unwrap();
        assert_eq!(segments, vec![Segment::Token(Token::VersionDirective)]);
    }

    #[test]
    fn split_line_embedded_tokens_keep_surrounding_text() {
        let segments = split_line("  $FRAGCOLOR = $TEXTURE_2D(colour_tex, colour_tex_uv);").unwrap();
        assert_eq!(
            segments,
            vec![
                Segment::Text("  "),
                Segment::Token(Token::FragColor),
                Segment::Text(" = "),
                Segment::Token(Token::Texture2d),
                Segment::Text("(colour_tex, colour_tex_uv);"),
            ]
        );
    }

    #[test]
    fn split_line_token_name_stops_at_lowercase() {
        let segments = split_line("$ATTRIBUTE vec2 position;").unwrap();
        assert_eq!(segments[0], Segment::Token(Token::Attribute));
        assert_eq!(segments[1], Segment::Text(" vec2 position;"));
    }

    #[test]
    fn split_line_unknown_token_fails() {
        let err = split_line("  $TEXTURE_CUBE(sky, dir);").unwrap_err();
        assert_eq!(err, ShaderError::UnknownToken("TEXTURE_CUBE".into()));
    }

    #[test]
    fn split_line_bare_dollar_is_unknown_empty_token() {
        let err = split_line("float $x;").unwrap_err();
        assert_eq!(err, ShaderError::UnknownToken(String::new()));
    }
}
