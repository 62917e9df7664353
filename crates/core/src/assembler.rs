//! Template assembly: resolve every placeholder, splice includes, verify
//! the structural rules of the output.
//!
//! Assembly is a pure function of `(template, profile, effects)`. Two calls
//! with the same inputs produce byte-identical text; caching the result is
//! left to the caller.
//!
//! Rules checked on every assembled text:
//! - when the profile has a version, `#version` is the first line, and no
//!   `#version` appears anywhere else;
//! - every `#extension` line sits after the version line and before the
//!   first body line;
//! - each included template appears once, and the routines it defines
//!   precede their first call outside the included block.

use crate::error::ShaderError;
use crate::listing::format_listing;
use crate::profile::Profile;
use crate::resolver::{resolve, Effects};
use crate::template::{template_for, Line, Template, VERTEX_SPRITE};
use crate::token::{split_line, Segment};
use crate::variant::{Selection, Variant};

/// Includes nested deeper than this are treated as a cycle.
const MAX_INCLUDE_DEPTH: usize = 8;

/// Vertex and fragment text for one variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSources {
    pub variant: Variant,
    pub vertex: String,
    pub fragment: String,
}

/// A spliced include: the template and the half-open line range it occupies.
struct Inclusion {
    template: &'static Template,
    start: usize,
    end: usize,
}

struct Expanded {
    lines: Vec<String>,
    inclusions: Vec<Inclusion>,
}

fn expand(
    template: &Template,
    profile: &Profile,
    effects: Effects,
    depth: usize,
) -> Result<Expanded, ShaderError> {
    if depth > MAX_INCLUDE_DEPTH {
        return Err(ShaderError::InvalidOrdering(format!(
            "includes nested deeper than {MAX_INCLUDE_DEPTH} levels at '{}'",
            template.name
        )));
    }

    let mut lines = Vec::with_capacity(template.lines.len());
    let mut inclusions = Vec::new();

    for line in template.lines {
        match line {
            Line::Source(text) => {
                let segments = split_line(text)?;
                let mut has_token = false;
                let mut out = String::with_capacity(text.len());
                for segment in segments {
                    match segment {
                        Segment::Text(literal) => out.push_str(literal),
                        Segment::Token(token) => {
                            has_token = true;
                            out.push_str(&resolve(token, profile, effects)?);
                        }
                    }
                }
                // A placeholder the dialect doesn't need leaves no line behind;
                // blank lines written in the template stay.
                if has_token && out.trim().is_empty() {
                    continue;
                }
                lines.push(out);
            }
            Line::Include(inner) => {
                let nested = expand(inner, profile, effects, depth + 1)?;
                let start = lines.len();
                inclusions.extend(nested.inclusions.into_iter().map(|inc| Inclusion {
                    start: inc.start + start,
                    end: inc.end + start,
                    ..inc
                }));
                lines.extend(nested.lines);
                inclusions.push(Inclusion {
                    template: *inner,
                    start,
                    end: lines.len(),
                });
            }
        }
    }

    Ok(Expanded { lines, inclusions })
}

fn ordering_error(lines: &[String], detail: String) -> ShaderError {
    ShaderError::InvalidOrdering(format_listing(&lines.join("\n"), &detail))
}

fn is_directive(line: &str, name: &str) -> bool {
    line.trim_start()
        .strip_prefix('#')
        .map(|rest| rest.trim_start().starts_with(name))
        .unwrap_or(false)
}

/// Whether `line` calls (or declares) `name`, matching whole identifiers.
fn mentions_call(line: &str, name: &str) -> bool {
    let pattern = format!("{name}(");
    line.match_indices(&pattern).any(|(pos, _)| {
        line[..pos]
            .chars()
            .next_back()
            .map_or(true, |c| !(c.is_ascii_alphanumeric() || c == '_'))
    })
}

fn check_directives(lines: &[String], profile: &Profile) -> Result<(), ShaderError> {
    if profile.version.is_some() && !lines.first().is_some_and(|l| is_directive(l, "version")) {
        return Err(ordering_error(
            lines,
            format!("profile '{}' requires #version on line 1", profile.name),
        ));
    }

    let mut body_started = false;
    for (i, line) in lines.iter().enumerate() {
        if is_directive(line, "version") {
            if i != 0 {
                return Err(ordering_error(lines, format!("#version on line {}", i + 1)));
            }
        } else if is_directive(line, "extension") {
            if body_started {
                return Err(ordering_error(
                    lines,
                    format!("#extension on line {} follows shader body", i + 1),
                ));
            }
        } else if !line.trim().is_empty() {
            body_started = true;
        }
    }
    Ok(())
}

fn check_inclusions(lines: &[String], inclusions: &[Inclusion]) -> Result<(), ShaderError> {
    for (i, inclusion) in inclusions.iter().enumerate() {
        let name = inclusion.template.name;
        if inclusions[..i]
            .iter()
            .any(|earlier| std::ptr::eq(earlier.template, inclusion.template))
        {
            return Err(ordering_error(lines, format!("'{name}' included more than once")));
        }

        for routine in inclusion.template.defines {
            let block = &lines[inclusion.start..inclusion.end];
            if !block.iter().any(|l| mentions_call(l, routine)) {
                return Err(ordering_error(
                    lines,
                    format!("'{name}' does not define {routine}()"),
                ));
            }
            let first_call = lines
                .iter()
                .enumerate()
                .filter(|(idx, _)| !(inclusion.start..inclusion.end).contains(idx))
                .find(|(_, l)| mentions_call(l, routine))
                .map(|(idx, _)| idx);
            if let Some(call) = first_call.filter(|&call| call < inclusion.start) {
                return Err(ordering_error(
                    lines,
                    format!(
                        "{routine}() called on line {} before '{name}' is included on line {}",
                        call + 1,
                        inclusion.start + 1
                    ),
                ));
            }
        }
    }
    Ok(())
}

/// Assembles a template into shader text for the given profile.
///
/// # Errors
///
/// - `ShaderError::UnknownToken` if the template names a token outside the table.
/// - `ShaderError::UnsupportedCapability` if the profile cannot resolve a token.
/// - `ShaderError::InvalidOrdering` if the assembled text breaks a structural rule.
pub fn assemble(
    template: &Template,
    profile: &Profile,
    effects: Effects,
) -> Result<String, ShaderError> {
    let Expanded { lines, inclusions } = expand(template, profile, effects, 0)?;
    check_directives(&lines, profile)?;
    check_inclusions(&lines, &inclusions)?;

    log::debug!(
        "assembled {} shader '{}' for '{}' ({} lines, {effects:?})",
        template.stage.name(),
        template.name,
        profile.name,
        lines.len()
    );
    Ok(lines.join("\n"))
}

/// Assembles the sprite vertex shader.
pub fn assemble_vertex(profile: &Profile) -> Result<String, ShaderError> {
    assemble(&VERTEX_SPRITE, profile, Effects::NONE)
}

/// Assembles the fragment shader of a variant.
pub fn assemble_fragment(
    variant: Variant,
    profile: &Profile,
    effects: Effects,
) -> Result<String, ShaderError> {
    assemble(template_for(variant), profile, effects)
}

/// Assembles both stages for a [`Selection`].
pub fn assemble_selection(
    selection: &Selection,
    profile: &Profile,
) -> Result<ShaderSources, ShaderError> {
    Ok(ShaderSources {
        variant: selection.variant,
        vertex: assemble_vertex(profile)?,
        fragment: assemble_fragment(selection.variant, profile, selection.effects)?,
    })
}

/// Whether every token of the variant's templates resolves for `profile`.
///
/// The supported cross-product is every `(variant, profile)` pair for which
/// this holds.
pub fn is_supported(variant: Variant, profile: &Profile) -> bool {
    [&VERTEX_SPRITE, template_for(variant)].iter().all(|template| {
        template.tokens().is_ok_and(|tokens| {
            tokens
                .into_iter()
                .all(|token| resolve(token, profile, Effects::NONE).is_ok())
        })
    })
}
