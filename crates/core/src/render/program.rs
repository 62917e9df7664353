//! Compiling and linking assembled shader sources with `glow`.

use thiserror::Error;

use crate::assembler::ShaderSources;
use crate::listing::format_listing;

/// Vertex attribute locations bound before linking; the sprite vertex
/// template declares no explicit layout.
pub const ATTRIBUTE_LOCATIONS: &[(u32, &str)] = &[(0, "position"), (1, "colour_uv")];

/// Driver-side failures when building a program from assembled text.
#[derive(Debug, Clone, Error)]
pub enum ProgramError {
    /// A stage failed to compile; `log` carries the numbered source and driver log.
    #[error("{variant} {stage} shader failed to compile:\n{log}")]
    Compile {
        variant: String,
        stage: &'static str,
        log: String,
    },
    /// The program failed to link.
    #[error("{variant} program failed to link:\n{log}")]
    Link { variant: String, log: String },
}

#[allow(unsafe_code)]
fn compile_stage(
    gl: &glow::Context,
    variant: &str,
    stage: &'static str,
    kind: u32,
    source: &str,
) -> Result<glow::Shader, ProgramError> {
    use glow::HasContext;

    let compile_error = |log: String| ProgramError::Compile {
        variant: variant.to_string(),
        stage,
        log,
    };

    // SAFETY: `kind` is VERTEX_SHADER or FRAGMENT_SHADER and the handle is
    // deleted on the failure path.
    unsafe {
        let shader = gl.create_shader(kind).map_err(compile_error)?;
        gl.shader_source(shader, source);
        gl.compile_shader(shader);
        if gl.get_shader_compile_status(shader) {
            return Ok(shader);
        }
        let log = gl.get_shader_info_log(shader);
        gl.delete_shader(shader);
        Err(compile_error(format_listing(source, &log)))
    }
}

/// Compiles both stages, binds [`ATTRIBUTE_LOCATIONS`], and links.
///
/// Shader objects are released whether or not linking succeeds.
///
/// # Errors
///
/// Returns `ProgramError::Compile` with a numbered listing if a stage is
/// rejected, or `ProgramError::Link` if linking fails.
#[allow(unsafe_code)]
pub fn compile_sources(
    gl: &glow::Context,
    sources: &ShaderSources,
) -> Result<glow::Program, ProgramError> {
    use glow::HasContext;

    let variant = sources.variant.name();
    let vertex = compile_stage(gl, variant, "vertex", glow::VERTEX_SHADER, &sources.vertex)?;
    let fragment = match compile_stage(gl, variant, "fragment", glow::FRAGMENT_SHADER, &sources.fragment) {
        Ok(shader) => shader,
        Err(e) => {
            // SAFETY: `vertex` is a live handle from compile_stage.
            unsafe { gl.delete_shader(vertex) };
            return Err(e);
        }
    };

    let link_error = |log: String| ProgramError::Link {
        variant: variant.to_string(),
        log,
    };

    // SAFETY: all handles come from successful glow calls above and are
    // released on every path.
    let result = unsafe {
        match gl.create_program() {
            Ok(program) => {
                gl.attach_shader(program, vertex);
                gl.attach_shader(program, fragment);
                for &(location, name) in ATTRIBUTE_LOCATIONS {
                    gl.bind_attrib_location(program, location, name);
                }
                gl.link_program(program);
                gl.detach_shader(program, vertex);
                gl.detach_shader(program, fragment);

                if gl.get_program_link_status(program) {
                    Ok(program)
                } else {
                    let log = gl.get_program_info_log(program);
                    gl.delete_program(program);
                    Err(link_error(log))
                }
            }
            Err(log) => Err(link_error(log)),
        }
    };

    // SAFETY: both shaders are live and no longer attached to a program.
    unsafe {
        gl.delete_shader(vertex);
        gl.delete_shader(fragment);
    }

    if result.is_ok() {
        log::debug!("linked {variant} program");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_locations_match_vertex_template() {
        let vertex = crate::assemble_vertex(&crate::Profile::glsl150()).unwrap();
        for (_, name) in ATTRIBUTE_LOCATIONS {
            assert!(vertex.contains(name), "vertex shader lacks attribute {name}");
        }
    }

    #[test]
    fn compile_error_display_includes_variant_stage_and_log() {
        let err = ProgramError::Compile {
            variant: "sprite-blend".into(),
            stage: "fragment",
            log: "3: uniform bool crash;\n\nERROR: 0:3: oops".into(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("sprite-blend"), "missing variant in: {msg}");
        assert!(msg.contains("fragment"), "missing stage in: {msg}");
        assert!(msg.contains("ERROR: 0:3: oops"), "missing log in: {msg}");
    }

    #[test]
    fn link_error_display_includes_log() {
        let err = ProgramError::Link {
            variant: "direct".into(),
            log: "varying mismatch".into(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("direct") && msg.contains("varying mismatch"), "{msg}");
    }

    #[test]
    #[ignore = "requires GL context"]
    fn compile_sources_links_every_variant() {
        // Would test: every variant assembled for the detected profile links.
    }
}
