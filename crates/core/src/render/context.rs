//! Capability detection for a live GL context.

use crate::profile::Profile;

/// Picks the built-in profile matching the context's version and extensions.
///
/// Returns `None` for contexts that predate GLSL.
pub fn detect_profile(gl: &glow::Context) -> Option<Profile> {
    use glow::HasContext;

    let version = gl.version();
    let extensions = gl.supported_extensions();
    let profile = Profile::for_context(version.major, version.minor, version.is_embedded, |ext| {
        extensions.contains(ext)
    });

    match &profile {
        Some(p) => log::info!(
            "GL {}.{}{} -> shader profile '{}'",
            version.major,
            version.minor,
            if version.is_embedded { " ES" } else { "" },
            p.name
        ),
        None => log::warn!(
            "GL {}.{} has no usable GLSL support",
            version.major,
            version.minor
        ),
    }
    profile
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_profile_signature_compiles() {
        fn _assert_api(gl: &glow::Context) -> Option<Profile> {
            detect_profile(gl)
        }
    }

    #[test]
    #[ignore = "requires GL context"]
    fn detect_profile_on_live_context_returns_builtin() {
        // Would test: a desktop 3.3 context yields "glsl150".
    }
}
