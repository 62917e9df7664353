#![deny(unsafe_code)]
//! CLI binary for inspecting assembled sprite shaders.
//!
//! Subcommands:
//! - `list` -- print built-in profiles, variants and placeholder tokens
//! - `assemble <variant>` -- print the assembled shader text for one profile
//! - `check` -- assemble every variant for every built-in profile

mod error;

use clap::{Parser, Subcommand, ValueEnum};
use error::CliError;
use spriteshade_core::{
    assemble_fragment, assemble_vertex, format_listing, is_supported, Effects, Profile,
    ShaderError, Token, Variant,
};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "spriteshade", about = "Portable sprite shader assembly")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StageArg {
    Vertex,
    Fragment,
    Both,
}

#[derive(Subcommand)]
enum Command {
    /// List built-in profiles, variants and placeholder tokens.
    List,
    /// Assemble one variant for one profile and print the text.
    Assemble {
        /// Variant name (direct, palette, rgb-mask-blend, sprite-blend).
        variant: String,

        /// Built-in profile name (glsl110, glsl150, gles100, gles300).
        #[arg(short, long, default_value = "glsl150")]
        profile: String,

        /// Load the profile from a JSON file instead of a built-in.
        #[arg(long, conflicts_with = "profile")]
        profile_file: Option<PathBuf>,

        /// Strip LOD sampling from the profile.
        #[arg(long)]
        no_lod: bool,

        /// Compile in the crash override.
        #[arg(long)]
        crash: bool,

        /// Which stage to print.
        #[arg(short, long, value_enum, default_value_t = StageArg::Both)]
        stage: StageArg,

        /// Prefix each line with its line number.
        #[arg(short, long)]
        numbered: bool,
    },
    /// Assemble every variant for every built-in profile, with and without LOD.
    Check,
}

fn parse_variant(name: &str) -> Result<Variant, CliError> {
    Variant::from_name(name).ok_or_else(|| {
        let known: Vec<&str> = Variant::ALL.iter().map(|v| v.name()).collect();
        CliError::Input(format!(
            "unknown variant '{name}' (expected one of: {})",
            known.join(", ")
        ))
    })
}

fn load_profile(name: &str, file: Option<&PathBuf>) -> Result<Profile, CliError> {
    match file {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .map_err(|e| CliError::Io(format!("cannot read {}: {e}", path.display())))?;
            Ok(Profile::from_json(&json)?)
        }
        None => Ok(Profile::builtin(name)?),
    }
}

fn render_text(source: &str, numbered: bool) -> String {
    if numbered {
        format_listing(source, "")
    } else {
        source.to_string()
    }
}

/// Outcome of assembling one (profile, variant, effects) combination.
enum CheckOutcome {
    Ok,
    Unsupported,
    Failed(ShaderError),
}

fn check_one(variant: Variant, profile: &Profile, effects: Effects) -> CheckOutcome {
    if !is_supported(variant, profile) {
        return CheckOutcome::Unsupported;
    }
    match assemble_vertex(profile).and_then(|_| assemble_fragment(variant, profile, effects)) {
        Ok(_) => CheckOutcome::Ok,
        Err(e) => CheckOutcome::Failed(e),
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let profiles = Profile::builtin_names();
            let variants: Vec<&str> = Variant::ALL.iter().map(|v| v.name()).collect();
            let tokens: Vec<&str> = Token::ALL.iter().map(|t| t.name()).collect();
            if cli.json {
                let info = serde_json::json!({
                    "profiles": profiles,
                    "variants": variants,
                    "tokens": tokens,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Profiles:");
                println!("  {}", profiles.join(", "));
                println!("Variants:");
                println!("  {}", variants.join(", "));
                println!("Tokens:");
                for name in tokens {
                    println!("  ${name}");
                }
            }
        }
        Command::Assemble {
            variant,
            profile,
            profile_file,
            no_lod,
            crash,
            stage,
            numbered,
        } => {
            let variant = parse_variant(&variant)?;
            let mut profile = load_profile(&profile, profile_file.as_ref())?;
            if no_lod {
                profile = profile.without_lod();
            }
            if crash && variant != Variant::SpriteBlend {
                log::warn!("--crash has no effect on the {variant} variant");
            }
            let effects = Effects::NONE.with_crash(crash);

            let vertex = match stage {
                StageArg::Vertex | StageArg::Both => Some(assemble_vertex(&profile)?),
                StageArg::Fragment => None,
            };
            let fragment = match stage {
                StageArg::Fragment | StageArg::Both => {
                    Some(assemble_fragment(variant, &profile, effects)?)
                }
                StageArg::Vertex => None,
            };

            if cli.json {
                let info = serde_json::json!({
                    "variant": variant.name(),
                    "profile": profile.name,
                    "crash": crash,
                    "vertex": vertex,
                    "fragment": fragment,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                if let Some(text) = &vertex {
                    if stage == StageArg::Both {
                        println!("// vertex ({})", profile.name);
                    }
                    println!("{}", render_text(text, numbered));
                }
                if let Some(text) = &fragment {
                    if stage == StageArg::Both {
                        println!("// fragment: {variant} ({})", profile.name);
                    }
                    println!("{}", render_text(text, numbered));
                }
            }
        }
        Command::Check => {
            let profiles: Vec<Profile> = Profile::builtins()
                .into_iter()
                .flat_map(|p| {
                    let nolod = p.clone().without_lod();
                    [p, nolod]
                })
                .collect();

            let mut results = Vec::new();
            let mut first_failure = None;
            for profile in &profiles {
                for variant in Variant::ALL {
                    for crash in [false, true] {
                        if crash && variant != Variant::SpriteBlend {
                            continue;
                        }
                        let outcome = check_one(variant, profile, Effects::NONE.with_crash(crash));
                        let status = match &outcome {
                            CheckOutcome::Ok => "ok".to_string(),
                            CheckOutcome::Unsupported => "unsupported".to_string(),
                            CheckOutcome::Failed(e) => format!("FAILED: {e}"),
                        };
                        results.push((profile.name.clone(), variant, crash, status));
                        if let CheckOutcome::Failed(e) = outcome {
                            first_failure.get_or_insert(e);
                        }
                    }
                }
            }

            if cli.json {
                let rows: Vec<serde_json::Value> = results
                    .iter()
                    .map(|(profile, variant, crash, status)| {
                        serde_json::json!({
                            "profile": profile,
                            "variant": variant.name(),
                            "crash": crash,
                            "status": status,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                for (profile, variant, crash, status) in &results {
                    let label = if *crash {
                        format!("{variant}+crash")
                    } else {
                        variant.to_string()
                    };
                    println!("{profile:<16} {label:<20} {status}");
                }
            }

            if let Some(e) = first_failure {
                return Err(e.into());
            }
        }
    }

    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_variant_accepts_kebab_names() {
        assert_eq!(parse_variant("sprite-blend").ok(), Some(Variant::SpriteBlend));
        let err = parse_variant("wireframe").err().map(|e| e.exit_code());
        assert_eq!(err, Some(12));
    }

    #[test]
    fn unknown_builtin_profile_is_input_error() {
        let err = load_profile("glsl999", None).err().map(|e| e.exit_code());
        assert_eq!(err, Some(12));
    }

    #[test]
    fn missing_profile_file_is_io_error() {
        let path = PathBuf::from("/nonexistent/spriteshade/profile.json");
        let err = load_profile("glsl150", Some(&path)).err().map(|e| e.exit_code());
        assert_eq!(err, Some(11));
    }

    #[test]
    fn check_classifies_nolod_blend_as_unsupported() {
        let profile = Profile::glsl150().without_lod();
        assert!(matches!(
            check_one(Variant::SpriteBlend, &profile, Effects::NONE),
            CheckOutcome::Unsupported
        ));
        assert!(matches!(
            check_one(Variant::Direct, &profile, Effects::NONE),
            CheckOutcome::Ok
        ));
    }

    #[test]
    fn check_passes_every_builtin() {
        for profile in Profile::builtins() {
            for variant in Variant::ALL {
                assert!(
                    matches!(check_one(variant, &profile, Effects::NONE), CheckOutcome::Ok),
                    "{variant} on {}",
                    profile.name
                );
            }
        }
    }

    #[test]
    fn numbered_text_uses_listing_format() {
        assert_eq!(render_text("a\nb", true), "1: a\n2: b");
        assert_eq!(render_text("a\nb", false), "a\nb");
    }

    #[test]
    fn assemble_flags_parse() {
        let cli = Cli::try_parse_from([
            "spriteshade",
            "--json",
            "assemble",
            "sprite-blend",
            "--profile",
            "gles100",
            "--crash",
            "--stage",
            "fragment",
            "--numbered",
        ]);
        assert!(cli.is_ok());
    }
}
