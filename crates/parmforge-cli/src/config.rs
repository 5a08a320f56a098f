use crate::cli::BuildArgs;
use crate::error::{CliError, Result};
use parmforge::build::options::SystemOptions;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Loads construction options from a TOML file, falling back to the
/// defaults when no file is given.
pub fn load_options(path: Option<&Path>) -> Result<SystemOptions> {
    let Some(path) = path else {
        return Ok(SystemOptions::default());
    };
    let content = fs::read_to_string(path).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: anyhow::Error::new(e),
    })?;
    let options: SystemOptions = toml::from_str(&content).map_err(|e| {
        CliError::Config(format!("Failed to parse '{}': {}", path.display(), e))
    })?;
    debug!(path = %path.display(), "Loaded construction options");
    Ok(options)
}

/// Applies command-line overrides on top of the file-derived options.
pub fn apply_overrides(mut options: SystemOptions, args: &BuildArgs) -> Result<SystemOptions> {
    if let Some(method) = &args.nonbonded_method {
        options.nonbonded_method = method
            .parse()
            .map_err(|_| CliError::Argument(format!("Unknown nonbonded method '{}'", method)))?;
    }
    if let Some(cutoff) = args.cutoff {
        options.cutoff = cutoff;
    }
    if let Some(model) = &args.implicit_solvent {
        options.implicit_solvent = Some(model.parse().map_err(|_| {
            CliError::Argument(format!("Unknown implicit solvent model '{}'", model))
        })?);
    }
    if let Some(mass) = args.hydrogen_mass {
        options.hydrogen_mass = Some(mass);
    }
    options.validate().map_err(|e| CliError::Config(e.to_string()))?;
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use parmforge::build::options::{ConstraintPolicy, NonbondedMethod};
    use parmforge::core::forcefield::gb::GbModel;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn build_args() -> BuildArgs {
        BuildArgs {
            prmtop: "in.prmtop".into(),
            coordinates: None,
            options: None,
            nonbonded_method: None,
            cutoff: None,
            implicit_solvent: None,
            hydrogen_mass: None,
        }
    }

    #[test]
    fn missing_file_means_defaults() {
        let options = load_options(None).unwrap();
        assert_eq!(options, SystemOptions::default());
    }

    #[test]
    fn options_file_deserializes_kebab_case_fields() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
nonbonded-method = "pme"
cutoff = 0.9
constraints = "h-bonds"
implicit-solvent = "obc2"
rigid-water = false
hydrogen-mass = 3.5
"#
        )
        .unwrap();

        let options = load_options(Some(file.path())).unwrap();
        assert_eq!(options.nonbonded_method, NonbondedMethod::Pme);
        assert_eq!(options.cutoff, 0.9);
        assert_eq!(options.constraints, Some(ConstraintPolicy::HBonds));
        assert_eq!(options.implicit_solvent, Some(GbModel::Obc2));
        assert!(!options.rigid_water);
        assert_eq!(options.hydrogen_mass, Some(3.5));
        // Unset fields keep their defaults.
        assert!(options.remove_cm_motion);
    }

    #[test]
    fn malformed_options_file_is_a_config_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "nonbonded-method = \"reaction-field\"").unwrap();
        assert!(matches!(
            load_options(Some(file.path())),
            Err(CliError::Config(_))
        ));
    }

    #[test]
    fn overrides_take_precedence_and_validate() {
        let mut args = build_args();
        args.nonbonded_method = Some("ewald".to_string());
        args.cutoff = Some(1.2);
        args.implicit_solvent = Some("gbn".to_string());

        let options = apply_overrides(SystemOptions::default(), &args).unwrap();
        assert_eq!(options.nonbonded_method, NonbondedMethod::Ewald);
        assert_eq!(options.cutoff, 1.2);
        assert_eq!(options.implicit_solvent, Some(GbModel::Gbn));

        let mut bad = build_args();
        bad.cutoff = Some(-1.0);
        assert!(matches!(
            apply_overrides(SystemOptions::default(), &bad),
            Err(CliError::Config(_))
        ));

        let mut unknown = build_args();
        unknown.nonbonded_method = Some("magic".to_string());
        assert!(matches!(
            apply_overrides(SystemOptions::default(), &unknown),
            Err(CliError::Argument(_))
        ));
    }
}
