mod discovery;
mod formatting;

use camino::Utf8Path;
use config::Config;
use config::ConfigError as ExternalConfigError;
use config::File;
use config::FileFormat;
pub use discovery::DiscoverySettings;
use directories::ProjectDirs;
pub use formatting::AttributeIndentStyle;
pub use formatting::FormattingOptions;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration build/deserialize error")]
    Config(#[from] ExternalConfigError),
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Settings {
    debug: bool,
    format: FormattingOptions,
    discovery: DiscoverySettings,
}

impl Settings {
    /// Load settings for a project, layering the user configuration file,
    /// `.rzls.toml` and `rzls.toml` (highest priority last).
    pub fn new(project_root: &Utf8Path) -> Result<Self, ConfigError> {
        let user_config_file = ProjectDirs::from("com.github", "rzls", "rzls")
            .map(|proj_dirs| proj_dirs.config_dir().join("rzls.toml"));

        Self::load_from_paths(
            project_root,
            user_config_file
                .as_deref()
                .and_then(Utf8Path::from_path),
        )
    }

    fn load_from_paths(
        project_root: &Utf8Path,
        user_config_path: Option<&Utf8Path>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        if let Some(path) = user_config_path {
            tracing::debug!(%path, "Adding user configuration source");
            builder = builder.add_source(
                File::from(path.as_std_path())
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        for name in [".rzls.toml", "rzls.toml"] {
            builder = builder.add_source(
                File::from(project_root.join(name).as_std_path())
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        let config = builder.build()?;
        let settings = config.try_deserialize()?;
        Ok(settings)
    }

    #[must_use]
    pub fn debug(&self) -> bool {
        self.debug
    }

    #[must_use]
    pub fn format(&self) -> &FormattingOptions {
        &self.format
    }

    #[must_use]
    pub fn discovery(&self) -> &DiscoverySettings {
        &self.discovery
    }

    #[must_use]
    pub fn with_format(mut self, format: FormattingOptions) -> Self {
        self.format = format;
        self
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use camino::Utf8PathBuf;
    use tempfile::tempdir;

    use super::*;

    fn utf8(dir: &tempfile::TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap()
    }

    mod defaults {
        use super::*;

        #[test]
        fn test_load_no_files() {
            let dir = tempdir().unwrap();
            let settings = Settings::load_from_paths(&utf8(&dir), None).unwrap();
            assert_eq!(settings, Settings::default());
            assert_eq!(settings.format().tab_size, 4);
            assert!(settings.format().insert_spaces);
            assert!(settings.discovery().include_documentation);
        }
    }

    mod project_files {
        use super::*;

        #[test]
        fn test_load_rzls_toml_only() {
            let dir = tempdir().unwrap();
            fs::write(
                dir.path().join("rzls.toml"),
                "debug = true\n[format]\ntab_size = 2\n",
            )
            .unwrap();
            let settings = Settings::load_from_paths(&utf8(&dir), None).unwrap();
            assert!(settings.debug());
            assert_eq!(settings.format().tab_size, 2);
            assert!(settings.format().insert_spaces);
        }

        #[test]
        fn test_load_attribute_indent_style() {
            let dir = tempdir().unwrap();
            fs::write(
                dir.path().join(".rzls.toml"),
                "[format]\nattribute_indent_style = \"indent_by_one\"\n",
            )
            .unwrap();
            let settings = Settings::load_from_paths(&utf8(&dir), None).unwrap();
            assert_eq!(
                settings.format().attribute_indent_style,
                AttributeIndentStyle::IndentByOne
            );
        }

        #[test]
        fn test_load_discovery_section() {
            let dir = tempdir().unwrap();
            fs::write(
                dir.path().join("rzls.toml"),
                "[discovery]\nexclude_hidden = true\nskip_assembly_prefixes = [\"Vendor.\"]\n",
            )
            .unwrap();
            let settings = Settings::load_from_paths(&utf8(&dir), None).unwrap();
            assert!(settings.discovery().exclude_hidden);
            assert!(settings.discovery().skips_assembly("Vendor.Widgets"));
            assert!(!settings.discovery().skips_assembly("System.Runtime"));
        }
    }

    mod priority {
        use super::*;

        #[test]
        fn test_rzls_overrides_dot_rzls() {
            let dir = tempdir().unwrap();
            fs::write(dir.path().join(".rzls.toml"), "[format]\ntab_size = 8\n").unwrap();
            fs::write(dir.path().join("rzls.toml"), "[format]\ntab_size = 2\n").unwrap();
            let settings = Settings::load_from_paths(&utf8(&dir), None).unwrap();
            assert_eq!(settings.format().tab_size, 2);
        }

        #[test]
        fn test_project_overrides_user() {
            let user_dir = tempdir().unwrap();
            let project_dir = tempdir().unwrap();
            let user_conf_path = utf8(&user_dir).join("rzls.toml");
            fs::write(&user_conf_path, "debug = true\n[format]\ninsert_spaces = false\n").unwrap();
            fs::write(project_dir.path().join("rzls.toml"), "debug = false\n").unwrap();

            let settings =
                Settings::load_from_paths(&utf8(&project_dir), Some(&user_conf_path)).unwrap();
            assert!(!settings.debug());
            assert!(!settings.format().insert_spaces);
        }
    }

    mod errors {
        use super::*;

        #[test]
        fn test_invalid_toml_content() {
            let dir = tempdir().unwrap();
            fs::write(dir.path().join("rzls.toml"), "debug = not_a_boolean").unwrap();
            let result = Settings::load_from_paths(&utf8(&dir), None);
            assert!(matches!(result.unwrap_err(), ConfigError::Config(_)));
        }
    }
}
