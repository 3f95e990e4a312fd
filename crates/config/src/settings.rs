// Run settings
// Loaded from ~/.config/ventas/settings.toml

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Output file name used when neither the settings file nor the command
/// line names one.
pub const DEFAULT_OUTPUT_NAME: &str = "datos_ventas_filtrados.xlsx";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Folders searched recursively for source workbooks
    pub input_roots: Vec<PathBuf>,

    /// Reference workbook with the SKU mapping and homologated attributes
    pub mapping_file: Option<PathBuf>,

    /// Where the consolidated file is written (None = current directory)
    pub output_dir: Option<PathBuf>,

    /// Output file name; the extension picks the format (.xlsx or .csv)
    pub output_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input_roots: Vec::new(),
            mapping_file: None,
            output_dir: None,
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
        }
    }
}

/// Values given on the command line. Anything set here wins over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub input_roots: Vec<PathBuf>,
    pub mapping_file: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub output_name: Option<String>,
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ventas");
        config_dir.join("settings.toml")
    }

    /// Load from the default location. A missing file means defaults; a
    /// file that exists but does not parse is an error.
    pub fn load() -> Result<Self, String> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load from an explicit path, which must exist.
    ///
    /// Relative paths inside the file are taken relative to the file's own
    /// directory, so a settings file can travel with its data folders.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Error reading {}: {}", path.display(), e))?;
        let mut settings: Self = toml::from_str(&contents)
            .map_err(|e| format!("Error parsing {}: {}", path.display(), e))?;

        if let Some(base) = path.parent() {
            settings.resolve_relative_to(base);
        }
        Ok(settings)
    }

    fn resolve_relative_to(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            let expanded = expand_home(&*p);
            *p = if expanded.is_relative() {
                base.join(expanded)
            } else {
                expanded
            };
        };
        self.input_roots.iter_mut().for_each(resolve);
        self.mapping_file.iter_mut().for_each(resolve);
        self.output_dir.iter_mut().for_each(resolve);
    }

    /// Apply command-line values on top of the file's. A leading `~` is
    /// expanded; other relative paths stay relative to the working directory.
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if !overrides.input_roots.is_empty() {
            self.input_roots = overrides.input_roots.iter().map(|p| expand_home(p)).collect();
        }
        if let Some(path) = overrides.mapping_file {
            self.mapping_file = Some(expand_home(&path));
        }
        if let Some(path) = overrides.output_dir {
            self.output_dir = Some(expand_home(&path));
        }
        if let Some(name) = overrides.output_name {
            self.output_name = name;
        }
        self
    }

    /// Check that there is something to read.
    pub fn validate_inputs(&self) -> Result<(), String> {
        if self.input_roots.is_empty() {
            return Err("no input folders configured".to_string());
        }
        Ok(())
    }

    /// The configured reference workbook. Whether it can be read is left to
    /// the reader.
    pub fn mapping_path(&self) -> Result<&Path, String> {
        self.mapping_file
            .as_deref()
            .ok_or_else(|| "no reference mapping file configured".to_string())
    }

    /// Full output path: `output_dir` (or the current directory) joined
    /// with `output_name`. The name must be a bare file name.
    pub fn output_path(&self) -> Result<PathBuf, String> {
        let name = self.output_name.trim();
        if name.is_empty() {
            return Err("output name is empty".to_string());
        }
        if Path::new(name).file_name().map(|f| f != name).unwrap_or(true) {
            return Err(format!("output name must be a file name, not a path: {}", name));
        }
        let dir = self.output_dir.clone().unwrap_or_else(|| PathBuf::from("."));
        Ok(dir.join(name))
    }

    /// Get the config file path for display
    pub fn config_path_display() -> String {
        Self::config_path().to_string_lossy().to_string()
    }
}

/// Expand a leading `~` to the home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).as_ref())
}
