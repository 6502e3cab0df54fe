//! Configuration structures for the extraction and labeling tools.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::label::LedgerSchema;

/// Main configuration for the tunlab tools.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TunlabConfig {
    /// Extraction pipeline configuration.
    pub extract: ExtractConfig,

    /// Labeling session configuration.
    pub label: LabelConfig,
}

/// Extraction pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Directory holding the source PDF reports.
    pub input_dir: PathBuf,

    /// Root of the extracted image tree.
    pub output_dir: PathBuf,

    /// Minimum image width in pixels.
    pub min_width: u32,

    /// Minimum image height in pixels.
    pub min_height: u32,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("pdfs"),
            output_dir: PathBuf::from("extracted-images"),
            min_width: 350,
            min_height: 350,
        }
    }
}

/// Labeling session configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// Root of the extracted image tree to label.
    pub image_dir: PathBuf,

    /// Path of the label ledger CSV.
    pub ledger_path: PathBuf,

    /// Row schema for the ledger and form.
    pub schema: LedgerSchema,

    /// Choices offered for the software field.
    pub software_options: Vec<String>,

    /// Choices offered for the output type field.
    pub output_type_options: Vec<String>,

    /// Choices offered for the tunnel shape field.
    pub shape_options: Vec<String>,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            image_dir: PathBuf::from("extracted-images"),
            ledger_path: PathBuf::from("manual_labels.csv"),
            schema: LedgerSchema::default(),
            software_options: [
                "RS2", "RS3", "PLAXIS2D", "PLAXIS3D", "UDEC", "FLAC2D", "FLAC3D", "3DEC",
            ]
            .map(String::from)
            .to_vec(),
            output_type_options: [
                "Model",
                "Vertical Displacement",
                "Horizontal Displacement",
                "Stress Distribution",
                "Bolt Axial Load",
                "Shear",
            ]
            .map(String::from)
            .to_vec(),
            shape_options: ["Arch", "Circular", "Rectangular", "Other"]
                .map(String::from)
                .to_vec(),
        }
    }
}

impl TunlabConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}
