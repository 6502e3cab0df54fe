//! Manual labeling: form schema, ledger records and the labeling session.

mod ledger;
mod session;

pub use ledger::{CsvLedger, LabelStore};
pub use session::{LabelSession, scan_candidates};

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Sentinel persisted for fields the operator left blank.
pub const NOT_AVAILABLE: &str = "N/A";

/// Maximum number of tunnels the granular form covers.
pub const MAX_TUNNELS: usize = 4;

/// Shape of the label form and ledger rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LedgerSchema {
    /// Per-tunnel crown and sidewall values, four slots each.
    #[default]
    Granular,
    /// One aggregate crown value and one sidewall value.
    Scalar,
}

impl LedgerSchema {
    /// The fixed CSV header for this schema.
    pub fn header(&self) -> &'static [&'static str] {
        match self {
            LedgerSchema::Granular => &[
                "Image",
                "Software",
                "Output_Type",
                "Num_Tunnels",
                "Crown_T1",
                "Crown_T2",
                "Crown_T3",
                "Crown_T4",
                "Sidewall_Left_T1",
                "Sidewall_Left_T2",
                "Sidewall_Left_T3",
                "Sidewall_Left_T4",
                "Sidewall_Right_T1",
                "Sidewall_Right_T2",
                "Sidewall_Right_T3",
                "Sidewall_Right_T4",
                "Tunnel_Shape",
            ],
            LedgerSchema::Scalar => &[
                "Image",
                "Software",
                "Output_Type",
                "Num_Tunnels",
                "Crown_Value",
                "Sidewall_Value",
                "Tunnel_Shape",
            ],
        }
    }

    /// Short name used in error messages and config files.
    pub fn name(&self) -> &'static str {
        match self {
            LedgerSchema::Granular => "granular",
            LedgerSchema::Scalar => "scalar",
        }
    }
}

impl std::fmt::Display for LedgerSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Displacement values as entered in the form, shape depending on schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplacementValues {
    /// One value per tunnel slot for crown and both sidewalls.
    Granular {
        crown: [String; MAX_TUNNELS],
        sidewall_left: [String; MAX_TUNNELS],
        sidewall_right: [String; MAX_TUNNELS],
    },
    /// Aggregate crown and sidewall values.
    Scalar { crown: String, sidewall: String },
}

impl DisplacementValues {
    /// An all-blank value set matching the given schema.
    pub fn blank(schema: LedgerSchema) -> Self {
        match schema {
            LedgerSchema::Granular => DisplacementValues::Granular {
                crown: Default::default(),
                sidewall_left: Default::default(),
                sidewall_right: Default::default(),
            },
            LedgerSchema::Scalar => DisplacementValues::Scalar {
                crown: String::new(),
                sidewall: String::new(),
            },
        }
    }

    fn matches(&self, schema: LedgerSchema) -> bool {
        matches!(
            (self, schema),
            (DisplacementValues::Granular { .. }, LedgerSchema::Granular)
                | (DisplacementValues::Scalar { .. }, LedgerSchema::Scalar)
        )
    }
}

/// Raw form values collected from the operator for one image.
///
/// Values are taken as entered; normalization to [`NOT_AVAILABLE`] happens
/// when a [`LabelRecord`] is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormValues {
    pub software: String,
    pub output_type: String,
    pub num_tunnels: String,
    pub values: DisplacementValues,
    pub tunnel_shape: String,
}

impl FormValues {
    /// A blank form for the given schema.
    pub fn blank(schema: LedgerSchema) -> Self {
        Self {
            software: String::new(),
            output_type: String::new(),
            num_tunnels: String::new(),
            values: DisplacementValues::blank(schema),
            tunnel_shape: String::new(),
        }
    }
}

/// One ledger row: an image key plus its normalized form values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelRecord {
    /// Ledger key: path of the labeled image.
    pub image: String,
    pub software: String,
    pub output_type: String,
    pub num_tunnels: String,
    pub values: DisplacementValues,
    pub tunnel_shape: String,
}

/// Replace a blank entry with the "N/A" sentinel.
fn or_na(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        trimmed.to_string()
    }
}

impl LabelRecord {
    /// Build a record for an image, normalizing every blank field to "N/A".
    pub fn from_form(image: &str, form: &FormValues) -> Self {
        let values = match &form.values {
            DisplacementValues::Granular {
                crown,
                sidewall_left,
                sidewall_right,
            } => DisplacementValues::Granular {
                crown: crown.clone().map(|v| or_na(&v)),
                sidewall_left: sidewall_left.clone().map(|v| or_na(&v)),
                sidewall_right: sidewall_right.clone().map(|v| or_na(&v)),
            },
            DisplacementValues::Scalar { crown, sidewall } => DisplacementValues::Scalar {
                crown: or_na(crown),
                sidewall: or_na(sidewall),
            },
        };

        Self {
            image: image.to_string(),
            software: or_na(&form.software),
            output_type: or_na(&form.output_type),
            num_tunnels: or_na(&form.num_tunnels),
            values,
            tunnel_shape: or_na(&form.tunnel_shape),
        }
    }

    /// Flatten to one CSV row matching the given schema.
    pub fn to_row(&self, schema: LedgerSchema) -> Result<Vec<String>, LedgerError> {
        if !self.values.matches(schema) {
            return Err(LedgerError::RecordShape(schema.name().to_string()));
        }

        let mut row = vec![
            self.image.clone(),
            self.software.clone(),
            self.output_type.clone(),
            self.num_tunnels.clone(),
        ];

        match &self.values {
            DisplacementValues::Granular {
                crown,
                sidewall_left,
                sidewall_right,
            } => {
                row.extend(crown.iter().cloned());
                row.extend(sidewall_left.iter().cloned());
                row.extend(sidewall_right.iter().cloned());
            }
            DisplacementValues::Scalar { crown, sidewall } => {
                row.push(crown.clone());
                row.push(sidewall.clone());
            }
        }

        row.push(self.tunnel_shape.clone());
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_headers_match_schema_width() {
        assert_eq!(LedgerSchema::Granular.header().len(), 17);
        assert_eq!(LedgerSchema::Scalar.header().len(), 7);
    }

    #[test]
    fn test_blank_fields_normalize_to_na() {
        let mut form = FormValues::blank(LedgerSchema::Scalar);
        form.software = "RS2".to_string();
        form.output_type = "Model".to_string();
        form.tunnel_shape = "Arch".to_string();
        if let DisplacementValues::Scalar { crown, .. } = &mut form.values {
            *crown = "12.5".to_string();
        }

        let record = LabelRecord::from_form("extracted-images/doc/page_1_img_1.png", &form);
        let row = record.to_row(LedgerSchema::Scalar).unwrap();

        assert_eq!(
            row,
            vec![
                "extracted-images/doc/page_1_img_1.png",
                "RS2",
                "Model",
                "N/A",
                "12.5",
                "N/A",
                "Arch",
            ]
        );
    }

    #[test]
    fn test_nonblank_fields_persist_verbatim() {
        let mut form = FormValues::blank(LedgerSchema::Granular);
        form.num_tunnels = "2".to_string();
        if let DisplacementValues::Granular { crown, .. } = &mut form.values {
            crown[0] = "-3.4mm or so".to_string();
            crown[1] = "7".to_string();
        }

        let record = LabelRecord::from_form("img.png", &form);
        let row = record.to_row(LedgerSchema::Granular).unwrap();

        assert_eq!(row.len(), 17);
        assert_eq!(row[3], "2");
        assert_eq!(row[4], "-3.4mm or so");
        assert_eq!(row[5], "7");
        assert_eq!(row[6], "N/A");
    }

    #[test]
    fn test_whitespace_only_counts_as_blank() {
        let mut form = FormValues::blank(LedgerSchema::Scalar);
        form.num_tunnels = "   ".to_string();

        let record = LabelRecord::from_form("img.png", &form);
        assert_eq!(record.num_tunnels, NOT_AVAILABLE);
    }

    #[test]
    fn test_row_shape_must_match_schema() {
        let form = FormValues::blank(LedgerSchema::Scalar);
        let record = LabelRecord::from_form("img.png", &form);
        assert!(record.to_row(LedgerSchema::Granular).is_err());
    }
}
