//! Analysis options.

use serde::Deserialize;

fn default_epsilon() -> f64 {
    1e-14
}

fn default_csv_precision() -> usize {
    14
}

fn default_csv_delimiter() -> String {
    ",".to_string()
}

fn default_nodal_displacements_filename() -> String {
    "nodal_displacements.csv".to_string()
}

fn default_nodal_forces_filename() -> String {
    "nodal_forces.csv".to_string()
}

fn default_tie_forces_filename() -> String {
    "tie_forces.csv".to_string()
}

fn default_report_filename() -> String {
    "report.txt".to_string()
}

/// Customization of a finite element analysis.
///
/// The defaults are sensible for most runs; overriding them from the JSON
/// configuration's `options` object is optional. Unknown keys are ignored,
/// mistyped values are configuration errors.
#[derive(Debug, Clone, Deserialize)]
pub struct Options {
    /// Results with a magnitude below `epsilon` are rounded to 0.0.
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,

    /// Decimal places used when saving result CSVs.
    #[serde(default = "default_csv_precision")]
    pub csv_precision: usize,

    /// Delimiter used when saving result CSVs.
    #[serde(default = "default_csv_delimiter")]
    pub csv_delimiter: String,

    /// Save nodal displacements to `nodal_displacements_filename`.
    #[serde(default)]
    pub save_nodal_displacements: bool,

    /// Save nodal forces to `nodal_forces_filename`.
    #[serde(default)]
    pub save_nodal_forces: bool,

    /// Save tie forces to `tie_forces_filename`.
    #[serde(default)]
    pub save_tie_forces: bool,

    /// Report progress and the final summary through the logger.
    #[serde(default)]
    pub verbose: bool,

    /// Save the textual report to `report_filename`.
    #[serde(default)]
    pub save_report: bool,

    /// Output path for nodal displacements.
    #[serde(default = "default_nodal_displacements_filename")]
    pub nodal_displacements_filename: String,

    /// Output path for nodal forces.
    #[serde(default = "default_nodal_forces_filename")]
    pub nodal_forces_filename: String,

    /// Output path for tie forces.
    #[serde(default = "default_tie_forces_filename")]
    pub tie_forces_filename: String,

    /// Output path for the textual report.
    #[serde(default = "default_report_filename")]
    pub report_filename: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            epsilon: default_epsilon(),
            csv_precision: default_csv_precision(),
            csv_delimiter: default_csv_delimiter(),
            save_nodal_displacements: false,
            save_nodal_forces: false,
            save_tie_forces: false,
            verbose: false,
            save_report: false,
            nodal_displacements_filename: default_nodal_displacements_filename(),
            nodal_forces_filename: default_nodal_forces_filename(),
            tie_forces_filename: default_tie_forces_filename(),
            report_filename: default_report_filename(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = Options::default();
        assert_eq!(options.epsilon, 1e-14);
        assert_eq!(options.csv_precision, 14);
        assert_eq!(options.csv_delimiter, ",");
        assert!(!options.save_nodal_displacements);
        assert!(!options.save_nodal_forces);
        assert!(!options.save_tie_forces);
        assert!(!options.verbose);
        assert!(!options.save_report);
        assert_eq!(options.nodal_displacements_filename, "nodal_displacements.csv");
        assert_eq!(options.report_filename, "report.txt");
    }

    #[test]
    fn test_partial_json_overrides() {
        let options: Options =
            serde_json::from_str(r#"{"epsilon": 1e-10, "verbose": true}"#).unwrap();
        assert_eq!(options.epsilon, 1e-10);
        assert!(options.verbose);
        // untouched members keep their defaults
        assert_eq!(options.csv_precision, 14);
        assert_eq!(options.tie_forces_filename, "tie_forces.csv");
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let options: Options = serde_json::from_str(r#"{"frobnicate": 3}"#).unwrap();
        assert_eq!(options.epsilon, 1e-14);
    }

    #[test]
    fn test_mistyped_value_is_an_error() {
        assert!(serde_json::from_str::<Options>(r#"{"epsilon": "tiny"}"#).is_err());
        assert!(serde_json::from_str::<Options>(r#"{"verbose": 1}"#).is_err());
    }
}
