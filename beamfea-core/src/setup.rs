//! Job construction from a JSON configuration.
//!
//! The configuration is a single JSON object naming the CSV tables of the
//! model and, optionally, an `options` object:
//!
//! ```json
//! {
//!     "nodes": "nodes.csv",
//!     "elems": "elems.csv",
//!     "props": "props.csv",
//!     "bcs": "bcs.csv",
//!     "forces": "forces.csv",
//!     "ties": "ties.csv",
//!     "options": { "epsilon": 1e-12, "verbose": true }
//! }
//! ```
//!
//! `nodes`, `elems` and `props` are required; the rest default to empty.
//! Unknown members are ignored, mistyped values are configuration errors.

use crate::csv;
use crate::error::{Error, Result};
use crate::model::{Dof, Elem, Force, Job, Point3, Props, Tie, BC};
use crate::options::Options;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Parsed JSON configuration: table paths plus analysis options.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Path of the nodal coordinate table (3 columns: x, y, z).
    pub nodes: PathBuf,
    /// Path of the connectivity table (2 columns: n1, n2, zero-based).
    pub elems: PathBuf,
    /// Path of the property table (7 columns, one row per element).
    pub props: PathBuf,
    /// Optional path of the boundary condition table (3 columns).
    pub bcs: Option<PathBuf>,
    /// Optional path of the force table (3 columns).
    pub forces: Option<PathBuf>,
    /// Optional path of the tie table (4 columns).
    pub ties: Option<PathBuf>,
    /// Analysis options; defaults apply for missing members.
    #[serde(default)]
    pub options: Options,
}

/// The model inputs loaded from a configuration.
#[derive(Debug, Clone)]
pub struct ModelInputs {
    /// Mesh and element properties.
    pub job: Job,
    /// Boundary conditions (empty when the table is absent).
    pub bcs: Vec<BC>,
    /// Prescribed forces (empty when the table is absent).
    pub forces: Vec<Force>,
    /// Tie constraints (empty when the table is absent).
    pub ties: Vec<Tie>,
}

/// Parse the JSON configuration file at `path`.
pub fn load_config(path: &Path) -> Result<Config> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        Error::Configuration(format!(
            "cannot open configuration file {}: {e}",
            path.display()
        ))
    })?;
    serde_json::from_str(&text).map_err(|e| {
        Error::Configuration(format!("invalid configuration {}: {e}", path.display()))
    })
}

fn check_columns(name: &Path, row: usize, record: &[f64], expected: usize, what: &str) -> Result<()> {
    if record.len() != expected {
        return Err(Error::InputShape(format!(
            "{}: row {row} does not specify {what}",
            name.display()
        )));
    }
    Ok(())
}

fn as_index(name: &Path, row: usize, value: f64, what: &str) -> Result<usize> {
    if value < 0.0 || value.fract() != 0.0 {
        return Err(Error::InputShape(format!(
            "{}: row {row}: {what} must be a non-negative integer, got {value}",
            name.display()
        )));
    }
    Ok(value as usize)
}

fn as_dof(name: &Path, row: usize, value: f64) -> Result<usize> {
    let index = as_index(name, row, value, "DOF index")?;
    let dof = Dof::try_from(index).map_err(|_| {
        Error::InputShape(format!(
            "{}: row {row}: DOF index {index} out of range 0..6",
            name.display()
        ))
    })?;
    Ok(dof.index())
}

fn load_required(name: &Path) -> Result<Vec<Vec<f64>>> {
    let data = csv::read_table(name)?;
    if data.is_empty() {
        return Err(Error::InputShape(format!(
            "{}: table contains no data",
            name.display()
        )));
    }
    Ok(data)
}

fn load_nodes(path: &Path) -> Result<Vec<Point3>> {
    let rows = load_required(path)?;
    let mut nodes = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        check_columns(path, i, row, 3, "x, y and z coordinates")?;
        nodes.push(Point3::new(row[0], row[1], row[2]));
    }
    Ok(nodes)
}

fn load_elems(elems_path: &Path, props_path: &Path) -> Result<Vec<Elem>> {
    let elem_rows = load_required(elems_path)?;
    let prop_rows = load_required(props_path)?;

    if elem_rows.len() != prop_rows.len() {
        return Err(Error::InputShape(format!(
            "{} has {} rows but {} has {}; the tables are aligned by element",
            elems_path.display(),
            elem_rows.len(),
            props_path.display(),
            prop_rows.len()
        )));
    }

    let mut elems = Vec::with_capacity(elem_rows.len());
    for (i, (elem_row, prop_row)) in elem_rows.iter().zip(&prop_rows).enumerate() {
        check_columns(elems_path, i, elem_row, 2, "2 nodal indices [n1, n2]")?;
        check_columns(
            props_path,
            i,
            prop_row,
            7,
            "the 7 property values [EA, EIz, EIy, GJ, nx, ny, nz]",
        )?;

        let n1 = as_index(elems_path, i, elem_row[0], "node index")?;
        let n2 = as_index(elems_path, i, elem_row[1], "node index")?;
        let props = Props::new(
            prop_row[0],
            prop_row[1],
            prop_row[2],
            prop_row[3],
            Point3::new(prop_row[4], prop_row[5], prop_row[6]),
        );
        elems.push(Elem::new(n1, n2, props));
    }
    Ok(elems)
}

fn load_bcs(path: &Path) -> Result<Vec<BC>> {
    let rows = load_required(path)?;
    let mut bcs = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        check_columns(path, i, row, 3, "[node, DOF, value]")?;
        bcs.push(BC::new(
            as_index(path, i, row[0], "node index")?,
            as_dof(path, i, row[1])?,
            row[2],
        ));
    }
    Ok(bcs)
}

fn load_forces(path: &Path) -> Result<Vec<Force>> {
    let rows = load_required(path)?;
    let mut forces = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        check_columns(path, i, row, 3, "[node, DOF, value]")?;
        forces.push(Force::new(
            as_index(path, i, row[0], "node index")?,
            as_dof(path, i, row[1])?,
            row[2],
        ));
    }
    Ok(forces)
}

fn load_ties(path: &Path) -> Result<Vec<Tie>> {
    let rows = load_required(path)?;
    let mut ties = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        check_columns(path, i, row, 4, "[n1, n2, k_lin, k_rot]")?;
        ties.push(Tie::new(
            as_index(path, i, row[0], "node index")?,
            as_index(path, i, row[1], "node index")?,
            row[2],
            row[3],
        ));
    }
    Ok(ties)
}

/// Load every table the configuration names and build the model inputs.
pub fn load_inputs(config: &Config) -> Result<ModelInputs> {
    let nodes = load_nodes(&config.nodes)?;
    let elems = load_elems(&config.elems, &config.props)?;
    let job = Job::new(nodes, elems)?;

    let bcs = match &config.bcs {
        Some(path) => load_bcs(path)?,
        None => Vec::new(),
    };
    let forces = match &config.forces {
        Some(path) => load_forces(path)?,
        None => Vec::new(),
    };
    let ties = match &config.ties {
        Some(path) => load_ties(path)?,
        None => Vec::new(),
    };

    log::info!(
        "loaded {} nodes, {} elements, {} BCs, {} forces, {} ties",
        job.n_nodes(),
        job.n_elems(),
        bcs.len(),
        forces.len(),
        ties.len()
    );

    Ok(ModelInputs {
        job,
        bcs,
        forces,
        ties,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::fs;

    struct TestDir(PathBuf);

    impl TestDir {
        fn new(tag: &str) -> Self {
            let dir = std::env::temp_dir().join(format!("beamfea-setup-{tag}-{}", std::process::id()));
            fs::create_dir_all(&dir).unwrap();
            Self(dir)
        }

        fn file(&self, name: &str, contents: &str) -> PathBuf {
            let path = self.0.join(name);
            fs::write(&path, contents).unwrap();
            path
        }
    }

    impl Drop for TestDir {
        fn drop(&mut self) {
            fs::remove_dir_all(&self.0).ok();
        }
    }

    fn write_cantilever(dir: &TestDir) -> PathBuf {
        dir.file("nodes.csv", "0,0,0\n1,0,0\n");
        dir.file("elems.csv", "0,1\n");
        dir.file("props.csv", "1,1,1,1,0,0,1\n");
        dir.file(
            "bcs.csv",
            "0,0,0\n0,1,0\n0,2,0\n0,3,0\n0,4,0\n0,5,0\n",
        );
        dir.file("forces.csv", "1,1,0.1\n");
        dir.file(
            "config.json",
            &format!(
                r#"{{
                    "nodes": "{0}/nodes.csv",
                    "elems": "{0}/elems.csv",
                    "props": "{0}/props.csv",
                    "bcs": "{0}/bcs.csv",
                    "forces": "{0}/forces.csv",
                    "options": {{"epsilon": 1e-12}}
                }}"#,
                dir.0.display()
            ),
        )
    }

    #[test]
    fn test_load_full_configuration() {
        let dir = TestDir::new("full");
        let config_path = write_cantilever(&dir);

        let config = load_config(&config_path).unwrap();
        assert_relative_eq!(config.options.epsilon, 1e-12);
        assert!(config.ties.is_none());

        let inputs = load_inputs(&config).unwrap();
        assert_eq!(inputs.job.n_nodes(), 2);
        assert_eq!(inputs.job.n_elems(), 1);
        assert_eq!(inputs.bcs.len(), 6);
        assert_eq!(inputs.forces.len(), 1);
        assert!(inputs.ties.is_empty());
        assert_relative_eq!(inputs.forces[0].value, 0.1);
        assert_relative_eq!(inputs.job.props[0].normal[2], 1.0);
    }

    #[test]
    fn test_missing_required_member() {
        let dir = TestDir::new("missing");
        let path = dir.file("config.json", r#"{"nodes": "nodes.csv"}"#);
        assert!(matches!(load_config(&path), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_mistyped_member() {
        let dir = TestDir::new("mistyped");
        let path = dir.file(
            "config.json",
            r#"{"nodes": 5, "elems": "e.csv", "props": "p.csv"}"#,
        );
        assert!(matches!(load_config(&path), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_unknown_members_are_ignored() {
        let dir = TestDir::new("unknown");
        let path = dir.file(
            "config.json",
            r#"{"nodes": "n.csv", "elems": "e.csv", "props": "p.csv", "plugin": true}"#,
        );
        assert!(load_config(&path).is_ok());
    }

    #[test]
    fn test_wrong_column_count() {
        let dir = TestDir::new("columns");
        let nodes = dir.file("nodes.csv", "0,0\n");
        let result = load_nodes(&nodes);
        assert!(matches!(result, Err(Error::InputShape(_))));
    }

    #[test]
    fn test_elems_props_row_mismatch() {
        let dir = TestDir::new("mismatch");
        let elems = dir.file("elems.csv", "0,1\n1,2\n");
        let props = dir.file("props.csv", "1,1,1,1,0,1,0\n");
        let result = load_elems(&elems, &props);
        assert!(matches!(result, Err(Error::InputShape(_))));
    }

    #[test]
    fn test_fractional_node_index() {
        let dir = TestDir::new("fractional");
        let bcs = dir.file("bcs.csv", "0.5,1,0\n");
        assert!(matches!(load_bcs(&bcs), Err(Error::InputShape(_))));
    }

    #[test]
    fn test_dof_index_out_of_range() {
        let dir = TestDir::new("dofrange");
        let bcs = dir.file("bcs.csv", "0,6,0\n");
        assert!(matches!(load_bcs(&bcs), Err(Error::InputShape(_))));
    }

    #[test]
    fn test_empty_table() {
        let dir = TestDir::new("empty");
        let nodes = dir.file("nodes.csv", "\n");
        assert!(matches!(load_nodes(&nodes), Err(Error::InputShape(_))));
    }
}
