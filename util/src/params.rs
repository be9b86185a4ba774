//! Generic parameters functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::de::DeserializeOwned;
use std::fs::read_to_string;
use std::env::VarError;
use std::path::{Path, PathBuf};
use thiserror::Error;
use toml;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// An error that occurs during loading of a parameter file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("The software root environment variable (PURSUIT_SW_ROOT) is not set")]
    SwRootNotSet,

    #[error("Cannot load the parmeter file: {0}")]
    FileLoadError(std::io::Error),

    #[error("Cannot read the parameter file: {0}")]
    DeserialiseError(toml::de::Error)
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Load a parameter file
///
/// The file path is relative to the "$PURSUIT_SW_ROOT/params" directory
pub fn load<P>(param_file_path: &str) -> Result<P, LoadError> 
where
    P: DeserializeOwned
{
    load_in_root(crate::host::get_sw_root(), param_file_path)
}

/// Load a parameter file from the params directory of the given software
/// root.
fn load_in_root<P>(
    sw_root: Result<PathBuf, VarError>,
    param_file_path: &str
) -> Result<P, LoadError>
where
    P: DeserializeOwned
{
    let mut path = sw_root.map_err(|_| LoadError::SwRootNotSet)?;
    path.push("params");
    path.push(param_file_path);

    load_from(path)
}

/// Load a parameter file from an explicit path, ignoring the software root.
pub fn load_from<P, Q>(path: Q) -> Result<P, LoadError>
where
    P: DeserializeOwned,
    Q: AsRef<Path>
{
    // Load the file into a string
    let params_str = read_to_string(path)
        .map_err(LoadError::FileLoadError)?;

    // Parse the string into the parameter struct
    toml::from_str(params_str.as_str())
        .map_err(LoadError::DeserialiseError)
}

#[cfg(test)]
mod test {
    use super::*;
    use serde::Deserialize;
    use std::io::Write;

    #[derive(Deserialize, Debug)]
    struct TestParams {
        gain: f64,
        name: String
    }

    #[test]
    fn test_load_from() {
        let mut path = std::env::temp_dir();
        path.push(format!("util_params_test_{}.toml", std::process::id()));

        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "gain = 0.5\nname = \"test\"").unwrap();
        drop(file);

        let params: TestParams = load_from(&path).unwrap();
        assert_eq!(params.gain, 0.5);
        assert_eq!(params.name, "test");

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_from_missing_file() {
        let res: Result<TestParams, _> = load_from("/this/file/does/not/exist.toml");
        assert!(matches!(res, Err(LoadError::FileLoadError(_))));
    }

    #[test]
    fn test_load_without_sw_root() {
        let res: Result<TestParams, _> = load_in_root(
            Err(VarError::NotPresent),
            "pure_pursuit.toml"
        );
        assert!(matches!(res, Err(LoadError::SwRootNotSet)));
    }

    #[test]
    fn test_load_in_root() {
        let root = std::env::temp_dir()
            .join(format!("util_params_root_{}", std::process::id()));
        std::fs::create_dir_all(root.join("params")).unwrap();
        std::fs::write(root.join("params").join("test.toml"), "gain = 2.0\nname = \"root\"")
            .unwrap();

        let params: TestParams = load_in_root(Ok(root.clone()), "test.toml").unwrap();
        assert_eq!(params.gain, 2.0);
        assert_eq!(params.name, "root");

        let missing: Result<TestParams, _> = load_in_root(Ok(root.clone()), "missing.toml");
        assert!(matches!(missing, Err(LoadError::FileLoadError(_))));

        std::fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_load_from_bad_toml() {
        let mut path = std::env::temp_dir();
        path.push(format!("util_params_bad_{}.toml", std::process::id()));
        std::fs::write(&path, "gain = \"not a number\"").unwrap();

        let res: Result<TestParams, _> = load_from(&path);
        assert!(matches!(res, Err(LoadError::DeserialiseError(_))));

        std::fs::remove_file(&path).ok();
    }
}
