use std::io;

use thiserror::Error;

use crate::domain::parameters::{ParameterError, ParameterSet};

#[derive(Error, Debug)]
pub enum ParametersYamlError {
    #[error("failed to read parameters yaml: {0}")]
    Read(#[from] io::Error),
    #[error("failed to parse parameters yaml: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid parameters: {0}")]
    Invalid(#[from] ParameterError),
}

pub fn load_parameters_from_yaml_file(path: &str) -> Result<ParameterSet, ParametersYamlError> {
    let contents = std::fs::read_to_string(path)?;
    deserialize_parameters_from_yaml_str(&contents)
}

pub fn deserialize_parameters_from_yaml_str(input: &str) -> Result<ParameterSet, ParametersYamlError> {
    let parameters: ParameterSet = serde_yaml::from_str(input)?;
    parameters.validate()?;
    Ok(parameters)
}
