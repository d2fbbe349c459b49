use crate::error::{AppError, Result};
use serde::Serialize;

pub fn serialize_to_json<T: Serialize>(data: &T, pretty: bool) -> Result<String> {
    if pretty {
        serde_json::to_string_pretty(data).map_err(AppError::JsonSerialize)
    } else {
        serde_json::to_string(data).map_err(AppError::JsonSerialize)
    }
}

pub fn serialize_to_yaml<T: Serialize>(data: &T) -> Result<String> {
    serde_yml::to_string(data).map_err(AppError::YamlError)
}

pub fn serialize_to_xml<T: Serialize>(data: &T, root_name: &str) -> Result<String> {
    Ok(quick_xml::se::to_string_with_root(root_name, data)?)
}
