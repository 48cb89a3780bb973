//! Sectioned document loader. A document holds uppercase headers, each followed by a JSON body:
//!
//! ```text
//! SETTINGS
//! {"moments": {"tracked": ["He", "V"]}, "grid_points": 4}
//! NETWORK
//! {"clusters": [...], "production": [...], "contributions": [...]}
//! ```
//! A section ends at the next non-empty line made only of uppercase letters and underscores.

use crate::ReactionNetwork::description::NetworkDescription;
use crate::ReactionNetwork::network::ReactionNetwork;
use crate::ReactionNetwork::network_error::NetworkError;
use crate::settings::NetworkSettings;
use log::{error, info, warn};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

pub const SETTINGS_HEADER: &str = "SETTINGS";
pub const NETWORK_HEADER: &str = "NETWORK";

pub struct LoadData {
    pub file_name: String,
}

impl LoadData {
    pub fn new(file_name: String) -> Self {
        LoadData { file_name }
    }
    pub fn load_settings(&self) -> Result<NetworkSettings, NetworkError> {
        load_settings(&self.file_name)
    }
    pub fn load_description(&self) -> Result<NetworkDescription, NetworkError> {
        load_section(&self.file_name, NETWORK_HEADER)
    }
    pub fn load_network(&self) -> Result<ReactionNetwork, NetworkError> {
        load_network(&self.file_name)
    }
}

fn read_lines(file_name: &str) -> Result<Vec<String>, NetworkError> {
    let path = Path::new(file_name);
    if !path.exists() {
        return Err(NetworkError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("File '{}' does not exist", file_name),
        )));
    }
    let reader = BufReader::new(File::open(path)?);
    Ok(reader.lines().map_while(Result::ok).collect())
}

fn is_header(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && trimmed.chars().all(|c| c.is_uppercase() || c == '_')
}

/// Parses the JSON body under `header` (case-insensitive). Parse errors are logged with the file
/// line and a pointer to the offending column.
pub fn parse_section<T: DeserializeOwned>(lines: &[String], header: &str) -> Result<T, NetworkError> {
    let start_index = lines
        .iter()
        .position(|line| line.trim().to_uppercase() == header)
        .map(|i| i + 1)
        .ok_or_else(|| NetworkError::MissingSection(header.to_string()))?;

    let end_index = (start_index..lines.len())
        .find(|i| is_header(&lines[*i]))
        .unwrap_or(lines.len());

    let section = lines[start_index..end_index].join("\n");
    match serde_json::from_str::<T>(&section) {
        Ok(data) => Ok(data),
        Err(e) => {
            let error_line = e.line();
            let error_column = e.column();
            let actual_line = start_index + error_line.saturating_sub(1);
            error!(
                "Error parsing section {} at line {}, column {} (line {} in file): {}",
                header,
                error_line,
                error_column,
                actual_line + 1,
                e
            );
            if let Some(problem_line) = lines.get(actual_line) {
                error!("Problematic line: {}", problem_line);
                if error_column >= 1 && error_column <= problem_line.len() {
                    error!("{}", " ".repeat(error_column - 1) + "^");
                }
            }
            Err(NetworkError::Json(e))
        }
    }
}

pub fn load_section<T: DeserializeOwned>(file_name: &str, header: &str) -> Result<T, NetworkError> {
    let lines = read_lines(file_name)?;
    let data = parse_section(&lines, header)?;
    info!("Successfully parsed section {} from file '{}'", header, file_name);
    Ok(data)
}

pub fn load_settings(file_name: &str) -> Result<NetworkSettings, NetworkError> {
    let settings: NetworkSettings = load_section(file_name, SETTINGS_HEADER)?;
    settings.validate()?;
    Ok(settings)
}

/// Settings and description from one document, replayed into a frozen network.
pub fn load_network(file_name: &str) -> Result<ReactionNetwork, NetworkError> {
    let lines = read_lines(file_name)?;
    let settings: NetworkSettings = parse_section(&lines, SETTINGS_HEADER)?;
    let description: NetworkDescription = parse_section(&lines, NETWORK_HEADER)?;
    if description.contributions.is_empty() {
        warn!("Network description in '{}' has no coefficient contributions", file_name);
    }
    description.build(settings)
}
