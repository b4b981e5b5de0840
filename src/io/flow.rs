//! Flow survey data: a mapping from sprint name to a raw score in
//! `[0, 100]`, collected outside this tool.

use std::collections::HashMap;
use std::path::Path;

use crate::core::Result;

/// Read the survey map from a JSON object file. A missing file is not an
/// error: the run proceeds without survey data and every flow score is
/// imputed.
pub fn load_flow_data(path: Option<&Path>) -> Result<HashMap<String, f64>> {
    let Some(path) = path else {
        return Ok(HashMap::new());
    };
    if !path.exists() {
        log::warn!("{} not found. Proceeding without survey data.", path.display());
        return Ok(HashMap::new());
    }
    let contents = std::fs::read_to_string(path)?;
    let raw: HashMap<String, f64> = serde_json::from_str(&contents)?;
    Ok(raw
        .into_iter()
        .map(|(sprint, score)| (sprint.trim().to_string(), score))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_yields_empty_map() {
        let map = load_flow_data(Some(Path::new("/nonexistent/flow.json"))).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn sprint_names_are_trimmed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{" Iteration 01.06.25 ": 72.5}"#).unwrap();
        let map = load_flow_data(Some(file.path())).unwrap();
        assert_eq!(map.get("Iteration 01.06.25"), Some(&72.5));
    }
}
