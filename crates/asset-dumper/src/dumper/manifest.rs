//! The manifest summarizing one run

use serde::{Deserialize, Serialize};

use crate::dumper::core::{AssetRecord, DumpSummary, Result};

/// `{ "assets": [...] }`, one record per requested id in request order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub assets: Vec<AssetRecord>,
}

impl Manifest {
    pub fn new(assets: Vec<AssetRecord>) -> Self {
        Self { assets }
    }

    /// Serialize with 2-space indentation
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn summary(&self) -> DumpSummary {
        DumpSummary::from_records(&self.assets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_json_layout() {
        let manifest = Manifest::new(vec![AssetRecord {
            name: "Logo".to_string(),
            id: 1,
            filename: "1.png".to_string(),
            type_id: 1,
            success: true,
        }]);

        let expected = r#"{
  "assets": [
    {
      "name": "Logo",
      "id": 1,
      "filename": "1.png",
      "type_id": 1,
      "success": true
    }
  ]
}"#;
        assert_eq!(manifest.to_json().unwrap(), expected);
    }

    #[test]
    fn test_empty_manifest() {
        let manifest = Manifest::new(Vec::new());
        assert_eq!(manifest.to_json().unwrap(), "{\n  \"assets\": []\n}");
        assert_eq!(manifest.summary().total, 0);
    }
}
