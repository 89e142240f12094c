use std::path::Path;

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::{Error, OrderedMap};

/// One stage of the analysis pipeline, with its interchangeable
/// implementations.
#[derive(Debug, Clone, Deserialize)]
pub struct Module {
    /// Shown to the user when the module comes up for a decision.
    pub description: String,
    /// display label -> package id, in catalog order.
    pub choices: OrderedMap<String>,
}

/// Declared type of an extra parameter; anything that is not an integer
/// or a plain string is a filesystem path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    Integer,
    String,
    Path,
}

/// Spec for one extra parameter a package needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ParamSpec {
    /// Prompt text shown when asking for the value.
    pub description: String,
    #[serde(rename = "type")]
    pub kind: ParamType,
}

/// The whole package catalog, as loaded from `packages.json`.
#[derive(Debug, Deserialize)]
pub struct Catalog {
    /// module id -> module metadata
    pub modules: FxHashMap<String, Module>,
    /// raw dependency edge list; fed to the graph builder unparsed so
    /// malformed edges are reported with their position
    pub graph: Vec<Vec<String>>,
    /// total ordering over all module ids
    pub order: Vec<String>,
    /// module id -> extra parameters its packages need
    #[serde(default)]
    pub additional_input: FxHashMap<String, OrderedMap<ParamSpec>>,
    /// package id -> parameters describing a user-supplied database
    #[serde(default)]
    pub custom_db: FxHashMap<String, OrderedMap<ParamSpec>>,
}

impl Catalog {
    pub fn parse(text: &str) -> Result<Self, Error> {
        let catalog: Catalog = serde_json::from_str(text)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Referential checks: the order and the graph may only name modules
    /// that exist, and every module must have a position in the order.
    fn validate(&self) -> Result<(), Error> {
        for m in &self.order {
            if !self.modules.contains_key(m) {
                return Err(Error::UnknownModuleInOrder(m.clone()));
            }
        }
        for edge in &self.graph {
            // Malformed edges are the graph builder's concern, not ours.
            for endpoint in edge {
                if !self.modules.contains_key(endpoint) {
                    return Err(Error::UnknownModuleInGraph(endpoint.clone()));
                }
            }
        }
        for m in self.modules.keys() {
            if !self.order.contains(m) {
                return Err(Error::ModuleNotInOrder(m.clone()));
            }
        }
        log::debug!(
            "loaded catalog with {} modules and {} edges",
            self.modules.len(),
            self.graph.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const CATALOG: &str = r#"{
        "modules": {
            "read_qc": {
                "description": "Quality control of raw reads",
                "choices": {
                    "fastp": "fastp",
                    "Trim Galore": "trim_galore"
                }
            },
            "assembly": {
                "description": "Assembly of quality-checked reads",
                "choices": {
                    "metaSPAdes": "metaspades"
                }
            }
        },
        "graph": [["read_qc", "assembly"]],
        "order": ["read_qc", "assembly"],
        "additional_input": {
            "assembly": {
                "min_contig_len": {
                    "description": "Minimum contig length to keep",
                    "type": "integer"
                }
            }
        },
        "custom_db": {
            "metaspades": {
                "db_folder": {
                    "description": "Path to the reference database folder",
                    "type": "path"
                }
            }
        }
    }"#;

    #[test]
    fn test_parse_catalog() -> anyhow::Result<()> {
        let catalog = Catalog::parse(CATALOG)?;
        assert_eq!(catalog.modules.len(), 2);
        assert_eq!(catalog.order, vec!["read_qc", "assembly"]);

        let qc = &catalog.modules["read_qc"];
        let choices: Vec<(&str, &String)> = qc.choices.iter().collect();
        assert_eq!(choices[0].0, "fastp");
        assert_eq!(choices[1].1, "trim_galore");

        let spec = catalog.additional_input["assembly"].get("min_contig_len").unwrap();
        assert_eq!(spec.kind, ParamType::Integer);
        let db = catalog.custom_db["metaspades"].get("db_folder").unwrap();
        assert_eq!(db.kind, ParamType::Path);
        Ok(())
    }

    #[test]
    fn test_unknown_module_in_order() {
        let text = r#"{
            "modules": {},
            "graph": [],
            "order": ["ghost"]
        }"#;
        assert!(matches!(
            Catalog::parse(text),
            Err(Error::UnknownModuleInOrder(m)) if m == "ghost"
        ));
    }

    #[test]
    fn test_unknown_module_in_graph() {
        let text = r#"{
            "modules": {
                "read_qc": { "description": "qc", "choices": { "fastp": "fastp" } }
            },
            "graph": [["read_qc", "ghost"]],
            "order": ["read_qc"]
        }"#;
        assert!(matches!(
            Catalog::parse(text),
            Err(Error::UnknownModuleInGraph(m)) if m == "ghost"
        ));
    }

    #[test]
    fn test_module_missing_from_order() {
        let text = r#"{
            "modules": {
                "read_qc": { "description": "qc", "choices": { "fastp": "fastp" } }
            },
            "graph": [],
            "order": []
        }"#;
        assert!(matches!(
            Catalog::parse(text),
            Err(Error::ModuleNotInOrder(m)) if m == "read_qc"
        ));
    }

    #[test]
    fn test_unknown_param_type_is_an_error() {
        let text = r#"{
            "modules": {
                "read_qc": { "description": "qc", "choices": { "fastp": "fastp" } }
            },
            "graph": [],
            "order": ["read_qc"],
            "additional_input": {
                "read_qc": {
                    "x": { "description": "x", "type": "float" }
                }
            }
        }"#;
        assert!(matches!(Catalog::parse(text), Err(Error::Parse(_))));
    }
}
