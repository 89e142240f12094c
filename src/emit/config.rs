use std::path::Path;

use serde_yaml::{Mapping, Value};

use resolve::{CollectedParams, ParamValue, ResolvedPipeline};

use crate::fs::Fs;
use crate::setup::Setup;

/// Everything the configuration file is composed from.
pub struct ConfigInputs<'a> {
    pub setup: &'a Setup,
    pub threads: usize,
    pub resolved: &'a ResolvedPipeline,
    pub params: &'a CollectedParams,
    /// package id -> custom-database fields; only the unit command
    /// collects these
    pub custom_db: Option<&'a [(String, CollectedParams)]>,
}

/// Compose the configuration mapping. Key order is meaningful: modules
/// appear in write order, parameters in collection order.
pub fn compose_config(fs: &Fs, inputs: &ConfigInputs) -> Mapping {
    let mut map = Mapping::new();
    map.insert("work_dir".into(), path_value(&inputs.setup.work_dir));
    map.insert(
        "samples".into(),
        Value::Sequence(
            inputs
                .setup
                .samples
                .iter()
                .map(|s| Value::from(s.as_str()))
                .collect(),
        ),
    );
    map.insert("threads".into(), Value::from(inputs.threads as u64));
    map.insert("user_parameters_dir".into(), path_value(&fs.user_parameters_dir()));
    map.insert("external_db_dir".into(), path_value(&fs.external_db_dir()));

    let mut modules = Mapping::new();
    for module in &inputs.resolved.write_order {
        let package = &inputs.resolved.choices[module];
        modules.insert(Value::from(module.as_str()), Value::from(package.as_str()));
    }
    map.insert("modules".into(), Value::Mapping(modules));

    let mut additional = Mapping::new();
    for (name, value) in inputs.params.iter() {
        additional.insert(Value::from(name), param_value(value));
    }
    map.insert("additional_parameters".into(), Value::Mapping(additional));

    if let Some(custom_db) = inputs.custom_db {
        let mut dbs = Mapping::new();
        for (package, fields) in custom_db {
            let mut entry = Mapping::new();
            for (name, value) in fields.iter() {
                entry.insert(Value::from(name), param_value(value));
            }
            dbs.insert(Value::from(package.as_str()), Value::Mapping(entry));
        }
        map.insert("custom_db".into(), Value::Mapping(dbs));
    }

    map.insert(
        "skipped_modules".into(),
        Value::Sequence(
            inputs
                .resolved
                .skipped
                .iter()
                .map(|m| Value::from(m.as_str()))
                .collect(),
        ),
    );
    map
}

fn param_value(value: &ParamValue) -> Value {
    match value {
        ParamValue::Integer(n) => Value::from(*n),
        ParamValue::Text(s) => Value::from(s.as_str()),
        ParamValue::Path(p) => path_value(p),
    }
}

fn path_value(path: &Path) -> Value {
    Value::from(path.to_string_lossy().into_owned())
}
