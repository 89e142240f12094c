use std::io;
use std::path::PathBuf;

use colored::Colorize;
use rustc_hash::FxHashMap;

use catalog::{OrderedMap, ParamSpec, ParamType};

use crate::ask::Ask;

/// A collected parameter value, coerced per its declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Integer(i64),
    Text(String),
    Path(PathBuf),
}

/// Parameters collected so far, in collection order. Names are unique;
/// the first module in the write order to declare a name wins.
#[derive(Debug, Default)]
pub struct CollectedParams {
    entries: Vec<(String, ParamValue)>,
}

impl CollectedParams {
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, name: String, value: ParamValue) {
        debug_assert!(!self.contains(&name));
        self.entries.push((name, value));
    }
}

/// Predicate deciding whether a raw input is acceptable for a parameter.
/// Gets the parameters collected so far, for cross-field checks.
pub type Validator = Box<dyn Fn(&str, &CollectedParams) -> bool>;

/// Validators keyed by parameter name. Names with no registered
/// validator accept any input.
#[derive(Default)]
pub struct ValidatorRegistry {
    by_name: FxHashMap<String, Validator>,
}

impl ValidatorRegistry {
    pub fn register<F>(&mut self, name: &str, validator: F)
    where
        F: Fn(&str, &CollectedParams) -> bool + 'static,
    {
        self.by_name.insert(name.to_owned(), Box::new(validator));
    }

    fn check(&self, name: &str, raw: &str, collected: &CollectedParams) -> bool {
        match self.by_name.get(name) {
            Some(validator) => validator(raw, collected),
            None => true,
        }
    }
}

/// Gathers the extra parameters the chosen packages need, prompting and
/// validating one field at a time.
pub struct ParamCollector<'a> {
    validators: &'a ValidatorRegistry,
}

impl<'a> ParamCollector<'a> {
    pub fn new(validators: &'a ValidatorRegistry) -> Self {
        Self { validators }
    }

    /// Collect the additional parameters declared by the modules in
    /// `write_order`, deduplicated by name across modules.
    pub fn collect_additional(
        &self,
        specs: &FxHashMap<String, OrderedMap<ParamSpec>>,
        write_order: &[String],
        ask: &mut dyn Ask,
    ) -> io::Result<CollectedParams> {
        let mut collected = CollectedParams::default();
        for module in write_order {
            let Some(module_specs) = specs.get(module) else {
                continue;
            };
            for (name, spec) in module_specs.iter() {
                if collected.contains(name) {
                    continue;
                }
                let value = self.ask_until_valid(name, spec, &collected, ask)?;
                collected.insert(name.to_owned(), value);
            }
        }
        Ok(collected)
    }

    /// Collect the custom-database fields for every chosen package that
    /// declares them. Prompt order follows the global order of the
    /// modules the packages were chosen for.
    pub fn collect_custom_db(
        &self,
        specs: &FxHashMap<String, OrderedMap<ParamSpec>>,
        choices: &FxHashMap<String, String>,
        order: &[String],
        ask: &mut dyn Ask,
    ) -> io::Result<Vec<(String, CollectedParams)>> {
        let mut out: Vec<(String, CollectedParams)> = Vec::new();
        for module in order {
            let Some(package) = choices.get(module) else {
                continue;
            };
            let Some(package_specs) = specs.get(package) else {
                continue;
            };
            let mut fields = CollectedParams::default();
            for (name, spec) in package_specs.iter() {
                let value = self.ask_until_valid(name, spec, &fields, ask)?;
                fields.insert(name.to_owned(), value);
            }
            // a package chosen for two modules keeps its last answers
            out.retain(|(p, _)| p != package);
            out.push((package.clone(), fields));
        }
        Ok(out)
    }

    /// Prompt for one field until its validator accepts the input and it
    /// coerces cleanly, with no limit on retries.
    fn ask_until_valid(
        &self,
        name: &str,
        spec: &ParamSpec,
        collected: &CollectedParams,
        ask: &mut dyn Ask,
    ) -> io::Result<ParamValue> {
        loop {
            let raw = ask.input(&spec.description)?;
            let raw = raw.trim();
            if !self.validators.check(name, raw, collected) {
                eprintln!("{}: invalid value for \"{name}\"", "ERROR".red());
                continue;
            }
            match coerce(raw, spec.kind) {
                Some(value) => return Ok(value),
                None => {
                    eprintln!("{}: invalid value for \"{name}\"", "ERROR".red());
                }
            }
        }
    }
}

/// Coerce a validated raw value per its declared type. A value that
/// doesn't fit the type (non-numeric integer, empty path) yields `None`
/// so the caller can re-prompt.
fn coerce(raw: &str, kind: ParamType) -> Option<ParamValue> {
    let value = match kind {
        ParamType::Integer => ParamValue::Integer(raw.parse::<i64>().ok()?),
        ParamType::String => ParamValue::Text(raw.to_owned()),
        ParamType::Path => ParamValue::Path(std::path::absolute(raw).ok()?),
    };
    Some(value)
}
