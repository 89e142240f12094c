use std::path::Path;

use resolve::{CollectedParams, ParamValue, ValidatorRegistry};

/// Register the validators for the parameter names the stock catalog
/// declares. Parameter names not listed here accept any input.
pub fn register_defaults(registry: &mut ValidatorRegistry) {
    registry.register("hmm_folder", |raw, _| is_hmm_folder(raw));
    registry.register("completeness_threshold", |raw, _| is_percent(raw));
    registry.register("contamination_threshold", |raw, _| is_percent(raw));
    registry.register("assembly_hmmsearch_output_folder", |raw, collected| {
        is_output_folder(raw, collected)
    });
    registry.register("mags_hmmsearch_output_folder", |raw, collected| {
        is_output_folder(raw, collected)
    });

    // custom-database fields:
    registry.register("custom_db_protein_fasta", |raw, _| is_fasta_file(raw));
    registry.register("custom_db_mapping_file", |raw, _| Path::new(raw).is_file());
    registry.register("custom_db_database_folder", |raw, _| Path::new(raw).is_dir());
    registry.register("custom_db_output_folder", |raw, _| is_creatable_dir(raw));
}

/// A directory holding at least one profile (`.hmm`) file.
fn is_hmm_folder(raw: &str) -> bool {
    let path = Path::new(raw);
    if !path.is_dir() {
        return false;
    }
    match std::fs::read_dir(path) {
        Ok(entries) => entries
            .flatten()
            .any(|e| e.path().extension().is_some_and(|ext| ext == "hmm")),
        Err(_) => false,
    }
}

/// An integer percentage, 0 to 100.
fn is_percent(raw: &str) -> bool {
    raw.parse::<i64>().map(|n| (0..=100).contains(&n)).unwrap_or(false)
}

/// An existing directory, or one whose parent exists so the pipeline can
/// create it. Also accepts a folder that was already named by an earlier
/// answer, so paired search-output parameters can point at one place.
fn is_output_folder(raw: &str, collected: &CollectedParams) -> bool {
    let path = Path::new(raw);
    if path.is_dir() || is_creatable_dir(raw) {
        return true;
    }
    collected
        .iter()
        .any(|(_, v)| matches!(v, ParamValue::Path(p) if p == path))
}

fn is_creatable_dir(raw: &str) -> bool {
    let path = Path::new(raw);
    path.is_dir() || path.parent().is_some_and(Path::is_dir)
}

fn is_fasta_file(raw: &str) -> bool {
    let path = Path::new(raw);
    path.is_file()
        && path
            .extension()
            .is_some_and(|ext| ext == "fa" || ext == "faa" || ext == "fasta")
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_percent_bounds() {
        assert!(is_percent("0"));
        assert!(is_percent("100"));
        assert!(!is_percent("101"));
        assert!(!is_percent("-1"));
        assert!(!is_percent("ninety"));
    }

    #[test]
    fn test_hmm_folder() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        assert!(!is_hmm_folder(dir.path().to_str().unwrap()));
        std::fs::write(dir.path().join("marker.hmm"), "HMMER3/f\n")?;
        assert!(is_hmm_folder(dir.path().to_str().unwrap()));
        assert!(!is_hmm_folder("/no/such/dir"));
        Ok(())
    }

    #[test]
    fn test_fasta_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let fasta = dir.path().join("proteins.faa");
        std::fs::write(&fasta, ">p1\nMKV\n")?;
        assert!(is_fasta_file(fasta.to_str().unwrap()));
        let other = dir.path().join("notes.txt");
        std::fs::write(&other, "")?;
        assert!(!is_fasta_file(other.to_str().unwrap()));
        Ok(())
    }

    #[test]
    fn test_creatable_dir() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let fresh = dir.path().join("new_output");
        assert!(is_creatable_dir(fresh.to_str().unwrap()));
        assert!(!is_creatable_dir("/no/such/parent/child"));
        Ok(())
    }
}
