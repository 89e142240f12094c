use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;

use catalog::Catalog;
use resolve::{
    Ask, DirectedGraph, ParamCollector, ResolveOpts, ResolvedPipeline, Resolver, ValidatorRegistry,
};

use crate::args::Command;
use crate::emit::{self, ConfigInputs};
use crate::fs::Fs;
use crate::settings::Settings;
use crate::setup::Setup;
use crate::slurm::{self, SlurmOpts};
use crate::validators;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("module \"{0}\" is not a node of the dependency graph")]
    UnknownModule(String),
    #[error("catalog order is empty, nothing to configure")]
    EmptyCatalog,
}

/// This struct actually runs the command-line app.
pub struct App {
    /// Interpreted command line settings
    settings: Settings,
}

impl App {
    /// Create a new `App`.
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Run the app. All questions go through `ask`, so a scripted
    /// responder can drive a whole session.
    pub fn run(self, ask: &mut dyn Ask) -> Result<()> {
        let setup = Setup::load(&self.settings.setup)
            .with_context(|| format!("loading setup file {:?}", self.settings.setup))?;

        match &self.settings.cmd {
            Command::Workflow { from, threads } => {
                self.run_workflow(&setup, from.clone(), *threads, ask)
            }
            Command::Unit { module, threads } => {
                self.run_unit(&setup, module.clone(), *threads, ask)
            }
            Command::Slurm {
                unit,
                threads,
                memory,
                partition,
                mail_type,
                mail_user,
                log_dir,
                output_script,
                db_output_script,
                sample_list,
            } => {
                let opts = SlurmOpts {
                    unit: *unit,
                    threads: *threads,
                    memory_gb: *memory,
                    partition: partition.clone(),
                    mail_type: mail_type.clone(),
                    mail_user: mail_user.clone(),
                    log_dir: log_dir.clone().map(PathBuf::from),
                    output_script: PathBuf::from(output_script),
                    db_output_script: PathBuf::from(db_output_script),
                    sample_list: PathBuf::from(sample_list),
                };
                self.run_slurm(&setup, opts)
            }
        }
    }

    fn load_catalog(&self) -> Result<Catalog> {
        let catalog = Catalog::from_file(&self.settings.catalog)
            .with_context(|| format!("loading catalog {:?}", self.settings.catalog))?;
        Ok(catalog)
    }

    /// Configure the full pipeline from `from` (or the first module of
    /// the catalog order) and emit config.yaml + pipeline.smk.
    fn run_workflow(
        &self,
        setup: &Setup,
        from: Option<String>,
        threads: usize,
        ask: &mut dyn Ask,
    ) -> Result<()> {
        let catalog = self.load_catalog()?;
        let graph = DirectedGraph::from_edges(&catalog.graph).context("building module graph")?;
        let start = match from {
            Some(module) => module,
            None => catalog.order.first().ok_or(Error::EmptyCatalog)?.clone(),
        };
        if !graph.contains(&start) {
            return Err(Error::UnknownModule(start).into());
        }

        let resolver = Resolver::new(&graph, &catalog.modules, &catalog.order);
        let resolved = resolver
            .resolve(&start, ResolveOpts::default(), ask)
            .context("resolving the pipeline")?;
        log::debug!(
            "resolved {} modules, {} skipped",
            resolved.choices.len(),
            resolved.skipped.len()
        );

        let params = self
            .collect_params(&catalog, &resolved, ask)
            .context("collecting additional parameters")?;

        self.emit(setup, threads, &resolved, &params, None, false)
    }

    /// Configure `module` alone, confirming the packages its direct
    /// dependencies were already run with, and emit config_unit.yaml +
    /// pipeline_unit.smk.
    fn run_unit(
        &self,
        setup: &Setup,
        module: String,
        threads: usize,
        ask: &mut dyn Ask,
    ) -> Result<()> {
        let catalog = self.load_catalog()?;
        let graph = DirectedGraph::from_edges(&catalog.graph).context("building module graph")?;
        if !graph.contains(&module) {
            return Err(Error::UnknownModule(module).into());
        }

        let resolver = Resolver::new(&graph, &catalog.modules, &catalog.order);
        let opts = ResolveOpts {
            single_module: true,
            ..Default::default()
        };
        let mut resolved = resolver
            .resolve(&module, opts, ask)
            .context("resolving the module")?;

        // the module's inputs come from stages that were already run;
        // ask which packages produced them
        let dependencies = graph.predecessors(&module);
        if !dependencies.is_empty() {
            eprintln!(
                "{} \"{module}\" reads the output of {} already-run module(s):",
                "NOTE:".yellow(),
                dependencies.len()
            );
            for dep in &dependencies {
                eprintln!("\t- {dep}");
            }
            eprintln!("Specify the package each of them was run with.\n");
        }
        let dep_opts = ResolveOpts {
            single_module: true,
            dependency_mode: true,
        };
        for dep in dependencies {
            let dep_resolved = resolver
                .resolve(dep, dep_opts, ask)
                .with_context(|| format!("resolving dependency \"{dep}\""))?;
            resolved.choices.extend(dep_resolved.choices);
        }

        let params = self
            .collect_params(&catalog, &resolved, ask)
            .context("collecting additional parameters")?;

        let registry = self.registry();
        let collector = ParamCollector::new(&registry);
        let custom_db = collector
            .collect_custom_db(&catalog.custom_db, &resolved.choices, &catalog.order, ask)
            .context("collecting custom database parameters")?;

        self.emit(setup, threads, &resolved, &params, Some(&custom_db), true)
    }

    /// Generate the scheduler submission scripts for an already-emitted
    /// configuration.
    fn run_slurm(&self, setup: &Setup, opts: SlurmOpts) -> Result<()> {
        let fs = Fs::new(&setup.work_dir);
        slurm::update_threads(&fs.config_path(opts.unit), opts.threads)?;

        let sample_list = std::path::absolute(&opts.sample_list)?;
        std::fs::write(&sample_list, slurm::render_sample_list(&setup.samples))
            .with_context(|| format!("writing sample list {sample_list:?}"))?;

        let opts = SlurmOpts {
            sample_list,
            ..opts
        };
        let pipeline = fs.pipeline_path(opts.unit);

        let output_script = std::path::absolute(&opts.output_script)?;
        std::fs::write(
            &output_script,
            slurm::render_pipeline_script(&opts, setup.samples.len(), &pipeline),
        )
        .with_context(|| format!("writing submission script {output_script:?}"))?;

        let db_output_script = std::path::absolute(&opts.db_output_script)?;
        std::fs::write(&db_output_script, slurm::render_db_script(&opts, &pipeline))
            .with_context(|| format!("writing database-setup script {db_output_script:?}"))?;

        eprintln!(
            "{} submission scripts written to {output_script:?} and {db_output_script:?}",
            "OK:".green()
        );
        Ok(())
    }

    fn registry(&self) -> ValidatorRegistry {
        let mut registry = ValidatorRegistry::default();
        validators::register_defaults(&mut registry);
        registry
    }

    fn collect_params(
        &self,
        catalog: &Catalog,
        resolved: &ResolvedPipeline,
        ask: &mut dyn Ask,
    ) -> Result<resolve::CollectedParams> {
        let registry = self.registry();
        let collector = ParamCollector::new(&registry);
        let params =
            collector.collect_additional(&catalog.additional_input, &resolved.write_order, ask)?;
        Ok(params)
    }

    fn emit(
        &self,
        setup: &Setup,
        threads: usize,
        resolved: &ResolvedPipeline,
        params: &resolve::CollectedParams,
        custom_db: Option<&[(String, resolve::CollectedParams)]>,
        unit: bool,
    ) -> Result<()> {
        let fs = Fs::new(&setup.work_dir);
        fs.ensure_layout()?;

        let inputs = ConfigInputs {
            setup,
            threads,
            resolved,
            params,
            custom_db,
        };
        let config = emit::compose_config(&fs, &inputs);
        emit::write_artifacts(&fs, &config, resolved, unit)
            .context("writing configuration artifacts")?;

        eprintln!(
            "{} configuration written to {:?}",
            "OK:".green(),
            fs.config_path(unit)
        );
        Ok(())
    }
}
