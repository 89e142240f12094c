use std::collections::VecDeque;

use colored::Colorize;
use rustc_hash::{FxHashMap, FxHashSet};

use catalog::Module;

use crate::ask::Ask;
use crate::graph::{self, DirectedGraph};

/// Label for the synthetic option that prunes a module and everything
/// downstream of it.
pub const SKIP_LABEL: &str = "-- skip this module (and all its successors) --";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("module \"{0}\" is reachable from the start module but missing from the global order")]
    NotInOrder(String),
    #[error("module \"{0}\" has no catalog entry")]
    UnknownModule(String),
    #[error(transparent)]
    Graph(#[from] graph::Error),
    #[error("reading user input")]
    Io(#[from] std::io::Error),
}

/// Options controlling a resolution session.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveOpts {
    /// Restrict the session to the start module alone, instead of
    /// walking everything reachable from it.
    pub single_module: bool,
    /// The module being resolved has already been run upstream, so a
    /// concrete package must be named and no skip option is offered.
    pub dependency_mode: bool,
}

/// Output of a resolution session.
#[derive(Debug)]
pub struct ResolvedPipeline {
    /// module -> chosen package id
    pub choices: FxHashMap<String, String>,
    /// edges of the pruned graph
    pub edges: Vec<(String, String)>,
    /// the working graph after all removals
    pub pruned: DirectedGraph,
    /// global order restricted to chosen modules
    pub write_order: Vec<String>,
    /// modules the user opted out of
    pub skipped: Vec<String>,
}

/// Walks the user through the modules reachable from a start point, in
/// global order, and turns their package picks and skip decisions into a
/// concrete sub-pipeline.
///
/// Holds only borrowed, read-only inputs; every call to [`resolve`]
/// operates on its own private copy of the graph.
///
/// [`resolve`]: Resolver::resolve
pub struct Resolver<'a> {
    graph: &'a DirectedGraph,
    modules: &'a FxHashMap<String, Module>,
    order: &'a [String],
}

impl<'a> Resolver<'a> {
    pub fn new(
        graph: &'a DirectedGraph,
        modules: &'a FxHashMap<String, Module>,
        order: &'a [String],
    ) -> Self {
        Self {
            graph,
            modules,
            order,
        }
    }

    /// Resolve the sub-pipeline rooted at `start`.
    ///
    /// `start` must be a node of the graph; anything else is a caller
    /// bug. Recoverable problems (cycles, modules missing from the order
    /// or the catalog) come back as errors.
    pub fn resolve(
        &self,
        start: &str,
        opts: ResolveOpts,
        ask: &mut dyn Ask,
    ) -> Result<ResolvedPipeline, Error> {
        assert!(
            self.graph.contains(start),
            "start module \"{start}\" is not a node of the dependency graph"
        );
        self.graph.check_acyclic()?;

        // Restrict a working copy to the nodes reachable from `start`.
        let mut working = self.graph.clone();
        let reachable: FxHashSet<String> = working.dfs_preorder(start).into_iter().collect();
        let doomed: Vec<String> = working
            .nodes()
            .filter(|n| !reachable.contains(*n))
            .map(str::to_owned)
            .collect();
        for n in &doomed {
            working.remove_node(n);
        }
        log::debug!(
            "working graph has {} of {} modules (start: {start})",
            working.node_count(),
            self.graph.node_count()
        );

        // Descendant sets, captured before the graph starts shrinking.
        let mut descendants: FxHashMap<String, Vec<String>> = working
            .nodes()
            .map(|m| (m.to_owned(), working.descendants(m)))
            .collect();

        let scope: Vec<String> = if opts.single_module {
            vec![start.to_owned()]
        } else {
            working.bfs_nodes(start)
        };
        for m in &scope {
            if !self.order.contains(m) {
                return Err(Error::NotInOrder(m.clone()));
            }
        }

        // The global order is authoritative for presentation sequence.
        let scope: FxHashSet<&str> = scope.iter().map(String::as_str).collect();
        let mut queue: VecDeque<&String> =
            self.order.iter().filter(|m| scope.contains(m.as_str())).collect();

        let mut choices: FxHashMap<String, String> = FxHashMap::default();
        let mut skipped: Vec<String> = Vec::new();

        while let Some(&module) = queue.front() {
            let meta = self
                .modules
                .get(module)
                .ok_or_else(|| Error::UnknownModule(module.clone()))?;

            let header = format!(
                "{} {}",
                format!("[{}] -", module.to_uppercase()).cyan().bold(),
                meta.description
            );
            let mut options = Vec::with_capacity(meta.choices.len() + 1);
            if !opts.dependency_mode {
                options.push(SKIP_LABEL.to_owned());
            }
            for (display, _) in meta.choices.iter() {
                options.push(display.to_owned());
            }

            let pick = ask.select(&header, &options)?;

            if !opts.dependency_mode && pick == 0 {
                log::info!("skipping module \"{module}\" and all its successors");
                skipped.push(module.clone());
                let desc = descendants.remove(module).unwrap_or_default();
                working.remove_node(module);
                for d in &desc {
                    working.remove_node(d);
                    if let Some(pos) = queue.iter().position(|q| *q == d) {
                        queue.remove(pos);
                    }
                }
                queue.pop_front();
                continue;
            }

            let choice_idx = if opts.dependency_mode { pick } else { pick - 1 };
            // in range: `select` returned an index into `options`
            let (_, package) = meta.choices.get_index(choice_idx).unwrap();
            log::info!("module \"{module}\": using package \"{package}\"");
            choices.insert(module.clone(), package.clone());
            queue.pop_front();
        }

        let write_order: Vec<String> = self
            .order
            .iter()
            .filter(|m| choices.contains_key(*m))
            .cloned()
            .collect();
        let edges = working.edges();

        Ok(ResolvedPipeline {
            choices,
            edges,
            pruned: working,
            write_order,
            skipped,
        })
    }
}
