use std::sync::Arc;

use crate::ctx::Ctx;
use crate::stmt::Stmt;

/// Builds the statement tree for a fresh invocation context.
pub type BuildFn = Arc<dyn Fn(&Ctx) -> Vec<Stmt> + Send + Sync>;

/// A named, reentrant behavior: declared parameters plus a builder that
/// yields its statement tree. Immutable after construction; every
/// invocation (top-level or via `run`) gets its own context, and
/// parameters are copied explicitly rather than lexically shared.
#[derive(Clone)]
pub struct Activity {
    name: String,
    in_params: Vec<String>,
    inout_params: Vec<String>,
    build: BuildFn,
}

impl Activity {
    pub fn new(
        name: &str,
        in_params: &[&str],
        inout_params: &[&str],
        build: impl Fn(&Ctx) -> Vec<Stmt> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.to_string(),
            in_params: in_params.iter().map(|p| p.to_string()).collect(),
            inout_params: inout_params.iter().map(|p| p.to_string()).collect(),
            build: Arc::new(build),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn in_params(&self) -> &[String] {
        &self.in_params
    }

    pub fn inout_params(&self) -> &[String] {
        &self.inout_params
    }

    pub fn make_stmts(&self, ctx: &Ctx) -> Vec<Stmt> {
        (self.build)(ctx)
    }
}

/// An ordered list of activities plus imported modules.
///
/// Lookup is depth-first by name: own activities first, then each import
/// in declaration order. First match wins.
#[derive(Clone, Default)]
pub struct Module {
    activities: Vec<Activity>,
    imports: Vec<Module>,
}

impl Module {
    pub fn new(activities: Vec<Activity>) -> Self {
        Self {
            activities,
            imports: Vec::new(),
        }
    }

    pub fn with_imports(activities: Vec<Activity>, imports: Vec<Module>) -> Self {
        Self {
            activities,
            imports,
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&Activity> {
        if let Some(act) = self.activities.iter().find(|a| a.name() == name) {
            return Some(act);
        }
        self.imports.iter().find_map(|m| m.lookup(name))
    }
}
