use std::{collections::BTreeSet, fmt};

use pumpkin_util::ResourceLocation;

use super::{
    context::{ElementKind, param_set::LootContextParamSet},
    registry::LootDataResolver,
};

/// A single finding of a validation pass, located by a JSON-path-like string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Problem {
    pub path: String,
    pub message: String,
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

#[derive(Debug, Default)]
pub struct ProblemReporter {
    problems: Vec<Problem>,
}

impl ProblemReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, path: &str, message: impl Into<String>) {
        self.problems.push(Problem {
            path: path.to_string(),
            message: message.into(),
        });
    }

    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    pub fn into_problems(self) -> Vec<Problem> {
        self.problems
    }
}

/// Walks a loot structure collecting problems. Never stops at the first one.
pub struct ValidationContext<'v> {
    reporter: &'v mut ProblemReporter,
    path: String,
    params: &'v LootContextParamSet,
    resolver: Option<&'v dyn LootDataResolver>,
    visited: Vec<(ElementKind, ResourceLocation)>,
}

impl<'v> ValidationContext<'v> {
    pub fn new(
        reporter: &'v mut ProblemReporter,
        path: &str,
        params: &'v LootContextParamSet,
        resolver: Option<&'v dyn LootDataResolver>,
    ) -> Self {
        Self {
            reporter,
            path: path.to_string(),
            params,
            resolver,
            visited: Vec::new(),
        }
    }

    pub fn for_child(&mut self, name: &str) -> ValidationContext<'_> {
        ValidationContext {
            reporter: &mut *self.reporter,
            path: format!("{}{name}", self.path),
            params: self.params,
            resolver: self.resolver,
            visited: self.visited.clone(),
        }
    }

    /// Descends into a referenced element, remembering it so that cycles can be reported.
    pub fn enter_element(
        &mut self,
        name: &str,
        kind: ElementKind,
        id: &ResourceLocation,
    ) -> ValidationContext<'_> {
        let mut child = self.for_child(name);
        child.visited.push((kind, id.clone()));
        child
    }

    pub fn has_visited(&self, kind: ElementKind, id: &ResourceLocation) -> bool {
        self.visited
            .iter()
            .any(|(visited_kind, visited)| *visited_kind == kind && visited == id)
    }

    pub fn report(&mut self, message: impl Into<String>) {
        self.reporter.report(&self.path, message);
    }

    /// Reports parameters that are read but not available to the table being validated.
    pub fn validate_context_usage(&mut self, referenced: &BTreeSet<&'static str>) {
        let missing: Vec<_> = referenced
            .iter()
            .filter(|param| !self.params.is_allowed(param))
            .copied()
            .collect();
        if !missing.is_empty() {
            self.report(format!(
                "Parameters [{}] are not provided in this context",
                missing.join(", ")
            ));
        }
    }

    pub fn params(&self) -> &'v LootContextParamSet {
        self.params
    }

    pub fn resolver(&self) -> Option<&'v dyn LootDataResolver> {
        self.resolver
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}
