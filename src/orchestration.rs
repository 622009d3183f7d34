//! Main bump workflow orchestration logic
//!
//! Ties the configured scheme, the rule engine and a [VersionSource] together. The CLI is a
//! thin layer over [Bumper]; the same workflow can be driven programmatically or against a
//! [MockSource](crate::source::MockSource) in tests.

use crate::config::Config;
use crate::domain::{apply_rules, matching_rules, BumpRule, Trigger, VersionMap};
use crate::error::Result;
use crate::resolver::{resolve_version, ResolvedVersion};
use crate::scheme::{CompiledScheme, SchemeCompiler};
use crate::source::{VersionFileRef, VersionSource};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The computed change for one trigger, before anything is written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BumpPlan {
    /// The decorated version currently in the version file
    pub current: ResolvedVersion,
    /// The decorated version that will replace it
    pub next: String,
    /// Rules that matched, in declaration order
    pub applied: Vec<BumpRule>,
}

impl BumpPlan {
    /// Whether applying the plan would leave the version untouched
    pub fn is_noop(&self) -> bool {
        self.current.to_string() == self.next
    }
}

/// Version bump workflow over a configuration and a version source
pub struct Bumper<S: VersionSource> {
    config: Config,
    scheme: Arc<CompiledScheme>,
    source: S,
}

impl<S: VersionSource> Bumper<S> {
    /// Create a bumper, compiling the configured scheme
    ///
    /// # Errors
    /// Fails if the scheme cannot be resolved or compiled, or if a rule names an unknown field.
    pub fn new(config: Config, source: S) -> Result<Self> {
        Self::with_compiler(config, source, &mut SchemeCompiler::new())
    }

    /// Like [Bumper::new], reusing schemes already compiled by `compiler`
    pub fn with_compiler(config: Config, source: S, compiler: &mut SchemeCompiler) -> Result<Self> {
        let scheme = compiler.compile(config.scheme_definition()?)?;
        config.validate_rules(scheme.grammar())?;
        Ok(Bumper {
            config,
            scheme,
            source,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn scheme(&self) -> &CompiledScheme {
        &self.scheme
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn resolve_in(&self, file: &VersionFileRef) -> Result<(String, ResolvedVersion)> {
        let text = self.source.read(file)?;
        let resolved = resolve_version(&text, &self.scheme, &self.config.rules)?;
        Ok((text, resolved))
    }

    /// The decorated version found in the version file
    pub fn current_version(&self) -> Result<ResolvedVersion> {
        let (_, resolved) = self.resolve_in(&self.config.version_file)?;
        Ok(resolved)
    }

    /// Split an undecorated literal into field values
    pub fn version_map(&self, literal: &str) -> Result<VersionMap> {
        VersionMap::encode(literal, &self.scheme)
    }

    /// Render field values as a literal of the configured scheme
    pub fn version_to_string(&self, map: &VersionMap) -> String {
        map.decode(self.scheme.grammar())
    }

    /// Compute the next version for `trigger` on `branch` without writing anything.
    ///
    /// Decorations on the current version are not carried over; only those set by the
    /// matching rules appear on the next version.
    pub fn plan(&self, trigger: Trigger, branch: &str) -> Result<BumpPlan> {
        let current = self.current_version()?;
        let map = self.version_map(&current.core)?;

        let selected = matching_rules(&self.config.rules, trigger, branch);
        if selected.is_empty() {
            debug!(%trigger, branch, "no rule matches");
        }
        let outcome = apply_rules(map, self.scheme.grammar(), &selected)?;
        let next = outcome.render(self.scheme.grammar());

        debug!(current = %current, %next, rules = selected.len(), "planned bump");
        Ok(BumpPlan {
            current,
            next,
            applied: selected.into_iter().cloned().collect(),
        })
    }

    /// The next version for `trigger` on `branch`
    pub fn bump_version(&self, trigger: Trigger, branch: &str) -> Result<String> {
        Ok(self.plan(trigger, branch)?.next)
    }

    /// Write the planned version to the version file, then to each extra file in turn.
    ///
    /// Each file is resolved on its own, so its literal may sit at a different position or
    /// carry different decorations. Files already written stay written if a later one fails.
    ///
    /// # Returns
    /// Paths of the files that were rewritten
    pub fn apply(&self, plan: &BumpPlan) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(1 + self.config.files.len());
        let targets = std::iter::once(&self.config.version_file).chain(&self.config.files);

        for file in targets {
            let (text, resolved) = self.resolve_in(file).map_err(|e| {
                warn!(path = %file.path.display(), error = %e, "cannot locate version");
                e
            })?;

            let mut updated = String::with_capacity(text.len() + plan.next.len());
            updated.push_str(&text[..resolved.span.start]);
            updated.push_str(&plan.next);
            updated.push_str(&text[resolved.span.end..]);

            self.source.write(file, &updated)?;
            info!(
                path = %file.path.display(),
                from = %resolved,
                to = %plan.next,
                "updated version"
            );
            written.push(file.path.clone());
        }
        Ok(written)
    }
}
