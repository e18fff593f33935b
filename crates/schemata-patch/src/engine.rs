//! The diff-to-patch pipeline.

use tracing::debug;

use schemata_diff::{diff_trees, CoalescedChanges};
use schemata_tree::SchemaTree;

use crate::config::PatchConfig;
use crate::enricher::PatchEnricher;
use crate::error::PatchResult;
use crate::generator::PatchGenerator;
use crate::patch::Patch;

/// Runs collection, coalescing, generation and enrichment.
///
/// The stages are also exposed one by one, so a caller can keep the
/// unenriched patch when enrichment fails.
#[derive(Clone, Debug, Default)]
pub struct SchemaPatcher {
    config: PatchConfig,
}

impl SchemaPatcher {
    pub fn new(config: PatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PatchConfig {
        &self.config
    }

    /// Collect and coalesce the changes between two snapshots.
    pub fn diff(&self, base: &SchemaTree, current: &SchemaTree) -> PatchResult<CoalescedChanges> {
        Ok(diff_trees(base, current)?)
    }

    /// Generate the schema operations for `changes`.
    pub fn generate(
        &self,
        base: &SchemaTree,
        current: &SchemaTree,
        changes: &CoalescedChanges,
    ) -> PatchResult<Patch> {
        let ops = PatchGenerator::new(base, current, changes, &self.config).generate()?;
        Ok(Patch::new(ops))
    }

    /// Append default-value data operations to `patch`.
    pub fn enrich(&self, current: &SchemaTree, mut patch: Patch) -> PatchResult<Patch> {
        let data_ops = PatchEnricher::new(current).enrich(patch.schema_operations())?;
        patch.append_data(data_ops);
        Ok(patch)
    }

    /// Run every stage.
    pub fn compute(&self, base: &SchemaTree, current: &SchemaTree) -> PatchResult<Patch> {
        let changes = self.diff(base, current)?;
        let patch = self.generate(base, current, &changes)?;
        let patch = if self.config.enrich_defaults {
            self.enrich(current, patch)?
        } else {
            patch
        };
        debug!(
            changes = changes.len(),
            schema_ops = patch.schema_operations().len(),
            data_ops = patch.data_operations().len(),
            "computed patch"
        );
        Ok(patch)
    }
}

/// Compute the patch from `base` to `current` with the default configuration.
pub fn compute_patch(base: &SchemaTree, current: &SchemaTree) -> PatchResult<Patch> {
    SchemaPatcher::default().compute(base, current)
}
