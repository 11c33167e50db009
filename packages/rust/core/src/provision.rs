//! End-to-end `create` workflow: create standard, enable every tool,
//! disable info/minor patterns, promote, set as org default.
//!
//! API calls are strictly sequential. A failure configuring one tool is
//! contained (logged and counted); a failure on the standard itself aborts
//! the run. There is no rollback: a mid-sequence abort leaves the remote
//! standard partially configured.

use std::time::{Duration, Instant};

use tracing::{info, instrument, warn};

use standardforge_api::CodacyClient;
use standardforge_shared::{
    Pattern, PatternUpdate, Result, StandardForgeError, StandardId, Tool,
};

/// Largest pattern batch sent in one PATCH; the API rejects oversized
/// payloads.
pub const PATTERN_BATCH_SIZE: usize = 500;

/// Inputs for one provisioning run.
#[derive(Debug, Clone)]
pub struct ProvisionConfig {
    /// Name for the new coding standard.
    pub name: String,
    /// Log intended actions without issuing any mutating call.
    pub dry_run: bool,
}

/// Summary of a completed provisioning run.
#[derive(Debug)]
pub struct ProvisionOutcome {
    /// Identifier of the created standard; `None` under dry-run.
    pub standard_id: Option<StandardId>,
    /// Tools successfully enabled (or that would be, under dry-run).
    pub tools_enabled: usize,
    /// Tools skipped after a contained per-tool failure.
    pub tools_skipped: usize,
    /// Info/minor patterns disabled across all tools.
    pub patterns_disabled: usize,
    /// Total wall-clock time of the run.
    pub elapsed: Duration,
}

/// Progress callback for reporting workflow status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called before each tool is configured.
    fn tool_started(&self, name: &str, current: usize, total: usize);
    /// Called when the workflow completes.
    fn done(&self, outcome: &ProvisionOutcome);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn tool_started(&self, _name: &str, _current: usize, _total: usize) {}
    fn done(&self, _outcome: &ProvisionOutcome) {}
}

/// Run the full provisioning workflow.
///
/// 1. Create the coding standard (draft)
/// 2. Enable every cataloged tool and disable its info/minor patterns
/// 3. Promote the draft
/// 4. Set it as the organization default
///
/// Under dry-run no mutating call is issued; each step logs the action it
/// would have taken. The tool catalog is still fetched so the log names
/// every tool that would be enabled.
#[instrument(skip_all, fields(name = %config.name, dry_run = config.dry_run))]
pub async fn provision(
    client: &CodacyClient,
    config: &ProvisionConfig,
    progress: &dyn ProgressReporter,
) -> Result<ProvisionOutcome> {
    let start = Instant::now();

    let name = config.name.trim();
    if name.is_empty() {
        return Err(StandardForgeError::config(
            "coding standard name must not be empty",
        ));
    }

    progress.phase("Creating coding standard");
    let standard_id = if config.dry_run {
        info!(name, "[dry-run] would create coding standard");
        None
    } else {
        let standard = client.create_coding_standard(name).await?;
        info!(id = %standard.id, name, "created coding standard");
        Some(standard.id)
    };

    progress.phase("Fetching tool catalog");
    let catalog = client.list_tools().await?;
    let tools: Vec<&Tool> = catalog
        .iter()
        .filter(|tool| {
            if tool.is_well_formed() {
                true
            } else {
                warn!(uuid = %tool.uuid, name = %tool.name, "skipping incomplete catalog entry");
                false
            }
        })
        .collect();

    if tools.is_empty() {
        warn!("no tools available, nothing to enable");
    }

    let mut tools_enabled = 0;
    let mut tools_skipped = 0;
    let mut patterns_disabled = 0;

    for (idx, tool) in tools.iter().enumerate() {
        progress.tool_started(&tool.name, idx + 1, tools.len());

        match configure_tool(client, standard_id, tool).await {
            Ok(disabled) => {
                tools_enabled += 1;
                patterns_disabled += disabled;
            }
            Err(e) => {
                warn!(tool = %tool.name, error = %e, "tool configuration failed, continuing");
                tools_skipped += 1;
            }
        }
    }

    progress.phase("Promoting coding standard");
    match standard_id {
        Some(id) => {
            client.promote(id).await?;
            info!(%id, "promoted coding standard");

            client.set_default(id).await?;
            info!(%id, "set as organization default");
        }
        None => {
            info!("[dry-run] would promote coding standard");
            info!("[dry-run] would set coding standard as organization default");
        }
    }

    let outcome = ProvisionOutcome {
        standard_id,
        tools_enabled,
        tools_skipped,
        patterns_disabled,
        elapsed: start.elapsed(),
    };

    info!(
        tools_enabled,
        tools_skipped,
        patterns_disabled,
        elapsed_ms = outcome.elapsed.as_millis(),
        "provisioning complete"
    );
    progress.done(&outcome);

    Ok(outcome)
}

/// Enable one tool and disable its info/minor patterns.
///
/// Returns the number of patterns disabled. `standard_id` is `None` under
/// dry-run: no standard exists remotely, so there are no patterns to
/// inspect; only the intent is logged.
async fn configure_tool(
    client: &CodacyClient,
    standard_id: Option<StandardId>,
    tool: &Tool,
) -> Result<usize> {
    let Some(id) = standard_id else {
        info!(tool = %tool.name, "[dry-run] would enable tool and disable its info/minor patterns");
        return Ok(0);
    };

    client.enable_tool(id, &tool.uuid).await?;
    info!(tool = %tool.name, "enabled tool");

    let patterns = client.list_patterns(id, &tool.uuid).await?;
    let updates = minor_pattern_updates(&patterns);

    if updates.is_empty() {
        return Ok(0);
    }

    for batch in updates.chunks(PATTERN_BATCH_SIZE) {
        client.update_patterns(id, &tool.uuid, batch).await?;
        info!(tool = %tool.name, count = batch.len(), "disabled minor patterns");
    }

    Ok(updates.len())
}

/// Collect the disable payload for every info/minor pattern.
fn minor_pattern_updates(patterns: &[Pattern]) -> Vec<PatternUpdate> {
    patterns
        .iter()
        .filter(|p| p.pattern_definition.is_minor())
        .map(|p| PatternUpdate {
            id: p.pattern_definition.id.clone(),
            enabled: false,
        })
        .collect()
}
