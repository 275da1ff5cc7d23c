//! Rollback command

use anyhow::Result;
use lu_core::RuntimeConfig;
use lu_update::fs::rollback_temp_path;
use lu_update::{detect_install_mode, InstallRules, Rollback};

use crate::output;

pub fn run(config: &RuntimeConfig) -> Result<()> {
    let mode = detect_install_mode(&InstallRules::with_config(&config.install.managed_paths));
    let rollback = Rollback::for_current_exe(mode)?;

    let outcome = rollback.run().inspect_err(|e| {
        if e.leaves_executable_missing() {
            output::warning(&format!(
                "{} may be missing; the version you were running is at {}",
                rollback.executable().display(),
                rollback_temp_path(rollback.executable()).display()
            ));
        }
    })?;

    output::success("Rolled back to the previous version");
    output::kv("Binary", outcome.executable.display());

    Ok(())
}
