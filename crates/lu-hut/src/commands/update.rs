//! Update command

use anyhow::{anyhow, Result};
use lu_core::RuntimeConfig;
use lu_update::{
    current_version, detect_install_mode, find_asset_url, is_newer_version, BinaryDownloader,
    InstallMode, InstallRules, Installer, Platform, ReleaseManager, UpdateError,
};

use crate::cli::UpdateArgs;
use crate::output;

/// What to do once the latest release is known
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    /// Nothing newer and no reinstall requested
    UpToDate,
    /// A newer release exists but only a check was requested
    Available,
    /// Download and install the release
    Install,
}

fn decide(current: &str, latest: &str, args: &UpdateArgs) -> Action {
    let newer = is_newer_version(current, latest);
    match (args.check, newer, args.force) {
        (true, true, _) => Action::Available,
        (true, false, _) => Action::UpToDate,
        (false, true, _) | (false, false, true) => Action::Install,
        (false, false, false) => Action::UpToDate,
    }
}

pub async fn run(args: UpdateArgs, config: &RuntimeConfig) -> Result<()> {
    let rules = InstallRules::with_config(&config.install.managed_paths);
    if let InstallMode::Managed {
        manager,
        upgrade_command,
        ..
    } = detect_install_mode(&rules)
    {
        output::warning(&format!(
            "lu was installed with {manager}; self-update is disabled"
        ));
        output::info(&format!("Run '{upgrade_command}' to upgrade"));
        return Ok(());
    }

    let platform = Platform::current().ok_or_else(|| {
        anyhow!(
            "no lu-hut build is published for {}/{}",
            std::env::consts::OS,
            std::env::consts::ARCH
        )
    })?;

    let current = current_version();
    output::info(&format!("Current version: {}", current));

    let manager = ReleaseManager::new(config.github.clone(), &config.network)?;
    let spinner = output::spinner("Checking for updates...");
    let release = manager.get_latest().await;
    spinner.finish_and_clear();
    let release = release?;

    match decide(current, &release.tag_name, &args) {
        Action::UpToDate => {
            output::success(&format!("Already up to date ({})", current));
            return Ok(());
        }
        Action::Available => {
            output::success(&format!("Update available: {}", release.tag_name));
            output::info("Run 'lu update' to install it");
            return Ok(());
        }
        Action::Install => {}
    }

    let url = find_asset_url(&release, &platform)?;
    let downloader = BinaryDownloader::new(&config.network)?;
    let installer = Installer::for_current_exe()?;

    let spinner = output::spinner(&format!("Downloading {}...", release.tag_name));
    let image = downloader.fetch_executable_image(&url).await;
    spinner.finish_and_clear();
    let image = image?;

    let outcome = installer.install(image).inspect_err(|e| {
        if e.leaves_executable_missing() {
            restore_hint(e, &installer);
        }
    })?;

    output::success(&format!(
        "Updated lu-hut {} → {}",
        current, release.tag_name
    ));
    output::kv("Binary", outcome.executable.display());
    output::kv("Backup", outcome.backup.display());
    output::info("Run 'lu rollback' to restore the previous version");

    Ok(())
}

fn restore_hint(e: &UpdateError, installer: &Installer) {
    output::warning(&format!(
        "{} may be missing; restore it with: mv {} {}",
        installer.executable().display(),
        installer.backup_path().display(),
        installer.executable().display()
    ));
    tracing::error!(error = %e, "update left no binary in place");
}
