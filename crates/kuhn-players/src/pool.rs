use kuhn_cards::Variant;
use kuhn_core::ID;
use std::path::{Path, PathBuf};

/// A discovered bot executable: one subfolder of the bot folder containing
/// a launcher entrypoint, paired with the token that identifies it as a
/// bot Player for the duration of the process.
#[derive(Debug, Clone)]
pub struct BotLauncher {
    pub name: String,
    pub path: PathBuf,
    pub token: String,
}

/// Scans `folder` once, collecting one launcher per subfolder that
/// contains `entrypoint`. Callers discover bots once at boot and keep the
/// result as an immutable list for the lifetime of the process.
pub fn discover_bots(folder: &str, entrypoint: &str) -> Vec<BotLauncher> {
    let root = Path::new(folder);
    let Ok(entries) = std::fs::read_dir(root) else {
        log::warn!("bot folder {folder} not found, no bots discovered");
        return Vec::new();
    };
    let mut bots = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let launcher = path.join(entrypoint);
        if launcher.exists() {
            let name = entry.file_name().to_string_lossy().into_owned();
            let token = ID::<BotLauncher>::default().inner().to_string();
            bots.push(BotLauncher { name, path: launcher, token });
        }
    }
    log::info!("discovered {} bot(s) under {folder}", bots.len());
    bots
}

/// Spawns `launcher` against `session_id`/`variant` and waits for it to
/// exit, mirroring the reference coordinator's
/// `subprocess.run(['python', bot_exec, '--play', id, '--token', token, '--cards', type], check=True)`.
pub async fn spawn(launcher: &BotLauncher, session_id: &str, variant: Variant) -> anyhow::Result<()> {
    let output = tokio::process::Command::new(&launcher.path)
        .args(["--play", session_id, "--token", &launcher.token, "--cards", variant.card_count()])
        .output()
        .await
        .map_err(|e| anyhow::anyhow!("failed to spawn bot {}: {e}", launcher.name))?;
    if !output.status.success() {
        anyhow::bail!(
            "bot {} exited with {}: {}",
            launcher.name,
            output.status,
            String::from_utf8_lossy(&output.stderr)
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// a nonexistent bot folder yields an empty, not panicking, bot list
    #[test]
    fn missing_folder_yields_empty() {
        let bots = discover_bots("/nonexistent/path/for/kuhn/tests", "run.sh");
        assert!(bots.is_empty());
    }
}
