use crate::FolderPicker;
use std::path::PathBuf;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

const MAC_SCRIPT: &str = r#"tell application "System Events"
    activate
    set theFolder to choose folder with prompt "Select a folder"
    return POSIX path of theFolder
end tell"#;

const WINDOWS_SCRIPT: &str = "Add-Type -AssemblyName System.Windows.Forms; \
$d = New-Object System.Windows.Forms.FolderBrowserDialog; \
if ($d.ShowDialog() -eq 'OK') { Write-Output $d.SelectedPath }";

/// Opens the platform's native folder dialog as a child process.
#[derive(Debug, Clone)]
pub struct DialogPicker {
    timeout: Duration,
}

impl DialogPicker {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    async fn run_dialog(&self, program: &str, args: &[&str]) -> Option<PathBuf> {
        let mut cmd = Command::new(program);
        cmd.args(args).kill_on_drop(true);
        match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(Ok(output)) if output.status.success() => {
                parse_selection(&String::from_utf8_lossy(&output.stdout))
            }
            Ok(Ok(output)) => {
                debug!(program, status = ?output.status, "folder dialog cancelled");
                None
            }
            Ok(Err(e)) => {
                debug!(program, error = %e, "folder dialog unavailable");
                None
            }
            Err(_) => {
                warn!(program, timeout = ?self.timeout, "folder dialog timed out");
                None
            }
        }
    }
}

impl Default for DialogPicker {
    fn default() -> Self {
        Self::new(Duration::from_secs(120))
    }
}

#[async_trait::async_trait]
impl FolderPicker for DialogPicker {
    async fn pick_folder(&self) -> Option<PathBuf> {
        if cfg!(target_os = "macos") {
            self.run_dialog("osascript", &["-e", MAC_SCRIPT]).await
        } else if cfg!(target_os = "windows") {
            self.run_dialog("powershell", &["-NoProfile", "-Command", WINDOWS_SCRIPT])
                .await
        } else if cfg!(unix) {
            if let Some(path) = self
                .run_dialog("zenity", &["--file-selection", "--directory"])
                .await
            {
                return Some(path);
            }
            self.run_dialog("kdialog", &["--getexistingdirectory"]).await
        } else {
            None
        }
    }
}

fn parse_selection(stdout: &str) -> Option<PathBuf> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(PathBuf::from(trimmed))
    }
}
