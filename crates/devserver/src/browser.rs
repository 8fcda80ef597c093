//! Opening the map page in the user's browser

use std::time::Duration;
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Open `url` after `delay`, logging instead of failing
pub fn open_after(url: String, delay: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        match launch(&url).await {
            Ok(()) => info!(url = %url, "Opened browser"),
            Err(e) => warn!(url = %url, error = %e, "Failed to open browser, open the page manually"),
        }
    })
}

async fn launch(url: &str) -> std::io::Result<()> {
    let status = opener_command(url).status().await?;
    if status.success() {
        Ok(())
    } else {
        Err(std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("browser launcher exited with {}", status),
        ))
    }
}

fn opener_command(url: &str) -> Command {
    #[cfg(target_os = "macos")]
    let command = {
        let mut command = Command::new("open");
        command.arg(url);
        command
    };

    #[cfg(target_os = "windows")]
    let command = {
        let mut command = Command::new("cmd");
        command.args(["/C", "start", "", url]);
        command
    };

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let command = {
        let mut command = Command::new("xdg-open");
        command.arg(url);
        command
    };

    command
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opener_passes_url() {
        let command = opener_command("http://localhost:8000/index.html");
        let args: Vec<_> = command.as_std().get_args().collect();
        assert_eq!(
            args.last().and_then(|a| a.to_str()),
            Some("http://localhost:8000/index.html")
        );
    }
}
