use anyhow::{bail, Result};
use std::process::{Command, Stdio};

fn try_prog(prog: &str, args: &[&str]) -> bool {
    Command::new(prog)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .is_ok()
}

/// Hand `url` to the desktop's default handler.
pub fn open_url(url: &str) -> Result<()> {
    #[cfg(target_os = "linux")]
    {
        if try_prog("xdg-open", &[url]) || try_prog("gio", &["open", url]) {
            return Ok(());
        }
    }
    #[cfg(target_os = "macos")]
    {
        if try_prog("open", &[url]) {
            return Ok(());
        }
    }
    #[cfg(target_os = "windows")]
    {
        if try_prog("cmd", &["/C", "start", "", url]) {
            return Ok(());
        }
    }
    tracing::warn!(url, "no opener available");
    bail!("could not open {url}: no URL opener found")
}
