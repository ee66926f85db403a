use crate::error::{PlotError, PlotResult};
use crate::figure::Figure;
use crate::save::save_figure;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, warn};

/// Something that can put a figure in front of a user.
///
/// A renderer owns at most one viewer; without one, `show` requests are skipped.
pub trait Viewer {
    /// Displays the figure, blocking for as long as the viewer needs.
    fn show(&self, figure: &Figure) -> PlotResult<()>;
}

/// Opens figures in the desktop's default image viewer.
///
/// The figure is written as png to the temporary directory first. On macOS
/// and Windows the opener waits for the viewer and the file is removed
/// afterwards. `xdg-open` returns before the viewer has read the file, so
/// there the png is left in the temporary directory.
#[derive(Debug, Clone, Default)]
pub struct SystemViewer;

static SHOWN: AtomicUsize = AtomicUsize::new(0);

#[cfg(any(target_os = "macos", target_os = "windows"))]
const OPENER_WAITS: bool = true;

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const OPENER_WAITS: bool = false;

impl Viewer for SystemViewer {
    fn show(&self, figure: &Figure) -> PlotResult<()> {
        self.show_in(figure, |name| std::env::var_os(name))
    }
}

impl SystemViewer {
    fn show_in(
        &self,
        figure: &Figure,
        env: impl Fn(&str) -> Option<OsString>,
    ) -> PlotResult<()> {
        if !display_present(env) {
            return Err(PlotError::RenderBackendUnavailable {
                reason: "neither DISPLAY nor WAYLAND_DISPLAY is set".to_string(),
            });
        }
        let image = TempImage(std::env::temp_dir().join(format!(
            "aq_plot-{}-{}.png",
            std::process::id(),
            SHOWN.fetch_add(1, Ordering::Relaxed)
        )));
        save_figure(figure, &image.0)?;
        debug!(path = %image.0.display(), "opening figure in the system viewer");
        let status = open_command(&image.0).status().map_err(|e| {
            PlotError::RenderBackendUnavailable {
                reason: format!("could not start the image viewer: {}", e),
            }
        })?;
        if !status.success() {
            return Err(PlotError::RenderBackendUnavailable {
                reason: format!("image viewer exited with {}", status),
            });
        }
        if !OPENER_WAITS {
            image.keep();
        }
        Ok(())
    }
}

/// An image file removed when dropped, unless kept.
struct TempImage(PathBuf);

impl TempImage {
    fn keep(self) -> PathBuf {
        let path = self.0.clone();
        std::mem::forget(self);
        path
    }
}

impl Drop for TempImage {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.0) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %self.0.display(), error = %e, "could not remove shown figure");
            }
        }
    }
}

#[cfg(any(target_os = "macos", target_os = "windows"))]
fn display_present(_env: impl Fn(&str) -> Option<OsString>) -> bool {
    true
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn display_present(env: impl Fn(&str) -> Option<OsString>) -> bool {
    ["DISPLAY", "WAYLAND_DISPLAY"]
        .into_iter()
        .any(|v| env(v).map_or(false, |s| !s.is_empty()))
}

#[cfg(target_os = "macos")]
fn open_command(path: &Path) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg("-W").arg(path);
    cmd
}

#[cfg(target_os = "windows")]
fn open_command(path: &Path) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "start", "/WAIT", ""]).arg(path);
    cmd
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn open_command(path: &Path) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(path);
    cmd
}
