//! Placing binaries into the binary directory and deleting them again.
//!
//! The unprivileged path is always tried first. When it fails (typically a
//! permission error on a system directory) the operation is retried through an
//! [`Elevation`] provider.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

/// Both the direct and the elevated attempt failed.
#[derive(Error, Debug)]
#[error("{}: {direct} (elevated retry failed: {elevated})", .dest.display())]
pub struct PlacementError {
    pub dest: PathBuf,
    pub direct: io::Error,
    pub elevated: io::Error,
}

/// Privileged fallback for file operations in protected directories.
pub trait Elevation: Send + Sync {
    /// Copy `src` to `dest` with mode 0755.
    fn copy(&self, src: &Path, dest: &Path) -> io::Result<()>;

    /// Delete `path`.
    fn remove(&self, path: &Path) -> io::Result<()>;
}

/// Elevation through `sudo`, prompting on the controlling terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sudo;

impl Sudo {
    fn run(configure: impl FnOnce(&mut Command) -> &mut Command) -> io::Result<()> {
        let sudo = which::which("sudo")
            .map_err(|e| io::Error::new(io::ErrorKind::NotFound, format!("sudo: {e}")))?;
        let mut cmd = Command::new(sudo);
        configure(&mut cmd);
        tracing::debug!("Running {:?}", cmd);
        let status = cmd.status()?;
        if status.success() {
            Ok(())
        } else {
            Err(io::Error::other(format!("sudo exited with {status}")))
        }
    }
}

impl Elevation for Sudo {
    fn copy(&self, src: &Path, dest: &Path) -> io::Result<()> {
        Self::run(|cmd| cmd.args(["install", "-m", "755"]).arg(src).arg(dest))
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        Self::run(|cmd| cmd.args(["rm", "-f"]).arg(path))
    }
}

/// Never elevates; every call fails with `PermissionDenied`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoElevation;

impl Elevation for NoElevation {
    fn copy(&self, _: &Path, dest: &Path) -> io::Result<()> {
        Err(denied(dest))
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        Err(denied(path))
    }
}

fn denied(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::PermissionDenied,
        format!("elevation disabled for {}", path.display()),
    )
}

/// Which route a successful placement took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Direct,
    Elevated,
}

/// Outcome of [`delete_binary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deletion {
    Direct,
    Elevated,
    /// There was no file to delete.
    Missing,
}

/// Set mode 0755 on `path`.
pub fn make_executable(path: &Path) -> io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}

/// Copy `src` to `dest` as an executable, replacing any existing file.
///
/// The copy is staged next to `dest` and renamed over it, so a running binary
/// is never truncated in place.
pub fn place_binary(
    src: &Path,
    dest: &Path,
    elevation: &dyn Elevation,
) -> Result<Placement, PlacementError> {
    let direct = match place_direct(src, dest) {
        Ok(()) => return Ok(Placement::Direct),
        Err(e) => e,
    };

    tracing::debug!(
        "Direct placement of {} failed ({direct}), retrying elevated",
        dest.display()
    );
    match elevation.copy(src, dest) {
        Ok(()) => Ok(Placement::Elevated),
        Err(elevated) => Err(PlacementError {
            dest: dest.to_path_buf(),
            direct,
            elevated,
        }),
    }
}

fn place_direct(src: &Path, dest: &Path) -> io::Result<()> {
    let file_name = dest.file_name().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "destination has no file name")
    })?;
    let staged = dest.with_file_name(format!(".{}.bpm-new", file_name.to_string_lossy()));

    let result = std::fs::copy(src, &staged)
        .and_then(|_| make_executable(&staged))
        .and_then(|()| std::fs::rename(&staged, dest));

    if result.is_err() {
        let _ = std::fs::remove_file(&staged);
    }
    result
}

/// Delete the binary at `path`, falling back to elevation.
pub fn delete_binary(path: &Path, elevation: &dyn Elevation) -> Result<Deletion, PlacementError> {
    let direct = match std::fs::remove_file(path) {
        Ok(()) => return Ok(Deletion::Direct),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Deletion::Missing),
        Err(e) => e,
    };

    match elevation.remove(path) {
        Ok(()) => Ok(Deletion::Elevated),
        Err(elevated) => Err(PlacementError {
            dest: path.to_path_buf(),
            direct,
            elevated,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recording {
        calls: Mutex<Vec<String>>,
    }

    impl Elevation for Recording {
        fn copy(&self, src: &Path, dest: &Path) -> io::Result<()> {
            self.calls.lock().unwrap().push(format!("copy {}", dest.display()));
            std::fs::create_dir_all(dest.parent().unwrap())?;
            std::fs::copy(src, dest).map(|_| ())
        }

        fn remove(&self, path: &Path) -> io::Result<()> {
            self.calls.lock().unwrap().push(format!("rm {}", path.display()));
            Ok(())
        }
    }

    #[test]
    fn test_place_direct_replaces_existing() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        let dest = dir.path().join("tool");
        std::fs::write(&src, b"new").unwrap();
        std::fs::write(&dest, b"old").unwrap();

        let placement = place_binary(&src, &dest, &NoElevation).unwrap();
        assert_eq!(placement, Placement::Direct);
        assert_eq!(std::fs::read(&dest).unwrap(), b"new");
        assert!(!dir.path().join(".tool.bpm-new").exists());

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&dest).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o755);
        }
    }

    #[test]
    fn test_place_falls_back_to_elevation() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        std::fs::write(&src, b"bin").unwrap();
        let dest = dir.path().join("missing-dir").join("tool");

        let elevation = Recording::default();
        let placement = place_binary(&src, &dest, &elevation).unwrap();
        assert_eq!(placement, Placement::Elevated);
        assert_eq!(elevation.calls.lock().unwrap().len(), 1);
        assert_eq!(std::fs::read(&dest).unwrap(), b"bin");
    }

    #[test]
    fn test_place_reports_both_failures() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        std::fs::write(&src, b"bin").unwrap();
        let dest = dir.path().join("missing-dir").join("tool");

        let err = place_binary(&src, &dest, &NoElevation).unwrap_err();
        assert_eq!(err.elevated.kind(), io::ErrorKind::PermissionDenied);
        assert_eq!(err.dest, dest);
    }

    #[test]
    fn test_delete_binary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tool");
        std::fs::write(&path, b"bin").unwrap();

        assert_eq!(delete_binary(&path, &NoElevation).unwrap(), Deletion::Direct);
        assert!(!path.exists());
        assert_eq!(delete_binary(&path, &NoElevation).unwrap(), Deletion::Missing);
    }
}
