//! Executes generated launchers with a real interpreter.
//!
//! Skipped when no `python3` is on PATH.

use sitescripts_launcher::generate;
use sitescripts_metadata::Distribution;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Real interpreter path, resolving shims that only work under their own name
fn real_python() -> Option<PathBuf> {
    let python = which::which("python3").ok()?;
    let output = Command::new(python)
        .args(["-c", "import sys; print(sys.executable)"])
        .output()
        .ok()?;
    let executable = String::from_utf8(output.stdout).ok()?;
    let executable = executable.trim();
    (!executable.is_empty()).then(|| PathBuf::from(executable))
}

/// A site-packages dir holding module `foo` and a record declaring `execname = foo:main`
fn make_site(root: &Path) -> Option<PathBuf> {
    let site = root.join("site");
    let dist_info = site.join("foo-1.0.dist-info");
    fs::create_dir_all(&dist_info).ok()?;
    fs::write(
        site.join("foo.py"),
        "def main():\n    print(\"Hello, World!\")\n",
    )
    .ok()?;
    fs::write(dist_info.join("METADATA"), "Name: foo\nVersion: 1.0\n").ok()?;
    fs::write(
        dist_info.join("entry_points.txt"),
        "[console_scripts]\nexecname = foo:main\n",
    )
    .ok()?;
    Some(dist_info)
}

fn run_generated_script(interpreter: &Path, temp_dir: &TempDir) -> Option<(String, std::process::Output)> {
    let dist_info = make_site(temp_dir.path())?;
    let dist = Distribution::from_metadata_path(&dist_info).ok()?;
    let bin_dir = temp_dir.path().join("bin");

    let written = generate(&dist, &bin_dir, interpreter.to_str()?).ok()?;
    assert_eq!(written.len(), 1);

    let script = bin_dir.join("execname");
    let content = fs::read_to_string(&script).ok()?;
    let output = Command::new(&script)
        .env("PYTHONPATH", temp_dir.path().join("site"))
        .output()
        .ok()?;
    Some((content, output))
}

#[cfg(unix)]
#[test]
fn test_regular_shebang_runs() {
    let Some(python) = real_python() else {
        return;
    };
    let Ok(temp_dir) = TempDir::new() else {
        return;
    };
    let link = temp_dir.path().join("mypython");
    if std::os::unix::fs::symlink(&python, &link).is_err() {
        return;
    }

    let Some((content, output)) = run_generated_script(&link, &temp_dir) else {
        return;
    };
    assert!(content.starts_with(&format!("#!{}\n\nimport sys\n", link.display())));
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "Hello, World!\n");
}

#[cfg(unix)]
#[test]
fn test_long_shebang_runs_through_sh() {
    let Some(python) = real_python() else {
        return;
    };
    let Ok(temp_dir) = TempDir::new() else {
        return;
    };
    let link = temp_dir
        .path()
        .join(format!("{}_long_mypython", "very_".repeat(24)));
    if std::os::unix::fs::symlink(&python, &link).is_err() {
        return;
    }

    let Some((content, output)) = run_generated_script(&link, &temp_dir) else {
        return;
    };
    assert!(content.starts_with(&format!(
        "#!/bin/sh\n'''exec' {} \"$0\" \"$@\"\n' '''\n",
        link.display()
    )));
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "Hello, World!\n");
}

#[cfg(unix)]
#[test]
fn test_interpreter_path_with_space_runs_through_sh() {
    let Some(python) = real_python() else {
        return;
    };
    let Ok(temp_dir) = TempDir::new() else {
        return;
    };
    let env_dir = temp_dir.path().join("my env");
    if fs::create_dir_all(&env_dir).is_err() {
        return;
    }
    let link = env_dir.join("python");
    if std::os::unix::fs::symlink(&python, &link).is_err() {
        return;
    }

    let Some((content, output)) = run_generated_script(&link, &temp_dir) else {
        return;
    };
    assert!(content.starts_with(&format!(
        "#!/bin/sh\n'''exec' \"{}\" \"$0\" \"$@\"\n' '''\n",
        link.display()
    )));
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "Hello, World!\n");
}
