use std::{
    env, fs,
    path::{Path, PathBuf},
};

const BACKEND_STEM: &str = "SondaClickBackend";

fn main() {
    stage_packaged_files();
    tauri_build::build()
}

/// Copies the PyInstaller build and the workspace `.env` next to the
/// manifest so the bundle resource globs pick them up.
fn stage_packaged_files() {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".into()));
    let workspace = manifest_dir.join("..");
    let suffix = match env::var("CARGO_CFG_TARGET_OS").as_deref() {
        Ok("windows") => ".exe",
        _ => "",
    };
    let executable = format!("{BACKEND_STEM}{suffix}");

    stage(
        &workspace
            .join("backend")
            .join("dist")
            .join(BACKEND_STEM)
            .join(&executable),
        &manifest_dir.join("packaged-backend").join(&executable),
    );
    stage(
        &workspace.join(".env"),
        &manifest_dir.join("packaged-resources").join(".env"),
    );
}

fn stage(source: &Path, target: &Path) {
    println!("cargo:rerun-if-changed={}", source.display());
    if !source.is_file() {
        println!(
            "cargo:warning=packaged resource {} not found; the bundle will not include it",
            source.display()
        );
        return;
    }
    if let Some(parent) = target.parent() {
        if let Err(error) = fs::create_dir_all(parent) {
            panic!("failed to create {}: {error}", parent.display());
        }
    }
    if let Err(error) = fs::copy(source, target) {
        panic!(
            "failed to stage {} into {}: {error}",
            source.display(),
            target.display()
        );
    }
}
