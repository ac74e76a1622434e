//! Build automation tasks for Scrollshot
//!
//! Usage:
//!   cargo xtask check-assets [--manifest PATH]   # Validate the animation manifest
//!   cargo xtask package [--platform NAME]        # Native release into dist/<platform>/

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Command;

const TAGS: [&str; 4] = ["player", "weapon", "bullet", "cursor"];
const FACINGS: [&str; 8] = [
    "right", "up_right", "up", "up_left", "left", "down_left", "down", "down_right",
];

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation for Scrollshot")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse the animation manifest and check every frame file exists
    CheckAssets {
        /// Manifest path, relative to the project root
        #[arg(long, default_value = "assets/animations.ron")]
        manifest: PathBuf,
    },
    /// Build a native release and copy it with assets/ and config/ into dist/
    Package {
        /// Target platform: windows, macos, linux
        #[arg(long)]
        platform: Option<String>,
    },
}

#[derive(Deserialize)]
struct ClipDef {
    frames: Vec<PathBuf>,
    frame_duration: f32,
}

#[derive(Deserialize)]
struct Manifest {
    animations: BTreeMap<String, ClipDef>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::CheckAssets { manifest } => check_assets(&manifest),
        Commands::Package { platform } => package(platform),
    }
}

/// Get the project root directory
fn project_root() -> Result<PathBuf> {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .context("xtask has no parent directory")
}

/// Run a command and check for success
fn run_cmd(cmd: &mut Command) -> Result<()> {
    let status = cmd.status().context("Failed to execute command")?;
    if !status.success() {
        anyhow::bail!("Command failed with status: {}", status);
    }
    Ok(())
}

/// Copy directory recursively
fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<()> {
    std::fs::create_dir_all(dst)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// `tag/clip` where clip is `idle`, `idle_<facing>` or `run_<facing>`
fn key_is_valid(key: &str) -> bool {
    let Some((tag, clip)) = key.split_once('/') else {
        return false;
    };
    if !TAGS.contains(&tag) {
        return false;
    }
    if clip == "idle" {
        return true;
    }
    let facing = clip
        .strip_prefix("idle_")
        .or_else(|| clip.strip_prefix("run_"));
    facing.is_some_and(|f| FACINGS.contains(&f))
}

fn check_assets(manifest: &Path) -> Result<()> {
    let root = project_root()?;
    let path = root.join(manifest);
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("reading {}", path.display()))?;
    let manifest: Manifest =
        ron::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    let base = path.parent().unwrap_or(&root);

    let mut problems = Vec::new();
    let mut frames = 0;
    for (key, clip) in &manifest.animations {
        if !key_is_valid(key) {
            problems.push(format!("{}: not a valid animation key", key));
        }
        if clip.frames.is_empty() {
            problems.push(format!("{}: no frames", key));
        }
        if !(clip.frame_duration > 0.0) {
            problems.push(format!("{}: frame_duration must be positive", key));
        }
        for frame in &clip.frames {
            frames += 1;
            if !base.join(frame).is_file() {
                problems.push(format!("{}: missing frame {}", key, frame.display()));
            }
        }
    }

    if !problems.is_empty() {
        for problem in &problems {
            eprintln!("  {}", problem);
        }
        anyhow::bail!("{} problem(s) in {}", problems.len(), path.display());
    }

    println!(
        "{}: {} animations, {} frames OK",
        path.display(),
        manifest.animations.len(),
        frames
    );
    Ok(())
}

/// Build a native release into dist/<platform>/
fn package(platform: Option<String>) -> Result<()> {
    let root = project_root()?;
    let platform = platform.unwrap_or_else(|| {
        if cfg!(target_os = "windows") {
            "windows".to_string()
        } else if cfg!(target_os = "macos") {
            "macos".to_string()
        } else {
            "linux".to_string()
        }
    });

    let dist = root.join("dist").join(&platform);

    println!("Building native release for {}...", platform);

    // Clean and create dist folder
    if dist.exists() {
        std::fs::remove_dir_all(&dist)?;
    }
    std::fs::create_dir_all(&dist)?;

    run_cmd(
        Command::new("cargo")
            .current_dir(&root)
            .args(["build", "--release"]),
    )?;

    let binary_name = if platform == "windows" {
        "scrollshot.exe"
    } else {
        "scrollshot"
    };
    std::fs::copy(
        root.join("target/release").join(binary_name),
        dist.join(binary_name),
    )
    .with_context(|| format!("copying {}", binary_name))?;

    for dir in ["assets", "config"] {
        let src = root.join(dir);
        if src.exists() {
            copy_dir_recursive(&src, &dist.join(dir))?;
        }
    }

    println!("Package ready: dist/{}/", platform);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_syntax() {
        assert!(key_is_valid("player/run_up_left"));
        assert!(key_is_valid("player/idle_down"));
        assert!(key_is_valid("bullet/idle"));
        assert!(!key_is_valid("player/run"));
        assert!(!key_is_valid("enemy/idle"));
        assert!(!key_is_valid("player"));
        assert!(!key_is_valid("cursor/run_sideways"));
    }
}
