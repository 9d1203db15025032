//! # Release Pipeline
//!
//! This module contains the core logic of pyrelease. A release is produced by five
//! stages that always run in the same order:
//! 1. Remove output left over from earlier builds (`clean_workspace`).
//! 2. Install the Python packages the product needs (`install_dependencies`).
//! 3. Bundle the entry script and resources into one executable (`build_executable`).
//! 4. Assemble the release folder (`assemble_distribution`).
//! 5. Remove the packager's intermediate files (`cleanup_artifacts`).
//!
//! There is no retry and no rollback. A failed packager run stops the pipeline
//! before the release folder is touched; any other error stops it wherever it
//! happens and the next run starts again from stage 1.

use std::fs;
use std::path::PathBuf;
use anyhow::{Context, Result, bail};
use log::{debug, info, warn};
use crate::config::Layout;
use crate::invariant_ppt::*;
use crate::system::{BuildOps, Invocation};
use crate::workspace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Clean,
    Dependencies,
    Build,
    Distribute,
    Cleanup,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::Clean,
        Stage::Dependencies,
        Stage::Build,
        Stage::Distribute,
        Stage::Cleanup,
    ];

    pub fn number(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).map_or(0, |i| i + 1)
    }

    pub fn title(self) -> &'static str {
        match self {
            Stage::Clean => "Cleaning old builds",
            Stage::Dependencies => "Installing dependencies",
            Stage::Build => "Building executable",
            Stage::Distribute => "Creating distribution package",
            Stage::Cleanup => "Cleaning up build artifacts",
        }
    }

    /// The `[n/5] Title...` marker printed when a stage starts.
    pub fn marker(self) -> String {
        format!("[{}/{}] {}...", self.number(), Self::ALL.len(), self.title())
    }

    fn announce(self) {
        println!();
        println!("{}", self.marker());
    }
}

/// Per-run switches layered over the configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    pub skip_dependencies: bool,
    pub strict_dependencies: bool,
}

#[derive(Debug, Default)]
pub struct InstallReport {
    pub installed: Vec<String>,
    pub failed: Vec<String>,
}

#[derive(Debug, Default)]
pub struct DistributionReport {
    pub resources: Vec<String>,
    pub documents: Vec<PathBuf>,
    pub files_copied: usize,
}

/// Runs every stage in order.
///
/// # Arguments
///
/// * `layout` - Where everything lives, resolved against the project root.
/// * `ops` - The process runner (real or mocked).
/// * `options` - Per-run switches from the command line.
///
/// # Returns
///
/// `Ok(())` once the release folder is assembled and intermediate files are gone.
pub fn run(layout: &Layout, ops: &impl BuildOps, options: BuildOptions) -> Result<()> {
    Stage::Clean.announce();
    clean_workspace(layout)?;
    println!("✓ Cleaned");

    Stage::Dependencies.announce();
    if options.skip_dependencies {
        println!("- Skipped (--skip-deps)");
    } else {
        let strict = options.strict_dependencies || layout.config.strict_dependencies;
        let report = install_dependencies(layout, ops, strict)?;
        info!("{} of {} packages installed", report.installed.len(), layout.config.packages.len());
        if report.failed.is_empty() {
            println!("✓ Dependencies installed");
        } else {
            println!(
                "⚠ Dependencies installed with {} failure(s): {}",
                report.failed.len(),
                report.failed.join(", ")
            );
        }
    }

    Stage::Build.announce();
    println!("This may take a few minutes...");
    if !build_executable(layout, ops)? {
        bail!("packaging failed, release directory left untouched");
    }

    Stage::Distribute.announce();
    let report = assemble_distribution(layout)?;
    info!(
        "Release holds {} resource dir(s), {} doc(s), {} file(s) in total",
        report.resources.len(),
        report.documents.len(),
        report.files_copied
    );
    println!("✓ Distribution package created: {}", layout.release_dir().display());

    Stage::Cleanup.announce();
    cleanup_artifacts(layout)?;
    println!("✓ Cleanup complete");

    Ok(())
}

/// Deletes `build`, `dist` and the packager's spec file. Absent paths are skipped.
pub fn clean_workspace(layout: &Layout) -> Result<usize> {
    let mut removed = 0;
    for path in [layout.work_dir(), layout.dist_dir(), layout.metadata_file()] {
        if workspace::remove_if_exists(&path)? {
            removed += 1;
        }
    }
    info!("Removed {} stale build output(s)", removed);
    Ok(removed)
}

/// Stand-alone clean: the workspace cleaner, optionally followed by the release folder.
pub fn clean_only(layout: &Layout, include_release: bool) -> Result<()> {
    clean_workspace(layout)?;
    if include_release && workspace::remove_if_exists(&layout.release_dir())? {
        info!("Removed release directory {:?}", layout.release_dir());
    }
    Ok(())
}

pub fn pip_invocation(layout: &Layout, package: &str) -> Invocation {
    Invocation::new(&layout.config.python, &layout.root)
        .arg("-m")
        .arg("pip")
        .arg("install")
        .arg("-q")
        .arg(package)
}

/// Installs each configured package, one `pip install -q` per package.
///
/// Installs are best-effort: a failure is logged and the next package is tried.
/// With `strict` set, the first failure aborts the pipeline instead.
pub fn install_dependencies(layout: &Layout, ops: &impl BuildOps, strict: bool) -> Result<InstallReport> {
    let mut report = InstallReport::default();

    for package in &layout.config.packages {
        let invocation = pip_invocation(layout, package);
        let ok = match ops.install_package(&invocation) {
            Ok(ok) => ok,
            Err(e) if !strict => {
                warn!("Could not run installer for {}: {:#}", package, e);
                false
            }
            Err(e) => return Err(e).with_context(|| format!("failed to install {}", package)),
        };

        if ok {
            debug!("Installed {}", package);
            report.installed.push(package.clone());
        } else if strict {
            bail!("failed to install {} (strict dependency mode)", package);
        } else {
            warn!("Install of {} failed, continuing", package);
            report.failed.push(package.clone());
        }
    }

    Ok(report)
}

/// The exact PyInstaller command for this layout.
pub fn packager_invocation(layout: &Layout) -> Invocation {
    let config = &layout.config;
    let mut invocation = Invocation::new(&config.python, &layout.root)
        .arg("-m")
        .arg("PyInstaller")
        .arg("--onefile")
        .arg("--windowed")
        .arg(format!("--icon={}", config.icon.display()))
        .arg(format!("--name={}", config.product_name));

    for mapping in &config.resources {
        invocation = invocation.arg("--add-data").arg(mapping.add_data_arg());
    }

    invocation
        .arg(format!("--distpath={}", config.dist_dir.display()))
        .arg(format!("--workpath={}", config.work_dir.display()))
        .arg(config.entry_script.display().to_string())
}

/// Runs the packager and reports whether it succeeded.
///
/// On failure the captured stderr is printed so the operator can see why.
pub fn build_executable(layout: &Layout, ops: &impl BuildOps) -> Result<bool> {
    let invocation = packager_invocation(layout);
    info!("Invoking packager: {}", invocation.command_line());

    let output = ops.run_packager(&invocation)?;
    if !output.stdout.is_empty() {
        debug!("Packager output:\n{}", output.stdout);
    }

    if output.success {
        println!("✓ Executable created: {}", layout.built_executable().display());
        Ok(true)
    } else {
        println!("✗ Build failed! (exit code {:?})", output.code);
        println!("{}", output.stderr);
        Ok(false)
    }
}

/// Recreates the release folder and fills it.
///
/// The executable is required. Resource directories and documentation files are
/// copied only when they exist at the project root.
pub fn assemble_distribution(layout: &Layout) -> Result<DistributionReport> {
    let release = layout.release_dir();
    workspace::remove_if_exists(&release)?;
    fs::create_dir_all(&release)
        .with_context(|| format!("failed to create release directory {}", release.display()))?;

    let mut report = DistributionReport::default();

    let built = layout.built_executable();
    if !built.is_file() {
        bail!("built executable not found at {}", built.display());
    }
    fs::copy(&built, layout.released_executable())
        .with_context(|| format!("failed to copy executable {}", built.display()))?;
    report.files_copied += 1;

    for mapping in &layout.config.resources {
        let src = layout.root.join(&mapping.source);
        if let Some(count) = workspace::copy_tree_if_exists(&src, &release.join(&mapping.target))? {
            info!("Copied resource {:?} ({} files)", mapping.target, count);
            report.resources.push(mapping.target.clone());
            report.files_copied += count;
        }
    }

    for doc in &layout.config.documentation {
        let Some(name) = doc.file_name() else { continue };
        if workspace::copy_file_if_exists(&layout.root.join(doc), &release.join(name))? {
            report.documents.push(doc.clone());
            report.files_copied += 1;
        }
    }

    assert_invariant(layout.released_executable().is_file(), RELEASE_HAS_EXECUTABLE, Some("Assembler"));
    Ok(report)
}

/// Deletes the packager's work directory and spec file. `dist` is kept.
pub fn cleanup_artifacts(layout: &Layout) -> Result<()> {
    workspace::remove_if_exists(&layout.work_dir())?;
    workspace::remove_if_exists(&layout.metadata_file())?;

    assert_invariant(!layout.work_dir().exists(), WORK_DIR_REMOVED, Some("Cleanup"));
    assert_invariant(!layout.metadata_file().exists(), METADATA_REMOVED, Some("Cleanup"));
    Ok(())
}

fn plan_mark(present: bool) -> (&'static str, &'static str) {
    if present { ("+", "") } else { ("?", " (missing, will be skipped)") }
}

/// Lines printed after a successful build, with paths anchored at the project root.
pub fn completion_summary(layout: &Layout) -> Vec<String> {
    let release = layout.release_dir();
    let exe = layout.released_executable();
    vec![
        String::new(),
        format!("Executable: {}", exe.display()),
        format!("Package:    {}", release.display()),
        String::new(),
        "You can now:".to_string(),
        format!("- Test: {}", exe.display()),
        format!("- Distribute: Zip the {} folder", release.display()),
        String::new(),
    ]
}

/// Prints what a real run would do without touching anything.
pub fn print_plan(layout: &Layout, options: BuildOptions) {
    let config = &layout.config;

    println!();
    println!("═══════════════════════════════════════════════════════════════");
    println!("                   What pyrelease Will Do");
    println!("═══════════════════════════════════════════════════════════════");
    println!();
    println!("Project root: {}", layout.root.display());
    println!();

    println!("{}", Stage::Clean.marker());
    for path in [&config.work_dir, &config.dist_dir] {
        println!("    ✕ {}/", path.display());
    }
    println!("    ✕ {}", config.metadata_file().display());

    println!("{}", Stage::Dependencies.marker());
    if options.skip_dependencies {
        println!("    (skipped)");
    } else {
        for package in &config.packages {
            println!("    $ {}", pip_invocation(layout, package).command_line());
        }
        if options.strict_dependencies || config.strict_dependencies {
            println!("    (strict: any failed install aborts the build)");
        }
    }

    println!("{}", Stage::Build.marker());
    println!("    $ {}", packager_invocation(layout).command_line());

    println!("{}", Stage::Distribute.marker());
    println!("    {}/", config.release_dir().display());
    println!("      + {}", config.executable_name());
    for mapping in &config.resources {
        let (mark, note) = plan_mark(layout.root.join(&mapping.source).is_dir());
        println!("      {} {}/{}", mark, mapping.target, note);
    }
    for doc in &config.documentation {
        let (mark, note) = plan_mark(layout.root.join(doc).is_file());
        println!("      {} {}{}", mark, doc.display(), note);
    }

    println!("{}", Stage::Cleanup.marker());
    println!("    ✕ {}/", config.work_dir.display());
    println!("    ✕ {}", config.metadata_file().display());

    println!();
    println!("───────────────────────────────────────────────────────────────");
    println!("This is a preview. Run 'pyrelease build' to produce the release.");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, BTreeSet};
    use std::path::Path;
    use proptest::prelude::*;
    use tempfile::TempDir;
    use crate::config::{BuildConfig, ResourceMapping};
    use crate::system::MockSystem;

    /// A project with one file in each resource directory plus docs.
    fn fixture() -> (TempDir, Layout) {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        for (dir, file, body) in [
            ("data", "one.txt", "data payload"),
            ("handle", "two.txt", "handle payload"),
            ("version", "three.txt", "1.4.2"),
        ] {
            fs::create_dir_all(root.join(dir)).unwrap();
            fs::write(root.join(dir).join(file), body).unwrap();
        }
        fs::write(root.join("README.md"), "# dznvBlox").unwrap();
        fs::write(root.join("LICENSE"), "MIT").unwrap();
        fs::write(root.join("dznvBlox.pyw"), "print('hi')").unwrap();
        fs::write(root.join("app.ico"), [0u8, 0, 1, 0]).unwrap();

        let config = BuildConfig {
            icon: PathBuf::from("app.ico"),
            ..BuildConfig::default()
        };
        let layout = Layout::new(root, config);
        (temp, layout)
    }

    /// Every path under `dir` (relative, `/`-separated) mapped to its bytes; directories map to `None`.
    fn snapshot(dir: &Path) -> BTreeMap<String, Option<Vec<u8>>> {
        walkdir::WalkDir::new(dir)
            .min_depth(1)
            .into_iter()
            .map(|e| e.unwrap())
            .map(|e| {
                let rel = e.path().strip_prefix(dir).unwrap().components()
                    .map(|c| c.as_os_str().to_string_lossy().to_string())
                    .collect::<Vec<_>>()
                    .join("/");
                let bytes = if e.file_type().is_file() { Some(fs::read(e.path()).unwrap()) } else { None };
                (rel, bytes)
            })
            .collect()
    }

    #[test]
    fn test_successful_run_produces_exact_release() {
        let (_temp, layout) = fixture();
        let ops = MockSystem::new();

        run(&layout, &ops, BuildOptions::default()).unwrap();

        let release = snapshot(&layout.release_dir());
        let exe = layout.config.executable_name();
        let expected: BTreeSet<String> = [
            "LICENSE", "README.md", "data", "data/one.txt", "handle", "handle/two.txt",
            "version", "version/three.txt", exe.as_str(),
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        assert_eq!(release.keys().cloned().collect::<BTreeSet<_>>(), expected);

        assert_eq!(release["data/one.txt"].as_deref(), Some(&b"data payload"[..]));
        assert_eq!(release["version/three.txt"].as_deref(), Some(&b"1.4.2"[..]));
        assert_eq!(release[&exe].as_deref(), Some(ops.executable_bytes.as_slice()));

        assert!(!layout.work_dir().exists());
        assert!(!layout.metadata_file().exists());
        assert!(layout.released_executable().is_file());

        contract_test("full pipeline", &[RELEASE_HAS_EXECUTABLE, WORK_DIR_REMOVED, METADATA_REMOVED]);
    }

    #[test]
    fn test_rerun_is_byte_identical() {
        let (_temp, layout) = fixture();
        let ops = MockSystem::new();

        run(&layout, &ops, BuildOptions::default()).unwrap();
        let first = snapshot(&layout.release_dir());
        run(&layout, &ops, BuildOptions::default()).unwrap();
        let second = snapshot(&layout.release_dir());

        assert_eq!(first, second);
    }

    #[test]
    fn test_stale_release_content_is_replaced() {
        let (_temp, layout) = fixture();
        fs::create_dir_all(layout.release_dir()).unwrap();
        fs::write(layout.release_dir().join("old-build.log"), "stale").unwrap();

        run(&layout, &MockSystem::new(), BuildOptions::default()).unwrap();

        assert!(!layout.release_dir().join("old-build.log").exists());
    }

    #[test]
    fn test_packager_failure_leaves_release_untouched() {
        let (_temp, layout) = fixture();
        fs::create_dir_all(layout.release_dir()).unwrap();
        fs::write(layout.release_dir().join("previous.txt"), "keep me").unwrap();
        let before = snapshot(&layout.release_dir());

        let ops = MockSystem::failing_packager("ModuleNotFoundError: No module named 'psutil'");
        let err = run(&layout, &ops, BuildOptions::default()).unwrap_err();

        assert!(err.to_string().contains("packaging failed"));
        assert_eq!(snapshot(&layout.release_dir()), before);
        assert_eq!(ops.packager_calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_packager_failure_creates_no_release() {
        let (_temp, layout) = fixture();
        let ops = MockSystem::failing_packager("boom");

        assert!(run(&layout, &ops, BuildOptions::default()).is_err());
        assert!(!layout.release_dir().exists());
    }

    #[test]
    fn test_missing_executable_aborts_assembly() {
        let (_temp, layout) = fixture();
        let ops = MockSystem {
            skip_executable: true,
            ..MockSystem::new()
        };

        let err = run(&layout, &ops, BuildOptions::default()).unwrap_err();
        assert!(err.to_string().contains("built executable not found"));
        // Cleanup never ran.
        assert!(layout.work_dir().exists());
    }

    #[test]
    fn test_absent_resource_is_omitted() {
        let (_temp, layout) = fixture();
        fs::remove_dir_all(layout.root.join("handle")).unwrap();
        fs::remove_file(layout.root.join("LICENSE")).unwrap();

        run(&layout, &MockSystem::new(), BuildOptions::default()).unwrap();

        let release = layout.release_dir();
        assert!(!release.join("handle").exists());
        assert!(!release.join("LICENSE").exists());
        assert!(release.join("data").join("one.txt").is_file());
        assert!(release.join("README.md").is_file());
    }

    #[test]
    fn test_resource_copied_under_target_name() {
        let (_temp, mut layout) = fixture();
        layout.config.resources = vec![ResourceMapping {
            source: PathBuf::from("data"),
            target: "assets".to_string(),
        }];
        fs::create_dir_all(layout.dist_dir()).unwrap();
        fs::write(layout.built_executable(), "exe").unwrap();

        let report = assemble_distribution(&layout).unwrap();

        assert_eq!(report.resources, vec!["assets".to_string()]);
        assert!(layout.release_dir().join("assets").join("one.txt").is_file());
        assert!(!layout.release_dir().join("data").exists());
    }

    #[test]
    fn test_best_effort_installs_continue_past_failures() {
        let (_temp, layout) = fixture();
        let ops = MockSystem {
            failing_packages: vec!["pillow".to_string()],
            ..MockSystem::new()
        };

        let report = install_dependencies(&layout, &ops, false).unwrap();

        assert_eq!(report.failed, vec!["pillow".to_string()]);
        assert_eq!(report.installed.len(), 4);
        assert_eq!(ops.installed.lock().unwrap().len(), 5);
    }

    #[test]
    fn test_strict_installs_abort_before_packaging() {
        let (_temp, layout) = fixture();
        let ops = MockSystem {
            failing_packages: vec!["requests".to_string()],
            ..MockSystem::new()
        };
        let options = BuildOptions { strict_dependencies: true, ..Default::default() };

        let err = run(&layout, &ops, options).unwrap_err();

        assert!(err.to_string().contains("requests"));
        assert_eq!(*ops.installed.lock().unwrap(), vec!["psutil".to_string(), "requests".to_string()]);
        assert!(ops.packager_calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_skip_dependencies_runs_no_installs() {
        let (_temp, layout) = fixture();
        let ops = MockSystem::new();
        let options = BuildOptions { skip_dependencies: true, ..Default::default() };

        run(&layout, &ops, options).unwrap();

        assert!(ops.installed.lock().unwrap().is_empty());
    }

    #[test]
    fn test_clean_removes_outputs_but_keeps_release_by_default() {
        let (_temp, layout) = fixture();
        run(&layout, &MockSystem::new(), BuildOptions::default()).unwrap();
        fs::write(layout.metadata_file(), "# stale").unwrap();

        clean_only(&layout, false).unwrap();
        assert!(!layout.dist_dir().exists());
        assert!(!layout.metadata_file().exists());
        assert!(layout.release_dir().exists());

        clean_only(&layout, true).unwrap();
        assert!(!layout.release_dir().exists());
        assert_eq!(clean_workspace(&layout).unwrap(), 0);
    }

    #[test]
    fn test_installer_spawn_failure_is_tolerated_when_not_strict() {
        let (_temp, layout) = fixture();
        let ops = MockSystem {
            install_spawn_error: true,
            ..MockSystem::new()
        };

        let report = install_dependencies(&layout, &ops, false).unwrap();

        assert!(report.installed.is_empty());
        assert_eq!(report.failed, layout.config.packages);
    }

    #[test]
    fn test_installer_spawn_failure_aborts_when_strict() {
        let (_temp, layout) = fixture();
        let ops = MockSystem {
            install_spawn_error: true,
            ..MockSystem::new()
        };

        let err = install_dependencies(&layout, &ops, true).unwrap_err();

        assert!(format!("{:#}", err).contains("failed to install psutil"));
        assert_eq!(ops.installed.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_packager_spawn_failure_propagates_and_leaves_release_alone() {
        let (_temp, layout) = fixture();
        let ops = MockSystem {
            packager_spawn_error: true,
            ..MockSystem::new()
        };

        let err = run(&layout, &ops, BuildOptions::default()).unwrap_err();

        assert!(format!("{:#}", err).contains("failed to execute"));
        assert!(!layout.release_dir().exists());
    }

    #[test]
    fn test_host_packager_with_missing_interpreter_is_an_error() {
        let (_temp, mut layout) = fixture();
        layout.config.python = "no-such-python-xyz".to_string();

        let err = build_executable(&layout, &crate::system::HostSystem).unwrap_err();

        assert!(err.to_string().contains("failed to execute no-such-python-xyz"));
        assert!(!layout.dist_dir().exists());
    }

    #[test]
    fn test_host_installer_spawn_failure_continues_when_not_strict() {
        let (_temp, mut layout) = fixture();
        layout.config.python = "no-such-python-xyz".to_string();
        layout.config.packages = vec!["requests".to_string(), "pillow".to_string()];

        let report = install_dependencies(&layout, &crate::system::HostSystem, false).unwrap();

        assert_eq!(report.failed, layout.config.packages);
    }

    #[test]
    fn test_plan_touches_nothing() {
        let (_temp, layout) = fixture();
        fs::create_dir_all(layout.work_dir()).unwrap();
        fs::create_dir_all(layout.dist_dir()).unwrap();
        fs::write(layout.metadata_file(), "# spec").unwrap();
        fs::create_dir_all(layout.release_dir()).unwrap();
        fs::write(layout.release_dir().join("previous.txt"), "keep").unwrap();
        let before = snapshot(&layout.root);

        print_plan(&layout, BuildOptions::default());
        print_plan(&layout, BuildOptions { skip_dependencies: true, strict_dependencies: true });

        assert_eq!(snapshot(&layout.root), before);
    }

    #[test]
    fn test_completion_summary_uses_project_root_paths() {
        let layout = Layout::new("/work/app", BuildConfig::default());
        let summary = completion_summary(&layout).join("\n");

        assert!(summary.contains(&layout.released_executable().display().to_string()));
        assert!(summary.contains(&format!("Package:    {}", layout.release_dir().display())));
    }

    #[test]
    fn test_stage_markers() {
        assert_eq!(Stage::Clean.marker(), "[1/5] Cleaning old builds...");
        assert_eq!(Stage::Cleanup.marker(), "[5/5] Cleaning up build artifacts...");
        assert_eq!(Stage::Distribute.number(), 4);
    }

    #[test]
    fn test_default_packager_vector() {
        let layout = Layout::new("/proj", BuildConfig::default());
        let inv = packager_invocation(&layout);
        let expected: Vec<&str> = vec![
            "-m", "PyInstaller", "--onefile", "--windowed",
            "--icon=data/assets/mylogo.ico", "--name=dznvBlox",
            "--add-data", "data:data", "--add-data", "handle:handle", "--add-data", "version:version",
            "--distpath=dist", "--workpath=build", "dznvBlox.pyw",
        ];
        assert_eq!(inv.args, expected);
        assert_eq!(inv.cwd, PathBuf::from("/proj"));
    }

    proptest! {
        #[test]
        fn test_packager_vector_properties(
            name in "[A-Za-z][A-Za-z0-9_]{0,12}",
            dirs in prop::collection::vec("[a-z]{1,8}", 0..6),
        ) {
            let config = BuildConfig {
                product_name: name.clone(),
                entry_script: PathBuf::from(format!("{}.pyw", name)),
                resources: dirs.iter().map(|d| ResourceMapping::same_name(d)).collect(),
                ..BuildConfig::default()
            };
            let inv = packager_invocation(&Layout::new("/proj", config));

            let name_flag = format!("--name={}", name);
            prop_assert!(inv.args.contains(&name_flag));
            prop_assert_eq!(inv.args.last().cloned(), Some(format!("{}.pyw", name)));

            let pairs: Vec<&str> = inv.args
                .windows(2)
                .filter(|w| w[0] == "--add-data")
                .map(|w| w[1].as_str())
                .collect();
            let expected: Vec<String> = dirs.iter().map(|d| format!("{}:{}", d, d)).collect();
            prop_assert_eq!(pairs, expected.iter().map(String::as_str).collect::<Vec<_>>());
        }
    }
}
