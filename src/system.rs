use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use anyhow::{Context, Result};
use log::{debug, trace};

/// A fully resolved external command: program, arguments and working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl Invocation {
    pub fn new(program: &str, cwd: &Path) -> Self {
        Self {
            program: program.to_string(),
            args: Vec::new(),
            cwd: cwd.to_path_buf(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Shell-like rendering for dry runs and logs.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .map(|part| {
                if part.contains(' ') { format!("\"{}\"", part) } else { part.to_string() }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// What the packaging tool left behind once it exited.
#[derive(Debug, Clone, Default)]
pub struct PackagerOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Abstraction for the external processes the pipeline drives.
/// This allows the pipeline to be tested without Python or PyInstaller installed.
pub trait BuildOps {
    /// Run one package-manager install. `Ok(false)` means the installer ran and failed.
    fn install_package(&self, invocation: &Invocation) -> Result<bool>;

    /// Run the packaging tool to completion, capturing its output.
    fn run_packager(&self, invocation: &Invocation) -> Result<PackagerOutput>;
}

/// The Real System implementation (Production).
pub struct HostSystem;

impl BuildOps for HostSystem {
    fn install_package(&self, invocation: &Invocation) -> Result<bool> {
        debug!("Running: {}", invocation.command_line());
        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .stdin(Stdio::null())
            .status()
            .with_context(|| format!("failed to execute {}", invocation.program))?;
        Ok(status.success())
    }

    fn run_packager(&self, invocation: &Invocation) -> Result<PackagerOutput> {
        debug!("Running: {}", invocation.command_line());
        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("failed to execute {}", invocation.program))?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        if !stdout.is_empty() {
            trace!("packager stdout:\n{}", stdout);
        }

        Ok(PackagerOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout,
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// A Mock System for Testing.
///
/// A successful packager run behaves like PyInstaller: it writes the executable
/// into `--distpath`, fills `--workpath` and drops `<name>.spec` into the cwd.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockSystem {
    pub installed: std::sync::Mutex<Vec<String>>,
    pub packager_calls: std::sync::Mutex<Vec<Invocation>>,
    /// Packages whose install reports failure.
    pub failing_packages: Vec<String>,
    /// When set, the packager exits 1 with this stderr.
    pub packager_error: Option<String>,
    /// Packager reports success but produces no executable.
    pub skip_executable: bool,
    pub executable_bytes: Vec<u8>,
    /// Every install fails to start, as if the interpreter were missing.
    pub install_spawn_error: bool,
    /// The packager fails to start.
    pub packager_spawn_error: bool,
}

#[cfg(test)]
impl Invocation {
    /// Value of a `--flag=value` style argument, if present.
    pub fn flag_value(&self, flag: &str) -> Option<&str> {
        let prefix = format!("{}=", flag);
        self.args.iter().find_map(|a| a.strip_prefix(prefix.as_str()))
    }
}

#[cfg(test)]
impl MockSystem {
    pub fn new() -> Self {
        Self {
            executable_bytes: b"\x7fELF fake executable".to_vec(),
            ..Default::default()
        }
    }

    pub fn failing_packager(stderr: &str) -> Self {
        Self {
            packager_error: Some(stderr.to_string()),
            ..Self::new()
        }
    }
}

#[cfg(test)]
impl BuildOps for MockSystem {
    fn install_package(&self, invocation: &Invocation) -> Result<bool> {
        let package = invocation.args.last().cloned().unwrap_or_default();
        self.installed.lock().unwrap().push(package.clone());
        if self.install_spawn_error {
            anyhow::bail!("failed to execute {}", invocation.program);
        }
        Ok(!self.failing_packages.contains(&package))
    }

    fn run_packager(&self, invocation: &Invocation) -> Result<PackagerOutput> {
        self.packager_calls.lock().unwrap().push(invocation.clone());
        if self.packager_spawn_error {
            anyhow::bail!("failed to execute {}", invocation.program);
        }

        if let Some(stderr) = &self.packager_error {
            return Ok(PackagerOutput {
                success: false,
                code: Some(1),
                stdout: String::new(),
                stderr: stderr.clone(),
            });
        }

        let cwd = &invocation.cwd;
        let name = invocation.flag_value("--name").unwrap_or("app");
        let dist = cwd.join(invocation.flag_value("--distpath").unwrap_or("dist"));
        let work = cwd.join(invocation.flag_value("--workpath").unwrap_or("build"));

        std::fs::create_dir_all(work.join(name))?;
        std::fs::write(work.join(name).join("warn.txt"), "analysis")?;
        std::fs::write(cwd.join(format!("{}.spec", name)), "# generated")?;
        std::fs::create_dir_all(&dist)?;
        if !self.skip_executable {
            let exe = dist.join(format!("{}{}", name, std::env::consts::EXE_SUFFIX));
            std::fs::write(exe, &self.executable_bytes)?;
        }

        Ok(PackagerOutput {
            success: true,
            code: Some(0),
            ..Default::default()
        })
    }
}
