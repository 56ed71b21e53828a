//! Implementation of `spwn-cmpl build`.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::builder::{
    wrapper_path, BuildReport, FixedRuntime, PackageBuilder, RuntimeInstall, RuntimeLocator,
};
use crate::core::{PackageManifest, Platform};
use crate::ops::cmpl_resolve::{resolve, ResolveOptions};
use crate::util::Config;

/// Options for the build command.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Entry source file
    pub entry: PathBuf,

    /// Output directory (default: config, then `./bin`)
    pub out_dir: Option<PathBuf>,

    /// Output file name (default: platform name plus executable extension)
    pub name: Option<String>,

    /// Extra files to include without scanning them for imports
    pub includes: Vec<PathBuf>,

    /// Arguments passed through to the runtime
    pub pass_through: Option<String>,

    /// Explicit runtime executable
    pub runtime: Option<PathBuf>,

    /// Explicit wrapper stub
    pub wrapper: Option<PathBuf>,

    /// Directory holding the wrapper stubs
    pub containers_dir: Option<PathBuf>,

    /// Platform to pick the wrapper and extension for (default: config,
    /// then the host)
    pub platform: Option<Platform>,

    /// Show a progress bar while staging
    pub progress: bool,
}

impl BuildOptions {
    /// Options with defaults for everything but the entry file.
    pub fn new(entry: impl Into<PathBuf>) -> Self {
        BuildOptions {
            entry: entry.into(),
            out_dir: None,
            name: None,
            includes: Vec::new(),
            pass_through: None,
            runtime: None,
            wrapper: None,
            containers_dir: None,
            platform: None,
            progress: false,
        }
    }
}

/// Result of a build.
#[derive(Debug, Clone)]
pub struct BuildResult {
    /// Files found by following imports
    pub imports: Vec<PathBuf>,

    /// Files embedded in the payload
    pub manifest: PackageManifest,

    /// Artifact sizes and location
    pub report: BuildReport,
}

/// Build a standalone executable.
///
/// `locator` finds the runtime when neither the options nor the config name
/// one explicitly. Relative paths are taken relative to `cwd`.
pub fn build(
    opts: &BuildOptions,
    config: &Config,
    locator: &dyn RuntimeLocator,
    cwd: &Path,
) -> Result<BuildResult> {
    tracing::info!("Getting paths");
    let platform = opts
        .platform
        .or(config.build.platform)
        .unwrap_or_else(Platform::host);
    tracing::debug!("Platform: {}", platform);

    let runtime = locate_runtime(opts, config, locator, cwd)?;
    let wrapper = select_wrapper(opts, config, platform, cwd)?;
    tracing::debug!("Wrapper: {}", wrapper.display());

    let resolved = resolve(
        &ResolveOptions {
            entry: opts.entry.clone(),
            includes: opts.includes.clone(),
            stdlib: Some(runtime.stdlib.clone()),
        },
        cwd,
    )?;

    let output = output_path(opts, config, platform, cwd);

    tracing::info!("Creating executable");
    let report = PackageBuilder::new(runtime, wrapper)
        .subcommand(config.subcommand())
        .pass_through(opts.pass_through.clone().or_else(|| config.build.args.clone()))
        .progress(opts.progress)
        .build(&resolved.manifest, &output)?;

    tracing::debug!(
        "Written exe data: {} bytes (runtime {}, payload {})",
        report.total_size,
        report.runtime_size,
        report.payload_size
    );

    Ok(BuildResult {
        imports: resolved.imports,
        manifest: resolved.manifest,
        report,
    })
}

/// Find the runtime: `--runtime`, then `runtime.path`, then the locator.
fn locate_runtime(
    opts: &BuildOptions,
    config: &Config,
    locator: &dyn RuntimeLocator,
    cwd: &Path,
) -> Result<RuntimeInstall> {
    let explicit = opts
        .runtime
        .as_ref()
        .or(config.runtime.path.as_ref())
        .map(|p| FixedRuntime(cwd.join(p)));

    let locator: &dyn RuntimeLocator = match &explicit {
        Some(fixed) => fixed,
        None => locator,
    };

    let mut install = RuntimeInstall::discover(locator, config.runtime_name())?;
    if let Some(stdlib) = &config.runtime.stdlib {
        install = install.with_stdlib(cwd.join(stdlib));
    }
    Ok(install)
}

/// Pick the wrapper stub: `--wrapper`, then `build.wrapper`, then the
/// platform's stub in the containers directory.
fn select_wrapper(
    opts: &BuildOptions,
    config: &Config,
    platform: Platform,
    cwd: &Path,
) -> Result<PathBuf> {
    if let Some(wrapper) = opts.wrapper.as_ref().or(config.build.wrapper.as_ref()) {
        return Ok(cwd.join(wrapper));
    }

    if platform == Platform::Unknown {
        bail!(
            "no wrapper stub for this platform ({})\n\
             hint: pass `--wrapper <path>` to use a stub built for it",
            std::env::consts::OS
        );
    }

    let containers = match opts.containers_dir.as_ref().or(config.build.containers_dir.as_ref()) {
        Some(dir) => cwd.join(dir),
        None => default_containers_dir()?,
    };
    Ok(wrapper_path(&containers, platform))
}

/// `containers/` next to the spwn-cmpl executable.
pub fn default_containers_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("failed to locate the spwn-cmpl executable")?;
    let dir = exe.parent().unwrap_or(Path::new("."));
    Ok(dir.join("containers"))
}

fn output_path(opts: &BuildOptions, config: &Config, platform: Platform, cwd: &Path) -> PathBuf {
    let dir = opts.out_dir.clone().unwrap_or_else(|| config.out_dir());
    let name = opts
        .name
        .clone()
        .unwrap_or_else(|| platform.default_artifact_name());
    cwd.join(dir).join(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{BuildError, PathLookup};
    use crate::core::ArtifactFooter;
    use crate::resolver::ResolveError;
    use crate::test_support::{ProjectFixture, RuntimeFixture};
    use std::fs::{self, File};

    fn project() -> crate::test_support::WrittenProject {
        ProjectFixture::new()
            .file("main.spwn", "import \"./a.spwn\"\nimport std\n")
            .file("a.spwn", "import \"b\"\n")
            .file("libraries/b/lib.spwn", "return {}\n")
            .file("assets/level.txt", "level")
            .write()
    }

    #[test]
    fn test_build_end_to_end() {
        let runtime = RuntimeFixture::new().write();
        let project = project();

        let mut opts = BuildOptions::new("main.spwn");
        opts.platform = Some(Platform::Linux);
        opts.containers_dir = Some(runtime.containers.clone());
        opts.includes = vec![PathBuf::from("assets")];

        let result = build(
            &opts,
            &Config::default(),
            &FixedRuntime(runtime.exe.clone()),
            project.root(),
        )
        .unwrap();

        assert_eq!(result.imports.len(), 2);
        assert_eq!(result.manifest.file_count(), 4);
        assert_eq!(result.report.output, project.path("bin/linux"));
        assert_eq!(result.report.command, "b main.spwn");

        let mut file = File::open(&result.report.output).unwrap();
        let (footer, layout) = ArtifactFooter::read_from(&mut file).unwrap();
        assert_eq!(footer.payload_size, result.report.payload_size);
        assert_eq!(layout.runtime.start, result.report.wrapper_size);
    }

    #[test]
    fn test_config_supplies_defaults() {
        let runtime = RuntimeFixture::new().write();
        let project = project();

        let mut config = Config::default();
        config.runtime.path = Some(runtime.exe.clone());
        config.build.wrapper = Some(runtime.wrapper.clone());
        config.build.out_dir = Some(PathBuf::from("dist"));
        config.build.args = Some("--no-level".to_string());

        let mut opts = BuildOptions::new("main.spwn");
        opts.name = Some("game".to_string());

        // The locator would fail; the configured runtime path wins.
        let result = build(&opts, &config, &PathLookup, project.root()).unwrap();

        assert_eq!(result.report.output, project.path("dist/game"));
        assert_eq!(result.report.command, "b main.spwn --no-level");
    }

    #[test]
    fn test_config_platform_picks_wrapper_and_name() {
        let runtime = RuntimeFixture::new().write();
        let project = project();
        fs::write(runtime.containers.join("windows"), b"WINDOWS STUB").unwrap();

        let mut config = Config::default();
        config.build.platform = Some(Platform::Windows);
        config.build.containers_dir = Some(runtime.containers.clone());

        let result = build(
            &BuildOptions::new("main.spwn"),
            &config,
            &FixedRuntime(runtime.exe.clone()),
            project.root(),
        )
        .unwrap();

        assert_eq!(result.report.output, project.path("bin/windows.exe"));
        let bytes = fs::read(&result.report.output).unwrap();
        assert!(bytes.starts_with(b"WINDOWS STUB"));
    }

    #[test]
    fn test_missing_dependency_aborts_before_output() {
        let runtime = RuntimeFixture::new().write();
        let project = ProjectFixture::new()
            .file("main.spwn", "import ./gone.spwn\n")
            .write();

        let mut opts = BuildOptions::new("main.spwn");
        opts.wrapper = Some(runtime.wrapper.clone());

        let err = build(
            &opts,
            &Config::default(),
            &FixedRuntime(runtime.exe.clone()),
            project.root(),
        )
        .unwrap_err();

        assert!(err.downcast_ref::<ResolveError>().is_some());
        assert!(!project.path("bin").exists());
    }

    #[test]
    fn test_runtime_not_found() {
        let project = project();
        let mut config = Config::default();
        config.runtime.name = Some("spwn-cmpl-no-such-runtime-3f9a".to_string());

        let err = build(
            &BuildOptions::new("main.spwn"),
            &config,
            &PathLookup,
            project.root(),
        )
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<BuildError>(),
            Some(BuildError::RuntimeNotFound { .. })
        ));
    }

    #[test]
    fn test_unknown_platform_needs_wrapper() {
        let runtime = RuntimeFixture::new().write();
        let project = project();

        let mut opts = BuildOptions::new("main.spwn");
        opts.platform = Some(Platform::Unknown);

        let err = build(
            &opts,
            &Config::default(),
            &FixedRuntime(runtime.exe.clone()),
            project.root(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("no wrapper stub"));
    }
}
