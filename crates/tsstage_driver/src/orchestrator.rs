//! The build-cycle state machine.
//!
//! ```text
//! Idle -> Collecting -> Deciding -> Skipping ----------------> Done
//!                                \-> Staging -> Compiling ---> Done
//! ```
//!
//! Any error during `finish_cycle` returns the orchestrator to `Idle`. A new
//! cycle may begin from any state; whatever an abandoned cycle collected is
//! discarded.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};

use tsstage_cache::ChangeDetector;
use tsstage_common::{OutputSlot, StagingLayout, TrackedFile};
use tsstage_config::{load_settings, ProjectConfig, Settings};
use tsstage_diagnostics::DiagnosticSink;

use crate::classifier::FileClassifier;
use crate::compiler::CompileCommand;
use crate::error::DriverError;
use crate::staging::StagingDir;

/// Where the orchestrator is within a build cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleState {
    /// No cycle in progress.
    Idle,
    /// Accepting items from the host.
    Collecting,
    /// Consulting the change detector.
    Deciding,
    /// Restoring previous output without compiling.
    Skipping,
    /// Rebuilding the staging tree.
    Staging,
    /// Running the compiler.
    Compiling,
    /// The last cycle finished successfully.
    Done,
}

impl fmt::Display for CycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CycleState::Idle => "idle",
            CycleState::Collecting => "collecting",
            CycleState::Deciding => "deciding",
            CycleState::Skipping => "skipping",
            CycleState::Staging => "staging",
            CycleState::Compiling => "compiling",
            CycleState::Done => "done",
        };
        f.write_str(name)
    }
}

/// How a finished cycle produced its output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleMode {
    /// Nothing changed; output was read back from the staging tree.
    Skipped,
    /// The staging tree was rebuilt and every compilable file compiled.
    Compiled,
}

/// The result of a successful build cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CycleOutcome {
    /// Whether compilation ran.
    pub mode: CycleMode,
    /// Compiled output keyed by the relative path of each compilable item.
    pub outputs: BTreeMap<PathBuf, String>,
}

impl CycleOutcome {
    /// Returns `true` if the cycle reused previous output.
    pub fn is_skipped(&self) -> bool {
        self.mode == CycleMode::Skipped
    }

    /// The output for the item at `relative`, if it was compiled.
    pub fn output(&self, relative: &Path) -> Option<&str> {
        self.outputs.get(relative).map(String::as_str)
    }

    /// Assigns output to every host item that has one. Returns how many
    /// items were updated.
    pub fn apply<T: OutputSlot>(&self, items: &mut [T]) -> usize {
        let mut applied = 0;
        for item in items.iter_mut() {
            if let Some(output) = self.outputs.get(item.relative_path()) {
                item.assign_output(output.clone());
                applied += 1;
            }
        }
        applied
    }
}

/// Drives staging and compilation for a host pipeline.
///
/// One orchestrator serves one project for the lifetime of the host
/// process. The cache it holds is what lets an unchanged rebuild skip the
/// compiler, so hosts that rebuild repeatedly should keep it alive.
#[derive(Debug)]
pub struct Orchestrator {
    settings: Settings,
    classifier: FileClassifier,
    staging: StagingDir,
    detector: ChangeDetector,
    project_config: ProjectConfig,
    sink: DiagnosticSink,
    state: CycleState,
    tracked: Vec<TrackedFile>,
    index: HashMap<PathBuf, usize>,
}

impl Orchestrator {
    /// Creates an orchestrator for the project at `project_root`.
    ///
    /// Relative `temp_dir` and `project_config` settings are resolved
    /// against `project_root`.
    pub fn new(project_root: &Path, settings: Settings) -> Self {
        let layout = StagingLayout::new(
            resolve(project_root, &settings.temp_dir),
            settings.normalized_output_ext(),
        );
        let project_config = ProjectConfig::new(
            resolve(project_root, &settings.project_config),
            settings.options_key.clone(),
        );
        Self {
            classifier: FileClassifier::from_settings(&settings),
            staging: StagingDir::new(layout),
            detector: ChangeDetector::new(settings.cache),
            project_config,
            sink: DiagnosticSink::new(),
            state: CycleState::Idle,
            tracked: Vec::new(),
            index: HashMap::new(),
            settings,
        }
    }

    /// Creates an orchestrator from the settings file in `project_root`.
    pub fn load(project_root: &Path) -> Result<Self, DriverError> {
        let settings = load_settings(project_root)?;
        Ok(Self::new(project_root, settings))
    }

    /// The current state.
    pub fn state(&self) -> CycleState {
        self.state
    }

    /// The settings this orchestrator was created with.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The extension classifier.
    pub fn classifier(&self) -> &FileClassifier {
        &self.classifier
    }

    /// The staging path mapping.
    pub fn layout(&self) -> &StagingLayout {
        self.staging.layout()
    }

    /// The change detector.
    pub fn detector(&self) -> &ChangeDetector {
        &self.detector
    }

    /// The project configuration location.
    pub fn project_config(&self) -> &ProjectConfig {
        &self.project_config
    }

    /// Non-fatal diagnostics emitted so far. The host drains this.
    pub fn sink(&self) -> &DiagnosticSink {
        &self.sink
    }

    /// Items collected so far in the current cycle.
    pub fn tracked(&self) -> &[TrackedFile] {
        &self.tracked
    }

    /// Translates the project configuration into compiler flags.
    pub fn flags(&self) -> Result<Vec<String>, DriverError> {
        Ok(self.project_config.load_flags(&self.sink)?)
    }

    /// Starts a build cycle. Called before the host renders anything.
    pub fn begin_cycle(&mut self) {
        if self.state == CycleState::Collecting && !self.tracked.is_empty() {
            tracing::debug!(
                "discarding {} items from an unfinished cycle",
                self.tracked.len()
            );
        }
        self.tracked.clear();
        self.index.clear();
        self.transition(CycleState::Collecting);
    }

    /// Offers a rendered item to the orchestrator.
    ///
    /// Returns `true` if the item's extension is compilable or pass-through
    /// and it was tracked, `false` if it is of no interest. An item with the
    /// same relative path as one already tracked replaces it. Paths are
    /// compared after dropping `.` components, so `./js/a.ts` and `js/a.ts`
    /// are the same item.
    pub fn add_item(&mut self, file: TrackedFile) -> Result<bool, DriverError> {
        self.expect_state(CycleState::Collecting)?;
        let relative = normalize_relative(file.relative_path())?;

        let Some(role) = self.classifier.role(&file.extension()) else {
            return Ok(false);
        };
        let file = file.with_relative_path(relative.clone()).with_role(role);
        match self.index.get(&relative).copied() {
            Some(slot) => self.tracked[slot] = file,
            None => {
                self.index.insert(relative, self.tracked.len());
                self.tracked.push(file);
            }
        }
        Ok(true)
    }

    /// Ends the cycle: skips or compiles, and returns the output.
    ///
    /// Fails fast on the first compiler error. On any failure no output is
    /// returned and the orchestrator is back in `Idle`.
    pub fn finish_cycle(&mut self) -> Result<CycleOutcome, DriverError> {
        self.expect_state(CycleState::Collecting)?;
        let files = std::mem::take(&mut self.tracked);
        self.index.clear();

        match self.run_cycle(&files) {
            Ok(outcome) => {
                self.transition(CycleState::Done);
                Ok(outcome)
            }
            Err(e) => {
                if matches!(self.state, CycleState::Staging | CycleState::Compiling) {
                    // The staging tree no longer matches the cached hashes.
                    self.detector.invalidate();
                }
                self.transition(CycleState::Idle);
                Err(e)
            }
        }
    }

    /// Deletes the staging tree and forgets the cache.
    pub fn clean(&mut self) -> Result<(), DriverError> {
        self.detector.invalidate();
        self.staging.remove()
    }

    fn run_cycle(&mut self, files: &[TrackedFile]) -> Result<CycleOutcome, DriverError> {
        self.transition(CycleState::Deciding);
        if !self
            .detector
            .needs_recompile(files, self.staging.layout(), &self.sink)
        {
            self.transition(CycleState::Skipping);
            tracing::debug!("no changes, restoring compiled output from cache");
            let mut outputs = BTreeMap::new();
            for file in files.iter().filter(|f| f.is_compilable()) {
                outputs.insert(file.relative_path().to_path_buf(), self.read_output(file)?);
            }
            return Ok(CycleOutcome {
                mode: CycleMode::Skipped,
                outputs,
            });
        }

        self.transition(CycleState::Staging);
        let flags = self.project_config.load_flags(&self.sink)?;
        let command = CompileCommand::new(&self.settings.command, self.staging.root(), &flags)?;
        self.staging.rebuild(files)?;

        self.transition(CycleState::Compiling);
        let mut outputs = BTreeMap::new();
        for file in files.iter().filter(|f| f.is_compilable()) {
            let relative = file.relative_path();
            let input = self.staging.layout().staged_path(relative);
            let result = command.run(&input)?;
            if !result.success() {
                return Err(DriverError::Compilation {
                    path: relative.to_path_buf(),
                    output: result.text,
                });
            }
            outputs.insert(relative.to_path_buf(), self.read_output(file)?);
        }

        self.detector.refresh(files)?;
        Ok(CycleOutcome {
            mode: CycleMode::Compiled,
            outputs,
        })
    }

    fn read_output(&self, file: &TrackedFile) -> Result<String, DriverError> {
        let path = self.staging.layout().output_path(file.relative_path());
        fs::read_to_string(&path).map_err(|source| DriverError::MissingOutput { path, source })
    }

    fn expect_state(&self, expected: CycleState) -> Result<(), DriverError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(DriverError::InvalidState {
                expected,
                actual: self.state,
            })
        }
    }

    fn transition(&mut self, next: CycleState) {
        tracing::trace!("build cycle {} -> {}", self.state, next);
        self.state = next;
    }
}

fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Rebuilds `path` from its normal components.
///
/// Rejects paths that are empty, absolute or climb out of the site.
fn normalize_relative(path: &Path) -> Result<PathBuf, DriverError> {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => normalized.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(DriverError::InvalidPath(path.to_path_buf()));
            }
        }
    }
    if normalized.as_os_str().is_empty() {
        return Err(DriverError::InvalidPath(path.to_path_buf()));
    }
    Ok(normalized)
}
