use crate::error::{StreelityError, StreelityResult};
use std::fmt;
use std::time::Duration;

use super::value::{IntoRecord, Record};

/// The computation behind a stage
///
/// Implementors close over whatever request data they need; the pipeline
/// passes nothing in. Plain closures are wrapped automatically by
/// [`Stage::new`], so implementing this trait directly is only worthwhile
/// for reusable, named checks.
///
/// # Example
/// ```
/// use streelity::error::StreelityResult;
/// use streelity::pipeline::{PipelineStage, Record, Stage};
///
/// struct FixedId(i64);
///
/// impl PipelineStage for FixedId {
///     fn execute(&self) -> StreelityResult<Record> {
///         Ok(Record::new().with("Id", self.0))
///     }
///
///     fn name(&self) -> Option<&str> {
///         Some("fixed id")
///     }
/// }
///
/// let stage = Stage::from_task(FixedId(3));
/// assert_eq!(stage.label(), Some("fixed id"));
/// ```
pub trait PipelineStage: Send {
    /// Produce this stage's fields, or fail and stop the pipeline
    fn execute(&self) -> StreelityResult<Record>;

    /// Label used only in logs and execution reports
    fn name(&self) -> Option<&str> {
        None
    }
}

/// Adapts a closure returning `Result<impl IntoRecord, impl Into<StreelityError>>`
struct FnStage<F>(F);

impl<F, R, E> PipelineStage for FnStage<F>
where
    F: Fn() -> Result<R, E> + Send,
    R: IntoRecord,
    E: Into<StreelityError>,
{
    fn execute(&self) -> StreelityResult<Record> {
        (self.0)().map(IntoRecord::into_record).map_err(Into::into)
    }
}

/// One step of a request pipeline, owning its successor stages
///
/// Successors run depth-first, in the order they were added, and only
/// when this stage succeeded. A stage without a computation is a root:
/// it always succeeds and contributes nothing.
///
/// # Example
/// ```
/// use streelity::error::StreelityError;
/// use streelity::pipeline::{Record, Stage};
///
/// let mut root = Stage::root();
/// root.next(|| Ok::<_, StreelityError>(Record::new().with("Name", "ATM")));
/// root.next(|| Ok::<_, StreelityError>(Record::new().with_strings("Images", ["a.png"])));
///
/// assert_eq!(root.successors().len(), 2);
/// assert_eq!(root.stage_count(), 3);
/// ```
pub struct Stage<'a> {
    task: Option<Box<dyn PipelineStage + 'a>>,
    label: Option<String>,
    successors: Vec<Stage<'a>>,
}

impl<'a> Stage<'a> {
    /// Build a stage from a zero-argument computation
    pub fn new<F, R, E>(computation: F) -> Self
    where
        F: Fn() -> Result<R, E> + Send + 'a,
        R: IntoRecord,
        E: Into<StreelityError>,
    {
        Self::from_task(FnStage(computation))
    }

    /// Same as [`Stage::new`] with a label for logs
    pub fn labelled<F, R, E>(label: impl Into<String>, computation: F) -> Self
    where
        F: Fn() -> Result<R, E> + Send + 'a,
        R: IntoRecord,
        E: Into<StreelityError>,
    {
        let mut stage = Self::new(computation);
        stage.label = Some(label.into());
        stage
    }

    pub fn from_task<T: PipelineStage + 'a>(task: T) -> Self {
        Self {
            task: Some(Box::new(task)),
            label: None,
            successors: Vec::new(),
        }
    }

    /// Pass-through stage with no computation
    pub fn root() -> Self {
        Self {
            task: None,
            label: None,
            successors: Vec::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.task.is_none()
    }

    pub fn label(&self) -> Option<&str> {
        self.label
            .as_deref()
            .or_else(|| self.task.as_ref().and_then(|task| task.name()))
    }

    /// Append a successor and return it, so deeper levels can be chained
    pub fn next_stage(&mut self, stage: Stage<'a>) -> &mut Stage<'a> {
        let index = self.successors.len();
        self.successors.push(stage);
        &mut self.successors[index]
    }

    /// Build a successor from a computation and append it
    pub fn next<F, R, E>(&mut self, computation: F) -> &mut Stage<'a>
    where
        F: Fn() -> Result<R, E> + Send + 'a,
        R: IntoRecord,
        E: Into<StreelityError>,
    {
        self.next_stage(Stage::new(computation))
    }

    /// Builder-style [`Stage::next_stage`]
    pub fn with_successor(mut self, stage: Stage<'a>) -> Self {
        self.successors.push(stage);
        self
    }

    pub fn successors(&self) -> &[Stage<'a>] {
        &self.successors
    }

    /// Number of stages in this subtree, including this one
    pub fn stage_count(&self) -> usize {
        1 + self
            .successors
            .iter()
            .map(Stage::stage_count)
            .sum::<usize>()
    }

    /// Run this stage's own computation, ignoring successors
    pub(crate) fn compute(&self) -> StreelityResult<Record> {
        match &self.task {
            Some(task) => task.execute(),
            None => Ok(Record::new()),
        }
    }
}

impl Default for Stage<'_> {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Debug for Stage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stage")
            .field("label", &self.label())
            .field("root", &self.is_root())
            .field("successors", &self.successors)
            .finish()
    }
}

/// Result of a single stage execution
#[derive(Debug, Clone)]
pub struct StageResult {
    /// Depth-first position, e.g. `0.1` for the second child of the entry stage
    pub path: String,

    pub label: Option<String>,

    pub success: bool,

    /// Error message if failed
    pub error: Option<String>,

    /// Number of field entries contributed
    pub fields: usize,

    pub duration: Duration,
}

impl StageResult {
    pub fn success(
        path: impl Into<String>,
        label: Option<&str>,
        fields: usize,
        duration: Duration,
    ) -> Self {
        Self {
            path: path.into(),
            label: label.map(str::to_string),
            success: true,
            error: None,
            fields,
            duration,
        }
    }

    pub fn failure(
        path: impl Into<String>,
        label: Option<&str>,
        error: impl Into<String>,
        duration: Duration,
    ) -> Self {
        Self {
            path: path.into(),
            label: label.map(str::to_string),
            success: false,
            error: Some(error.into()),
            fields: 0,
            duration,
        }
    }
}

/// Report of a complete pipeline run
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub pipeline_name: String,

    pub run_id: String,

    pub success: bool,

    /// One entry per executed stage, in execution order
    pub stage_results: Vec<StageResult>,

    pub total_duration: Duration,

    pub error: Option<String>,
}

impl PipelineResult {
    pub fn executed_stages(&self) -> usize {
        self.stage_results.len()
    }

    pub fn fields_contributed(&self) -> usize {
        self.stage_results.iter().map(|r| r.fields).sum()
    }

    /// Get the stage that failed (if any)
    pub fn failed_stage(&self) -> Option<&StageResult> {
        self.stage_results.iter().find(|r| !r.success)
    }
}
