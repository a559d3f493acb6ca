use super::context::FieldStore;
use super::core::{PipelineResult, Stage, StageResult};
use crate::config::PipelineConfig;
use crate::error::StreelityResult;
use crate::logger::{self, LogLevel};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use uuid::Uuid;

const LOG_SOURCE: &str = "pipeline";

/// Drives a stage tree and exposes the fields it produced
///
/// A pipeline is built per request, run once, read, and dropped. Running
/// it a second time re-executes every stage and appends duplicate entries.
///
/// # Example
/// ```
/// use streelity::error::StreelityError;
/// use streelity::pipeline::{Pipeline, Record, Stage};
///
/// let mut first = Stage::new(|| Ok::<_, StreelityError>(Record::new().with("X", "a")));
/// first.next(|| Ok::<_, StreelityError>(Record::new().with("X", "b")));
///
/// let mut pipeline = Pipeline::new();
/// pipeline.set_first(first);
/// pipeline.run().unwrap();
///
/// assert_eq!(pipeline.get_string("X"), vec!["a", "b"]);
/// assert_eq!(pipeline.get_string_first_or_default("X"), "a");
/// ```
pub struct Pipeline<'a> {
    config: PipelineConfig,
    run_id: Uuid,
    first: Option<Stage<'a>>,
    store: FieldStore,
    last_result: Option<PipelineResult>,
}

impl<'a> Pipeline<'a> {
    /// Empty pipeline with the default config; running it is a no-op success
    pub fn new() -> Self {
        Self::with_config(PipelineConfig::default())
    }

    pub fn with_config(config: PipelineConfig) -> Self {
        Self {
            config,
            run_id: Uuid::new_v4(),
            first: None,
            store: FieldStore::new(),
            last_result: None,
        }
    }

    pub fn builder(name: impl Into<String>) -> PipelineBuilder<'a> {
        PipelineBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Identifier attached to every log line of this pipeline
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn set_first(&mut self, stage: Stage<'a>) {
        self.first = Some(stage);
    }

    pub fn first(&self) -> Option<&Stage<'a>> {
        self.first.as_ref()
    }

    /// Number of stages reachable from the entry stage
    pub fn stage_count(&self) -> usize {
        self.first.as_ref().map(Stage::stage_count).unwrap_or(0)
    }

    /// Execute the stage tree depth-first, stopping at the first error
    ///
    /// Fields from stages that succeeded before the failure stay in the
    /// store; callers normally ignore them once `run` has failed.
    pub fn run(&mut self) -> StreelityResult<()> {
        self.log(
            LogLevel::Info,
            &format!(
                "Starting pipeline '{}' with {} stages (run: {})",
                self.config.name,
                self.stage_count(),
                self.run_id
            ),
        );

        let pipeline_start = Instant::now();
        let mut stage_results = Vec::new();

        let outcome = match self.first.take() {
            Some(first) => {
                let outcome = self.execute_stage(&first, "0".to_string(), &mut stage_results);
                self.first = Some(first);
                outcome
            }
            None => Ok(()),
        };

        let total_duration = self.elapsed(pipeline_start);
        let error = outcome.as_ref().err().map(ToString::to_string);

        match &error {
            None => {
                self.log(
                    LogLevel::Info,
                    &format!(
                        "Pipeline '{}' completed: {} stages, {} fields in {:.3}ms (run: {})",
                        self.config.name,
                        stage_results.len(),
                        self.store.len(),
                        total_duration.as_secs_f64() * 1000.0,
                        self.run_id
                    ),
                );
                if self.config.log_fields {
                    self.log(
                        LogLevel::Debug,
                        &format!("Pipeline '{}' fields: {}", self.config.name, self.store.to_json()),
                    );
                }
            }
            Some(message) => {
                self.log(
                    LogLevel::Warn,
                    &format!(
                        "Pipeline '{}' failed: {} (run: {})",
                        self.config.name, message, self.run_id
                    ),
                );
            }
        }

        self.last_result = Some(PipelineResult {
            pipeline_name: self.config.name.clone(),
            run_id: self.run_id.to_string(),
            success: error.is_none(),
            stage_results,
            total_duration,
            error,
        });

        outcome
    }

    fn execute_stage(
        &mut self,
        stage: &Stage<'a>,
        path: String,
        stage_results: &mut Vec<StageResult>,
    ) -> StreelityResult<()> {
        let label = stage.label();
        self.log(
            LogLevel::Debug,
            &format!(
                "Executing stage {} {} (run: {})",
                path,
                label.unwrap_or("<anonymous>"),
                self.run_id
            ),
        );

        let stage_start = Instant::now();
        match stage.compute() {
            Ok(record) => {
                let fields = self.store.append_record(record);
                let duration = self.elapsed(stage_start);
                stage_results.push(StageResult::success(&path, label, fields, duration));
            }
            Err(e) => {
                let duration = self.elapsed(stage_start);
                let message = e.to_string();
                self.log_failure(&path, label, &message);
                stage_results.push(StageResult::failure(&path, label, &message, duration));
                return Err(e);
            }
        }

        for (index, successor) in stage.successors().iter().enumerate() {
            self.execute_stage(successor, format!("{}.{}", path, index), stage_results)?;
        }

        Ok(())
    }

    fn elapsed(&self, start: Instant) -> Duration {
        if self.config.record_timings {
            start.elapsed()
        } else {
            Duration::ZERO
        }
    }

    fn log(&self, level: LogLevel, message: &str) {
        logger::log(self.config.log_level, level, LOG_SOURCE, message);
    }

    fn log_failure(&self, path: &str, label: Option<&str>, message: &str) {
        let mut context = HashMap::new();
        context.insert("pipeline".to_string(), serde_json::json!(self.config.name));
        context.insert("run_id".to_string(), serde_json::json!(self.run_id.to_string()));
        context.insert("path".to_string(), serde_json::json!(path));
        if let Some(label) = label {
            context.insert("stage".to_string(), serde_json::json!(label));
        }
        logger::log_with_context(
            self.config.log_level,
            LogLevel::Warn,
            LOG_SOURCE,
            &format!("Stage {} failed: {}", path, message),
            &context,
        );
    }

    /// Report of the most recent `run`, if any
    pub fn last_result(&self) -> Option<&PipelineResult> {
        self.last_result.as_ref()
    }

    pub fn store(&self) -> &FieldStore {
        &self.store
    }

    pub fn into_store(self) -> FieldStore {
        self.store
    }

    pub fn get_string(&self, name: &str) -> Vec<String> {
        self.store.strings(name)
    }

    pub fn get_int(&self, name: &str) -> Vec<i64> {
        self.store.ints(name)
    }

    pub fn get_float(&self, name: &str) -> Vec<f64> {
        self.store.floats(name)
    }

    pub fn get_string_first_or_default(&self, name: &str) -> String {
        self.store.first_string(name)
    }

    pub fn get_int_first_or_default(&self, name: &str) -> i64 {
        self.store.first_int(name)
    }

    pub fn get_float_first_or_default(&self, name: &str) -> f64 {
        self.store.first_float(name)
    }

    pub fn try_get_string(&self, name: &str) -> Option<String> {
        self.store.try_string(name)
    }

    pub fn try_get_int(&self, name: &str) -> Option<i64> {
        self.store.try_int(name)
    }

    pub fn try_get_float(&self, name: &str) -> Option<f64> {
        self.store.try_float(name)
    }
}

impl Default for Pipeline<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing pipelines
pub struct PipelineBuilder<'a> {
    config: PipelineConfig,
    first: Option<Stage<'a>>,
}

impl<'a> PipelineBuilder<'a> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            config: PipelineConfig::default().with_name(name),
            first: None,
        }
    }

    /// Apply a loaded config, keeping the builder's name
    pub fn config(mut self, config: PipelineConfig) -> Self {
        let name = std::mem::take(&mut self.config.name);
        self.config = config.with_name(name);
        self
    }

    pub fn first(mut self, stage: Stage<'a>) -> Self {
        self.first = Some(stage);
        self
    }

    pub fn build(self) -> Pipeline<'a> {
        let mut pipeline = Pipeline::with_config(self.config);
        pipeline.first = self.first;
        pipeline
    }
}
