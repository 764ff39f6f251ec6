//! Test doubles shared across this crate's test modules.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use statichost_core::executor::{Executor, JobOutput, JobSpec};
use statichost_core::{Error, Result};

/// Scripted response for one job name.
#[derive(Debug, Clone, Copy)]
pub enum Scripted {
    Ok(&'static str),
    Fail(&'static str),
    Unavailable,
}

/// An `Executor` double that records every `JobSpec` it receives and
/// answers from a per-job-name script. Jobs without a script entry
/// succeed with empty output.
pub struct ScriptedExecutor {
    reachable: bool,
    script: HashMap<&'static str, Scripted>,
    calls: Mutex<Vec<JobSpec>>,
}

impl ScriptedExecutor {
    pub fn all_ok() -> Self {
        Self {
            reachable: true,
            script: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            reachable: false,
            ..Self::all_ok()
        }
    }

    pub fn with(mut self, job: &'static str, response: Scripted) -> Self {
        self.script.insert(job, response);
        self
    }

    pub fn calls(&self) -> Vec<JobSpec> {
        self.calls.lock().unwrap().clone()
    }

    pub fn job_names(&self) -> Vec<String> {
        self.calls().into_iter().map(|spec| spec.name).collect()
    }
}

#[async_trait]
impl Executor for ScriptedExecutor {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn ping(&self) -> bool {
        self.reachable
    }

    async fn run(&self, spec: JobSpec) -> Result<JobOutput> {
        let response = self.script.get(spec.name.as_str()).copied();
        self.calls.lock().unwrap().push(spec.clone());
        match response {
            Some(Scripted::Fail(output)) => Err(Error::JobExecutionFailed {
                job: spec.name,
                output: output.to_string(),
            }),
            Some(Scripted::Unavailable) => {
                Err(Error::ExecutorUnavailable("scripted outage".to_string()))
            }
            Some(Scripted::Ok(output)) => Ok(JobOutput {
                output: output.to_string(),
            }),
            None => Ok(JobOutput {
                output: String::new(),
            }),
        }
    }
}
