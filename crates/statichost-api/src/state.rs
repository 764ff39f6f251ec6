//! Application state.

use std::path::PathBuf;
use std::sync::Arc;

use statichost_core::CompilerConfig;
use statichost_core::executor::Executor;
use statichost_pipeline::{DeployPipeline, StatusQuery};

/// Shared application state. The executor is constructed once at process
/// start and injected everywhere it is needed.
#[derive(Clone)]
pub struct AppState {
    pub executor: Arc<dyn Executor>,
    pub pipeline: Arc<DeployPipeline>,
    pub status: Arc<StatusQuery>,
    pub secret: Arc<str>,
}

impl AppState {
    pub fn new(
        executor: Arc<dyn Executor>,
        root: PathBuf,
        compiler: CompilerConfig,
        secret: String,
    ) -> Self {
        let pipeline = Arc::new(DeployPipeline::new(
            executor.clone(),
            root.clone(),
            compiler.clone(),
        ));
        let status = Arc::new(StatusQuery::new(executor.clone(), root, compiler));

        Self {
            executor,
            pipeline,
            status,
            secret: secret.into(),
        }
    }
}
