//! Generation orchestration: validation, fan-out, recording

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use log::{error, info};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::config::StudioConfig;
use crate::dispatch;
use crate::error::StudioError;
use crate::gemini::{GeminiClient, ImageGenerator};
use crate::images;
use crate::models::{GeneratedImage, GenerationInputs, GenerationParameters, Session};
use crate::state::AppState;
use crate::store::SessionStore;

/// Seconds-elapsed ticker giving feedback during a batch. The counting task
/// is aborted on [`stop`](ProgressTimer::stop) and again on drop, so every
/// exit path shuts it down.
pub struct ProgressTimer {
    handle: JoinHandle<()>,
}

impl ProgressTimer {
    /// Resets the counter to zero and starts ticking it once per second
    pub fn start(counter: Arc<AtomicU64>) -> Self {
        counter.store(0, Ordering::SeqCst);
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            // the first tick resolves immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });
        Self { handle }
    }

    /// Stops the ticker. Consumes the timer, it cannot be stopped twice.
    pub fn stop(self) {
        self.handle.abort();
    }
}

impl Drop for ProgressTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Drives the whole generate flow and owns the session history
pub struct StudioEngine {
    config: StudioConfig,
    state: AppState,
    store: SessionStore,
    generator: Arc<dyn ImageGenerator>,
    progress: Arc<AtomicU64>,
}

impl StudioEngine {
    /// Engine with an injected backend, for embedding and tests
    pub fn new(
        config: StudioConfig,
        generator: Arc<dyn ImageGenerator>,
        store: SessionStore,
    ) -> Self {
        Self {
            config,
            state: AppState::new(),
            store,
            generator,
            progress: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Engine wired to the live service, with storage from the config
    pub fn with_gemini(config: StudioConfig) -> Result<Self, StudioError> {
        let generator = Arc::new(GeminiClient::new(config.base_url.clone()));
        let store = match &config.database_path {
            Some(db_path) => SessionStore::open(db_path.clone())?,
            None => SessionStore::in_memory(),
        };
        Ok(Self::new(config, generator, store))
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// All state writes go through [`AppState`]'s named transitions
    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    /// Seconds elapsed in the current or most recent batch
    pub fn progress_seconds(&self) -> u64 {
        self.progress.load(Ordering::SeqCst)
    }

    /// Runs one batch end to end: validate, fan out one request per selected
    /// pose, and on all-success record a session. Returns the new session id.
    ///
    /// Any failure surfaces through both the returned error and the state's
    /// failure message; a failed batch records nothing.
    pub async fn generate(&mut self) -> Result<String, StudioError> {
        self.state.begin_validation();

        let Some(api_key) = self.config.resolve_api_key() else {
            let err = StudioError::Validation(
                "API Key missing. Please provide your API key.".to_string(),
            );
            self.state.finish_failure(err.user_message());
            return Err(err);
        };

        if let Err(err) = self.state.validate_required_inputs() {
            self.state.finish_failure(err.user_message());
            return Err(err);
        }

        // Snapshot before dispatch; edits made mid-flight must not leak in
        let inputs = self.state.inputs().clone();
        let parameters = self.state.parameters();

        info!(
            "[generate] starting batch: {} poses, model {}",
            parameters.pose_ids.len(),
            parameters.model.model_name()
        );

        self.state.begin_generation();
        let timer = ProgressTimer::start(Arc::clone(&self.progress));

        let result = dispatch::dispatch_batch(
            self.generator.as_ref(),
            &api_key,
            &inputs,
            &parameters,
            self.config.temperature,
            &self.config.aspect_ratio,
        )
        .await;
        timer.stop();

        let outputs = match result {
            Ok(outputs) => outputs,
            Err(err) => {
                error!(
                    "[generate] batch failed after {}s: {}",
                    self.progress_seconds(),
                    err
                );
                self.state.finish_failure(err.user_message());
                return Err(err);
            }
        };

        match self.record_outcome(inputs, parameters, outputs) {
            Ok(session_id) => {
                info!(
                    "[generate] batch succeeded after {}s, session {}",
                    self.progress_seconds(),
                    session_id
                );
                self.state.finish_success();
                Ok(session_id)
            }
            Err(err) => {
                error!("[generate] failed to record session: {}", err);
                self.state.finish_failure(err.user_message());
                Err(err)
            }
        }
    }

    /// Persists outputs and records the session. With an output directory
    /// configured the images land on disk and the session references files;
    /// otherwise the session carries the images inline as data URLs.
    fn record_outcome(
        &mut self,
        inputs: GenerationInputs,
        parameters: GenerationParameters,
        generated: Vec<GeneratedImage>,
    ) -> Result<String, StudioError> {
        let session_id = Uuid::new_v4().to_string();

        let (outputs, thumbnail) = match &self.config.output_dir {
            Some(output_dir) => {
                let mut outputs = Vec::with_capacity(generated.len());
                for (index, image) in generated.iter().enumerate() {
                    let path = images::save_output(output_dir, &session_id, index, image)?;
                    outputs.push(path.to_string_lossy().into_owned());
                }
                let thumbnail = match generated.first() {
                    Some(first) => {
                        let png = images::create_thumbnail(&first.data)?;
                        let path = images::save_thumbnail(output_dir, &session_id, &png)?;
                        Some(path.to_string_lossy().into_owned())
                    }
                    None => None,
                };
                (outputs, thumbnail)
            }
            None => (
                generated.iter().map(|image| image.to_data_url()).collect(),
                None,
            ),
        };

        let session = Session {
            id: session_id.clone(),
            timestamp: Utc::now().timestamp_millis(),
            inputs,
            parameters,
            outputs,
            thumbnail,
        };
        self.store.record_session(session)?;
        Ok(session_id)
    }

    /// Deletes one session along with its stored output files
    pub fn delete_session(&mut self, id: &str) -> Result<bool, StudioError> {
        match self.store.delete_session(id)? {
            Some(session) => {
                images::remove_session_files(&session);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Clears the whole history and every stored output file
    pub fn clear_history(&mut self) -> Result<usize, StudioError> {
        let removed = self.store.clear()?;
        for session in &removed {
            images::remove_session_files(session);
        }
        Ok(removed.len())
    }
}
