//! Concurrent fan-out of one generation request per selected pose

use futures_util::future::join_all;
use log::{error, info};

use crate::error::StudioError;
use crate::gemini::ImageGenerator;
use crate::models::{GeneratedImage, GenerationInputs, GenerationParameters};
use crate::poses;
use crate::prompts;
use crate::request::{self, GenerateContentRequest};

/// Builds one request per pose id, all sharing the same input snapshot
fn build_batch(
    inputs: &GenerationInputs,
    parameters: &GenerationParameters,
    temperature: f32,
    aspect_ratio: &str,
) -> Result<Vec<GenerateContentRequest>, StudioError> {
    let mut requests = Vec::with_capacity(parameters.pose_ids.len());
    for pose_id in &parameters.pose_ids {
        let pose = poses::find_pose(parameters.gender, pose_id).ok_or_else(|| {
            StudioError::Validation(format!("Unknown pose id: {}", pose_id))
        })?;
        let prompt = prompts::compose_prompt(parameters.background_mode, pose);
        requests.push(request::build_request(
            prompt,
            inputs,
            temperature,
            aspect_ratio,
        ));
    }
    Ok(requests)
}

/// Issues all requests concurrently and waits for every one to settle.
///
/// The batch is all-or-nothing: outputs come back index-aligned with
/// `parameters.pose_ids`, and any failure fails the whole batch with the
/// error of the earliest failing pose. In-flight siblings are never
/// cancelled and there are no retries.
pub async fn dispatch_batch(
    generator: &dyn ImageGenerator,
    api_key: &str,
    inputs: &GenerationInputs,
    parameters: &GenerationParameters,
    temperature: f32,
    aspect_ratio: &str,
) -> Result<Vec<GeneratedImage>, StudioError> {
    let requests = build_batch(inputs, parameters, temperature, aspect_ratio)?;
    let model = parameters.model.model_name();

    info!(
        "[dispatch_batch] dispatching {} requests with model {}",
        requests.len(),
        model
    );

    let futures = requests
        .iter()
        .map(|request| generator.generate_image(api_key, model, request));
    let results = join_all(futures).await;

    let mut outputs = Vec::with_capacity(results.len());
    for (pose_id, result) in parameters.pose_ids.iter().zip(results) {
        match result {
            Ok(image) => outputs.push(image),
            Err(e) => {
                error!("[dispatch_batch] pose {} failed: {}", pose_id, e);
                return Err(e);
            }
        }
    }

    info!("[dispatch_batch] batch complete, {} images", outputs.len());
    Ok(outputs)
}
