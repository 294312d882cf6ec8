//! Vision-assisted analysis action.

use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use webstage_protocols::{Action, ActionError, ActionResult};
use webstage_vision::VisionOutcome;

use super::{parse_params, require_string};
use crate::dispatch::{ActionContext, ActionHandler};

#[derive(Debug, Deserialize)]
struct VisionParams {
    question: String,
}

/// Screenshot the page and ask the vision model a question about it.
///
/// The screenshot is persisted either way so the caller can inspect what
/// the model saw; its name rides along on every outcome.
pub struct VisionAnalyzeHandler;

#[async_trait]
impl ActionHandler for VisionAnalyzeHandler {
    fn action(&self) -> Action {
        Action::VisionAnalyze
    }

    fn validate(&self, params: &Value) -> Result<(), ActionError> {
        require_string(params, "question").map(|_| ())
    }

    async fn execute(&self, ctx: Arc<ActionContext>, params: Value) -> Result<ActionResult, ActionError> {
        let p: VisionParams = parse_params(params)?;

        let Some(vision) = ctx.vision.clone() else {
            return Err(ActionError::Execution(
                "Vision analysis is not configured; set ANTHROPIC_API_KEY and restart".to_string(),
            ));
        };

        let page = ctx.session.ensure().await?;
        let bytes = page
            .screenshot_png()
            .await
            .map_err(|e| ActionError::Execution(format!("Failed to capture screenshot: {}", e)))?;
        let saved = ctx
            .store
            .save_png(&bytes)
            .await
            .map_err(|e| ActionError::Execution(format!("Failed to save screenshot: {}", e)))?;

        let encoded = BASE64.encode(&bytes);
        let outcome = vision
            .analyze(&p.question, &encoded)
            .await
            .map_err(|e| ActionError::Execution(format!("Vision analysis failed: {}", e)))?;

        match outcome {
            VisionOutcome::Located { x, y, description } => {
                info!(x, y, "vision located element");
                Ok(ActionResult::ok(description)
                    .with("found", json!(true))
                    .with("x", json!(x))
                    .with("y", json!(y))
                    .with("screenshot", json!(saved.name))
                    .with("path", json!(saved.path.display().to_string())))
            }
            VisionOutcome::Rejected { description } => Ok(ActionResult::fail(description)
                .with("found", json!(false))
                .with("screenshot", json!(saved.name))
                .with("path", json!(saved.path.display().to_string()))),
            VisionOutcome::Freetext { analysis } => Ok(ActionResult::ok("Vision analysis complete")
                .with("analysis", json!(analysis))
                .with("screenshot", json!(saved.name))
                .with("path", json!(saved.path.display().to_string()))),
        }
    }
}
