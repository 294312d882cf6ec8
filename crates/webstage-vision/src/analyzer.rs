//! Structured vision analysis over the raw client.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::client::{VisionClient, VisionError};
use crate::heuristic;

/// Structured answer the prompt asks the model for.
#[derive(Debug, Clone, Deserialize)]
pub struct VisionAnswer {
    pub found: bool,
    pub x: Option<f64>,
    pub y: Option<f64>,
    #[serde(default)]
    pub description: String,
}

/// What an analysis ultimately produced.
#[derive(Debug, Clone)]
pub enum VisionOutcome {
    /// The model located the element; coordinates are viewport pixels.
    Located { x: f64, y: f64, description: String },
    /// The model answered `found: false`, or the heuristic detected a
    /// position contradiction in a free-text reply.
    Rejected { description: String },
    /// The reply could not be interpreted as a located/rejected verdict;
    /// surfaced verbatim as analysis text.
    Freetext { analysis: String },
}

/// Sends screenshots to the model and interprets the reply.
pub struct VisionAnalyzer {
    client: VisionClient,
}

impl VisionAnalyzer {
    pub fn new(client: VisionClient) -> Self {
        Self { client }
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }

    /// Ask the model about a screenshot and interpret its reply.
    ///
    /// Primary path: locate and parse a structured object in the reply.
    /// Fallback: the positional heuristic, which only fires for questions
    /// that name a position and is approximate by design.
    pub async fn analyze(&self, question: &str, image_base64: &str) -> Result<VisionOutcome, VisionError> {
        let prompt = build_prompt(question);
        let reply = self.client.analyze_image(image_base64, &prompt).await?;

        if let Some(answer) = parse_structured(&reply) {
            debug!(found = answer.found, "structured vision answer parsed");
            return Ok(interpret_structured(answer, &reply));
        }

        warn!("vision reply had no parseable structure, applying positional heuristic");
        Ok(apply_heuristic(question, &reply))
    }
}

fn interpret_structured(answer: VisionAnswer, reply: &str) -> VisionOutcome {
    let description = if answer.description.is_empty() {
        reply.trim().to_string()
    } else {
        answer.description
    };
    if !answer.found {
        return VisionOutcome::Rejected { description };
    }
    match (answer.x, answer.y) {
        (Some(x), Some(y)) => VisionOutcome::Located { x, y, description },
        // found:true without coordinates is not actionable as a location.
        _ => VisionOutcome::Freetext {
            analysis: description,
        },
    }
}

fn apply_heuristic(question: &str, reply: &str) -> VisionOutcome {
    if let Some(expected) = heuristic::expected_position(question) {
        if heuristic::contradicts(reply, &expected) {
            return VisionOutcome::Rejected {
                description: format!(
                    "Reply suggests the element is not in the {} region (keyword analysis of an unstructured reply): {}",
                    expected,
                    reply.trim()
                ),
            };
        }
    }
    VisionOutcome::Freetext {
        analysis: reply.trim().to_string(),
    }
}

/// The fixed prompt template. Strict spatial semantics: a question that
/// names a position must be answered `found: false` when the element is
/// somewhere else.
fn build_prompt(question: &str) -> String {
    format!(
        r#"You are analyzing a screenshot of a web page to answer a UI test question.

Question: {question}

Respond with a single JSON object, and nothing else:
{{"found": <boolean>, "x": <number>, "y": <number>, "description": "<short explanation>"}}

Rules:
- "x" and "y" are the viewport pixel coordinates of the center of the element in question.
- Positions are strict. If the question names a position (for example "top right", "bottom", "center") and the element exists somewhere else on the page, answer "found": false and describe where it actually is.
- If the element is not present at all, answer "found": false with a description of what is there instead."#
    )
}

/// Extract the first JSON object in `reply` that carries a `found` field.
///
/// Models frequently wrap the object in prose or code fences, so this scans
/// for balanced braces (string- and escape-aware) rather than parsing the
/// whole reply.
pub fn parse_structured(reply: &str) -> Option<VisionAnswer> {
    let bytes = reply.as_bytes();
    let mut start = None;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => {
                if start.is_none() {
                    start = Some(i);
                }
                depth += 1;
            }
            b'}' => {
                if depth > 0 {
                    depth -= 1;
                    if depth == 0 {
                        let candidate = &reply[start?..=i];
                        if let Ok(answer) = serde_json::from_str::<VisionAnswer>(candidate) {
                            return Some(answer);
                        }
                        start = None;
                    }
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
#[path = "analyzer_tests.rs"]
mod tests;
