use anyhow::{Context, Result};
use serde_json::{Value, json};

use crate::types::{GenerateOptions, LLMClient, LLMMessage, LLMMessageType};

use super::models::{GeminiResponse, InlineData};

fn convert_body_parts_gemini(body_part: Vec<LLMMessageType>) -> Vec<Value> {
    body_part
        .into_iter()
        .map(|part| match part {
            LLMMessageType::TEXT(text) => json!({ "text": text }),
            LLMMessageType::IMAGE {
                data_b64,
                mime_type,
            } => json!({
                "inlineData": {
                    "mimeType": mime_type,
                    "data": data_b64
                }
            }),
        })
        .collect()
}

/// Builds a generateContent body: one `user` content per message, plus
/// `generationConfig` when response modalities are requested.
pub fn build_generate_body(messages: Vec<LLMMessage>, options: &GenerateOptions) -> Value {
    let contents: Vec<Value> = messages
        .into_iter()
        .map(|m| {
            json!({
                "role": "user",
                "parts": convert_body_parts_gemini(m.content)
            })
        })
        .collect();

    let mut body = json!({ "contents": contents });

    if !options.response_modalities.is_empty() {
        body["generationConfig"] = json!({
            "responseModalities": options.response_modalities
        });
    }

    body
}

pub async fn send_generate_request(
    api_client: &LLMClient,
    messages: Vec<LLMMessage>,
    options: &GenerateOptions,
) -> Result<GeminiResponse> {
    let endpoint = api_client.endpoint().trim_end_matches('/');
    let model = api_client.default_model();
    let model = model.strip_prefix("models/").unwrap_or(model);
    let url = format!("{endpoint}/{model}:generateContent");

    let body = build_generate_body(messages, options);

    let response = api_client
        .http
        .post(&url)
        .header("x-goog-api-key", api_client.api_key())
        .header("Content-Type", "application/json")
        .json(&body)
        .send()
        .await
        .with_context(|| format!("HTTP request to {url} failed"))?;

    let status = response.status();
    let response_text = response
        .text()
        .await
        .context("Reading response body failed")?;

    if !status.is_success() {
        return Err(anyhow::anyhow!(
            "Gemini generateContent failed: status {} body {}",
            status,
            response_text
        ));
    }

    let response: GeminiResponse = serde_json::from_str(&response_text).with_context(|| {
        format!(
            "Failed to decode Gemini response JSON. Raw response: {}",
            response_text
        )
    })?;

    Ok(response)
}

/// First non-empty inline payload across all candidates.
pub fn first_inline_image(response: &GeminiResponse) -> Option<&InlineData> {
    response
        .candidates
        .iter()
        .flat_map(|candidate| candidate.content.parts.iter())
        .filter_map(|part| part.inline_data.as_ref())
        .find(|inline_data| !inline_data.data.trim().is_empty())
}

pub fn response_to_text_data(response: &GeminiResponse) -> Result<String> {
    // only the first candidate is used
    let Some(candidate) = response.candidates.first() else {
        let reason = response
            .prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.as_deref())
            .unwrap_or("none given");
        return Err(anyhow::anyhow!("No candidates found (block reason: {reason})"));
    };

    let mut full_text = String::new();
    for part in &candidate.content.parts {
        if let Some(text) = &part.text {
            full_text.push_str(text);
        }
    }
    Ok(full_text)
}
