// Browser transport for the match service: a chat-completions POST issued
// through `window.fetch`. Body building and reply parsing are plain functions
// so they can be exercised off the browser.
use serde::{Deserialize, Serialize};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, RequestMode, Response, window};

use super::resolver::{MatchService, ResolveError};

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

pub fn request_body(model: &str, prompt: &str) -> Result<String, ResolveError> {
    let req = ChatRequest {
        model,
        messages: [ChatMessage {
            role: "user",
            content: prompt,
        }],
        temperature: 0.0,
        max_tokens: 10,
    };
    serde_json::to_string(&req).map_err(ResolveError::Encode)
}

/// Pull `choices[0].message.content` out of a response body.
pub fn parse_reply(body: &str) -> Result<String, ResolveError> {
    let resp: ChatResponse = serde_json::from_str(body)?;
    resp.choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or(ResolveError::EmptyAnswer)
}

fn js_error_text(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{:?}", err))
}

/// Chat-completions client holding the configured credential.
pub struct ChatCompletionsService {
    endpoint: String,
    api_key: String,
    model: String,
}

impl ChatCompletionsService {
    pub fn new(endpoint: &str, api_key: &str, model: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }

    async fn post(&self, body: &str) -> Result<(u16, String), JsValue> {
        let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
        let headers = Headers::new()?;
        headers.set("Content-Type", "application/json")?;
        headers.set("Authorization", &format!("Bearer {}", self.api_key))?;

        let init = RequestInit::new();
        init.set_method("POST");
        init.set_mode(RequestMode::Cors);
        init.set_headers(&headers);
        init.set_body(&JsValue::from_str(body));
        let request = Request::new_with_str_and_init(&self.endpoint, &init)?;

        let resp: Response = JsFuture::from(win.fetch_with_request(&request))
            .await?
            .dyn_into()?;
        let text = JsFuture::from(resp.text()?).await?;
        Ok((resp.status(), text.as_string().unwrap_or_default()))
    }
}

impl MatchService for ChatCompletionsService {
    async fn complete(&self, prompt: &str) -> Result<String, ResolveError> {
        let body = request_body(&self.model, prompt)?;
        let (status, text) = self
            .post(&body)
            .await
            .map_err(|e| ResolveError::Transport(js_error_text(&e)))?;
        if !(200..300).contains(&status) {
            return Err(ResolveError::Status(status));
        }
        parse_reply(&text)
    }
}
