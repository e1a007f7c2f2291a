//! # sb-chat-http
//!
//! `ChatClient` over the platform's Web API: `chat.postMessage` for
//! outbound replies and `users.info` for display names. Bearer-token auth,
//! JSON bodies, bounded timeouts; API-level failures (`ok: false`) are
//! errors, not silent drops.

use anyhow::Context;
use async_trait::async_trait;
use sb_core::models::Reply;
use sb_core::traits::ChatClient;
use serde_json::{json, Value};
use std::time::Duration;

pub struct HttpChatClient {
    base_url: String,
    token: String,
    client: reqwest::Client,
}

impl HttpChatClient {
    pub fn new(base_url: String, token: String) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("building chat client")?;
        Ok(Self { base_url: base_url.trim_end_matches('/').to_string(), token, client })
    }

    /// Checks the platform's `ok` envelope field on an API response.
    fn check_ok(method: &str, body: &Value) -> anyhow::Result<()> {
        if body["ok"].as_bool() == Some(true) {
            Ok(())
        } else {
            let detail = body["error"].as_str().unwrap_or("unknown error");
            anyhow::bail!("{method} failed: {detail}")
        }
    }
}

#[async_trait]
impl ChatClient for HttpChatClient {
    async fn post_message(&self, reply: &Reply) -> anyhow::Result<()> {
        let mut payload = json!({
            "channel": reply.channel,
            "text": reply.text,
        });
        if let Some(thread) = &reply.thread {
            payload["thread_ts"] = json!(thread);
        }
        if let Some(blocks) = &reply.blocks {
            payload["blocks"] = blocks.clone();
        }

        let body: Value = self
            .client
            .post(format!("{}/chat.postMessage", self.base_url))
            .bearer_auth(&self.token)
            .json(&payload)
            .send()
            .await
            .context("posting chat message")?
            .json()
            .await
            .context("decoding chat.postMessage response")?;
        Self::check_ok("chat.postMessage", &body)?;
        log::debug!("posted message to {}", reply.channel);
        Ok(())
    }

    async fn resolve_display_name(&self, user_id: &str) -> anyhow::Result<String> {
        let body: Value = self
            .client
            .get(format!("{}/users.info", self.base_url))
            .bearer_auth(&self.token)
            .query(&[("user", user_id)])
            .send()
            .await
            .context("requesting user info")?
            .json()
            .await
            .context("decoding users.info response")?;
        Self::check_ok("users.info", &body)?;

        body["user"]["real_name"]
            .as_str()
            .map(str::to_string)
            .with_context(|| format!("no real_name for user {user_id}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_envelope_is_accepted() {
        assert!(HttpChatClient::check_ok("t", &json!({ "ok": true })).is_ok());
    }

    #[test]
    fn error_envelope_carries_detail() {
        let err = HttpChatClient::check_ok("t", &json!({ "ok": false, "error": "channel_not_found" }))
            .unwrap_err();
        assert!(err.to_string().contains("channel_not_found"));
    }
}
