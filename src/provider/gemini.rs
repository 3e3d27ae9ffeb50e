use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::wire::{GenerateRequest, GenerateResponse};

pub struct GeminiProvider {
    model: String,
    api_base: String,
    api_key_env: String,
    client: Client,
    debug: bool,
}

impl GeminiProvider {
    pub fn new(
        model: String,
        api_base: String,
        api_key_env: String,
        timeout_secs: Option<u64>,
        debug: bool,
    ) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            model,
            api_base,
            api_key_env,
            client: builder.build().context("building http client")?,
            debug,
        })
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl super::Provider for GeminiProvider {
    async fn generate(&self, req: &GenerateRequest) -> Result<String> {
        // Looked up per request: a missing key is a request failure, not a startup error.
        let api_key = std::env::var(&self.api_key_env)
            .map_err(|_| anyhow!("{} env var is not set", self.api_key_env))?;

        let url = self.endpoint();
        if self.debug {
            eprintln!(
                "debug[gemini]: HTTP POST {} body:\n{}",
                url,
                serde_json::to_string_pretty(&req.redacted())?
            );
        }

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(req)
            .send()
            .await
            .context("gemini request failed")?;

        let status = resp.status();
        let text = resp.text().await.context("gemini read body failed")?;

        if self.debug {
            eprintln!("debug[gemini]: raw status: {}", status);
            eprintln!("debug[gemini]: raw response:\n{}", &text);
        }

        if !status.is_success() {
            return Err(anyhow!("Gemini API error ({}): {}", status, text));
        }

        let parsed: GenerateResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse Gemini response: {e}\nRaw: {text}"))?;

        Ok(parsed.text())
    }
}
