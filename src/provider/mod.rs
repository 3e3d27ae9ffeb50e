use anyhow::Result;
use async_trait::async_trait;

use crate::config::Config;
use crate::wire::GenerateRequest;

pub mod gemini;

/// The hosted model boundary: one request in, raw text out (possibly empty).
#[async_trait]
pub trait Provider: Send + Sync {
    async fn generate(&self, req: &GenerateRequest) -> Result<String>;
}

pub type DynProvider = Box<dyn Provider + Send + Sync>;

pub fn make_provider(cfg: &Config, model: Option<String>, debug: bool) -> Result<DynProvider> {
    Ok(Box::new(gemini::GeminiProvider::new(
        model.unwrap_or_else(|| cfg.model.clone()),
        cfg.api_base.clone(),
        cfg.api_key_env.clone(),
        cfg.timeout_secs,
        debug,
    )?))
}
