use std::env;
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::ai::length_policy::ShortInputPolicy;

pub const DEFAULT_HF_MODEL: &str = "facebook/bart-large-cnn";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_HF_BASE_URL: &str = "https://api-inference.huggingface.co";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
pub const DEFAULT_ENGINE_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Which hosted inference API serves the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineBackend {
    #[default]
    HuggingFace,
    OpenAi,
}

impl EngineBackend {
    #[must_use]
    pub fn default_model(self) -> &'static str {
        match self {
            EngineBackend::HuggingFace => DEFAULT_HF_MODEL,
            EngineBackend::OpenAi => DEFAULT_OPENAI_MODEL,
        }
    }

    #[must_use]
    pub fn default_base_url(self) -> &'static str {
        match self {
            EngineBackend::HuggingFace => DEFAULT_HF_BASE_URL,
            EngineBackend::OpenAi => DEFAULT_OPENAI_BASE_URL,
        }
    }
}

impl FromStr for EngineBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "huggingface" | "hf" => Ok(EngineBackend::HuggingFace),
            "openai" => Ok(EngineBackend::OpenAi),
            other => Err(format!(
                "unknown backend '{other}' (expected huggingface or openai)"
            )),
        }
    }
}

impl fmt::Display for EngineBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EngineBackend::HuggingFace => "huggingface",
            EngineBackend::OpenAi => "openai",
        })
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend: EngineBackend,
    pub model_id: String,
    /// Endpoint root without a trailing slash.
    pub inference_base_url: String,
    pub hf_api_token: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_org_id: Option<String>,
    pub short_input_policy: ShortInputPolicy,
    pub engine_timeout: Duration,
    pub max_body_bytes: usize,
    /// `None` leaves concurrent engine calls unbounded.
    pub inference_concurrency: Option<usize>,
    pub bind_addr: SocketAddr,
}

impl Default for AppConfig {
    fn default() -> Self {
        let backend = EngineBackend::default();
        Self {
            backend,
            model_id: backend.default_model().to_string(),
            inference_base_url: backend.default_base_url().to_string(),
            hf_api_token: None,
            openai_api_key: None,
            openai_org_id: None,
            short_input_policy: ShortInputPolicy::default(),
            engine_timeout: Duration::from_secs(DEFAULT_ENGINE_TIMEOUT_SECS),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            inference_concurrency: None,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
        }
    }
}

impl AppConfig {
    /// Loads configuration from the process environment, reading `.env` first
    /// when one is present.
    ///
    /// # Errors
    ///
    /// Returns a message naming the variable when a value fails to parse.
    pub fn from_env() -> Result<Self, String> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Empty values
    /// count as unset.
    ///
    /// # Errors
    ///
    /// Returns `"VAR: reason"` for the first value that fails to parse or
    /// validate.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let backend = match get("SUMMARIZER_BACKEND") {
            Some(raw) => raw
                .parse::<EngineBackend>()
                .map_err(|e| format!("SUMMARIZER_BACKEND: {e}"))?,
            None => EngineBackend::default(),
        };

        let inference_base_url = get("INFERENCE_BASE_URL")
            .unwrap_or_else(|| backend.default_base_url().to_string());
        Url::parse(&inference_base_url).map_err(|e| format!("INFERENCE_BASE_URL: {e}"))?;
        let inference_base_url = inference_base_url.trim_end_matches('/').to_string();

        let openai_api_key = get("OPENAI_API_KEY");
        if backend == EngineBackend::OpenAi && openai_api_key.is_none() {
            return Err("OPENAI_API_KEY: required when SUMMARIZER_BACKEND=openai".to_string());
        }

        let short_input_policy = match get("SHORT_INPUT_POLICY") {
            Some(raw) => raw
                .parse::<ShortInputPolicy>()
                .map_err(|e| format!("SHORT_INPUT_POLICY: {e}"))?,
            None => ShortInputPolicy::default(),
        };

        let engine_timeout_secs: u64 = parse_or(
            "ENGINE_TIMEOUT_SECS",
            get("ENGINE_TIMEOUT_SECS"),
            DEFAULT_ENGINE_TIMEOUT_SECS,
        )?;
        if engine_timeout_secs == 0 {
            return Err("ENGINE_TIMEOUT_SECS: must be greater than zero".to_string());
        }

        let max_body_bytes: usize =
            parse_or("MAX_BODY_BYTES", get("MAX_BODY_BYTES"), DEFAULT_MAX_BODY_BYTES)?;
        if max_body_bytes == 0 {
            return Err("MAX_BODY_BYTES: must be greater than zero".to_string());
        }

        let inference_concurrency = match get("INFERENCE_CONCURRENCY") {
            Some(raw) => {
                let n: usize = raw
                    .parse()
                    .map_err(|e| format!("INFERENCE_CONCURRENCY: {e}"))?;
                if n == 0 {
                    return Err("INFERENCE_CONCURRENCY: must be greater than zero".to_string());
                }
                Some(n)
            }
            None => None,
        };

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| format!("BIND_ADDR: {e}"))?;

        Ok(Self {
            backend,
            model_id: get("SUMMARIZER_MODEL")
                .unwrap_or_else(|| backend.default_model().to_string()),
            inference_base_url,
            hf_api_token: get("HF_API_TOKEN"),
            openai_api_key,
            openai_org_id: get("OPENAI_ORG_ID"),
            short_input_policy,
            engine_timeout: Duration::from_secs(engine_timeout_secs),
            max_body_bytes,
            inference_concurrency,
            bind_addr,
        })
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> Result<T, String>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match raw {
        Some(raw) => raw.parse().map_err(|e| format!("{key}: {e}")),
        None => Ok(default),
    }
}
