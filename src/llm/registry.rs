//! Ordered provider profiles and API key classification.

use tracing::debug;

/// How a profile recognizes its keys.
#[derive(Debug, Clone, Copy)]
enum KeyPattern {
    Prefix(&'static str),
    Contains(&'static str),
}

impl KeyPattern {
    fn matches(&self, key: &str) -> bool {
        match self {
            KeyPattern::Prefix(prefix) => key.starts_with(prefix),
            KeyPattern::Contains(needle) => key.contains(needle),
        }
    }
}

/// A provider the registry can recognize from the shape of an API key.
#[derive(Debug)]
struct ProviderProfile {
    name: &'static str,
    pattern: KeyPattern,
    base_url: &'static str,
    default_model: &'static str,
    extra_headers: &'static [(&'static str, &'static str)],
}

/// Recognized profiles, in evaluation order.
///
/// Order is load-bearing: Anthropic keys share the `sk-` prefix with OpenAI
/// keys, so the `sk-ant-` rule must run before the generic `sk-` rule.
const PROFILES: &[ProviderProfile] = &[
    ProviderProfile {
        name: "Anthropic",
        pattern: KeyPattern::Prefix("sk-ant-"),
        base_url: "https://api.anthropic.com/v1",
        default_model: "claude-3-opus-20240229",
        extra_headers: &[("anthropic-version", "2023-06-01")],
    },
    ProviderProfile {
        name: "OpenAI",
        pattern: KeyPattern::Prefix("sk-"),
        base_url: "https://api.openai.com/v1",
        default_model: "gpt-3.5-turbo",
        extra_headers: &[],
    },
    ProviderProfile {
        name: "Groq",
        pattern: KeyPattern::Prefix("gsk_"),
        base_url: "https://api.groq.com/openai/v1",
        default_model: "llama3-8b-8192",
        extra_headers: &[],
    },
    ProviderProfile {
        name: "Mistral",
        pattern: KeyPattern::Contains("mistral"),
        base_url: "https://api.mistral.ai/v1",
        default_model: "mistral-small",
        extra_headers: &[],
    },
    ProviderProfile {
        name: "TogetherAI",
        pattern: KeyPattern::Prefix("together-"),
        base_url: "https://api.together.xyz/v1",
        default_model: "mistralai/Mixtral-8x7B-Instruct-v0.1",
        extra_headers: &[],
    },
    ProviderProfile {
        name: "Fireworks",
        pattern: KeyPattern::Prefix("fk-"),
        base_url: "https://api.fireworks.ai/inference/v1",
        default_model: "accounts/fireworks/models/llama-v2-7b-chat",
        extra_headers: &[],
    },
];

/// Label used when no profile matches.
const UNKNOWN_PROVIDER: &str = "Unknown";

/// Connection parameters pinned for the rest of the session.
///
/// Derived from a matched [`ProviderProfile`], or user-supplied when
/// `manual_override` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionParams {
    pub base_url: String,
    pub model: String,
    pub extra_headers: Vec<(String, String)>,
    pub provider: String,
    pub manual_override: bool,
}

/// Classify an API key against the ordered profile list, first match wins.
///
/// Never fails: a key nobody recognizes yields a manual-override result with
/// empty endpoint and model for the caller to fill in.
pub fn classify(key: &str) -> ConnectionParams {
    for profile in PROFILES {
        if profile.pattern.matches(key) {
            debug!(provider = profile.name, "api key matched provider profile");
            return ConnectionParams {
                base_url: profile.base_url.to_string(),
                model: profile.default_model.to_string(),
                extra_headers: profile
                    .extra_headers
                    .iter()
                    .map(|(name, value)| (name.to_string(), value.to_string()))
                    .collect(),
                provider: profile.name.to_string(),
                manual_override: false,
            };
        }
    }

    debug!("api key matched no provider profile, falling back to manual mode");
    ConnectionParams {
        base_url: String::new(),
        model: String::new(),
        extra_headers: Vec::new(),
        provider: UNKNOWN_PROVIDER.to_string(),
        manual_override: true,
    }
}
