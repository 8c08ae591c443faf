//! Question answering restricted to the plan comparison domain
//!
//! A query goes through three layers:
//! - a local safety gate ([`check_query`])
//! - the remote cascade, trying every API key with every model in order
//! - the offline answer bank when the cascade yields nothing

mod knowledge;
pub mod remote;
mod safety;

use std::env;
use std::fmt;

use log::{debug, warn};

use crate::rates::RateTable;

pub use knowledge::{offline_answer, OFFLINE_PREFIX};
pub use remote::{AssistantError, GeminiClient, ModelClient};
pub use safety::{check_query, Rejection, MIN_QUERY_CHARS, OFF_TOPIC_TERMS};

/// Environment variable holding comma-separated API keys
pub const API_KEYS_ENV: &str = "ASSISTANT_API_KEYS";

/// Models tried for each key, cheapest first
pub const DEFAULT_MODELS: [&str; 4] = [
    "gemini-2.0-flash-lite",
    "gemini-2.0-flash",
    "gemini-2.5-flash",
    "gemini-2.0-flash-exp",
];

pub const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Credentials and model order for the remote cascade
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantConfig {
    pub api_keys: Vec<String>,
    pub models: Vec<String>,
    pub temperature: f32,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_keys: Vec::new(),
            models: DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl AssistantConfig {
    /// Default models with keys read from [`API_KEYS_ENV`]
    pub fn from_env() -> Self {
        let api_keys = env::var(API_KEYS_ENV)
            .map(|raw| parse_keys(&raw))
            .unwrap_or_default();
        Self {
            api_keys,
            ..Default::default()
        }
    }

    /// Upper bound on remote calls for one query
    pub fn max_attempts(&self) -> usize {
        self.api_keys.len() * self.models.len()
    }
}

fn parse_keys(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

/// Outcome of an assistant request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Rejected(Rejection),
    Remote(String),
    Offline(String),
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Reply::Rejected(reason) => write!(f, "Rejected: {}", reason),
            Reply::Remote(text) | Reply::Offline(text) => f.write_str(text),
        }
    }
}

/// System prompt with the rate table embedded as JSON
pub fn build_prompt(query: &str, table: &RateTable) -> String {
    let rates = serde_json::to_string(table).unwrap_or_else(|e| {
        warn!("Could not serialize rate table for the prompt: {}", e);
        String::from("{}")
    });

    format!(
        "You are a financial advisor specialised in the subscription plans below.\n\
         OFFICIAL DATA: {rates}\n\n\
         RULES:\n\
         1. Answer in a professional but direct tone.\n\
         2. Be brief (at most 3-4 sentences or a bullet list).\n\
         3. Use ONLY the data provided in the JSON.\n\
         4. For travel questions, answer only about insurance, lounges and currency exchange.\n\n\
         USER QUESTION: {query}"
    )
}

/// Domain assistant over a model backend
pub struct Assistant<C> {
    client: C,
    config: AssistantConfig,
}

impl<C: ModelClient> Assistant<C> {
    pub fn new(client: C, config: AssistantConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    /// Try every key with every model; first answer wins
    ///
    /// Failures are logged and skipped. Returns `None` once all
    /// `keys x models` attempts are used up.
    pub async fn ask(&self, query: &str, table: &RateTable) -> Option<String> {
        if self.config.max_attempts() == 0 {
            debug!("No API keys or models configured, skipping remote assistant");
            return None;
        }

        let prompt = build_prompt(query, table);
        for (key_idx, key) in self.config.api_keys.iter().enumerate() {
            for model in &self.config.models {
                match self
                    .client
                    .generate(key, model, &prompt, self.config.temperature)
                    .await
                {
                    Ok(text) => {
                        debug!("Answered by {} with key #{}", model, key_idx + 1);
                        return Some(text);
                    }
                    Err(e) => warn!("Model {} failed with key #{}: {}", model, key_idx + 1, e),
                }
            }
            warn!("Key #{} exhausted every model, moving to the next key", key_idx + 1);
        }
        None
    }

    /// Gate the query, ask the models, fall back to the answer bank
    pub async fn respond(&self, query: &str, table: &RateTable) -> Reply {
        if let Err(reason) = check_query(query) {
            return Reply::Rejected(reason);
        }

        match self.ask(query, table).await {
            Some(text) => Reply::Remote(text),
            None => Reply::Offline(offline_answer(query)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Fails until a given attempt, recording every call
    struct ScriptedClient {
        succeed_on: Option<usize>,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl ScriptedClient {
        fn new(succeed_on: Option<usize>) -> Self {
            Self {
                succeed_on,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<(String, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl ModelClient for ScriptedClient {
        async fn generate(
            &self,
            api_key: &str,
            model: &str,
            _prompt: &str,
            _temperature: f32,
        ) -> Result<String, AssistantError> {
            let mut calls = self.calls.lock().unwrap();
            calls.push((api_key.to_string(), model.to_string()));
            if Some(calls.len()) == self.succeed_on {
                Ok(format!("answer from {} via {}", model, api_key))
            } else {
                Err(AssistantError::EmptyResponse(model.to_string()))
            }
        }
    }

    fn config(keys: &[&str], models: &[&str]) -> AssistantConfig {
        AssistantConfig {
            api_keys: keys.iter().map(|k| k.to_string()).collect(),
            models: models.iter().map(|m| m.to_string()).collect(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    #[tokio::test]
    async fn test_cascade_stops_at_first_success() {
        let assistant = Assistant::new(
            ScriptedClient::new(Some(3)),
            config(&["k1", "k2"], &["m1", "m2"]),
        );
        let answer = assistant.ask("Is Metal worth it?", &RateTable::builtin()).await;

        assert_eq!(answer.as_deref(), Some("answer from m1 via k2"));
        assert_eq!(
            assistant.client.calls(),
            vec![
                ("k1".to_string(), "m1".to_string()),
                ("k1".to_string(), "m2".to_string()),
                ("k2".to_string(), "m1".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_cascade_is_bounded() {
        let assistant = Assistant::new(
            ScriptedClient::new(None),
            config(&["k1", "k2", "k3"], &["m1", "m2", "m3", "m4"]),
        );
        let answer = assistant.ask("Ultra lounge access", &RateTable::builtin()).await;

        assert!(answer.is_none());
        assert_eq!(assistant.client.calls().len(), assistant.config().max_attempts());
        assert_eq!(assistant.config().max_attempts(), 12);
    }

    #[tokio::test]
    async fn test_respond_falls_back_offline() {
        let assistant = Assistant::new(ScriptedClient::new(None), config(&["k1"], &["m1"]));
        let reply = assistant.respond("crypto fees?", &RateTable::builtin()).await;
        match reply {
            Reply::Offline(text) => assert!(text.contains("0.49%")),
            other => panic!("expected offline reply, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_respond_rejects_before_calling() {
        let assistant = Assistant::new(ScriptedClient::new(Some(1)), config(&["k1"], &["m1"]));
        let reply = assistant.respond("weather in Rome", &RateTable::builtin()).await;
        assert_eq!(reply, Reply::Rejected(Rejection::OffTopic("weather")));
        assert!(assistant.client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_no_keys_skips_remote() {
        let assistant = Assistant::new(ScriptedClient::new(Some(1)), AssistantConfig::default());
        let reply = assistant.respond("premium insurance", &RateTable::builtin()).await;
        assert!(matches!(reply, Reply::Offline(_)));
        assert!(assistant.client.calls().is_empty());
    }

    #[test]
    fn test_prompt_embeds_rates() {
        let prompt = build_prompt("Is Metal worth it?", &RateTable::builtin());
        assert!(prompt.contains("\"Metal\""));
        assert!(prompt.contains("\"benchmark_bank\""));
        assert!(prompt.ends_with("USER QUESTION: Is Metal worth it?"));
    }

    #[test]
    fn test_reply_display() {
        assert_eq!(
            Reply::Rejected(Rejection::TooShort).to_string(),
            "Rejected: Question too short. Ask about the subscription plans."
        );
        assert_eq!(Reply::Remote("Metal costs 15.99.".to_string()).to_string(), "Metal costs 15.99.");
    }

    #[test]
    fn test_parse_keys() {
        assert_eq!(parse_keys(" a , b,,c "), vec!["a", "b", "c"]);
        assert!(parse_keys("").is_empty());
    }
}
