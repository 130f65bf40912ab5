//! Personalized welcome messages from Gemini

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::GreetingConfig;

/// Produces the welcome text shown after check-in. Must always resolve.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Greeter: Send + Sync {
    async fn greet(&self, name: &str, purpose: &str) -> String;
}

pub fn missing_key_greeting(name: &str) -> String {
    format!("Selamat datang, {}! Selamat menikmati waktu Anda di perpustakaan.", name)
}

pub fn empty_reply_greeting(name: &str) -> String {
    format!("Selamat datang, {}! Semoga kunjungan Anda menyenangkan.", name)
}

pub fn error_greeting(name: &str) -> String {
    format!("Selamat datang, {}! Sistem kami senang Anda ada di sini.", name)
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize, Default)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateContentResponse {
    fn text(&self) -> Option<String> {
        let text: String = self
            .candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

/// Gemini `generateContent` client
#[derive(Clone)]
pub struct GeminiGreeter {
    http: reqwest::Client,
    config: GreetingConfig,
}

impl GeminiGreeter {
    pub fn new(config: GreetingConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    fn prompt(name: &str, purpose: &str) -> String {
        format!(
            "You are a friendly, intelligent librarian AI.\n\
             A visitor named \"{}\" has just checked in with the purpose: \"{}\".\n\
             Please generate a warm, short (max 2 sentences), and intellectual welcome message in Indonesian (Bahasa Indonesia).\n\
             If they are here to study, encourage focus. If they are here to read, suggest they get lost in a good story.\n\
             Mention a specific Dewey Decimal Classification (DDC) number relevant to their likely interests if applicable (randomly pick a popular one if vague).",
            name, purpose
        )
    }

    async fn generate(&self, api_key: &str, name: &str, purpose: &str) -> Result<Option<String>, reqwest::Error> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        );
        let body = GenerateContentRequest {
            contents: vec![json!({ "parts": [{ "text": Self::prompt(name, purpose) }] })],
        };

        let response: GenerateContentResponse = self
            .http
            .post(url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response.text())
    }
}

#[async_trait]
impl Greeter for GeminiGreeter {
    async fn greet(&self, name: &str, purpose: &str) -> String {
        let Some(api_key) = self.config.api_key.as_deref().filter(|k| !k.is_empty()) else {
            tracing::warn!("Gemini API key is missing, using default greeting");
            return missing_key_greeting(name);
        };

        match self.generate(api_key, name, purpose).await {
            Ok(Some(text)) => text,
            Ok(None) => empty_reply_greeting(name),
            Err(e) => {
                tracing::error!("Gemini API error: {}", e);
                error_greeting(name)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(base_url: &str, api_key: Option<&str>) -> GreetingConfig {
        GreetingConfig {
            api_key: api_key.map(str::to_string),
            model: "gemini-2.5-flash".to_string(),
            base_url: base_url.to_string(),
        }
    }

    #[tokio::test]
    async fn test_missing_key_skips_network() {
        let greeter = GeminiGreeter::new(config("http://127.0.0.1:9", None));
        assert_eq!(greeter.greet("Ana", "Membaca").await, missing_key_greeting("Ana"));
    }

    #[tokio::test]
    async fn test_reply_text_is_trimmed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-2.5-flash:generateContent"))
            .and(header("x-goog-api-key", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"parts": [{"text": "  Selamat belajar, Ana! Coba rak 500.  "}]}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let greeter = GeminiGreeter::new(config(&server.uri(), Some("secret")));
        assert_eq!(greeter.greet("Ana", "Belajar").await, "Selamat belajar, Ana! Coba rak 500.");
    }

    #[tokio::test]
    async fn test_empty_reply_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
            .mount(&server)
            .await;

        let greeter = GeminiGreeter::new(config(&server.uri(), Some("secret")));
        assert_eq!(greeter.greet("Ana", "Membaca").await, empty_reply_greeting("Ana"));
    }

    #[tokio::test]
    async fn test_api_error_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let greeter = GeminiGreeter::new(config(&server.uri(), Some("secret")));
        assert_eq!(greeter.greet("Ana", "Membaca").await, error_greeting("Ana"));
    }
}
