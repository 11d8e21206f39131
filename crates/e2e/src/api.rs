//! Document API client used by scenarios to prepare documents

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::ApiConfig;
use crate::error::{E2eError, E2eResult};
use crate::language::Language;

/// Lifecycle state of a document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    #[default]
    Preparation,
    Pending,
    Closed,
    Canceled,
    Rejected,
    Timedout,
    DocumentError,
}

/// A document as returned by the API
///
/// Keys this client does not model are kept in `extra` so an update sends
/// them back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    pub lang: Language,
    #[serde(default)]
    pub status: DocumentStatus,
    #[serde(rename = "signatories", default)]
    pub parties: Vec<Signatory>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signatory {
    pub id: String,
    #[serde(default)]
    pub author: bool,
    /// Whether this party signs; a party that does not sign is a viewer
    #[serde(default = "default_signs")]
    pub signs: bool,
    #[serde(rename = "signlink", default)]
    pub sign_url: Option<String>,
    #[serde(default)]
    pub sign_success_redirect_url: Option<String>,
    #[serde(default)]
    pub reject_redirect_url: Option<String>,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_signs() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Document {
    pub fn author(&self) -> E2eResult<&Signatory> {
        self.parties
            .iter()
            .find(|p| p.author)
            .ok_or_else(|| self.missing("author"))
    }

    pub fn author_mut(&mut self) -> E2eResult<&mut Signatory> {
        let err = self.missing("author");
        self.parties.iter_mut().find(|p| p.author).ok_or(err)
    }

    /// The first party that is not the author
    pub fn other_signatory(&self) -> E2eResult<&Signatory> {
        self.parties
            .iter()
            .find(|p| !p.author)
            .ok_or_else(|| self.missing("non-author"))
    }

    pub fn other_signatory_mut(&mut self) -> E2eResult<&mut Signatory> {
        let err = self.missing("non-author");
        self.parties.iter_mut().find(|p| !p.author).ok_or(err)
    }

    fn missing(&self, party: &'static str) -> E2eError {
        E2eError::MissingParty {
            document: self.id.clone(),
            party,
        }
    }
}

impl Signatory {
    /// Sign link resolved against the API base URL
    pub fn absolute_sign_url(&self, base_url: &str) -> E2eResult<String> {
        let link = self.sign_url.as_deref().ok_or_else(|| {
            E2eError::InvalidConfig(format!("Party {} has no sign link", self.id))
        })?;
        if link.starts_with("http://") || link.starts_with("https://") {
            return Ok(link.to_string());
        }
        Ok(format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            link.trim_start_matches('/')
        ))
    }
}

/// HTTP client for the document API, bound to one language
pub struct ApiClient {
    http: reqwest::Client,
    config: ApiConfig,
    lang: Language,
}

impl ApiClient {
    pub fn new(config: ApiConfig, lang: Language) -> E2eResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()?;
        Ok(Self { http, config, lang })
    }

    /// OAuth 1.0 PLAINTEXT authorization header
    fn authorization(&self) -> String {
        let c = &self.config;
        format!(
            "oauth_signature_method=\"PLAINTEXT\", oauth_consumer_key=\"{}\", \
             oauth_token=\"{}\", oauth_signature=\"{}&{}\"",
            c.client_credentials_identifier,
            c.token_credentials_identifier,
            c.client_credentials_secret,
            c.token_credentials_secret
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn post<T: DeserializeOwned>(
        &self,
        call: &str,
        path: &str,
        form: &[(&str, String)],
    ) -> E2eResult<T> {
        let url = self.url(path);
        debug!("API {} -> {}", call, url);

        let resp = self
            .http
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, self.authorization())
            .form(form)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(E2eError::ApiStatus {
                call: call.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp.json::<T>().await?)
    }

    pub async fn create_from_template(&self, template_id: &str) -> E2eResult<Document> {
        self.post(
            "createfromtemplate",
            &format!("createfromtemplate/{}", template_id),
            &[],
        )
        .await
    }

    /// Push local edits; the document is stamped with this client's language
    pub async fn update_document(&self, doc: &Document) -> E2eResult<Document> {
        let json = update_payload(doc, self.lang)?;
        self.post("update", &format!("update/{}", doc.id), &[("json", json)])
            .await
    }

    /// Start the signing process
    pub async fn ready(&self, doc: &Document) -> E2eResult<Document> {
        self.post("ready", &format!("ready/{}", doc.id), &[]).await
    }

    /// Sign `doc` on behalf of `party`
    pub async fn sign(&self, doc: &Document, party: &Signatory) -> E2eResult<Document> {
        self.post(
            "sign",
            &format!("sign/{}/{}", doc.id, party.id),
            &[("fields", "[]".to_string())],
        )
        .await
    }

    pub async fn cancel_document(&self, doc: &Document) -> E2eResult<Document> {
        self.post("cancel", &format!("cancel/{}", doc.id), &[]).await
    }

    /// Document from the configured template with `title`, in this client's
    /// language, with at least one party besides the author
    pub async fn create_standard_doc(&self, title: &str) -> E2eResult<Document> {
        let mut doc = self.create_from_template(&self.config.template_id).await?;
        doc.title = title.to_string();
        doc.lang = self.lang;
        doc.other_signatory()?;
        Ok(doc)
    }

    pub fn sign_url(&self, party: &Signatory) -> E2eResult<String> {
        party.absolute_sign_url(&self.config.base_url)
    }
}

fn update_payload(doc: &Document, lang: Language) -> E2eResult<String> {
    let mut doc = doc.clone();
    doc.lang = lang;
    Ok(serde_json::to_string(&doc)?)
}
