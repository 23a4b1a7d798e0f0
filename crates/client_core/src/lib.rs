use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::{ClientEntity, ClientId, ResolvedClient},
    i18n::{LocaleContext, Translator},
    locale::{Locale, LocalizedText},
    protocol::{ClientRecord, ErrorBody, CLIENTS_ROUTE},
};
use thiserror::Error;
use tracing::{debug, info, warn};

pub mod config;
mod directory;

pub use directory::{ClientDirectory, DirectoryEvent, LoadState};

pub const GENERIC_LOAD_ERROR: &str = "Failed to load clients. Please try again later.";
pub const GENERIC_NETWORK_ERROR: &str =
    "Could not reach the server. Check your connection and try again.";

const MESSAGES_NAMESPACE: &str = "clients";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadError {
    #[error("failed to reach clients endpoint: {0}")]
    Network(String),
    #[error("clients endpoint responded with status {status}")]
    Http {
        status: u16,
        message: Option<String>,
        info: Option<serde_json::Value>,
    },
    #[error("invalid clients payload: {0}")]
    Decode(String),
}

impl LoadError {
    /// What the page shows: the backend's message when it sent one, a generic
    /// text otherwise. Never empty.
    pub fn display_message(&self) -> String {
        match self {
            Self::Http {
                message: Some(message),
                ..
            } => message.clone(),
            Self::Network(_) => GENERIC_NETWORK_ERROR.to_string(),
            Self::Http { .. } | Self::Decode(_) => GENERIC_LOAD_ERROR.to_string(),
        }
    }

    pub fn localized_message(&self, translator: &Translator) -> String {
        match self {
            Self::Http {
                message: Some(message),
                ..
            } => message.clone(),
            Self::Network(_) => translator.t(MESSAGES_NAMESPACE, "network_error"),
            Self::Http { .. } | Self::Decode(_) => translator.t(MESSAGES_NAMESPACE, "load_error"),
        }
    }
}

/// What a successful but empty client list turns into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmptyListPolicy {
    /// Substitute [`fallback_clients`] so the page is never blank.
    #[default]
    UseFallback,
    KeepEmpty,
}

impl EmptyListPolicy {
    pub fn from_flag(fallback_on_empty: bool) -> Self {
        if fallback_on_empty {
            Self::UseFallback
        } else {
            Self::KeepEmpty
        }
    }
}

/// Seed list shown when the API returns no clients.
pub fn fallback_clients() -> Vec<ClientEntity> {
    [
        ("1", "Skyline Developments", "سكاي لاين للتطوير", "Скайлайн Девелопментс"),
        ("2", "Gulf Crest Properties", "خليج كريست العقارية", "Галф Крест Пропертиз"),
        (
            "3",
            "Horizon Engineering Consultants",
            "هورايزن للاستشارات الهندسية",
            "Хорайзон Инжиниринг",
        ),
        ("4", "Oasis Urban Planning", "واحة للتخطيط العمراني", "Оазис Урбан Планнинг"),
        (
            "5",
            "Meridian Industrial Group",
            "مجموعة ميريديان الصناعية",
            "Меридиан Индастриал Груп",
        ),
        ("6", "Pearl Coast Holdings", "بيرل كوست القابضة", "Перл Кост Холдингс"),
    ]
    .into_iter()
    .map(|(id, en, ar, ru)| ClientEntity {
        id: ClientId(id.to_string()),
        name: LocalizedText::new(en)
            .with_variant(Locale::Ar, ar)
            .with_variant(Locale::Ru, ru),
        logo: None,
    })
    .collect()
}

#[async_trait]
pub trait ClientsApi: Send + Sync {
    async fn fetch_clients(&self) -> Result<Vec<ClientRecord>, LoadError>;
}

/// `GET {api_base_url}/clients` over reqwest.
pub struct HttpClientsApi {
    http: Client,
    api_base_url: String,
}

impl HttpClientsApi {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn clients_url(&self) -> String {
        format!("{}{}", self.api_base_url, CLIENTS_ROUTE)
    }
}

#[async_trait]
impl ClientsApi for HttpClientsApi {
    async fn fetch_clients(&self) -> Result<Vec<ClientRecord>, LoadError> {
        let url = self.clients_url();
        debug!(%url, "fetching clients");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| LoadError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            let info = serde_json::from_slice::<serde_json::Value>(&body).ok();
            let message = serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .and_then(|body| body.message)
                .map(|message| message.trim().to_string())
                .filter(|message| !message.is_empty());
            return Err(LoadError::Http {
                status: status.as_u16(),
                message,
                info,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| LoadError::Network(e.to_string()))?;
        serde_json::from_slice(&body).map_err(|e| LoadError::Decode(e.to_string()))
    }
}

/// Loads the client list once per call: no retry, no caching.
pub struct ClientsLoader<A = HttpClientsApi> {
    api: A,
    empty_list: EmptyListPolicy,
}

impl ClientsLoader<HttpClientsApi> {
    pub fn new(api_base_url: impl Into<String>, empty_list: EmptyListPolicy) -> Self {
        Self::with_api(HttpClientsApi::new(api_base_url), empty_list)
    }
}

impl<A: ClientsApi> ClientsLoader<A> {
    pub fn with_api(api: A, empty_list: EmptyListPolicy) -> Self {
        Self { api, empty_list }
    }

    pub fn empty_list_policy(&self) -> EmptyListPolicy {
        self.empty_list
    }

    pub async fn load_clients(&self, ctx: &LocaleContext) -> Result<Vec<ResolvedClient>, LoadError> {
        let records = self.api.fetch_clients().await.map_err(|error| {
            warn!(%error, "failed to load clients");
            error
        })?;

        if records.is_empty() {
            return Ok(match self.empty_list {
                EmptyListPolicy::UseFallback => {
                    info!(locale = %ctx.locale, "clients endpoint returned no entries; using fallback list");
                    resolve_all(fallback_clients(), ctx.locale)
                }
                EmptyListPolicy::KeepEmpty => Vec::new(),
            });
        }

        debug!(count = records.len(), locale = %ctx.locale, "loaded clients");
        Ok(resolve_all(
            records.into_iter().map(ClientEntity::from),
            ctx.locale,
        ))
    }
}

fn resolve_all(
    entities: impl IntoIterator<Item = ClientEntity>,
    locale: Locale,
) -> Vec<ResolvedClient> {
    entities
        .into_iter()
        .map(|entity| entity.resolve(locale))
        .collect()
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
