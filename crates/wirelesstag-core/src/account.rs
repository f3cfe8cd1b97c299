// ── Account facade ──
//
// Signs in, lists tag managers and keeps a pool of tags keyed by uuid.
// Listing again updates pooled tags in place, so handles held by callers
// stay live, and drops tags the service no longer reports.

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, info};
use wirelesstag_api::{CallApi, TagManagerInfo, TransportConfig, WirelessTagClient, tags};

use crate::config::AccountConfig;
use crate::error::CoreError;
use crate::model::RawStore;
use crate::tag::Tag;

pub struct Account {
    api: Arc<dyn CallApi>,
    client: Option<Arc<WirelessTagClient>>,
    tags: DashMap<String, Tag>,
}

impl Account {
    /// Build an HTTP client for `config` and sign in.
    pub async fn connect(config: &AccountConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig::default().with_timeout(config.timeout);
        let client = WirelessTagClient::new(config.url.clone(), &transport)?;
        client.sign_in(&config.email, &config.password).await?;
        info!(url = %config.url, email = %config.email, "signed in");

        let client = Arc::new(client);
        let api: Arc<dyn CallApi> = client.clone();
        Ok(Self {
            api,
            client: Some(client),
            tags: DashMap::new(),
        })
    }

    /// Wrap an already-authenticated collaborator.
    pub fn with_api(api: Arc<dyn CallApi>) -> Self {
        Self {
            api,
            client: None,
            tags: DashMap::new(),
        }
    }

    pub fn api(&self) -> &Arc<dyn CallApi> {
        &self.api
    }

    /// End the HTTP session, if this account owns one.
    pub async fn disconnect(&self) -> Result<(), CoreError> {
        if let Some(client) = &self.client {
            client.sign_out().await?;
        }
        self.tags.clear();
        Ok(())
    }

    // ── Tag managers ─────────────────────────────────────────────────

    pub async fn tag_managers(&self) -> Result<Vec<TagManagerInfo>, CoreError> {
        Ok(tags::list_tag_managers(self.api.as_ref()).await?)
    }

    pub async fn select_tag_manager(&self, mac: &str) -> Result<(), CoreError> {
        tags::select_tag_manager(self.api.as_ref(), mac).await?;
        Ok(())
    }

    // ── Tags ─────────────────────────────────────────────────────────

    /// Fetch the tag list and reconcile it with the pool.
    pub async fn tags(&self) -> Result<Vec<Tag>, CoreError> {
        let records = tags::list_tags(self.api.as_ref()).await?;
        let mut seen = HashSet::with_capacity(records.len());
        let mut current = Vec::with_capacity(records.len());

        for record in records {
            let Some(key) = pool_key(&record) else {
                debug!("skipping tag record without uuid or slaveId");
                continue;
            };
            let tag = match self.tags.get(&key) {
                Some(existing) => {
                    existing.set_data(record);
                    existing.value().clone()
                }
                None => {
                    let tag = Tag::new(Arc::clone(&self.api), record);
                    self.tags.insert(key.clone(), tag.clone());
                    tag
                }
            };
            seen.insert(key);
            current.push(tag);
        }

        self.tags.retain(|key, _| seen.contains(key));
        debug!(count = current.len(), "tag pool reconciled");
        Ok(current)
    }

    /// Look a pooled tag up by uuid, slave id or case-insensitive name.
    pub fn find_tag(&self, query: &str) -> Option<Tag> {
        let slave_id = query.parse::<i64>().ok();
        self.tags
            .iter()
            .find(|entry| {
                let tag = entry.value();
                entry.key() == query
                    || (slave_id.is_some() && tag.slave_id() == slave_id)
                    || tag
                        .name()
                        .is_some_and(|name| name.eq_ignore_ascii_case(query))
            })
            .map(|entry| entry.value().clone())
    }
}

fn pool_key(record: &RawStore) -> Option<String> {
    match record.get("uuid").and_then(serde_json::Value::as_str) {
        Some(uuid) => Some(uuid.to_owned()),
        None => record
            .get("slaveId")
            .and_then(serde_json::Value::as_i64)
            .map(|id| format!("slave-{id}")),
    }
}
