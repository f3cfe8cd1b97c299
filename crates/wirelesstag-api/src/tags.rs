// Tag manager and tag listing calls
//
// Written against `dyn CallApi` rather than the concrete client so the
// core can drive them through an injected collaborator.

use serde_json::{Map, Value, json};
use tracing::debug;

use crate::client::CallApi;
use crate::error::Error;
use crate::models::TagManagerInfo;
use crate::paths;

/// List the tag managers registered on the account.
///
/// `POST /ethAccount.asmx/GetTagManagers`
pub async fn list_tag_managers(api: &dyn CallApi) -> Result<Vec<TagManagerInfo>, Error> {
    debug!("listing tag managers");
    let payload = api.call_api(paths::GET_TAG_MANAGERS, json!({})).await?;
    serde_json::from_value(payload.clone()).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body: payload.to_string(),
    })
}

/// Make a tag manager the target of subsequent tag calls.
///
/// `POST /ethAccount.asmx/SelectTagManager` with `{"mac": "..."}`
pub async fn select_tag_manager(api: &dyn CallApi, mac: &str) -> Result<(), Error> {
    debug!(mac, "selecting tag manager");
    let _ = api
        .call_api(paths::SELECT_TAG_MANAGER, json!({ "mac": mac }))
        .await?;
    Ok(())
}

/// List the raw tag records of the selected tag manager.
///
/// `POST /ethClient.asmx/GetTagList`
pub async fn list_tags(api: &dyn CallApi) -> Result<Vec<Map<String, Value>>, Error> {
    debug!("listing tags");
    let payload = api.call_api(paths::GET_TAG_LIST, json!({})).await?;
    match payload {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(map) => Ok(map),
                other => Err(unexpected("tag object", &other)),
            })
            .collect(),
        Value::Null => Ok(Vec::new()),
        other => Err(unexpected("tag list", &other)),
    }
}

/// Fetch the full raw record of one tag.
///
/// `POST /ethClient.asmx/GetTagForSlaveId` with `{"slaveid": N}`
pub async fn get_tag(api: &dyn CallApi, slave_id: i64) -> Result<Map<String, Value>, Error> {
    debug!(slave_id, "fetching tag");
    let payload = api
        .call_api(paths::GET_TAG_FOR_SLAVE_ID, json!({ "slaveid": slave_id }))
        .await?;
    match payload {
        Value::Object(map) => Ok(map),
        other => Err(unexpected("tag object", &other)),
    }
}

fn unexpected(what: &str, value: &Value) -> Error {
    Error::Deserialization {
        message: format!("expected {what}"),
        body: value.to_string(),
    }
}
