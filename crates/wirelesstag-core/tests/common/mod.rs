// Shared helpers: a scripted `CallApi` that records every call.
#![allow(clippy::unwrap_used, dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use futures_util::future::BoxFuture;
use serde_json::Value;

use wirelesstag_core::{CallApi, Tag};

pub const GET_TAG: &str = "/ethClient.asmx/GetTagForSlaveId";

/// Responses are queued per endpoint; the last one repeats forever.
#[derive(Default)]
pub struct StubApi {
    responses: Mutex<HashMap<String, VecDeque<Result<Value, String>>>>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl StubApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, endpoint: &str, value: Value) -> &Self {
        self.queue(endpoint, Ok(value))
    }

    pub fn fail(&self, endpoint: &str, message: &str) -> &Self {
        self.queue(endpoint, Err(message.to_owned()))
    }

    fn queue(&self, endpoint: &str, response: Result<Value, String>) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .entry(endpoint.to_owned())
            .or_default()
            .push_back(response);
        self
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls_to(&self, endpoint: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(e, _)| e == endpoint)
            .count()
    }

    pub fn last_body(&self, endpoint: &str) -> Option<Value> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(e, _)| e == endpoint)
            .map(|(_, body)| body.clone())
    }

    fn next(&self, endpoint: &str) -> Option<Result<Value, String>> {
        let mut responses = self.responses.lock().unwrap();
        let queue = responses.get_mut(endpoint)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

impl CallApi for StubApi {
    fn call_api<'a>(
        &'a self,
        endpoint: &'a str,
        body: Value,
    ) -> BoxFuture<'a, Result<Value, wirelesstag_api::Error>> {
        self.calls
            .lock()
            .unwrap()
            .push((endpoint.to_owned(), body));
        let response = self.next(endpoint);
        Box::pin(async move {
            match response {
                Some(Ok(value)) => Ok(value),
                Some(Err(message)) => Err(wirelesstag_api::Error::Api {
                    message,
                    exception: None,
                }),
                None => Err(wirelesstag_api::Error::Api {
                    message: format!("no stub for {endpoint}"),
                    exception: None,
                }),
            }
        })
    }
}

pub fn tag(api: &Arc<StubApi>, data: Value) -> Tag {
    let api: Arc<dyn CallApi> = api.clone();
    Tag::from_value(api, data).unwrap()
}

pub fn object(value: Value) -> serde_json::Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}
