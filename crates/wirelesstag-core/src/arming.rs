// ── Arm / disarm state machine ──
//
// Call the kind's arm or disarm endpoint, take the returned tag record as
// the new state, and re-fetch the tag until the event state confirms the
// transition or the retry budget runs out.

use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::retry::{AttemptError, RetryError, RetryPolicy, RetryUnsuccessful, retry};
use crate::sensor::Sensor;

pub(crate) async fn transition(sensor: &Sensor, arm: bool) -> Result<Sensor, CoreError> {
    let operation = if arm { "arm" } else { "disarm" };

    if sensor.is_armed() == Some(arm) {
        debug!(%sensor, operation, "already in requested state");
        return Ok(sensor.clone());
    }

    let Some(path) = sensor.endpoints().transition(arm) else {
        return Err(CoreError::Unsupported {
            operation: operation.to_owned(),
            sensor_type: sensor.kind(),
        });
    };

    let tag = sensor.tag();
    let id = tag.require_slave_id()?;
    let mut body = json!({ "id": id });
    if arm && sensor.kind().arms_door_mode() {
        body["door_mode_set_closed"] = Value::Bool(true);
    }

    debug!(%sensor, operation, path, "requesting state change");
    if let Value::Object(data) = tag.api().call_api(path, body).await? {
        tag.set_data(data);
    }
    if sensor.is_armed() == Some(arm) {
        return Ok(sensor.clone());
    }

    let result = retry(RetryPolicy::ARMING, |attempt| async move {
        tag.refresh().await.map_err(AttemptError::Fatal)?;
        if sensor.is_armed() == Some(arm) {
            Ok(())
        } else {
            Err(AttemptError::Retry(RetryUnsuccessful { attempt }))
        }
    })
    .await;

    match result {
        Ok(()) => {
            debug!(%sensor, operation, "state change confirmed");
            Ok(sensor.clone())
        }
        Err(RetryError::Exhausted { attempts }) => {
            warn!(%sensor, operation, attempts, "state change never confirmed");
            Err(CoreError::Incomplete {
                operation: operation.to_owned(),
                entity: sensor.to_string(),
                attempts,
            })
        }
        Err(RetryError::Fatal(e)) => Err(e),
    }
}
