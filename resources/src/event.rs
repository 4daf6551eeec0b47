/*
 * Copyright (c) 2021 gematik GmbH
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *    http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 *
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{misc::ParticipantId, prescription::Status, primitives::Id};

/// Notification payload emitted after a successful mutation. The correlation
/// and request tokens are opaque values handed in by the transport layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(rename = "type")]
    pub type_: EventType,
    pub id: Id,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<ParticipantId>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_id: Option<ParticipantId>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items_count: Option<usize>,

    pub status: Status,
    pub correlation_id: String,
    pub request_id: String,
    pub ts: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum EventType {
    #[serde(rename = "prescription.created")]
    Created,

    #[serde(rename = "prescription.updated")]
    Updated,

    #[serde(rename = "prescription.statusUpdated")]
    StatusUpdated,

    #[serde(rename = "prescription.deleted")]
    Deleted,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "prescription.created",
            Self::Updated => "prescription.updated",
            Self::StatusUpdated => "prescription.statusUpdated",
            Self::Deleted => "prescription.deleted",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::convert::TryFrom;

    use super::*;

    #[test]
    fn wire_format() {
        let event = Event {
            type_: EventType::StatusUpdated,
            id: Id::try_from("rx-1").unwrap(),
            patient_id: None,
            doctor_id: None,
            items_count: None,
            status: Status::Dispensed,
            correlation_id: "corr-1".into(),
            request_id: "req-1".into(),
            ts: Utc::now(),
        };

        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "prescription.statusUpdated");
        assert_eq!(json["id"], "rx-1");
        assert_eq!(json["status"], "DISPENSED");
        assert_eq!(json["correlationId"], "corr-1");
        assert_eq!(json["requestId"], "req-1");
        assert!(json.get("patientId").is_none());
        assert!(json.get("itemsCount").is_none());
    }
}
