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

use log::{info, warn};
use resources::Event;
use serde_json::to_string;

use crate::logging::LOG_TARGET;

pub const TOPIC_PRESCRIPTIONS: &str = "prescriptions";

/// Notification sink for lifecycle events. Delivery is best effort:
/// implementations must not block the calling operation and must handle
/// their own failures, a lost event never rolls back a persisted mutation.
pub trait EventPublisher: Send + Sync {
    fn publish(&self, topic: &str, event: &Event);
}

/// Publisher that emits events to the log, one JSON payload per line.
#[derive(Default)]
pub struct LogPublisher;

impl EventPublisher for LogPublisher {
    fn publish(&self, topic: &str, event: &Event) {
        match to_string(event) {
            Ok(payload) => info!(
                target: LOG_TARGET,
                "{} {}: {}",
                topic,
                event.type_.as_str(),
                payload
            ),
            Err(err) => warn!(
                target: LOG_TARGET,
                "unable to serialize event {} for {}: {}",
                event.type_.as_str(),
                event.id,
                err
            ),
        }
    }
}

#[cfg(test)]
pub mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Publisher that records every event it receives.
    #[derive(Default)]
    pub struct CapturePublisher {
        events: Mutex<Vec<(String, Event)>>,
    }

    impl CapturePublisher {
        pub fn take(&self) -> Vec<(String, Event)> {
            self.events.lock().unwrap().drain(..).collect()
        }
    }

    impl EventPublisher for CapturePublisher {
        fn publish(&self, topic: &str, event: &Event) {
            self.events.lock().unwrap().push((topic.into(), event.clone()));
        }
    }

    #[test]
    fn log_publisher_swallows_its_own_failures() {
        use std::convert::TryFrom;

        use chrono::Utc;
        use resources::{event::EventType, prescription::Status, primitives::Id};

        let event = Event {
            type_: EventType::Created,
            id: Id::try_from("rx-1").unwrap(),
            patient_id: None,
            doctor_id: None,
            items_count: Some(1),
            status: Status::Issued,
            correlation_id: "corr-1".into(),
            request_id: "req-1".into(),
            ts: Utc::now(),
        };

        LogPublisher::default().publish(TOPIC_PRESCRIPTIONS, &event);
    }
}
