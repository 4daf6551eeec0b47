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

use chrono::Utc;
use log::debug;
use resources::{
    event::{Event, EventType},
    misc::Actor,
    primitives::Id,
};

use crate::{events::TOPIC_PRESCRIPTIONS, logging::LOG_TARGET, service::misc::RequestContext};

use super::{Error, PrescriptionService};

impl PrescriptionService {
    /// Hard delete, the items go with the prescription. There is no status
    /// restriction: dispensed and completed records can be removed as well.
    pub async fn delete(
        &self,
        actor: &Actor,
        ctx: &RequestContext,
        id: &Id,
    ) -> Result<(), Error> {
        let prescription = match self.store.get(id).await? {
            Some(prescription) => prescription,
            None => return Err(Error::NotFound(id.clone())),
        };

        self.store.delete(id).await?;
        debug!(
            target: LOG_TARGET,
            "prescription {} deleted by {}",
            id,
            actor.id.as_string()
        );

        let event = Event {
            type_: EventType::Deleted,
            id: prescription.id,
            patient_id: None,
            doctor_id: None,
            items_count: None,
            status: prescription.status,
            correlation_id: ctx.correlation_id.clone(),
            request_id: ctx.request_id.clone(),
            ts: Utc::now(),
        };
        self.publisher.publish(TOPIC_PRESCRIPTIONS, &event);

        Ok(())
    }
}
