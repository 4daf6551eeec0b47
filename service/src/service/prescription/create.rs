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
    prescription::{Prescription, PrescriptionParameters, Status},
    primitives::Id,
};

use crate::{events::TOPIC_PRESCRIPTIONS, logging::LOG_TARGET, service::misc::RequestContext};

use super::{misc::validate, Error, PrescriptionService};

impl PrescriptionService {
    /// Issues a new prescription. The item list is written together with the
    /// scalar fields in one atomic insert.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        params: PrescriptionParameters,
    ) -> Result<Prescription, Error> {
        validate(&params)?;

        let id = Id::generate().map_err(|()| Error::GenerateId)?;
        let now = Utc::now();
        let prescription = Prescription {
            id,
            patient_id: params.patient_id,
            doctor_id: params.doctor_id,
            appointment_id: params.appointment_id,
            note: params.note,
            status: Status::Issued,
            items: params.items,
            dispensed_by: None,
            dispensed_at: None,
            created_at: now,
            updated_at: now,
        };

        let prescription = self.store.insert(prescription).await?;
        debug!(target: LOG_TARGET, "prescription created with id: {}", prescription.id);

        let event = Event {
            type_: EventType::Created,
            id: prescription.id.clone(),
            patient_id: Some(prescription.patient_id.clone()),
            doctor_id: Some(prescription.doctor_id.clone()),
            items_count: Some(prescription.items.len()),
            status: prescription.status,
            correlation_id: ctx.correlation_id.clone(),
            request_id: ctx.request_id.clone(),
            ts: Utc::now(),
        };
        self.publisher.publish(TOPIC_PRESCRIPTIONS, &event);

        Ok(prescription)
    }
}
