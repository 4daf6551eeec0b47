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
    prescription::{Prescription, PrescriptionParameters},
    primitives::Id,
};

use crate::{
    events::TOPIC_PRESCRIPTIONS, logging::LOG_TARGET, service::misc::RequestContext,
    state::Error as StateError,
};

use super::{access, misc::validate, Error, PrescriptionService};

impl PrescriptionService {
    /// Full edit: the stored item collection is replaced by the passed one
    /// as a whole, there is no partial item patch. Only possible before
    /// dispensing. The identity references must match the stored record.
    pub async fn replace(
        &self,
        actor: &Actor,
        ctx: &RequestContext,
        id: &Id,
        params: PrescriptionParameters,
    ) -> Result<Prescription, Error> {
        loop {
            let current = match self.store.get(id).await? {
                Some(prescription) => prescription,
                None => return Err(Error::NotFound(id.clone())),
            };

            access::check_edit(actor, &current.doctor_id)
                .map_err(|denied| Error::from_denied(denied, actor, id))?;

            if !current.status.is_editable() {
                return Err(Error::NotEditable {
                    id: id.clone(),
                    status: current.status,
                });
            }

            validate(&params)?;

            if params.patient_id != current.patient_id {
                return Err(Error::Immutable("patientId"));
            }
            if params.doctor_id != current.doctor_id {
                return Err(Error::Immutable("doctorId"));
            }
            if params.appointment_id != current.appointment_id {
                return Err(Error::Immutable("appointmentId"));
            }

            match self.store.replace(id, current.status, &params).await {
                Ok(prescription) => {
                    debug!(target: LOG_TARGET, "prescription {} updated", prescription.id);

                    let event = Event {
                        type_: EventType::Updated,
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

                    return Ok(prescription);
                }

                // Another writer moved the status first, re-run the checks
                // against the fresh state.
                Err(StateError::StatusChanged(_)) => continue,
                Err(err) => return Err(err.into()),
            }
        }
    }
}
