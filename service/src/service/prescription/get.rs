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

use resources::{misc::Actor, prescription::Prescription, primitives::Id};

use super::{access, Error, PrescriptionService};

impl PrescriptionService {
    /// Reads one prescription. A record of another doctor exists but is not
    /// visible, the caller gets an authorization error instead of not-found.
    pub async fn get_one(&self, actor: &Actor, id: &Id) -> Result<Prescription, Error> {
        let prescription = match self.store.get(id).await? {
            Some(prescription) => prescription,
            None => return Err(Error::NotFound(id.clone())),
        };

        access::check_read(actor, &prescription.doctor_id)
            .map_err(|denied| Error::from_denied(denied, actor, id))?;

        Ok(prescription)
    }

    /// Lists the prescriptions visible to the actor. Doctors only see their
    /// own records, unknown roles see nothing.
    pub async fn list(&self, actor: &Actor) -> Result<Vec<Prescription>, Error> {
        let prescriptions = self.store.list().await?;

        Ok(prescriptions
            .into_iter()
            .filter(|prescription| access::is_visible(actor, &prescription.doctor_id))
            .collect())
    }
}
