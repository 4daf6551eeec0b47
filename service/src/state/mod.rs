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

mod prescriptions;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use tokio::sync::Mutex;

use resources::{
    prescription::{DispenseStamp, Prescription, PrescriptionParameters, Status},
    primitives::Id,
};

pub use prescriptions::Prescriptions;

#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error("Prescription not found: {0}!")]
    NotFound(Id),

    #[error("Prescription with this ID ({0}) does already exist!")]
    Duplicate(Id),

    #[error("Prescription status has changed to {0}!")]
    StatusChanged(Status),
}

/// Persistence seam of the lifecycle engine. Every method is one atomic
/// unit: concurrent readers observe the state before or after a call, never
/// an intermediate one. `replace` and `transition` compare the stored status
/// against `expected` within the same unit and bail out with `StatusChanged`
/// when another writer got there first.
#[async_trait]
pub trait PrescriptionStore: Send + Sync {
    async fn insert(&self, prescription: Prescription) -> Result<Prescription, Error>;

    async fn get(&self, id: &Id) -> Result<Option<Prescription>, Error>;

    async fn list(&self) -> Result<Vec<Prescription>, Error>;

    /// Updates the scalar fields and replaces the item collection as a
    /// whole. Items are never patched partially.
    async fn replace(
        &self,
        id: &Id,
        expected: Status,
        params: &PrescriptionParameters,
    ) -> Result<Prescription, Error>;

    /// Compare-and-set on the status field. The dispense stamp, when given,
    /// is written together with the status.
    async fn transition(
        &self,
        id: &Id,
        expected: Status,
        target: Status,
        dispense: Option<DispenseStamp>,
    ) -> Result<Prescription, Error>;

    /// Removes the prescription including its items.
    async fn delete(&self, id: &Id) -> Result<(), Error>;
}

/// In-memory store. All operations run under a single lock, which is what
/// makes each of them atomic with respect to every other.
#[derive(Clone, Default)]
pub struct State {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    prescriptions: Prescriptions,
}

impl State {
    pub fn new() -> Self {
        Default::default()
    }
}

#[async_trait]
impl PrescriptionStore for State {
    async fn insert(&self, prescription: Prescription) -> Result<Prescription, Error> {
        let mut inner = self.inner.lock().await;
        let prescription = inner.prescriptions.insert(prescription)?;

        Ok(prescription.clone())
    }

    async fn get(&self, id: &Id) -> Result<Option<Prescription>, Error> {
        let inner = self.inner.lock().await;

        Ok(inner.prescriptions.get_by_id(id).cloned())
    }

    async fn list(&self) -> Result<Vec<Prescription>, Error> {
        let inner = self.inner.lock().await;

        Ok(inner.prescriptions.iter().cloned().collect())
    }

    async fn replace(
        &self,
        id: &Id,
        expected: Status,
        params: &PrescriptionParameters,
    ) -> Result<Prescription, Error> {
        let mut inner = self.inner.lock().await;
        let prescription = inner
            .prescriptions
            .get_mut_by_id(id)
            .ok_or_else(|| Error::NotFound(id.clone()))?;

        if prescription.status != expected {
            return Err(Error::StatusChanged(prescription.status));
        }

        prescription.patient_id = params.patient_id.clone();
        prescription.doctor_id = params.doctor_id.clone();
        prescription.appointment_id = params.appointment_id.clone();
        prescription.note = params.note.clone();
        prescription.items = params.items.clone();
        prescription.updated_at = Utc::now();

        Ok(prescription.clone())
    }

    async fn transition(
        &self,
        id: &Id,
        expected: Status,
        target: Status,
        dispense: Option<DispenseStamp>,
    ) -> Result<Prescription, Error> {
        let mut inner = self.inner.lock().await;
        let prescription = inner
            .prescriptions
            .get_mut_by_id(id)
            .ok_or_else(|| Error::NotFound(id.clone()))?;

        if prescription.status != expected {
            return Err(Error::StatusChanged(prescription.status));
        }

        prescription.status = target;
        if let Some(stamp) = dispense {
            prescription.dispensed_by = Some(stamp.dispensed_by);
            prescription.dispensed_at = Some(stamp.dispensed_at);
        }
        prescription.updated_at = Utc::now();

        Ok(prescription.clone())
    }

    async fn delete(&self, id: &Id) -> Result<(), Error> {
        let mut inner = self.inner.lock().await;

        match inner.prescriptions.remove_by_id(id) {
            Some(_) => Ok(()),
            None => Err(Error::NotFound(id.clone())),
        }
    }
}
