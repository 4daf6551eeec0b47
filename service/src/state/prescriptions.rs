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

use std::collections::hash_map::{Entry, HashMap};

use resources::{prescription::Prescription, primitives::Id};

use super::Error;

#[derive(Default)]
pub struct Prescriptions {
    by_id: HashMap<Id, Prescription>,
}

impl Prescriptions {
    pub fn insert(&mut self, prescription: Prescription) -> Result<&Prescription, Error> {
        match self.by_id.entry(prescription.id.clone()) {
            Entry::Occupied(entry) => Err(Error::Duplicate(entry.key().clone())),
            Entry::Vacant(entry) => Ok(entry.insert(prescription)),
        }
    }

    pub fn get_by_id(&self, id: &Id) -> Option<&Prescription> {
        self.by_id.get(id)
    }

    pub fn get_mut_by_id(&mut self, id: &Id) -> Option<&mut Prescription> {
        self.by_id.get_mut(id)
    }

    pub fn remove_by_id(&mut self, id: &Id) -> Option<Prescription> {
        self.by_id.remove(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Prescription> {
        self.by_id.values()
    }
}
