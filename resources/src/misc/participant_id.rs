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

use std::convert::TryFrom;
use std::fmt::Display;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

/// Reference to a participant of the prescription workflow (patient, doctor
/// or dispensing actor).
#[derive(Debug, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new<T: Display>(value: T) -> Result<Self, String> {
        let value = value.to_string();
        if value.is_empty() || value.len() > MAX_LEN {
            Err(format!("Invalid participant id: {}!", value))
        } else {
            Ok(Self(value))
        }
    }

    pub fn as_string(&self) -> &String {
        &self.0
    }
}

impl From<ParticipantId> for String {
    fn from(v: ParticipantId) -> Self {
        v.0
    }
}

impl TryFrom<String> for ParticipantId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() || value.len() > MAX_LEN {
            Err(value)
        } else {
            Ok(Self(value))
        }
    }
}

impl Deref for ParticipantId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

const MAX_LEN: usize = 64;
