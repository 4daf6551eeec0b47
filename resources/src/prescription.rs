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

use std::fmt::{Display, Formatter, Result as FmtResult};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{misc::ParticipantId, primitives::Id};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prescription {
    pub id: Id,
    pub patient_id: ParticipantId,
    pub doctor_id: ParticipantId,
    pub appointment_id: Option<Id>,
    pub note: Option<String>,
    pub status: Status,
    pub items: Vec<PrescriptionItem>,
    pub dispensed_by: Option<ParticipantId>,
    pub dispensed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionItem {
    pub drug_name: String,
    pub dosage: String,
    pub frequency: String,
    pub duration_days: i32,
    pub instruction: Option<String>,
}

/// Input of the create and replace operations. Replace carries the same
/// references as create, the stored values are immutable though and a
/// mismatch is rejected before anything is written.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionParameters {
    pub patient_id: ParticipantId,
    pub doctor_id: ParticipantId,
    pub appointment_id: Option<Id>,
    pub note: Option<String>,
    pub items: Vec<PrescriptionItem>,
}

/// Dispensing record written together with the transition into `Dispensed`.
#[derive(Clone, Debug, PartialEq)]
pub struct DispenseStamp {
    pub dispensed_by: ParticipantId,
    pub dispensed_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "ISSUED")]
    Issued,

    #[serde(rename = "PENDING")]
    Pending,

    #[serde(rename = "DISPENSED")]
    Dispensed,

    #[serde(rename = "COMPLETED")]
    Completed,

    #[serde(rename = "CANCELED")]
    Canceled,
}

impl Status {
    /// Terminal states have no outgoing transitions and refuse every edit.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Canceled)
    }

    /// Item and scalar edits are only possible before dispensing.
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Issued | Self::Pending)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Issued => "ISSUED",
            Self::Pending => "PENDING",
            Self::Dispensed => "DISPENSED",
            Self::Completed => "COMPLETED",
            Self::Canceled => "CANCELED",
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classes() {
        assert!(Status::Issued.is_editable());
        assert!(Status::Pending.is_editable());
        assert!(!Status::Dispensed.is_editable());
        assert!(!Status::Completed.is_editable());
        assert!(!Status::Canceled.is_editable());

        assert!(Status::Completed.is_terminal());
        assert!(Status::Canceled.is_terminal());
        assert!(!Status::Dispensed.is_terminal());
    }

    #[test]
    fn status_wire_names() {
        let json = serde_json::to_string(&Status::Dispensed).unwrap();

        assert_eq!(json, r#""DISPENSED""#);
    }
}
