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

use thiserror::Error;

use resources::{misc::Actor, prescription::Status, primitives::Id, types::Role};

use crate::state::Error as StateError;

use super::access::Denied;

#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error("Prescription not found: {0}!")]
    NotFound(Id),

    #[error("Operation is not permitted for role {0:?}!")]
    DeniedRole(Role),

    #[error("Prescription {0} is assigned to another doctor!")]
    DeniedOwnership(Id),

    #[error("Transition {from} -> {to} is not allowed, expected one of {allowed:?}!")]
    TransitionConflict {
        from: Status,
        to: Status,
        allowed: &'static [Status],
    },

    #[error("Prescription {id} can not be edited in status {status}!")]
    NotEditable { id: Id, status: Status },

    #[error("Prescription must contain at least one item!")]
    NoItems,

    #[error("Item {index} has an invalid value for {field}!")]
    InvalidItem { index: usize, field: &'static str },

    #[error("Field {0} can not be changed after creation!")]
    Immutable(&'static str),

    #[error("Unable to generate Id!")]
    GenerateId,

    #[error("State Error: {0}")]
    StateError(StateError),
}

/// Transport-agnostic category of an error, the stand-in for a response
/// status code.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Authorization,
    Conflict,
    Internal,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::DeniedRole(_) | Self::DeniedOwnership(_) => ErrorKind::Authorization,
            Self::TransitionConflict { .. } | Self::NotEditable { .. } => ErrorKind::Conflict,
            Self::NoItems | Self::InvalidItem { .. } | Self::Immutable(_) => ErrorKind::Validation,
            Self::GenerateId | Self::StateError(_) => ErrorKind::Internal,
        }
    }

    pub(super) fn from_denied(denied: Denied, actor: &Actor, id: &Id) -> Self {
        match denied {
            Denied::Role => Self::DeniedRole(actor.role),
            Denied::Ownership => Self::DeniedOwnership(id.clone()),
        }
    }
}

impl From<StateError> for Error {
    fn from(err: StateError) -> Self {
        match err {
            StateError::NotFound(id) => Self::NotFound(id),
            err => Self::StateError(err),
        }
    }
}
