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

mod access;
mod create;
mod delete;
mod error;
mod get;
mod misc;
mod policy;
mod replace;
mod status;

use std::sync::Arc;

use crate::{events::EventPublisher, state::PrescriptionStore};

pub use error::{Error, ErrorKind};
pub use policy::{is_allowed, targets};
pub use status::StatusUpdate;

/// Orchestrates the prescription lifecycle: every operation validates its
/// input, consults the authorization rules, persists through one atomic
/// store call and finally emits a best-effort event.
#[derive(Clone)]
pub struct PrescriptionService {
    store: Arc<dyn PrescriptionStore>,
    publisher: Arc<dyn EventPublisher>,
}

impl PrescriptionService {
    pub fn new(store: Arc<dyn PrescriptionStore>, publisher: Arc<dyn EventPublisher>) -> Self {
        Self { store, publisher }
    }
}
