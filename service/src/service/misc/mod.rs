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

use serde::{Deserialize, Serialize};

/// Tracing tokens handed in by the transport layer. They are threaded
/// through every event an operation emits, nothing in here interprets them.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    pub correlation_id: String,
    pub request_id: String,
}

impl RequestContext {
    pub fn new<C, R>(correlation_id: C, request_id: R) -> Self
    where
        C: Into<String>,
        R: Into<String>,
    {
        Self {
            correlation_id: correlation_id.into(),
            request_id: request_id.into(),
        }
    }
}
