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

use resources::prescription::Status;

/// Legal forward moves of the status machine. `Completed` and `Canceled`
/// have no outgoing edges. Re-applying the current status is not an edge,
/// callers short-circuit that case before consulting the table.
pub fn targets(from: Status) -> &'static [Status] {
    match from {
        Status::Issued => &[
            Status::Pending,
            Status::Dispensed,
            Status::Completed,
            Status::Canceled,
        ],
        Status::Pending => &[Status::Dispensed, Status::Completed, Status::Canceled],
        Status::Dispensed => &[Status::Completed, Status::Canceled],
        Status::Completed | Status::Canceled => &[],
    }
}

pub fn is_allowed(from: Status, to: Status) -> bool {
    targets(from).contains(&to)
}
