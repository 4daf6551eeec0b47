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

use resources::prescription::PrescriptionParameters;

use super::Error;

/// Input validation shared by create and replace. Runs before anything is
/// read from or written to the store.
pub fn validate(params: &PrescriptionParameters) -> Result<(), Error> {
    if params.items.is_empty() {
        return Err(Error::NoItems);
    }

    for (index, item) in params.items.iter().enumerate() {
        if item.drug_name.trim().is_empty() {
            return Err(Error::InvalidItem {
                index,
                field: "drugName",
            });
        }

        if item.dosage.trim().is_empty() {
            return Err(Error::InvalidItem {
                index,
                field: "dosage",
            });
        }

        if item.frequency.trim().is_empty() {
            return Err(Error::InvalidItem {
                index,
                field: "frequency",
            });
        }

        if item.duration_days <= 0 {
            return Err(Error::InvalidItem {
                index,
                field: "durationDays",
            });
        }
    }

    Ok(())
}
