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

use chrono::Utc;
use log::debug;
use serde::Serialize;

use resources::{
    event::{Event, EventType},
    misc::Actor,
    prescription::{DispenseStamp, Status},
    primitives::Id,
};

use crate::{
    events::TOPIC_PRESCRIPTIONS, logging::LOG_TARGET, service::misc::RequestContext,
    state::Error as StateError,
};

use super::{access, policy, Error, PrescriptionService};

/// Result of a status update request.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub id: Id,
    pub status: Status,
}

impl PrescriptionService {
    /// Moves the prescription along one edge of the status machine. The
    /// checks run against a freshly read status and the write is a
    /// compare-and-set on that status, a concurrent writer forces the whole
    /// sequence to start over. Requesting the current status again is a
    /// no-op: nothing is written, nothing is published.
    pub async fn update_status(
        &self,
        actor: &Actor,
        ctx: &RequestContext,
        id: &Id,
        target: Status,
    ) -> Result<StatusUpdate, Error> {
        loop {
            let current = match self.store.get(id).await? {
                Some(prescription) => prescription,
                None => return Err(Error::NotFound(id.clone())),
            };

            if current.status == target {
                return Ok(StatusUpdate {
                    id: id.clone(),
                    status: target,
                });
            }

            if !policy::is_allowed(current.status, target) {
                return Err(Error::TransitionConflict {
                    from: current.status,
                    to: target,
                    allowed: policy::targets(current.status),
                });
            }

            access::check_transition(actor, &current.doctor_id, current.status, target)
                .map_err(|denied| Error::from_denied(denied, actor, id))?;

            let dispense = if target == Status::Dispensed {
                Some(DispenseStamp {
                    dispensed_by: actor.id.clone(),
                    dispensed_at: Utc::now(),
                })
            } else {
                None
            };

            match self.store.transition(id, current.status, target, dispense).await {
                Ok(prescription) => {
                    debug!(
                        target: LOG_TARGET,
                        "prescription {} moved from {} to {}",
                        id,
                        current.status,
                        prescription.status
                    );

                    let event = Event {
                        type_: EventType::StatusUpdated,
                        id: prescription.id.clone(),
                        patient_id: None,
                        doctor_id: None,
                        items_count: None,
                        status: prescription.status,
                        correlation_id: ctx.correlation_id.clone(),
                        request_id: ctx.request_id.clone(),
                        ts: Utc::now(),
                    };
                    self.publisher.publish(TOPIC_PRESCRIPTIONS, &event);

                    return Ok(StatusUpdate {
                        id: prescription.id,
                        status: prescription.status,
                    });
                }

                Err(StateError::StatusChanged(_)) => continue,
                Err(err) => return Err(err.into()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use resources::{event::EventType, prescription::DispenseStamp, prescription::Status};

    use crate::state::PrescriptionStore;

    use super::super::tests::{
        admin, ctx, doctor, nurse, other_doctor, other_nurse, params, prescription, service,
        unknown,
    };
    use super::super::{policy, Error};

    const ALL: &[Status] = &[
        Status::Issued,
        Status::Pending,
        Status::Dispensed,
        Status::Completed,
        Status::Canceled,
    ];

    #[tokio::test]
    async fn dispensing_locks_the_prescription() {
        let (service, state, publisher) = service();

        let created = service.create(&ctx(), params()).await.unwrap();
        assert_eq!(created.status, Status::Issued);

        let update = service
            .update_status(&nurse(), &ctx(), &created.id, Status::Dispensed)
            .await
            .unwrap();
        assert_eq!(update.status, Status::Dispensed);

        let stored = state.get(&created.id).await.unwrap().unwrap();
        assert_eq!(stored.dispensed_by, Some(nurse().id));
        assert!(stored.dispensed_at.is_some());

        let err = service
            .update_status(&admin(), &ctx(), &created.id, Status::Pending)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            Error::TransitionConflict {
                from: Status::Dispensed,
                to: Status::Pending,
                allowed: &[Status::Completed, Status::Canceled],
            }
        );

        let err = service
            .replace(&doctor(), &ctx(), &created.id, params())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            Error::NotEditable {
                id: created.id.clone(),
                status: Status::Dispensed,
            }
        );

        let types = publisher
            .take()
            .into_iter()
            .map(|(_, event)| event.type_)
            .collect::<Vec<_>>();
        assert_eq!(types, vec![EventType::Created, EventType::StatusUpdated]);
    }

    #[tokio::test]
    async fn reapplying_the_current_status_is_a_noop() {
        let (service, state, publisher) = service();
        let created = service.create(&ctx(), params()).await.unwrap();
        publisher.take();

        let before = state.get(&created.id).await.unwrap().unwrap();

        let update = service
            .update_status(&admin(), &ctx(), &created.id, Status::Issued)
            .await
            .unwrap();
        assert_eq!(update.status, Status::Issued);

        let after = state.get(&created.id).await.unwrap().unwrap();
        assert_eq!(before, after);
        assert!(publisher.take().is_empty());
    }

    #[tokio::test]
    async fn noop_wins_over_every_other_check() {
        // The idempotent branch runs before policy and authorization, even
        // a terminal status can be re-applied by anyone.
        let (service, state, _) = service();
        let rx = prescription(Status::Canceled);
        let id = rx.id.clone();
        state.insert(rx).await.unwrap();

        let update = service
            .update_status(&unknown(), &ctx(), &id, Status::Canceled)
            .await
            .unwrap();

        assert_eq!(update.status, Status::Canceled);
    }

    #[tokio::test]
    async fn illegal_edges_report_the_allowed_set() {
        let (service, state, _) = service();

        for &from in ALL {
            for &to in ALL {
                if to == from || policy::is_allowed(from, to) {
                    continue;
                }

                let rx = prescription(from);
                let id = rx.id.clone();
                state.insert(rx).await.unwrap();

                let err = service
                    .update_status(&admin(), &ctx(), &id, to)
                    .await
                    .unwrap_err();

                assert_eq!(
                    err,
                    Error::TransitionConflict {
                        from,
                        to,
                        allowed: policy::targets(from),
                    }
                );
            }
        }
    }

    #[tokio::test]
    async fn role_denials_are_distinct_from_conflicts() {
        let (service, state, publisher) = service();
        let created = service.create(&ctx(), params()).await.unwrap();
        publisher.take();

        let err = service
            .update_status(&doctor(), &ctx(), &created.id, Status::Dispensed)
            .await
            .unwrap_err();
        assert_eq!(err, Error::DeniedRole(doctor().role));

        let err = service
            .update_status(&nurse(), &ctx(), &created.id, Status::Completed)
            .await
            .unwrap_err();
        assert_eq!(err, Error::DeniedRole(nurse().role));

        let err = service
            .update_status(&other_doctor(), &ctx(), &created.id, Status::Canceled)
            .await
            .unwrap_err();
        assert_eq!(err, Error::DeniedOwnership(created.id.clone()));

        let err = service
            .update_status(&unknown(), &ctx(), &created.id, Status::Pending)
            .await
            .unwrap_err();
        assert_eq!(err, Error::DeniedRole(unknown().role));

        let stored = state.get(&created.id).await.unwrap().unwrap();
        assert_eq!(stored.status, Status::Issued);
        assert!(publisher.take().is_empty());
    }

    #[tokio::test]
    async fn dispensing_stamps_exactly_once() {
        let (service, state, _) = service();
        let created = service.create(&ctx(), params()).await.unwrap();

        service
            .update_status(&nurse(), &ctx(), &created.id, Status::Dispensed)
            .await
            .unwrap();
        let dispensed = state.get(&created.id).await.unwrap().unwrap();

        service
            .update_status(&admin(), &ctx(), &created.id, Status::Completed)
            .await
            .unwrap();
        let completed = state.get(&created.id).await.unwrap().unwrap();

        assert_eq!(completed.dispensed_by, dispensed.dispensed_by);
        assert_eq!(completed.dispensed_at, dispensed.dispensed_at);
        assert_eq!(completed.dispensed_by, Some(nurse().id));
    }

    #[tokio::test]
    async fn plain_transitions_never_stamp() {
        let (service, state, _) = service();
        let created = service.create(&ctx(), params()).await.unwrap();

        service
            .update_status(&admin(), &ctx(), &created.id, Status::Pending)
            .await
            .unwrap();
        service
            .update_status(&admin(), &ctx(), &created.id, Status::Completed)
            .await
            .unwrap();

        let stored = state.get(&created.id).await.unwrap().unwrap();
        assert_eq!(stored.status, Status::Completed);
        assert!(stored.dispensed_by.is_none());
        assert!(stored.dispensed_at.is_none());
    }

    #[tokio::test]
    async fn raced_dispense_falls_back_to_the_noop() {
        let (service, state, publisher) = service();
        let created = service.create(&ctx(), params()).await.unwrap();
        publisher.take();

        // Another worker dispenses between this caller reading the record
        // and issuing its own request.
        state
            .transition(
                &created.id,
                Status::Issued,
                Status::Dispensed,
                Some(DispenseStamp {
                    dispensed_by: other_nurse().id,
                    dispensed_at: Utc::now(),
                }),
            )
            .await
            .unwrap();

        let update = service
            .update_status(&nurse(), &ctx(), &created.id, Status::Dispensed)
            .await
            .unwrap();
        assert_eq!(update.status, Status::Dispensed);

        let stored = state.get(&created.id).await.unwrap().unwrap();
        assert_eq!(stored.dispensed_by, Some(other_nurse().id));
        assert!(publisher.take().is_empty());
    }

    #[tokio::test]
    async fn concurrent_dispense_has_exactly_one_winner() {
        let (service, state, _) = service();
        let created = service.create(&ctx(), params()).await.unwrap();
        let service = Arc::new(service);

        let first = tokio::spawn({
            let service = service.clone();
            let id = created.id.clone();
            async move { service.update_status(&nurse(), &ctx(), &id, Status::Dispensed).await }
        });
        let second = tokio::spawn({
            let service = service.clone();
            let id = created.id.clone();
            async move {
                service
                    .update_status(&other_nurse(), &ctx(), &id, Status::Dispensed)
                    .await
            }
        });

        let first = first.await.unwrap().unwrap();
        let second = second.await.unwrap().unwrap();
        assert_eq!(first.status, Status::Dispensed);
        assert_eq!(second.status, Status::Dispensed);

        let stored = state.get(&created.id).await.unwrap().unwrap();
        let dispensed_by = stored.dispensed_by.unwrap();
        assert!(dispensed_by == nurse().id || dispensed_by == other_nurse().id);
        assert!(stored.dispensed_at.is_some());
    }
}
