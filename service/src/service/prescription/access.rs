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

use resources::{
    misc::{Actor, ParticipantId},
    prescription::Status,
    types::Role,
};

use super::policy;

/// Reason of a denial. Ownership is kept separate from role denials so the
/// caller can surface them as different errors.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Denied {
    Role,
    Ownership,
}

struct Rule {
    role: Role,
    owner_only: bool,
    transition: fn(Status, Status) -> bool,
}

/// Transition rules per role. Dispensing is reserved for the nursing staff
/// and administrators; doctors handle every other edge, restricted to their
/// own records. Roles without a rule are denied.
const RULES: &[Rule] = &[
    Rule {
        role: Role::Admin,
        owner_only: false,
        transition: policy::is_allowed,
    },
    Rule {
        role: Role::Doctor,
        owner_only: true,
        transition: doctor_edges,
    },
    Rule {
        role: Role::Nurse,
        owner_only: false,
        transition: nurse_edges,
    },
];

fn doctor_edges(from: Status, to: Status) -> bool {
    to != Status::Dispensed && policy::is_allowed(from, to)
}

fn nurse_edges(from: Status, to: Status) -> bool {
    to == Status::Dispensed && matches!(from, Status::Issued | Status::Pending)
}

pub fn check_transition(
    actor: &Actor,
    doctor_id: &ParticipantId,
    from: Status,
    to: Status,
) -> Result<(), Denied> {
    let rule = RULES
        .iter()
        .find(|rule| rule.role == actor.role)
        .ok_or(Denied::Role)?;

    if !(rule.transition)(from, to) {
        return Err(Denied::Role);
    }

    if rule.owner_only && &actor.id != doctor_id {
        return Err(Denied::Ownership);
    }

    Ok(())
}

pub fn check_read(actor: &Actor, doctor_id: &ParticipantId) -> Result<(), Denied> {
    match actor.role {
        Role::Admin | Role::Nurse => Ok(()),
        Role::Doctor if &actor.id == doctor_id => Ok(()),
        Role::Doctor => Err(Denied::Ownership),
        _ => Err(Denied::Role),
    }
}

pub fn check_edit(actor: &Actor, doctor_id: &ParticipantId) -> Result<(), Denied> {
    match actor.role {
        Role::Admin => Ok(()),
        Role::Doctor if &actor.id == doctor_id => Ok(()),
        Role::Doctor => Err(Denied::Ownership),
        _ => Err(Denied::Role),
    }
}

pub fn is_visible(actor: &Actor, doctor_id: &ParticipantId) -> bool {
    check_read(actor, doctor_id).is_ok()
}

#[cfg(test)]
mod tests {
    use super::super::tests::{admin, doctor, nurse, other_doctor, unknown};
    use super::*;

    const ALL: &[Status] = &[
        Status::Issued,
        Status::Pending,
        Status::Dispensed,
        Status::Completed,
        Status::Canceled,
    ];

    fn own() -> ParticipantId {
        ParticipantId::new("doc-1").unwrap()
    }

    #[test]
    fn admin_may_request_every_legal_edge() {
        for &from in ALL {
            for &to in ALL {
                if policy::is_allowed(from, to) {
                    assert_eq!(check_transition(&admin(), &own(), from, to), Ok(()));
                }
            }
        }
    }

    #[test]
    fn nurse_is_restricted_to_dispensing() {
        assert_eq!(
            check_transition(&nurse(), &own(), Status::Issued, Status::Dispensed),
            Ok(())
        );
        assert_eq!(
            check_transition(&nurse(), &own(), Status::Pending, Status::Dispensed),
            Ok(())
        );

        for &from in ALL {
            for &to in ALL {
                if to == Status::Dispensed && matches!(from, Status::Issued | Status::Pending) {
                    continue;
                }

                assert_eq!(
                    check_transition(&nurse(), &own(), from, to),
                    Err(Denied::Role),
                    "{} -> {}",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn doctor_may_not_dispense() {
        for &from in ALL {
            assert_eq!(
                check_transition(&doctor(), &own(), from, Status::Dispensed),
                Err(Denied::Role),
                "{} -> DISPENSED",
                from
            );
        }
    }

    #[test]
    fn doctor_is_bound_to_own_records() {
        assert_eq!(
            check_transition(&doctor(), &own(), Status::Issued, Status::Canceled),
            Ok(())
        );
        assert_eq!(
            check_transition(&other_doctor(), &own(), Status::Issued, Status::Canceled),
            Err(Denied::Ownership)
        );

        assert_eq!(check_read(&doctor(), &own()), Ok(()));
        assert_eq!(check_read(&other_doctor(), &own()), Err(Denied::Ownership));
        assert_eq!(check_edit(&other_doctor(), &own()), Err(Denied::Ownership));
    }

    #[test]
    fn nurse_may_read_but_not_edit() {
        assert_eq!(check_read(&nurse(), &own()), Ok(()));
        assert_eq!(check_edit(&nurse(), &own()), Err(Denied::Role));
    }

    #[test]
    fn unknown_roles_are_denied_everywhere() {
        assert_eq!(check_read(&unknown(), &own()), Err(Denied::Role));
        assert_eq!(check_edit(&unknown(), &own()), Err(Denied::Role));
        assert_eq!(
            check_transition(&unknown(), &own(), Status::Issued, Status::Pending),
            Err(Denied::Role)
        );
        assert!(!is_visible(&unknown(), &own()));
    }
}
