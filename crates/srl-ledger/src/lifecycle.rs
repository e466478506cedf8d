use srl_types::{Address, Record, Status};
use tracing::debug;

use crate::error::{LedgerResult, PreconditionFault};

/// Validate `record -> target` for `caller` and return the updated record.
///
/// Only `Prepared` records move, only to `Cast` or `Failed`, and only for
/// their author. The returned record differs from the input in `status`
/// alone; nothing is written here.
pub fn transition(record: &Record, target: Status, caller: &Address) -> LedgerResult<Record> {
    if record.status != Status::Prepared {
        return Err(PreconditionFault::NotPrepared {
            id: record.id.clone(),
            status: record.status,
        }
        .into());
    }
    if !record.status.can_transition_to(target) {
        return Err(PreconditionFault::InvalidTarget {
            id: record.id.clone(),
            target,
        }
        .into());
    }
    if !record.is_authored_by(caller) {
        return Err(PreconditionFault::NotAuthor {
            id: record.id.clone(),
            author: record.author.clone(),
            caller: caller.clone(),
        }
        .into());
    }
    debug!(id = %record.id, from = %record.status, to = %target, "transition accepted");
    Ok(record.with_status(target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LedgerError;
    use srl_types::{RecordId, Timestamp};

    fn author() -> Address {
        Address::new("0x00000000000000000000000000000000000000aa").unwrap()
    }

    fn record(status: Status) -> Record {
        Record {
            id: RecordId::parse("r1").unwrap(),
            encoded_value: "FHE-NDI=".into(),
            created_at: Timestamp::from_secs(1_700_000_000),
            author: author(),
            category: "Fireball".into(),
            declared_cost: 42.0,
            status,
        }
    }

    fn fault(err: LedgerError) -> PreconditionFault {
        match err {
            LedgerError::Precondition(fault) => fault,
            other => panic!("expected precondition fault, got {other:?}"),
        }
    }

    #[test]
    fn prepared_to_cast_changes_only_status() {
        let before = record(Status::Prepared);
        let after = transition(&before, Status::Cast, &author()).unwrap();
        assert_eq!(after.status, Status::Cast);
        assert_eq!(after.with_status(Status::Prepared), before);
    }

    #[test]
    fn prepared_to_failed() {
        let after = transition(&record(Status::Prepared), Status::Failed, &author()).unwrap();
        assert_eq!(after.status, Status::Failed);
    }

    #[test]
    fn terminal_records_do_not_move() {
        for from in [Status::Cast, Status::Failed] {
            for to in Status::ALL {
                let err = transition(&record(from), to, &author()).unwrap_err();
                assert!(matches!(fault(err), PreconditionFault::NotPrepared { status, .. } if status == from));
            }
        }
    }

    #[test]
    fn prepared_to_prepared_is_rejected() {
        let err = transition(&record(Status::Prepared), Status::Prepared, &author()).unwrap_err();
        assert!(matches!(fault(err), PreconditionFault::InvalidTarget { .. }));
    }

    #[test]
    fn author_match_ignores_case() {
        let upper = Address::new("0x00000000000000000000000000000000000000AA").unwrap();
        assert!(transition(&record(Status::Prepared), Status::Cast, &upper).is_ok());
    }

    #[test]
    fn non_author_is_rejected() {
        let stranger = Address::new("0x00000000000000000000000000000000000000bb").unwrap();
        let err = transition(&record(Status::Prepared), Status::Cast, &stranger).unwrap_err();
        assert!(matches!(fault(err), PreconditionFault::NotAuthor { .. }));
    }
}
