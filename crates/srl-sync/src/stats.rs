use serde::Serialize;
use srl_types::{Record, Status};

/// Per-status counts over a set of records.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RecordStats {
    pub total: usize,
    pub prepared: usize,
    pub cast: usize,
    pub failed: usize,
}

impl RecordStats {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a Record>) -> Self {
        records.into_iter().fold(Self::default(), |mut stats, r| {
            stats.total += 1;
            match r.status {
                Status::Prepared => stats.prepared += 1,
                Status::Cast => stats.cast += 1,
                Status::Failed => stats.failed += 1,
            }
            stats
        })
    }

    pub fn count(&self, status: Status) -> usize {
        match status {
            Status::Prepared => self.prepared,
            Status::Cast => self.cast,
            Status::Failed => self.failed,
        }
    }

    /// Share of `status` in percent; `0.0` for an empty set.
    pub fn percent(&self, status: Status) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count(status) as f64 * 100.0 / self.total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use srl_types::{Address, RecordId, Timestamp};

    fn record(id: &str, status: Status) -> Record {
        Record {
            id: RecordId::parse(id).unwrap(),
            encoded_value: "FHE-MQ==".into(),
            created_at: Timestamp::from_secs(1),
            author: Address::new("0xaa").unwrap(),
            category: "Fireball".into(),
            declared_cost: 1.0,
            status,
        }
    }

    #[test]
    fn counts_each_status() {
        let records = vec![
            record("1", Status::Prepared),
            record("2", Status::Cast),
            record("3", Status::Cast),
            record("4", Status::Failed),
        ];
        let stats = RecordStats::from_records(&records);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.count(Status::Prepared), 1);
        assert_eq!(stats.count(Status::Cast), 2);
        assert_eq!(stats.count(Status::Failed), 1);
        assert_eq!(stats.percent(Status::Cast), 50.0);
        assert_eq!(stats.percent(Status::Failed), 25.0);
    }

    #[test]
    fn empty_set_has_zero_percentages() {
        let stats = RecordStats::from_records(&Vec::<Record>::new());
        assert_eq!(stats, RecordStats::default());
        for status in Status::ALL {
            assert_eq!(stats.percent(status), 0.0);
        }
    }
}
