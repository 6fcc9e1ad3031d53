use crate::types::index::IndexSpec;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexStatus {
    Present,
    /// An index with the same keys exists but its options differ. Holds the options found.
    Mismatched {
        unique: bool,
        expire_after: Option<Duration>,
    },
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexVerification {
    pub spec: IndexSpec,
    pub status: IndexStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationReport {
    pub entries: Vec<IndexVerification>,
}

impl VerificationReport {
    pub fn is_satisfied(&self) -> bool {
        self.entries.iter().all(|entry| entry.status == IndexStatus::Present)
    }

    /// Entries that are missing or mismatched
    pub fn problems(&self) -> impl Iterator<Item = &IndexVerification> {
        self.entries.iter().filter(|entry| entry.status != IndexStatus::Present)
    }
}

impl fmt::Display for VerificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let problems: Vec<_> = self.problems().collect();
        if problems.is_empty() {
            return write!(f, "all {} indexes present", self.entries.len());
        }

        write!(f, "{} of {} indexes not in place: ", problems.len(), self.entries.len())?;
        for (i, entry) in problems.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            match &entry.status {
                IndexStatus::Missing => write!(f, "{} is missing", entry.spec)?,
                IndexStatus::Mismatched { unique, expire_after } => write!(
                    f,
                    "{} found with unique={} expire_after_secs={:?}",
                    entry.spec,
                    unique,
                    expire_after.map(|d| d.as_secs())
                )?,
                IndexStatus::Present => {}
            }
        }
        Ok(())
    }
}
