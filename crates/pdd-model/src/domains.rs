//! Test domains evaluated by the diagnostic criteria.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the test domains a criteria variant maps onto a score column.
///
/// The first five are cognitive domains; `Iadl` is the functional-impact
/// domain (instrumental activities of daily living) of criterion 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TestDomain {
    /// Attention / working memory.
    Attention,
    /// Executive function.
    Executive,
    /// Global cognition (MMSE, MoCA or similar screening total).
    Global,
    /// Memory / delayed recall.
    Memory,
    /// Language / verbal fluency.
    Language,
    /// Instrumental activities of daily living (functional impact).
    Iadl,
}

impl TestDomain {
    /// All domains, in criteria-table column order.
    pub const ALL: [TestDomain; 6] = [
        TestDomain::Attention,
        TestDomain::Executive,
        TestDomain::Global,
        TestDomain::Memory,
        TestDomain::Language,
        TestDomain::Iadl,
    ];

    /// Lowercase label as used in criteria-table headers.
    pub fn label(self) -> &'static str {
        match self {
            TestDomain::Attention => "attention",
            TestDomain::Executive => "executive",
            TestDomain::Global => "global",
            TestDomain::Memory => "memory",
            TestDomain::Language => "language",
            TestDomain::Iadl => "iadl",
        }
    }
}

impl fmt::Display for TestDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_domains_end_with_iadl() {
        assert_eq!(TestDomain::ALL.len(), 6);
        assert_eq!(TestDomain::ALL.last(), Some(&TestDomain::Iadl));
    }
}
