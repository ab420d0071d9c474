//! Per-site intervention tests, one module per bug report

pub mod bug1933811_indices_circana_com;
pub mod bug1994142_virtual_cards_exnode_ru;

use crate::case::InterventionTest;

/// Every registered test, ordered by bug number
pub fn all() -> Vec<InterventionTest> {
    let mut tests = Vec::new();
    tests.extend(bug1933811_indices_circana_com::tests());
    tests.extend(bug1994142_virtual_cards_exnode_ru::tests());
    tests
}
