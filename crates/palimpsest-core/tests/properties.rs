//! Property tests for the engine's algebraic guarantees.

use palimpsest_core::{
    ChangeLogError, FixedClock, MemberChangeLog, MemberName, SourceDialect, WorkItem,
};
use proptest::prelude::*;
use std::collections::HashSet;

const CLOCK: FixedClock = FixedClock(260_806);

fn member() -> MemberName {
    MemberName::new("DEVLIB", "QRPGLESRC", "INVOICE")
}

fn log_for(dialect: SourceDialect) -> MemberChangeLog {
    let mut log = MemberChangeLog::with_clock(member(), dialect, Box::new(CLOCK));
    log.load_source(Vec::new());
    log
}

fn arb_dialect() -> impl Strategy<Value = SourceDialect> {
    prop_oneof![Just(SourceDialect::Fixed), Just(SourceDialect::Sql)]
}

prop_compose! {
    fn arb_date()(y in 2000u32..=2019, m in 1u32..=12, d in 1u32..=28) -> u32 {
        y * 10_000 + m * 100 + d
    }
}

/// Free text that cannot collide with header machinery: no leading blanks,
/// none of the separator characters.
fn arb_text() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[A-Za-z0-9][A-Za-z0-9 .,]{0,30}", 0..3)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn header_roundtrips_through_render_and_parse(
        index in 9000u32..=9999,
        number in 1i64..=999_999,
        user in "[A-Z][A-Z0-9]{0,5}",
        date in arb_date(),
        in_work in any::<bool>(),
        dialect in arb_dialect(),
    ) {
        let item = WorkItem::new(index, number, &user, date, in_work, &CLOCK);
        let rendered = item.render_source(dialect);
        let parsed = WorkItem::parse(&rendered[0], dialect, &member()).expect("header parses");

        prop_assert_eq!(parsed.index(), item.index());
        prop_assert_eq!(parsed.number(), item.number());
        prop_assert_eq!(parsed.user(), item.user());
        prop_assert_eq!(parsed.date(), item.date());
        prop_assert_eq!(parsed.in_work(), item.in_work());
    }

    #[test]
    fn rescanning_a_scanned_member_changes_nothing(
        specs in prop::collection::vec(
            ("[A-Z][A-Z0-9]{0,5}", arb_date(), arb_text(), any::<bool>()),
            1..6,
        ),
        dialect in arb_dialect(),
    ) {
        let mut log = log_for(dialect);
        for (i, (user, date, text, in_work)) in specs.iter().enumerate() {
            log.put_work_item(1000 + i as i64, user, *date, &text.join("\n"), *in_work)
                .expect("numbers are unique");
        }

        let snapshot = |log: &MemberChangeLog| -> Vec<(i64, usize, Vec<String>)> {
            log.work_items()
                .map(|(item, position)| (item.number(), position, item.text().to_vec()))
                .collect()
        };

        let before = snapshot(&log);
        let report = log.scan();
        prop_assert!(report.issues.is_empty());
        prop_assert_eq!(snapshot(&log), before.clone());

        // The rendered buffer scans identically in a fresh instance.
        let mut fresh = log_for(dialect);
        fresh.load_source(log.lines().to_vec());
        prop_assert_eq!(snapshot(&fresh), before);
    }

    #[test]
    fn positions_stay_strictly_monotonic_under_mutation(
        count in 1usize..8,
        remove_mask in prop::collection::vec(any::<bool>(), 8),
        dialect in arb_dialect(),
    ) {
        let mut log = log_for(dialect);
        for i in 0..count {
            log.put_work_item(2000 + i as i64, "JDOE", 20_230_615, "change", false)
                .expect("numbers are unique");
        }
        for (i, remove) in remove_mask.iter().enumerate().take(count) {
            if *remove && log.work_item_count() > 1 {
                log.remove_work_item(2000 + i as i64, false).expect("still present");
            }
        }

        let positions: Vec<usize> = log.work_items().map(|(_, position)| position).collect();
        for pair in positions.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
        if let Some(last) = positions.last() {
            prop_assert!(*last < log.work_items_end());
        }
    }

    #[test]
    fn ticket_numbers_stay_unique(numbers in prop::collection::vec(1i64..=40, 1..20)) {
        let mut log = log_for(SourceDialect::Fixed);
        let mut accepted = HashSet::new();

        for &number in &numbers {
            let result = log.put_work_item(number, "JDOE", 20_230_615, "change", false);
            if accepted.insert(number) {
                prop_assert!(result.is_ok());
            } else {
                let is_duplicate = matches!(result, Err(ChangeLogError::DuplicateNumber { .. }));
                prop_assert!(is_duplicate);
            }
        }

        let registered: Vec<i64> = log.work_items().map(|(item, _)| item.number()).collect();
        let unique: HashSet<i64> = registered.iter().copied().collect();
        prop_assert_eq!(registered.len(), unique.len());
        prop_assert_eq!(unique, accepted);
    }

    #[test]
    fn adding_below_the_starting_index_never_mutates(
        index in 0u32..9000,
        number in 1i64..=999,
    ) {
        let mut log = log_for(SourceDialect::Fixed);
        let result = log.add_work_item(index, number, "JDOE", 20_230_615, "x", false);
        let is_below_minimum = matches!(result, Err(ChangeLogError::IndexBelowMinimum { .. }));
        prop_assert!(is_below_minimum);
        prop_assert_eq!(log.work_item_count(), 0);
        prop_assert!(log.lines().is_empty());
        prop_assert!(!log.is_dirty());
    }
}
