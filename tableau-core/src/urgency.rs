//! Date-derived urgency categories.
//!
//! A ticket with a parsable due date always gets its category recomputed from
//! the number of calendar days left. Undated tickets and malformed dates keep
//! whatever category they already carry.

use chrono::NaiveDate;

use crate::types::{Board, Ticket};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Category id for a number of days left until the due date.
/// Overdue tickets fall in the most urgent bucket.
pub fn urgency_for_days(days_left: i64) -> i64 {
    if days_left <= 3 {
        1
    } else if (4..=8).contains(&days_left) {
        2
    } else if (9..=15).contains(&days_left) {
        3
    } else {
        4
    }
}

/// Parse a due date the way forms submit it. Surrounding whitespace is ignored.
pub fn parse_due_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).ok()
}

/// Days from `today` to the ticket's due date, if it has a valid one.
pub fn days_left(ticket: &Ticket, today: NaiveDate) -> Option<i64> {
    let due = parse_due_date(ticket.date.as_deref()?)?;
    Some((due - today).num_days())
}

/// Recompute the category of every dated ticket. Returns how many changed.
pub fn classify(board: &mut Board, today: NaiveDate) -> usize {
    let mut changed = 0;
    for ticket in board.all_tickets_mut() {
        let Some(days) = days_left(ticket, today) else {
            continue;
        };
        let category = urgency_for_days(days);
        if ticket.category != Some(category) {
            ticket.set_category(Some(category));
            changed += 1;
        }
    }
    if changed > 0 {
        log::debug!(target: "tableau.urgency", "Reclassified {} tickets", changed);
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Column;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dated(date: &str) -> Ticket {
        let mut t = Ticket::new("t", "");
        t.date = Some(date.to_string());
        t
    }

    #[test]
    fn test_boundaries() {
        let today = day(2024, 1, 10);
        let cases = [
            ("2024-01-13", 1),
            ("2024-01-14", 2),
            ("2024-01-18", 2),
            ("2024-01-19", 3),
            ("2024-01-25", 3),
            ("2024-01-26", 4),
        ];
        for (date, expected) in cases {
            let mut board = Board::new();
            board.tickets_mut(Column::Todo).push(dated(date));
            classify(&mut board, today);
            assert_eq!(
                board.tickets(Column::Todo)[0].category,
                Some(expected),
                "date {}",
                date
            );
        }
    }

    #[test]
    fn test_overdue_is_most_urgent() {
        assert_eq!(urgency_for_days(-30), 1);
        assert_eq!(urgency_for_days(0), 1);
        assert_eq!(urgency_for_days(400), 4);
    }

    #[test]
    fn test_undated_ticket_keeps_manual_category() {
        let mut board = Board::new();
        let mut manual = Ticket::new("manual", "");
        manual.category = Some(7);
        board.tickets_mut(Column::Backlog).push(manual);
        board.tickets_mut(Column::Backlog).push(Ticket::new("bare", ""));

        for _ in 0..3 {
            assert_eq!(classify(&mut board, day(2024, 1, 10)), 0);
        }
        assert_eq!(board.tickets(Column::Backlog)[0].category, Some(7));
        assert_eq!(board.tickets(Column::Backlog)[1].category, None);
    }

    #[test]
    fn test_blank_and_malformed_dates_ignored() {
        let mut board = Board::new();
        let mut blank = dated("   ");
        blank.category = Some(2);
        board.tickets_mut(Column::Done).push(blank);
        board.tickets_mut(Column::Done).push(dated("10/01/2024"));
        board.tickets_mut(Column::Done).push(dated("2024-02-30"));

        assert_eq!(classify(&mut board, day(2024, 1, 10)), 0);
        let tickets = board.tickets(Column::Done);
        assert_eq!(tickets[0].category, Some(2));
        assert_eq!(tickets[1].category, None);
        assert_eq!(tickets[2].category, None);
    }

    #[test]
    fn test_date_overrides_manual_category() {
        let mut board = Board::new();
        let mut t = dated(" 2024-01-11 ");
        t.category = Some(4);
        board.tickets_mut(Column::InProgress).push(t);

        assert_eq!(classify(&mut board, day(2024, 1, 10)), 1);
        assert_eq!(board.tickets(Column::InProgress)[0].category, Some(1));
    }

    #[test]
    fn test_classification_is_idempotent() {
        let today = day(2024, 1, 10);
        let mut board = Board::new();
        board.tickets_mut(Column::Todo).push(dated("2024-01-20"));
        board.tickets_mut(Column::Done).push(dated("2023-12-01"));

        assert_eq!(classify(&mut board, today), 2);
        let once = board.clone();
        assert_eq!(classify(&mut board, today), 0);
        assert_eq!(board, once);
    }
}
