//! The reference trade set used by demos and end-to-end tests.

use etx_types::{Timestamp, TransactionDraft};

/// Twelve sample trades. The last one reuses transaction id `456783` and
/// is refused by [`Ledger::insert`](crate::Ledger::insert).
pub fn reference_trades() -> Vec<TransactionDraft> {
    let trade = |id: u32, seller: u32, buyer: u32, energy: f64, price: f64, at: (u32, u32, i32, u32, u32)| {
        let (day, month, year, hour, minute) = at;
        TransactionDraft::new(id, seller, buyer, energy, price, Timestamp::new(day, month, year, hour, minute))
    };
    vec![
        trade(123455, 123455, 123400, 18.5, 20.0, (21, 12, 2023, 2, 23)),
        trade(164832, 356872, 176581, 57.9, 15.0, (12, 12, 2023, 6, 45)),
        trade(234551, 536806, 304937, 57.9, 15.0, (5, 1, 2024, 14, 30)),
        trade(300002, 200030, 100004, 18.5, 20.0, (18, 2, 2023, 9, 15)),
        trade(456783, 654311, 789125, 45.2, 30.0, (7, 4, 2022, 11, 50)),
        trade(567898, 987644, 123780, 78.1, 12.5, (30, 6, 2023, 22, 10)),
        trade(678902, 345686, 567127, 33.3, 25.4, (9, 7, 2024, 5, 5)),
        trade(789018, 123469, 678911, 91.2, 10.1, (15, 8, 2023, 17, 40)),
        trade(890123, 234573, 789349, 66.7, 44.8, (1, 9, 2022, 8, 55)),
        trade(901237, 345686, 890562, 54.5, 28.9, (27, 10, 2023, 12, 20)),
        trade(345677, 456794, 901786, 99.9, 5.0, (3, 11, 2024, 16, 35)),
        trade(456783, 567802, 123890, 12.3, 32.1, (22, 5, 2023, 20, 0)),
    ]
}
