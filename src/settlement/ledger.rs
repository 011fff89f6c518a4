//! Pure balance arithmetic applied to an in-memory snapshot.
//!
//! Nothing here talks to the store. A failed debit leaves the snapshot
//! exactly as it was, so callers can discard it without cleanup.

use super::types::{BalancePool, BalanceSnapshot, PoolDebit};
use super::SettlementResult;
use crate::errors::SettlementError;
use crate::utils::widen_to_debit_scale;
use rust_decimal::Decimal;

/// Take `amount` of `symbol` from the snapshot, PrimaryExchange first.
///
/// A pool that covers the rest of the debit keeps its exact remainder,
/// shown with at least eight decimal places; a pool that cannot is emptied
/// to zero and the shortfall moves on to the next pool. Pools without an entry or with a non-positive
/// balance are skipped.
///
/// # Errors
///
/// Returns `SettlementError::InsufficientFunds` if both pools together hold
/// less than `amount`; the snapshot is left untouched in that case
pub fn debit(snapshot: &mut BalanceSnapshot, symbol: &str, amount: Decimal) -> SettlementResult<Vec<PoolDebit>> {
    let mut working = snapshot.clone();
    let mut remaining = amount;
    let mut debits = Vec::new();

    for pool in BalancePool::DRAIN_ORDER {
        if remaining <= Decimal::ZERO {
            break;
        }

        let current = match working.entry(pool, symbol) {
            Some(current) if current > Decimal::ZERO => current,
            _ => continue,
        };

        if current >= remaining {
            let left = widen_to_debit_scale(current - remaining);
            working.set_balance(pool, symbol, left);
            debits.push(PoolDebit {
                pool,
                amount: current - left,
                remaining_balance: left,
            });
            remaining = Decimal::ZERO;
        } else {
            working.set_balance(pool, symbol, Decimal::ZERO);
            debits.push(PoolDebit {
                pool,
                amount: current,
                remaining_balance: Decimal::ZERO,
            });
            remaining -= current;
        }

        tracing::trace!(
            pool = %pool,
            symbol = symbol,
            remaining = %remaining,
            "Pool drained"
        );
    }

    if remaining > Decimal::ZERO {
        return Err(SettlementError::InsufficientFunds {
            symbol: symbol.to_string(),
            requested: amount,
            available: snapshot.total(symbol),
        });
    }

    *snapshot = working;
    Ok(debits)
}

/// Add `amount` of `symbol` to the PrimaryExchange pool at full precision,
/// creating the entry if needed. Returns the new balance.
///
/// # Errors
///
/// Returns `SettlementError::InvalidAmount` if the new balance overflows
pub fn credit(snapshot: &mut BalanceSnapshot, symbol: &str, amount: Decimal) -> SettlementResult<Decimal> {
    let pool = BalancePool::CREDIT_POOL;
    let updated = snapshot
        .balance(pool, symbol)
        .checked_add(amount)
        .ok_or_else(|| SettlementError::InvalidAmount {
            value: amount.to_string(),
            reason: format!("crediting {} would overflow the {} balance", symbol, pool),
        })?;

    snapshot.set_balance(pool, symbol, updated);
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn usd_snapshot(primary: Decimal, custody: Decimal) -> BalanceSnapshot {
        BalanceSnapshot::new()
            .with_balance(BalancePool::PrimaryExchange, "USD", primary)
            .with_balance(BalancePool::SelfCustody, "USD", custody)
    }

    #[test]
    fn test_debit_spills_into_self_custody() {
        let mut snapshot = usd_snapshot(dec!(5), dec!(10));
        let debits = debit(&mut snapshot, "USD", dec!(12)).unwrap();

        assert_eq!(snapshot.balance(BalancePool::PrimaryExchange, "USD"), dec!(0));
        assert_eq!(snapshot.balance(BalancePool::SelfCustody, "USD"), dec!(3));
        assert_eq!(snapshot.balance(BalancePool::SelfCustody, "USD").to_string(), "3.00000000");
        assert_eq!(debits.len(), 2);
        assert_eq!(debits[0].pool, BalancePool::PrimaryExchange);
        assert_eq!(debits[0].amount, dec!(5));
        assert_eq!(debits[1].pool, BalancePool::SelfCustody);
        assert_eq!(debits[1].amount, dec!(7));
    }

    #[test]
    fn test_debit_covered_by_primary_leaves_self_custody_alone() {
        let mut snapshot = usd_snapshot(dec!(5), dec!(10));
        let debits = debit(&mut snapshot, "USD", dec!(4.5)).unwrap();

        assert_eq!(snapshot.balance(BalancePool::PrimaryExchange, "USD"), dec!(0.5));
        assert_eq!(snapshot.balance(BalancePool::SelfCustody, "USD").to_string(), "10");
        assert_eq!(debits.len(), 1);
    }

    #[test]
    fn test_insufficient_funds_leaves_snapshot_untouched() {
        let mut snapshot = usd_snapshot(dec!(5), dec!(10));
        let before = snapshot.clone();

        let err = debit(&mut snapshot, "USD", dec!(20)).unwrap_err();

        assert!(matches!(
            err,
            SettlementError::InsufficientFunds { requested, available, .. }
                if requested == dec!(20) && available == dec!(15)
        ));
        assert_eq!(snapshot, before);
    }

    #[test]
    fn test_exact_total_drains_both_pools() {
        let mut snapshot = usd_snapshot(dec!(5), dec!(10));
        debit(&mut snapshot, "USD", dec!(15)).unwrap();

        assert_eq!(snapshot.total("USD"), Decimal::ZERO);
    }

    #[test]
    fn test_debit_conserves_amount_at_eight_places() {
        let cases = [
            (dec!(0.00000001), dec!(0), dec!(0.00000001)),
            (dec!(1.23456789), dec!(2.5), dec!(3.1)),
            (dec!(0), dec!(7.77777777), dec!(7.77777777)),
            (dec!(100), dec!(0.1), dec!(99.99999999)),
        ];

        for (primary, custody, amount) in cases {
            let mut snapshot = usd_snapshot(primary, custody);
            let before = snapshot.total("USD");
            let debits = debit(&mut snapshot, "USD", amount).unwrap();

            assert_eq!(before - snapshot.total("USD"), amount);
            assert_eq!(debits.iter().map(|d| d.amount).sum::<Decimal>(), amount);
            if primary < amount {
                assert_eq!(snapshot.balance(BalancePool::PrimaryExchange, "USD"), Decimal::ZERO);
            }
        }
    }

    #[test]
    fn test_debit_of_credited_full_precision_balance_is_exact() {
        let mut snapshot = BalanceSnapshot::new();
        credit(&mut snapshot, "XBT", dec!(0.000123456789123)).unwrap();
        let before = snapshot.total("XBT");

        let debits = debit(&mut snapshot, "XBT", dec!(0.0001)).unwrap();

        assert_eq!(before - snapshot.total("XBT"), dec!(0.0001));
        assert_eq!(debits.iter().map(|d| d.amount).sum::<Decimal>(), dec!(0.0001));
        assert_eq!(
            snapshot.balance(BalancePool::PrimaryExchange, "XBT").to_string(),
            "0.000023456789123"
        );
    }

    #[test]
    fn test_missing_symbol_is_insufficient() {
        let mut snapshot = usd_snapshot(dec!(5), dec!(10));
        assert!(debit(&mut snapshot, "XBT", dec!(1)).is_err());
    }

    #[test]
    fn test_credit_lands_in_primary_at_full_precision() {
        let mut snapshot = BalanceSnapshot::new().with_balance(BalancePool::SelfCustody, "XBT", dec!(1));

        let updated = credit(&mut snapshot, "XBT", dec!(0.000123456789123)).unwrap();

        assert_eq!(updated, dec!(0.000123456789123));
        assert_eq!(
            snapshot.balance(BalancePool::PrimaryExchange, "XBT").to_string(),
            "0.000123456789123"
        );
        assert_eq!(snapshot.balance(BalancePool::SelfCustody, "XBT"), dec!(1));
    }

    #[test]
    fn test_credit_overflow_is_rejected() {
        let mut snapshot = BalanceSnapshot::new().with_balance(BalancePool::PrimaryExchange, "XBT", Decimal::MAX);
        assert!(credit(&mut snapshot, "XBT", dec!(1)).is_err());
    }
}
