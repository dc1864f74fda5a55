//! Balance computation for shared expenses.
//!
//! Pure functions mapping already-fetched rows (expenses, payments, members)
//! to per-member balance records: total paid, gross owed, pairwise debts and
//! credits, and cross-month carry-over of unsettled amounts. No I/O happens
//! here; callers fetch the rows and pass them in, which keeps every figure
//! unit-testable without a database.
//!
//! Splitting always divides by the *current* member count, so a past month's
//! figures shift if people join or leave later. That mirrors the historical
//! behavior of the app and is deliberately left as-is.

use std::collections::{BTreeMap, HashMap};

use chrono::{NaiveDate, Utc};
use serde::Serialize;

use crate::core::payment::{STATUS_CONFIRMED, STATUS_PENDING};
use crate::entities::{expense, member, payment};

/// Formats a date into its monthly settlement bucket ("YYYY-MM").
#[must_use]
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// The settlement bucket for today.
#[must_use]
pub fn current_month() -> String {
    month_key(Utc::now().date_naive())
}

/// One member's financial position for a single settlement month.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MemberBalance {
    /// Total this member paid out of pocket this month
    pub paid: f64,
    /// Gross total this member owes others for their share of expenses,
    /// reduced by confirmed payments (not clamped; overpaying goes negative)
    pub owes: f64,
    /// `paid - owes`, the gross net figure
    pub net: f64,
    /// What this member owes each counterparty (clamped at zero)
    pub debts_to: HashMap<String, f64>,
    /// What each counterparty owes this member (clamped at zero)
    pub owed_by: HashMap<String, f64>,
}

impl MemberBalance {
    /// Sum of outstanding pairwise debts.
    #[must_use]
    pub fn total_debt(&self) -> f64 {
        self.debts_to.values().filter(|v| **v > 0.0).sum()
    }

    /// Sum of outstanding pairwise credits.
    #[must_use]
    pub fn total_credit(&self) -> f64 {
        self.owed_by.values().filter(|v| **v > 0.0).sum()
    }

    /// Net settlement position: what others still owe me minus what I still
    /// owe others. Per month, these sum to zero across all members (as long
    /// as nobody has overpaid past the clamp).
    #[must_use]
    pub fn settlement_net(&self) -> f64 {
        self.total_credit() - self.total_debt()
    }
}

/// A record the engine had to exclude from the arithmetic.
///
/// Historically such records were dropped silently; they are now excluded
/// with an explicit report so the caller can surface the data loss.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum BalanceWarning {
    /// An expense whose payer is not a current member
    UnknownPayer {
        /// The offending expense
        expense_id: i64,
        /// The unrecognized payer email
        email: String,
    },
    /// A confirmed payment whose sender is not a current member
    UnknownPaymentSender {
        /// The offending payment
        payment_id: i64,
        /// The unrecognized sender email
        email: String,
    },
    /// A confirmed payment whose recipient is not a current member
    UnknownPaymentRecipient {
        /// The offending payment
        payment_id: i64,
        /// The unrecognized recipient email
        email: String,
    },
}

/// Balances for every member of the household for one month, plus any
/// records that had to be excluded.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MonthBalances {
    /// Balance record per member email; seeded for every member, even those
    /// with no activity
    pub balances: HashMap<String, MemberBalance>,
    /// Records excluded from the arithmetic
    pub warnings: Vec<BalanceWarning>,
}

/// Computes per-member balances for one settlement month.
///
/// `expenses` and `payments` must already be scoped to the month under
/// consideration. `members` is the *current* household roster; it seeds a
/// zero balance for every member and determines the equal-split divisor
/// (floored at 1 so an empty roster cannot divide by zero).
#[must_use]
#[allow(clippy::cast_precision_loss)] // household sizes are tiny
pub fn compute_month_balances(
    expenses: &[expense::Model],
    payments: &[payment::Model],
    members: &[member::Model],
) -> MonthBalances {
    let emails: Vec<String> = members.iter().map(|m| m.email.clone()).collect();
    let mut balances: HashMap<String, MemberBalance> = emails
        .iter()
        .map(|email| (email.clone(), MemberBalance::default()))
        .collect();
    let mut warnings = Vec::new();

    let divisor = if emails.is_empty() {
        1.0
    } else {
        emails.len() as f64
    };

    for exp in expenses {
        if !balances.contains_key(&exp.paid_by) {
            warnings.push(BalanceWarning::UnknownPayer {
                expense_id: exp.id,
                email: exp.paid_by.clone(),
            });
            continue;
        }

        if let Some(payer) = balances.get_mut(&exp.paid_by) {
            payer.paid += exp.amount;
        }

        let share = exp.amount / divisor;
        for email in &emails {
            if *email == exp.paid_by {
                continue;
            }
            if let Some(ower) = balances.get_mut(email) {
                ower.owes += share;
                *ower.debts_to.entry(exp.paid_by.clone()).or_insert(0.0) += share;
            }
            if let Some(payer) = balances.get_mut(&exp.paid_by) {
                *payer.owed_by.entry(email.clone()).or_insert(0.0) += share;
            }
        }
    }

    for pay in payments.iter().filter(|p| p.status == STATUS_CONFIRMED) {
        if !balances.contains_key(&pay.from_user) {
            warnings.push(BalanceWarning::UnknownPaymentSender {
                payment_id: pay.id,
                email: pay.from_user.clone(),
            });
        }
        if !balances.contains_key(&pay.to_user) {
            warnings.push(BalanceWarning::UnknownPaymentRecipient {
                payment_id: pay.id,
                email: pay.to_user.clone(),
            });
        }

        if let Some(from) = balances.get_mut(&pay.from_user) {
            from.owes -= pay.amount;
            if let Some(debt) = from.debts_to.get_mut(&pay.to_user) {
                // Overpayment is clamped; the excess is lost, not carried
                *debt = (*debt - pay.amount).max(0.0);
            }
        }
        if let Some(to) = balances.get_mut(&pay.to_user) {
            if let Some(credit) = to.owed_by.get_mut(&pay.from_user) {
                *credit = (*credit - pay.amount).max(0.0);
            }
        }
    }

    for balance in balances.values_mut() {
        balance.net = balance.paid - balance.owes;
    }

    MonthBalances { balances, warnings }
}

/// Computes balances independently for every settlement month present in the
/// expense set, keyed and ordered by month.
///
/// Months that only carry payments but no expenses do not form a bucket;
/// this mirrors the app's historical behavior of deriving the month list
/// from expenses alone.
#[must_use]
pub fn compute_monthly_balances(
    expenses: &[expense::Model],
    payments: &[payment::Model],
    members: &[member::Model],
) -> BTreeMap<String, MonthBalances> {
    let mut months: BTreeMap<String, MonthBalances> = BTreeMap::new();

    let mut month_keys: Vec<&str> = expenses.iter().map(|e| e.month_year.as_str()).collect();
    month_keys.sort_unstable();
    month_keys.dedup();

    for month in month_keys {
        let month_expenses: Vec<expense::Model> = expenses
            .iter()
            .filter(|e| e.month_year == month)
            .cloned()
            .collect();
        let month_payments: Vec<payment::Model> = payments
            .iter()
            .filter(|p| p.month_year == month)
            .cloned()
            .collect();
        months.insert(
            month.to_string(),
            compute_month_balances(&month_expenses, &month_payments, members),
        );
    }

    months
}

/// An amount owed to or by a single counterparty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CounterpartyAmount {
    /// Counterparty email
    pub email: String,
    /// Outstanding amount in euros
    pub amount: f64,
}

/// Dashboard figures for one member: the requested month's position plus the
/// carry-over of everything left unsettled from earlier months.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MemberOverview {
    /// The month the overview is anchored on ("YYYY-MM")
    pub month: String,
    /// Total the member still owes others for this month
    pub total_owed: f64,
    /// Total others still owe the member for this month
    pub total_owed_to_me: f64,
    /// `total_owed_to_me - total_owed`
    pub net_balance: f64,
    /// Sum of unsettled debts from all months before `month`
    pub previous_months_owed: f64,
    /// Sum of unsettled credits from all months before `month`
    pub previous_months_owed_to_me: f64,
    /// Carry-over debts bucketed by counterparty, ordered by email
    pub previous_debts: Vec<CounterpartyAmount>,
    /// Carry-over credits bucketed by counterparty, ordered by email
    pub previous_credits: Vec<CounterpartyAmount>,
    /// Records excluded from the arithmetic, across all months
    pub warnings: Vec<BalanceWarning>,
}

/// Builds the dashboard overview for one member.
///
/// `expenses` and `payments` span all months for the colocation. The
/// anchor month's figures are surfaced directly; remaining per-counterparty
/// amounts from strictly earlier months are summed into the carry-over
/// aggregates. Later months are ignored entirely, so current figures never
/// double-count carry-over.
#[must_use]
pub fn member_overview(
    expenses: &[expense::Model],
    payments: &[payment::Model],
    members: &[member::Model],
    member_email: &str,
    month: &str,
) -> MemberOverview {
    let monthly = compute_monthly_balances(expenses, payments, members);

    let mut overview = MemberOverview {
        month: month.to_string(),
        ..MemberOverview::default()
    };

    if let Some(current) = monthly.get(month).and_then(|m| m.balances.get(member_email)) {
        overview.total_owed = current.total_debt();
        overview.total_owed_to_me = current.total_credit();
        overview.net_balance = overview.total_owed_to_me - overview.total_owed;
    }

    let mut debts_by_counterparty: BTreeMap<String, f64> = BTreeMap::new();
    let mut credits_by_counterparty: BTreeMap<String, f64> = BTreeMap::new();

    // "YYYY-MM" keys compare correctly as strings
    for (month_bucket, balances) in monthly.range(..month.to_string()) {
        debug_assert!(month_bucket.as_str() < month);
        let Some(balance) = balances.balances.get(member_email) else {
            continue;
        };
        for (to, amount) in &balance.debts_to {
            if *amount > 0.0 {
                overview.previous_months_owed += amount;
                *debts_by_counterparty.entry(to.clone()).or_insert(0.0) += amount;
            }
        }
        for (from, amount) in &balance.owed_by {
            if *amount > 0.0 {
                overview.previous_months_owed_to_me += amount;
                *credits_by_counterparty.entry(from.clone()).or_insert(0.0) += amount;
            }
        }
    }

    overview.previous_debts = debts_by_counterparty
        .into_iter()
        .map(|(email, amount)| CounterpartyAmount { email, amount })
        .collect();
    overview.previous_credits = credits_by_counterparty
        .into_iter()
        .map(|(email, amount)| CounterpartyAmount { email, amount })
        .collect();
    overview.warnings = monthly.into_values().flat_map(|m| m.warnings).collect();

    overview
}

/// One outstanding debt with the pending-payment overlay applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutstandingDebt {
    /// Counterparty the debt is owed to
    pub to: String,
    /// Outstanding amount per the confirmed ledger
    pub amount: f64,
    /// Amount already declared but awaiting the recipient's confirmation
    pub pending_amount: f64,
    /// `amount - pending_amount`, floored at zero - what is actually left to pay
    pub remaining: f64,
}

/// Lists a member's outstanding debts with pending payments layered on top.
///
/// Pending payments never reduce `amount` (only confirmation does); they
/// only shrink `remaining` so the caller can show what is still actionable.
/// Only pending payments recorded for `month_year` count toward the overlay;
/// a declaration made for another settlement month is that month's business.
#[must_use]
pub fn outstanding_debts(
    balance: &MemberBalance,
    payments: &[payment::Model],
    member_email: &str,
    month_year: &str,
) -> Vec<OutstandingDebt> {
    let mut debts: Vec<OutstandingDebt> = balance
        .debts_to
        .iter()
        .filter(|(_, amount)| **amount > 0.0)
        .map(|(to, amount)| {
            let pending_amount: f64 = payments
                .iter()
                .filter(|p| {
                    p.status == STATUS_PENDING
                        && p.month_year == month_year
                        && p.from_user == member_email
                        && p.to_user == *to
                })
                .map(|p| p.amount)
                .sum();
            OutstandingDebt {
                to: to.clone(),
                amount: *amount,
                pending_amount,
                remaining: (amount - pending_amount).max(0.0),
            }
        })
        .collect();
    debts.sort_by(|a, b| a.to.cmp(&b.to));
    debts
}

/// Sums expense amounts by category label, for charts.
///
/// Independent of per-member balances: this is a plain aggregation over the
/// given expense set.
#[must_use]
pub fn category_totals(expenses: &[expense::Model]) -> HashMap<String, f64> {
    let mut totals = HashMap::new();
    for exp in expenses {
        *totals.entry(exp.category.clone()).or_insert(0.0) += exp.amount;
    }
    totals
}
