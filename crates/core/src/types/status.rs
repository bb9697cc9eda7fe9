//! Order status state machine.
//!
//! An order in `Pending` is a cart. Checkout moves it to `Paid`, which is the
//! only transition with side effects on product stock; `cancel` and `refund`
//! undo those effects. The predicates here are the single source of truth for
//! which transitions the lifecycle engine will act on. Everything else is a
//! no-op, not an error.

use serde::{Deserialize, Serialize};

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "order_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// The order is an open cart.
    #[default]
    Pending,
    /// Payment has been taken and stock deducted.
    Paid,
    /// Handed to the carrier.
    Shipped,
    /// Delivered; terminal.
    Completed,
    /// Cancelled after payment; stock restored. Terminal.
    Cancelled,
    /// Refunded after payment; stock restored. Terminal.
    Refunded,
}

impl OrderStatus {
    /// Whether `pay` would deduct stock and flip the status.
    ///
    /// A `Paid` order is not payable but paying it again is an idempotent
    /// success; see the lifecycle engine.
    #[must_use]
    pub const fn is_payable(self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Whether `cancel` restores stock and flips the status.
    #[must_use]
    pub const fn can_cancel(self) -> bool {
        matches!(self, Self::Paid | Self::Shipped)
    }

    /// Whether `refund` restores stock and flips the status.
    #[must_use]
    pub const fn can_refund(self) -> bool {
        matches!(self, Self::Paid)
    }

    /// Terminal states never transition again.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Refunded)
    }

    /// Full transition matrix.
    ///
    /// `Pending → Paid`, `Paid → {Shipped, Completed, Cancelled, Refunded}`,
    /// `Shipped → {Completed, Cancelled}`. Everything else is rejected.
    #[must_use]
    pub const fn can_transition(self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Pending, Self::Paid)
                | (
                    Self::Paid,
                    Self::Shipped | Self::Completed | Self::Cancelled | Self::Refunded
                )
                | (Self::Shipped, Self::Completed | Self::Cancelled)
        )
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Shipped => "shipped",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Refunded => "refunded",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "shipped" => Ok(Self::Shipped),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            "refunded" => Ok(Self::Refunded),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::OrderStatus::*;
    use super::*;

    const ALL: [OrderStatus; 6] = [Pending, Paid, Shipped, Completed, Cancelled, Refunded];

    #[test]
    fn test_payable_only_from_pending() {
        for status in ALL {
            assert_eq!(status.is_payable(), status == Pending, "{status}");
        }
    }

    #[test]
    fn test_cancel_from_paid_or_shipped() {
        for status in ALL {
            assert_eq!(
                status.can_cancel(),
                matches!(status, Paid | Shipped),
                "{status}"
            );
        }
    }

    #[test]
    fn test_refund_only_from_paid() {
        for status in ALL {
            assert_eq!(status.can_refund(), status == Paid, "{status}");
        }
    }

    #[test]
    fn test_terminal_states_transition_nowhere() {
        for from in [Completed, Cancelled, Refunded] {
            assert!(from.is_terminal());
            for to in ALL {
                assert!(!from.can_transition(to), "{from} -> {to}");
            }
        }
    }

    #[test]
    fn test_transition_matrix() {
        assert!(Pending.can_transition(Paid));
        assert!(!Pending.can_transition(Shipped));
        assert!(!Pending.can_transition(Cancelled));
        assert!(Paid.can_transition(Shipped));
        assert!(Paid.can_transition(Completed));
        assert!(Paid.can_transition(Cancelled));
        assert!(Paid.can_transition(Refunded));
        assert!(!Paid.can_transition(Pending));
        assert!(Shipped.can_transition(Completed));
        assert!(Shipped.can_transition(Cancelled));
        assert!(!Shipped.can_transition(Refunded));
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&Pending).expect("serialize");
        assert_eq!(json, "\"pending\"");
        let back: OrderStatus = serde_json::from_str("\"refunded\"").expect("deserialize");
        assert_eq!(back, Refunded);
    }

    #[test]
    fn test_display_from_str_roundtrip() {
        for status in ALL {
            let parsed: OrderStatus = status.to_string().parse().expect("parse");
            assert_eq!(parsed, status);
        }
        assert!("unknown".parse::<OrderStatus>().is_err());
    }
}
