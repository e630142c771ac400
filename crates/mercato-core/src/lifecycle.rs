//! # Order Lifecycle
//!
//! State machines for fulfillment and payment status.
//!
//! ```text
//! Fulfillment:
//!   pending ──► processing ──► shipped ──► delivered
//!      │             │
//!      └─────────────┴──► cancelled
//!
//! Payment:
//!   pending ──► paid ──► refunded
//! ```
//!
//! The two machines are independent: cancelling an order does not touch
//! its payment status, and refunding does not cancel fulfillment. Any
//! required coupling lives with the caller.
//!
//! Self-transitions are rejected like any other missing edge, so a
//! repeated "cancel" is an error rather than a silent no-op.

use crate::error::{CoreError, CoreResult};
use crate::types::{OrderStatus, PaymentStatus};

// =============================================================================
// Fulfillment Transitions
// =============================================================================

/// Checks whether a fulfillment transition is allowed.
pub fn can_transition_to(from: OrderStatus, to: OrderStatus) -> bool {
    use OrderStatus::*;
    matches!(
        (from, to),
        (Pending, Processing)
            | (Pending, Cancelled)
            | (Processing, Shipped)
            | (Processing, Cancelled)
            | (Shipped, Delivered)
    )
}

/// Validates a fulfillment transition, returning the new status or
/// [`CoreError::InvalidTransition`].
pub fn transition(from: OrderStatus, to: OrderStatus) -> CoreResult<OrderStatus> {
    if can_transition_to(from, to) {
        Ok(to)
    } else {
        Err(CoreError::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        })
    }
}

/// Whether a fulfillment status has no outgoing transitions.
pub fn is_terminal(status: OrderStatus) -> bool {
    matches!(status, OrderStatus::Delivered | OrderStatus::Cancelled)
}

// =============================================================================
// Payment Transitions
// =============================================================================

/// Checks whether a payment transition is allowed.
pub fn can_transition_payment_to(from: PaymentStatus, to: PaymentStatus) -> bool {
    use PaymentStatus::*;
    matches!((from, to), (Pending, Paid) | (Paid, Refunded))
}

/// Validates a payment transition, returning the new status or
/// [`CoreError::InvalidTransition`].
pub fn transition_payment(from: PaymentStatus, to: PaymentStatus) -> CoreResult<PaymentStatus> {
    if can_transition_payment_to(from, to) {
        Ok(to)
    } else {
        Err(CoreError::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use OrderStatus::*;

    #[test]
    fn test_happy_path() {
        assert!(can_transition_to(Pending, Processing));
        assert!(can_transition_to(Processing, Shipped));
        assert!(can_transition_to(Shipped, Delivered));
    }

    #[test]
    fn test_cancellation_window() {
        assert!(can_transition_to(Pending, Cancelled));
        assert!(can_transition_to(Processing, Cancelled));

        // Once shipped, cancellation is off the table
        assert!(!can_transition_to(Shipped, Cancelled));
        assert!(!can_transition_to(Delivered, Cancelled));
    }

    #[test]
    fn test_no_skipping_or_reversing() {
        assert!(!can_transition_to(Pending, Shipped));
        assert!(!can_transition_to(Pending, Delivered));
        assert!(!can_transition_to(Shipped, Processing));
        assert!(!can_transition_to(Delivered, Pending));
    }

    #[test]
    fn test_self_transition_rejected() {
        assert!(!can_transition_to(Pending, Pending));
        assert!(!can_transition_to(Cancelled, Cancelled));
    }

    #[test]
    fn test_terminal_states() {
        assert!(is_terminal(Delivered));
        assert!(is_terminal(Cancelled));
        assert!(!is_terminal(Pending));
        assert!(!is_terminal(Processing));
        assert!(!is_terminal(Shipped));

        // Terminal really means no outgoing edges
        for to in [Pending, Processing, Shipped, Delivered, Cancelled] {
            assert!(!can_transition_to(Delivered, to));
            assert!(!can_transition_to(Cancelled, to));
        }
    }

    #[test]
    fn test_transition_error_carries_states() {
        let err = transition(Shipped, Cancelled).unwrap_err();
        assert_eq!(err.to_string(), "invalid transition: shipped -> cancelled");
    }

    #[test]
    fn test_payment_transitions() {
        use PaymentStatus::*;
        assert!(can_transition_payment_to(Pending, Paid));
        assert!(can_transition_payment_to(Paid, Refunded));

        assert!(!can_transition_payment_to(Pending, Refunded));
        assert!(!can_transition_payment_to(Refunded, Paid));
        assert!(!can_transition_payment_to(Paid, Pending));
        assert!(!can_transition_payment_to(Paid, Paid));

        assert_eq!(transition_payment(Pending, Paid), Ok(Paid));
        assert!(transition_payment(Refunded, Pending).is_err());
    }
}
