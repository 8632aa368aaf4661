//! Tests for the patient queues and the completion-order stack

use hospital_des_core::{CompletionStack, FcfsQueue, QueueError, StackError, TieredQueue};
use proptest::prelude::*;

#[test]
fn test_fcfs_queue_walkthrough() {
    let mut queue = FcfsQueue::new();
    assert!(queue.is_empty());

    queue.enqueue(101);
    queue.enqueue(102);
    queue.enqueue(103);
    assert!(!queue.is_empty());
    assert_eq!(queue.len(), 3);

    assert_eq!(queue.dequeue(), Ok(101));
    assert_eq!(queue.dequeue(), Ok(102));
    assert!(!queue.is_empty());
    assert_eq!(queue.dequeue(), Ok(103));
    assert!(queue.is_empty());
    assert_eq!(queue.dequeue(), Err(QueueError::EmptyQueue));
}

#[test]
fn test_tiered_queue_walkthrough() {
    let mut single = TieredQueue::new(3);
    single.enqueue(10, 0);
    single.enqueue(20, 0);
    assert_eq!(single.dequeue(), Ok(10));
    assert_eq!(single.dequeue(), Ok(20));
    assert_eq!(single.dequeue(), Err(QueueError::EmptyQueue));

    let mut multi = TieredQueue::new(3);
    multi.enqueue(100, 2);
    multi.enqueue(10, 0);
    multi.enqueue(20, 1);
    multi.enqueue(30, 2);
    multi.enqueue(40, 1);
    assert_eq!(multi.dequeue(), Ok(10));
    assert_eq!(multi.dequeue(), Ok(20));
    assert_eq!(multi.dequeue(), Ok(40));
    assert_eq!(multi.dequeue(), Ok(100));
    assert_eq!(multi.dequeue(), Ok(30));
    assert_eq!(multi.dequeue(), Err(QueueError::EmptyQueue));
}

#[test]
fn test_tiered_queue_ignores_invalid_tier() {
    let mut queue = TieredQueue::new(3);
    assert!(!queue.enqueue(1, 3));
    assert!(!queue.enqueue(2, usize::MAX));
    assert!(queue.is_empty());
    assert_eq!(queue.peek_front(), Err(QueueError::EmptyQueue));
    assert_eq!(queue.peek_back(), Err(QueueError::EmptyQueue));
}

#[test]
fn test_completion_stack_walkthrough() {
    let mut stack = CompletionStack::new();
    assert!(stack.is_empty());

    for id in [5, 10, 7, 15, 6] {
        stack.push(id);
    }
    assert_eq!(stack.to_string(), "{6, 5}");

    assert_eq!(stack.pop(), Ok(6));
    assert_eq!(stack.to_string(), "{5}");
    assert_eq!(stack.pop(), Ok(5));
    assert_eq!(stack.to_string(), "{}");
    assert_eq!(stack.pop(), Err(StackError::EmptyStack));

    for id in [20, 8, 25, 4] {
        stack.push(id);
    }
    assert_eq!(stack.to_string(), "{4}");
    assert_eq!(stack.pop(), Ok(4));
    assert!(stack.is_empty());
}

proptest! {
    #[test]
    fn prop_tiered_dequeue_respects_tier_then_fcfs(
        entries in proptest::collection::vec(0usize..4, 0..50)
    ) {
        let mut queue = TieredQueue::new(4);
        for (id, &tier) in entries.iter().enumerate() {
            prop_assert!(queue.enqueue(id, tier));
        }

        let mut expected: Vec<(usize, usize)> = entries
            .iter()
            .enumerate()
            .map(|(id, &tier)| (tier, id))
            .collect();
        expected.sort();

        for (_, id) in expected {
            prop_assert_eq!(queue.peek_front(), Ok(id));
            prop_assert_eq!(queue.dequeue(), Ok(id));
        }
        prop_assert!(queue.is_empty());
    }

    #[test]
    fn prop_completion_stack_stays_non_decreasing(
        pushes in proptest::collection::vec(0usize..100, 0..60)
    ) {
        let mut stack = CompletionStack::new();
        for &id in &pushes {
            stack.push(id);
            prop_assert_eq!(stack.top(), Ok(id));

            let contents: Vec<usize> = stack.iter().collect();
            prop_assert!(contents.windows(2).all(|w| w[0] <= w[1]));
        }
    }

    #[test]
    fn prop_fcfs_remove_back_mirrors_enqueue(ids in proptest::collection::vec(0usize..1000, 1..30)) {
        let mut queue = FcfsQueue::new();
        for &id in &ids {
            queue.enqueue(id);
        }
        for &id in ids.iter().rev() {
            prop_assert_eq!(queue.peek_back(), Ok(id));
            prop_assert_eq!(queue.remove_back(), Ok(id));
        }
        prop_assert!(queue.is_empty());
    }
}
