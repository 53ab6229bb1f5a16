//! The bounded blocking slot queue.
//!
//! A slot is one unit of pool capacity: either an empty placeholder
//! ("capacity available, no connection built yet") or an established
//! connection resting between uses. The queue is created full of empty
//! slots, so capacity accounting falls out of queue occupancy: a caller
//! that dequeues a slot owns that unit of capacity until it offers a slot
//! back.

use log::trace;
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::config::QueueDiscipline;

/// One unit of pool capacity.
pub(crate) enum Slot<T> {
    /// Capacity is available but no connection has been built yet.
    Empty,

    /// An established connection resting in the pool.
    Occupied(T),
}

/// A fixed-capacity blocking queue of slots.
pub(crate) struct SlotQueue<T> {
    slots: Mutex<VecDeque<Slot<T>>>,
    available: Condvar,
    capacity: usize,
    discipline: QueueDiscipline,
}

impl<T> SlotQueue<T> {
    /// Create a queue pre-filled with `capacity` empty slots.
    pub(crate) fn new(capacity: usize, discipline: QueueDiscipline) -> Self {
        let mut slots = VecDeque::with_capacity(capacity);
        for _ in 0..capacity {
            slots.push_back(Slot::Empty);
        }
        Self {
            slots: Mutex::new(slots),
            available: Condvar::new(),
            capacity,
            discipline,
        }
    }

    /// Take a slot, blocking up to `timeout` (forever when `None`).
    ///
    /// Returns `Err(waited)` when the wait expired; nothing has been
    /// dequeued in that case, so queue state is unchanged.
    pub(crate) fn take(&self, timeout: Option<Duration>) -> Result<Slot<T>, Duration> {
        let start = Instant::now();
        let deadline = timeout.map(|t| start + t);
        let mut slots = self.slots.lock();

        loop {
            if let Some(slot) = self.pop(&mut slots) {
                return Ok(slot);
            }

            trace!("all slots checked out, waiting");
            match deadline {
                Some(deadline) => {
                    if self.available.wait_until(&mut slots, deadline).timed_out() {
                        // One more pop covers an offer that raced with the
                        // timeout.
                        return self.pop(&mut slots).ok_or_else(|| start.elapsed());
                    }
                }
                None => self.available.wait(&mut slots),
            }
        }
    }

    /// Offer a slot back without blocking.
    ///
    /// Returns the slot to the caller when the queue is already full.
    pub(crate) fn offer(&self, slot: Slot<T>) -> Result<(), Slot<T>> {
        let mut slots = self.slots.lock();
        if slots.len() >= self.capacity {
            return Err(slot);
        }
        slots.push_back(slot);
        drop(slots);
        self.available.notify_one();
        Ok(())
    }

    /// Number of slots currently queued.
    pub(crate) fn len(&self) -> usize {
        self.slots.lock().len()
    }

    fn pop(&self, slots: &mut VecDeque<Slot<T>>) -> Option<Slot<T>> {
        match self.discipline {
            QueueDiscipline::Lifo => slots.pop_back(),
            QueueDiscipline::Fifo => slots.pop_front(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn drain(queue: &SlotQueue<u32>) {
        while queue.len() > 0 {
            queue.take(Some(Duration::from_millis(10))).ok();
        }
    }

    #[test]
    fn test_starts_full_of_empty_slots() {
        let queue = SlotQueue::<u32>::new(5, QueueDiscipline::Lifo);
        assert_eq!(queue.len(), 5);
        for _ in 0..5 {
            let slot = queue.take(Some(Duration::from_millis(10))).unwrap();
            assert!(matches!(slot, Slot::Empty));
        }
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn test_take_times_out_when_drained() {
        let queue = SlotQueue::<u32>::new(1, QueueDiscipline::Lifo);
        drain(&queue);

        let start = Instant::now();
        let result = queue.take(Some(Duration::from_millis(50)));
        assert!(result.is_err());
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn test_lifo_pops_most_recent_offer() {
        let queue = SlotQueue::<u32>::new(3, QueueDiscipline::Lifo);
        drain(&queue);

        queue.offer(Slot::Occupied(1)).ok().unwrap();
        queue.offer(Slot::Occupied(2)).ok().unwrap();
        let slot = queue.take(Some(Duration::from_millis(10))).unwrap();
        assert!(matches!(slot, Slot::Occupied(2)));
    }

    #[test]
    fn test_fifo_pops_oldest_offer() {
        let queue = SlotQueue::<u32>::new(3, QueueDiscipline::Fifo);
        drain(&queue);

        queue.offer(Slot::Occupied(1)).ok().unwrap();
        queue.offer(Slot::Occupied(2)).ok().unwrap();
        let slot = queue.take(Some(Duration::from_millis(10))).unwrap();
        assert!(matches!(slot, Slot::Occupied(1)));
    }

    #[test]
    fn test_offer_to_full_queue_returns_slot() {
        let queue = SlotQueue::<u32>::new(2, QueueDiscipline::Lifo);
        let rejected = queue.offer(Slot::Occupied(9));
        assert!(matches!(rejected, Err(Slot::Occupied(9))));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_blocked_take_wakes_on_offer() {
        let queue = Arc::new(SlotQueue::<u32>::new(1, QueueDiscipline::Lifo));
        drain(&queue);

        let waiter = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || queue.take(Some(Duration::from_secs(5))))
        };

        thread::sleep(Duration::from_millis(50));
        queue.offer(Slot::Occupied(7)).ok().unwrap();

        let slot = waiter.join().unwrap().unwrap();
        assert!(matches!(slot, Slot::Occupied(7)));
    }
}
