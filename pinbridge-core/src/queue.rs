//! Outbound message queue
//!
//! Fixed-slot ring that decouples "a response or event was produced" from
//! "the link is free to transmit". Every slot is one maximum-size frame;
//! consumption is strict FIFO with at most one frame in flight.
//!
//! The queue never overwrites unread slots. Producers that find it full get
//! [`QueueError::Full`]; the main loop avoids that by only producing while
//! [`OutboundQueue::free_slots`] is non-zero.

use pinbridge_hal::Link;
use pinbridge_protocol::codec::get_u16;
use pinbridge_protocol::{encode_message, encode_response, FrameError, Header, Status, MAX_FRAME_SIZE};

/// Default number of queue slots
pub const QUEUE_SLOTS: usize = 16;

/// Errors from queueing a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum QueueError {
    /// Every slot holds an unsent frame
    Full,
    /// The frame does not fit a slot
    PayloadTooLarge,
}

impl From<FrameError> for QueueError {
    fn from(_: FrameError) -> Self {
        QueueError::PayloadTooLarge
    }
}

/// Result of one drain attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DrainOutcome {
    /// Nothing queued
    Empty,
    /// A frame is waiting but the link is still busy
    LinkBusy,
    /// A frame of this many bytes was handed to the link
    Sent(usize),
    /// The link rejected the frame; it was dropped
    LinkFailed,
}

/// Ring of fixed-size frame slots
pub struct OutboundQueue<const N: usize = QUEUE_SLOTS> {
    slots: [[u8; MAX_FRAME_SIZE]; N],
    /// Slot holding the oldest unsent frame
    read: usize,
    /// Number of occupied slots
    len: usize,
}

impl<const N: usize> Default for OutboundQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> OutboundQueue<N> {
    /// Create an empty queue
    pub const fn new() -> Self {
        Self {
            slots: [[0; MAX_FRAME_SIZE]; N],
            read: 0,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == N
    }

    /// Number of frames that can still be queued
    pub fn free_slots(&self) -> usize {
        N - self.len
    }

    /// Queue a complete message
    pub fn enqueue(
        &mut self,
        id: u16,
        echo: u16,
        handle: u16,
        payload: &[u8],
    ) -> Result<(), QueueError> {
        let slot = self.reserve()?;
        encode_message(slot, id, echo, handle, payload)?;
        self.commit();
        Ok(())
    }

    /// Queue a response to `request`
    pub fn enqueue_response(
        &mut self,
        request: &Header,
        status: Status,
        payload: &[u8],
    ) -> Result<(), QueueError> {
        let slot = self.reserve()?;
        encode_response(slot, request, status, payload)?;
        self.commit();
        Ok(())
    }

    /// The oldest unsent frame, trimmed to its encoded size
    pub fn front(&self) -> Option<&[u8]> {
        if self.is_empty() {
            return None;
        }
        let slot = &self.slots[self.read];
        let size = get_u16(slot) as usize;
        Some(&slot[..size])
    }

    /// Try to send the oldest frame
    ///
    /// Sends only when the link reports idle, and only the encoded size of
    /// the frame rather than the whole slot. A failed transmit still frees
    /// the slot; there are no retries.
    pub fn drain_step<L: Link>(&mut self, link: &mut L) -> DrainOutcome {
        let Some(frame) = self.front() else {
            return DrainOutcome::Empty;
        };
        if !link.is_idle() {
            return DrainOutcome::LinkBusy;
        }

        let size = frame.len();
        let outcome = match link.transmit(frame) {
            Ok(()) => {
                trace!("sent {=usize} byte frame", size);
                DrainOutcome::Sent(size)
            }
            Err(_) => {
                warn!("link rejected {=usize} byte frame, dropping", size);
                DrainOutcome::LinkFailed
            }
        };

        self.read = (self.read + 1) % N;
        self.len -= 1;
        outcome
    }

    fn reserve(&mut self) -> Result<&mut [u8; MAX_FRAME_SIZE], QueueError> {
        if self.is_full() {
            return Err(QueueError::Full);
        }
        let write = (self.read + self.len) % N;
        Ok(&mut self.slots[write])
    }

    fn commit(&mut self) {
        self.len += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeLink;
    use pinbridge_protocol::HEADER_SIZE;
    use proptest::prelude::*;

    #[test]
    fn test_drain_empty() {
        let mut queue: OutboundQueue = OutboundQueue::new();
        let mut link = FakeLink::new();
        assert_eq!(queue.drain_step(&mut link), DrainOutcome::Empty);
        assert!(link.sent.is_empty());
    }

    #[test]
    fn test_drain_sends_encoded_size_only() {
        let mut queue: OutboundQueue = OutboundQueue::new();
        let mut link = FakeLink::new();

        queue.enqueue(0x010F, 0, 0, &[0, 0, 0, 3, 0, 1]).unwrap();
        assert_eq!(queue.drain_step(&mut link), DrainOutcome::Sent(14));
        assert_eq!(link.sent.len(), 1);
        assert_eq!(link.sent[0].len(), 14);
        assert_eq!(&link.sent[0][HEADER_SIZE..], &[0, 0, 0, 3, 0, 1]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_drain_waits_for_idle_link() {
        let mut queue: OutboundQueue = OutboundQueue::new();
        let mut link = FakeLink::new();
        link.idle = false;

        queue.enqueue(1, 2, 3, &[]).unwrap();
        assert_eq!(queue.drain_step(&mut link), DrainOutcome::LinkBusy);
        assert_eq!(queue.len(), 1);

        link.idle = true;
        assert_eq!(queue.drain_step(&mut link), DrainOutcome::Sent(HEADER_SIZE));
    }

    #[test]
    fn test_one_frame_per_step() {
        let mut queue: OutboundQueue = OutboundQueue::new();
        let mut link = FakeLink::new();

        queue.enqueue(1, 0, 0, &[]).unwrap();
        queue.enqueue(2, 0, 0, &[]).unwrap();
        queue.drain_step(&mut link);
        assert_eq!(link.sent.len(), 1);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_failed_transmit_frees_slot() {
        let mut queue: OutboundQueue = OutboundQueue::new();
        let mut link = FakeLink::new();
        link.fail = true;

        queue.enqueue(1, 0, 0, &[]).unwrap();
        assert_eq!(queue.drain_step(&mut link), DrainOutcome::LinkFailed);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_full_queue_rejects_without_overwriting() {
        let mut queue: OutboundQueue<4> = OutboundQueue::new();
        for id in 0..4 {
            queue.enqueue(id, 0, 0, &[]).unwrap();
        }
        assert!(queue.is_full());
        assert_eq!(queue.free_slots(), 0);
        assert_eq!(queue.enqueue(99, 0, 0, &[]), Err(QueueError::Full));

        let mut link = FakeLink::new();
        for id in 0..4u16 {
            queue.drain_step(&mut link);
            assert_eq!(get_u16(&link.sent[id as usize][2..]), id);
        }
    }

    #[test]
    fn test_oversized_payload_rejected() {
        let mut queue: OutboundQueue = OutboundQueue::new();
        let payload = [0u8; MAX_FRAME_SIZE];
        assert_eq!(queue.enqueue(1, 0, 0, &payload), Err(QueueError::PayloadTooLarge));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_wraps_around() {
        let mut queue: OutboundQueue<3> = OutboundQueue::new();
        let mut link = FakeLink::new();

        for id in 0..10u16 {
            queue.enqueue(id, 0, 0, &[]).unwrap();
            queue.drain_step(&mut link);
        }
        let ids: heapless::Vec<u16, 16> = link.sent.iter().map(|f| get_u16(&f[2..])).collect();
        assert_eq!(&ids[..], &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
    }

    proptest! {
        #[test]
        fn prop_fifo_order_up_to_capacity(count in 0usize..40) {
            let mut queue: OutboundQueue = OutboundQueue::new();
            let mut accepted = 0usize;
            for id in 0..count {
                if queue.enqueue(id as u16, id as u16, 0, &[]).is_ok() {
                    accepted += 1;
                }
            }
            prop_assert_eq!(accepted, count.min(QUEUE_SLOTS));

            let mut link = FakeLink::new();
            for expected in 0..accepted {
                prop_assert_eq!(queue.drain_step(&mut link), DrainOutcome::Sent(HEADER_SIZE));
                let frame = &link.sent[expected];
                prop_assert_eq!(get_u16(&frame[2..]), expected as u16);
                prop_assert_eq!(get_u16(&frame[4..]), expected as u16);
            }
            prop_assert_eq!(queue.drain_step(&mut link), DrainOutcome::Empty);
        }
    }
}
