use std::num::NonZeroUsize;

use crossbeam_channel::{Receiver, Sender};
use parking_lot::{Condvar, Mutex};

/// A unit of work handed from the producer to the worker pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Job {
    /// Strike out the multiples of this prime above sqrt(limit).
    Prime(usize),
    /// No more work; the receiving worker exits.
    Shutdown,
}

/// Blocking FIFO handoff between the producer and the workers.
///
/// `enqueue` blocks while the queue is full and `dequeue` blocks while it is
/// empty. Neither times out, and no job is ever dropped.
pub trait JobQueue: Sync {
    fn enqueue(&self, job: Job);
    fn dequeue(&self) -> Job;
    /// Jobs currently waiting to be dequeued.
    fn len(&self) -> usize;
    fn capacity(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Circular buffer state guarded by the monitor lock.
struct Ring {
    // Slots outside [head, head + count) are stale; `count` alone decides
    // what is live.
    slots: Box<[Job]>,
    count: usize,
    head: usize,
    tail: usize,
}

/// Fixed-capacity ring buffer behind one mutex and two condition variables.
pub struct MonitorQueue {
    ring: Mutex<Ring>,
    not_full: Condvar,
    not_empty: Condvar,
    capacity: usize,
}

impl MonitorQueue {
    pub fn new(capacity: NonZeroUsize) -> Self {
        let capacity = capacity.get();
        Self {
            ring: Mutex::new(Ring {
                slots: vec![Job::Shutdown; capacity].into_boxed_slice(),
                count: 0,
                head: 0,
                tail: 0,
            }),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
            capacity,
        }
    }
}

impl JobQueue for MonitorQueue {
    fn enqueue(&self, job: Job) {
        let mut ring = self.ring.lock();
        while ring.count == self.capacity {
            self.not_full.wait(&mut ring);
        }

        let tail = ring.tail;
        ring.slots[tail] = job;
        ring.count += 1;
        ring.tail = (tail + 1) % self.capacity;
        debug_assert!(ring.count <= self.capacity);

        self.not_empty.notify_one();
    }

    fn dequeue(&self) -> Job {
        let mut ring = self.ring.lock();
        while ring.count == 0 {
            self.not_empty.wait(&mut ring);
        }

        let head = ring.head;
        let job = ring.slots[head];
        ring.count -= 1;
        ring.head = (head + 1) % self.capacity;

        self.not_full.notify_one();
        job
    }

    fn len(&self) -> usize {
        self.ring.lock().count
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Bounded MPMC channel used as the job queue.
///
/// Holds both ends itself, so the channel stays connected for as long as the
/// queue is alive.
pub struct ChannelQueue {
    tx: Sender<Job>,
    rx: Receiver<Job>,
    capacity: usize,
}

impl ChannelQueue {
    pub fn new(capacity: NonZeroUsize) -> Self {
        let capacity = capacity.get();
        let (tx, rx) = crossbeam_channel::bounded(capacity);
        Self { tx, rx, capacity }
    }
}

impl JobQueue for ChannelQueue {
    fn enqueue(&self, job: Job) {
        if self.tx.send(job).is_err() {
            unreachable!("job channel disconnected while its receiver is held");
        }
    }

    fn dequeue(&self) -> Job {
        match self.rx.recv() {
            Ok(job) => job,
            Err(_) => unreachable!("job channel disconnected while its sender is held"),
        }
    }

    fn len(&self) -> usize {
        self.rx.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}
