//! Frame-clock scheduling of pending tones.
//!
//! Melody cues start their tones at fixed offsets from the trigger. Instead of
//! one timer per tone, every pending tone sits in a single list ordered by the
//! output frame it is due at, and the renderer pops whatever falls inside the
//! block it is about to produce. Cancelling is clearing the list.

use crate::tone::Tone;

/// A tone waiting for the frame clock to reach `due_frame`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledTone {
    pub due_frame: u64,
    pub tone: Tone,
}

/// Pending tones ordered by due frame. Entries with the same due frame keep
/// their insertion order.
#[derive(Debug, Default)]
pub struct ToneScheduler {
    entries: Vec<ScheduledTone>,
}

impl ToneScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn schedule(&mut self, due_frame: u64, tone: Tone) {
        let index = self
            .entries
            .partition_point(|entry| entry.due_frame <= due_frame);
        self.entries.insert(index, ScheduledTone { due_frame, tone });
    }

    /// Removes and yields, in order, every entry due before `until`.
    pub fn pop_due(&mut self, until: u64) -> std::vec::Drain<'_, ScheduledTone> {
        let count = self
            .entries
            .partition_point(|entry| entry.due_frame < until);
        self.entries.drain(..count)
    }

    pub fn next_due(&self) -> Option<u64> {
        self.entries.first().map(|entry| entry.due_frame)
    }

    /// Drops every pending entry and returns how many there were.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScheduledTone> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries the queue holds before it has to grow
    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tone::Waveform;

    fn tone(frequency: f32) -> Tone {
        Tone::new(frequency, 0.1, Waveform::Sine)
    }

    #[test]
    fn keeps_entries_ordered_by_due_frame() {
        let mut scheduler = ToneScheduler::new();
        scheduler.schedule(300, tone(3.0));
        scheduler.schedule(100, tone(1.0));
        scheduler.schedule(200, tone(2.0));

        let frames: Vec<u64> = scheduler.iter().map(|e| e.due_frame).collect();
        assert_eq!(frames, vec![100, 200, 300]);
        assert_eq!(scheduler.next_due(), Some(100));
    }

    #[test]
    fn equal_frames_keep_insertion_order() {
        let mut scheduler = ToneScheduler::new();
        scheduler.schedule(50, tone(1.0));
        scheduler.schedule(50, tone(2.0));
        scheduler.schedule(50, tone(3.0));

        let order: Vec<f32> = scheduler.iter().map(|e| e.tone.frequency).collect();
        assert_eq!(order, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn pop_due_is_exclusive_of_until() {
        let mut scheduler = ToneScheduler::new();
        for frame in [0, 9600, 19200, 28800] {
            scheduler.schedule(frame, tone(frame as f32 + 1.0));
        }

        let due: Vec<u64> = scheduler.pop_due(9600).map(|e| e.due_frame).collect();
        assert_eq!(due, vec![0]);

        let due: Vec<u64> = scheduler.pop_due(19201).map(|e| e.due_frame).collect();
        assert_eq!(due, vec![9600, 19200]);

        assert_eq!(scheduler.len(), 1);
        assert_eq!(scheduler.pop_due(100).count(), 0);
    }

    #[test]
    fn clear_cancels_everything_pending() {
        let mut scheduler = ToneScheduler::with_capacity(4);
        scheduler.schedule(10, tone(1.0));
        scheduler.schedule(20, tone(2.0));

        assert_eq!(scheduler.clear(), 2);
        assert!(scheduler.is_empty());
        assert_eq!(scheduler.next_due(), None);
    }
}
