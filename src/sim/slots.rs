//! The two binding points of a paddle and their round-robin pointer

use serde::{Deserialize, Serialize};

use super::action::ActionKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotId {
    A,
    B,
}

impl SlotId {
    pub const BOTH: [SlotId; 2] = [SlotId::A, SlotId::B];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn other(self) -> SlotId {
        match self {
            SlotId::A => SlotId::B,
            SlotId::B => SlotId::A,
        }
    }
}

/// Empty or holding one action kind from the paddle's pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Slot {
    #[default]
    Empty,
    Bound(ActionKind),
}

impl Slot {
    pub fn kind(self) -> Option<ActionKind> {
        match self {
            Slot::Empty => None,
            Slot::Bound(kind) => Some(kind),
        }
    }

    pub fn is_empty(self) -> bool {
        self == Slot::Empty
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotBank {
    slots: [Slot; 2],
    /// Target of the next fresh assignment
    next: SlotId,
}

impl Default for SlotBank {
    fn default() -> Self {
        Self::new()
    }
}

impl SlotBank {
    pub fn new() -> Self {
        Self {
            slots: [Slot::Empty; 2],
            next: SlotId::A,
        }
    }

    pub fn get(&self, slot: SlotId) -> Slot {
        self.slots[slot.index()]
    }

    /// Which slot holds `kind`, if any
    pub fn slot_of(&self, kind: ActionKind) -> Option<SlotId> {
        SlotId::BOTH
            .into_iter()
            .find(|&slot| self.get(slot) == Slot::Bound(kind))
    }

    pub fn next_target(&self) -> SlotId {
        self.next
    }

    /// Kind in the slot other than the one `kind` sits in (or would land in)
    pub fn partner_of(&self, kind: ActionKind) -> Option<ActionKind> {
        let own = self.slot_of(kind).unwrap_or(self.next);
        self.get(own.other()).kind()
    }

    pub(crate) fn bind(&mut self, slot: SlotId, kind: ActionKind) {
        debug_assert!(self.slot_of(kind).is_none(), "{:?} bound twice", kind);
        self.slots[slot.index()] = Slot::Bound(kind);
    }

    pub(crate) fn clear(&mut self, slot: SlotId) {
        self.slots[slot.index()] = Slot::Empty;
    }

    /// Flip the pointer after a completed assignment
    pub(crate) fn advance(&mut self) {
        self.next = self.next.other();
    }

    pub(crate) fn reset_pointer(&mut self) {
        self.next = SlotId::A;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_bank_is_empty_and_targets_a() {
        let bank = SlotBank::new();
        assert!(SlotId::BOTH.iter().all(|&s| bank.get(s).is_empty()));
        assert_eq!(bank.next_target(), SlotId::A);
    }

    #[test]
    fn test_bind_and_lookup() {
        let mut bank = SlotBank::new();
        bank.bind(SlotId::B, ActionKind::Slam);
        assert_eq!(bank.slot_of(ActionKind::Slam), Some(SlotId::B));
        assert_eq!(bank.slot_of(ActionKind::LaserFire), None);
        assert_eq!(bank.get(SlotId::B).kind(), Some(ActionKind::Slam));

        bank.clear(SlotId::B);
        assert!(bank.get(SlotId::B).is_empty());
    }

    #[test]
    fn test_partner_lookup() {
        let mut bank = SlotBank::new();
        bank.bind(SlotId::A, ActionKind::GrowPaddle);
        bank.advance();
        // Shrink is not bound yet, it would land in B
        assert_eq!(bank.partner_of(ActionKind::ShrinkPaddle), Some(ActionKind::GrowPaddle));
        assert_eq!(bank.partner_of(ActionKind::GrowPaddle), None);
    }

    #[test]
    fn test_pointer_alternates() {
        let mut bank = SlotBank::new();
        bank.advance();
        assert_eq!(bank.next_target(), SlotId::B);
        bank.advance();
        assert_eq!(bank.next_target(), SlotId::A);
        bank.advance();
        bank.reset_pointer();
        assert_eq!(bank.next_target(), SlotId::A);
    }
}
