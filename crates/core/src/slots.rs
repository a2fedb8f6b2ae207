//! Standard slot topology of the face

use line_watchface_types::{ComplicationSlot, ContentType, SlotId, SlotRole};

pub const TOP_SLOT: SlotId = 0;
pub const LEFT_SLOT: SlotId = 1;
pub const RIGHT_SLOT: SlotId = 2;
pub const BOTTOM_SLOT: SlotId = 3;
pub const BACKGROUND_SLOT: SlotId = 4;

/// Per-frame draw order, which is also tap registration order
pub const DRAW_ORDER: [SlotId; 5] = [BACKGROUND_SLOT, TOP_SLOT, LEFT_SLOT, RIGHT_SLOT, BOTTOM_SLOT];

/// The five slots, indexed by id
pub fn standard_slots() -> Vec<ComplicationSlot> {
    use ContentType::*;

    vec![
        ComplicationSlot::new(TOP_SLOT, SlotRole::Top, &[ShortText, SmallImage, Icon]),
        ComplicationSlot::new(LEFT_SLOT, SlotRole::Left, &[ShortText, SmallImage, Icon]),
        ComplicationSlot::new(
            RIGHT_SLOT,
            SlotRole::Right,
            &[RangedValue, ShortText, SmallImage, Icon],
        ),
        ComplicationSlot::new(
            BOTTOM_SLOT,
            SlotRole::Bottom,
            &[LongText, ShortText, SmallImage, Icon],
        ),
        ComplicationSlot::new(BACKGROUND_SLOT, SlotRole::Background, &[LargeImage]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_indexed_by_id() {
        for (index, slot) in standard_slots().iter().enumerate() {
            assert_eq!(slot.id as usize, index);
        }
    }

    #[test]
    fn test_only_right_slot_takes_ranged_values() {
        let slots = standard_slots();
        let ranged: Vec<_> = slots
            .iter()
            .filter(|s| s.supports(ContentType::RangedValue))
            .map(|s| s.role)
            .collect();
        assert_eq!(ranged, vec![SlotRole::Right]);
        assert!(slots[BOTTOM_SLOT as usize].supports(ContentType::LongText));
        assert!(!slots[TOP_SLOT as usize].supports(ContentType::LongText));
    }

    #[test]
    fn test_background_drawn_first() {
        assert_eq!(DRAW_ORDER[0], BACKGROUND_SLOT);
        assert_eq!(DRAW_ORDER.len(), standard_slots().len());
    }
}
