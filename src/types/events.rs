//! Lock and alarm event bitmasks carried in the two status bytes of a data frame.

use std::fmt;
use std::marker::PhantomData;

#[cfg(feature = "serde")]
use serde::{Serialize, Serializer};

/// A single named bit of an 8-bit event byte
pub trait LockEvent: Copy + Eq + fmt::Debug + 'static {
    /// All defined flags, least significant bit first
    const ALL: [Self; 8];

    fn bit(self) -> u8;

    fn name(self) -> &'static str;

    /// Mask of every bit that has a name
    fn defined_mask() -> u8 {
        Self::ALL.iter().fold(0, |mask, flag| mask | flag.bit())
    }
}

/// Events reported in the high status byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HighByteLockEvent {
    LongTimeUnlocking,
    WrongPassword,
    Swipe,
    LowBattery,
    CoverOpen,
    CoverClosed,
    MotorStuck,
    Reserved,
}

impl LockEvent for HighByteLockEvent {
    const ALL: [Self; 8] = [
        Self::LongTimeUnlocking,
        Self::WrongPassword,
        Self::Swipe,
        Self::LowBattery,
        Self::CoverOpen,
        Self::CoverClosed,
        Self::MotorStuck,
        Self::Reserved,
    ];

    fn bit(self) -> u8 {
        1 << self as u8
    }

    fn name(self) -> &'static str {
        match self {
            Self::LongTimeUnlocking => "LongTimeUnlocking",
            Self::WrongPassword => "WrongPassword",
            Self::Swipe => "Swipe",
            Self::LowBattery => "LowBattery",
            Self::CoverOpen => "CoverOpen",
            Self::CoverClosed => "CoverClosed",
            Self::MotorStuck => "MotorStuck",
            Self::Reserved => "Reserved",
        }
    }
}

/// Events reported in the low status byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LowByteLockEvent {
    BaseStationPositioning,
    EnterFence,
    ExitFence,
    RopeCut,
    Vibration,
    AckRequired,
    RopeInserted,
    MotorLocked,
}

impl LockEvent for LowByteLockEvent {
    const ALL: [Self; 8] = [
        Self::BaseStationPositioning,
        Self::EnterFence,
        Self::ExitFence,
        Self::RopeCut,
        Self::Vibration,
        Self::AckRequired,
        Self::RopeInserted,
        Self::MotorLocked,
    ];

    fn bit(self) -> u8 {
        1 << self as u8
    }

    fn name(self) -> &'static str {
        match self {
            Self::BaseStationPositioning => "BaseStationPositioning",
            Self::EnterFence => "EnterFence",
            Self::ExitFence => "ExitFence",
            Self::RopeCut => "RopeCut",
            Self::Vibration => "Vibration",
            Self::AckRequired => "AckRequired",
            Self::RopeInserted => "RopeInserted",
            Self::MotorLocked => "MotorLocked",
        }
    }
}

/// One event byte viewed as a set of `T` flags
pub struct EventSet<T: LockEvent> {
    bits: u8,
    _flags: PhantomData<T>,
}

impl<T: LockEvent> EventSet<T> {
    pub fn from_bits(bits: u8) -> Self {
        Self {
            bits,
            _flags: PhantomData,
        }
    }

    pub fn empty() -> Self {
        Self::from_bits(0)
    }

    pub fn bits(&self) -> u8 {
        self.bits
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn has(&self, flag: T) -> bool {
        self.bits & flag.bit() != 0
    }

    pub fn add(&mut self, flag: T) {
        self.bits |= flag.bit();
    }

    /// Set flags, least significant first
    pub fn flags(&self) -> Vec<T> {
        T::ALL.iter().copied().filter(|flag| self.has(*flag)).collect()
    }

    /// Render as a single flag name, or all set names joined by `|`
    ///
    /// Bits outside the named flags render as `unknown value: N` instead of
    /// being dropped.
    pub fn render(&self) -> String {
        if self.bits & !T::defined_mask() != 0 {
            return format!("unknown value: {}", self.bits);
        }

        if let Some(single) = T::ALL.iter().find(|flag| flag.bit() == self.bits) {
            return single.name().to_string();
        }

        self.flags()
            .into_iter()
            .map(T::name)
            .collect::<Vec<_>>()
            .join("|")
    }
}

impl<T: LockEvent> Clone for EventSet<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: LockEvent> Copy for EventSet<T> {}

impl<T: LockEvent> PartialEq for EventSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits
    }
}

impl<T: LockEvent> Eq for EventSet<T> {}

impl<T: LockEvent> Default for EventSet<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: LockEvent> fmt::Debug for EventSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventSet(0x{:02X} {})", self.bits, self.render())
    }
}

impl<T: LockEvent> fmt::Display for EventSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl<T: LockEvent> From<u8> for EventSet<T> {
    fn from(bits: u8) -> Self {
        Self::from_bits(bits)
    }
}

#[cfg(feature = "serde")]
impl<T: LockEvent> Serialize for EventSet<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_flag_renders_its_name() {
        let set = EventSet::<HighByteLockEvent>::from_bits(0x20);
        assert_eq!(set.render(), "CoverClosed");
        assert!(set.has(HighByteLockEvent::CoverClosed));
        assert!(!set.has(HighByteLockEvent::CoverOpen));
    }

    #[test]
    fn test_multiple_flags_render_low_to_high() {
        let set = EventSet::<LowByteLockEvent>::from_bits(0xE0);
        assert_eq!(set.render(), "AckRequired|RopeInserted|MotorLocked");
        assert_eq!(
            set.flags(),
            vec![
                LowByteLockEvent::AckRequired,
                LowByteLockEvent::RopeInserted,
                LowByteLockEvent::MotorLocked
            ]
        );
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut set = EventSet::<HighByteLockEvent>::empty();
        set.add(HighByteLockEvent::LowBattery);
        set.add(HighByteLockEvent::LowBattery);
        set.add(HighByteLockEvent::LongTimeUnlocking);
        assert_eq!(set.bits(), 0x09);
        assert_eq!(set.to_string(), "LongTimeUnlocking|LowBattery");
    }

    #[test]
    fn test_empty_set_renders_empty() {
        assert_eq!(EventSet::<LowByteLockEvent>::empty().render(), "");
    }

    #[test]
    fn test_highest_bit_is_named() {
        assert_eq!(EventSet::<HighByteLockEvent>::from_bits(0x80).render(), "Reserved");
        assert_eq!(EventSet::<LowByteLockEvent>::from_bits(0x80).render(), "MotorLocked");
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Partial {
        A,
    }

    impl LockEvent for Partial {
        const ALL: [Self; 8] = [Self::A; 8];

        fn bit(self) -> u8 {
            1
        }

        fn name(self) -> &'static str {
            "A"
        }
    }

    #[test]
    fn test_undefined_bits_render_unknown() {
        assert_eq!(EventSet::<Partial>::from_bits(0x01).render(), "A");
        assert_eq!(EventSet::<Partial>::from_bits(0x03).render(), "unknown value: 3");
    }
}
