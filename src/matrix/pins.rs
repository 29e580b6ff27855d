//! The 13 HUB75 signal lines and the driver that sequences them.

use embedded_hal::digital::{OutputPin, PinState};

use super::{Cell, Color};
use crate::{Error, Result};

// ============================================================================
// PinMapping - which GPIO carries which signal
// ============================================================================

/// GPIO number for each of the 13 HUB75 signals.
///
/// Use [`PinMapping::ADAFRUIT_HAT`] for the common Adafruit RGB Matrix HAT wiring, or fill in
/// every field for custom wiring.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinMapping {
    /// Red, top half (rows 0-15).
    pub r1: u8,
    /// Red, bottom half (rows 16-31).
    pub r2: u8,
    /// Green, top half.
    pub g1: u8,
    /// Green, bottom half.
    pub g2: u8,
    /// Blue, top half.
    pub b1: u8,
    /// Blue, bottom half.
    pub b2: u8,
    /// Row address bit 0.
    pub a: u8,
    /// Row address bit 1.
    pub b: u8,
    /// Row address bit 2.
    pub c: u8,
    /// Row address bit 3.
    pub d: u8,
    /// Output enable.
    pub oe: u8,
    /// Column clock.
    pub clk: u8,
    /// Row latch.
    pub lat: u8,
}

impl PinMapping {
    /// Wiring of the Adafruit RGB Matrix HAT.
    pub const ADAFRUIT_HAT: Self = Self {
        r1: 5,
        r2: 12,
        g1: 13,
        g2: 16,
        b1: 6,
        b2: 23,
        a: 22,
        b: 26,
        c: 27,
        d: 20,
        oe: 4,
        clk: 17,
        lat: 21,
    };

    /// All 13 GPIO numbers in signal order (r1, r2, g1, g2, b1, b2, a, b, c, d, oe, clk, lat).
    #[must_use]
    pub const fn gpios(&self) -> [u8; 13] {
        [
            self.r1, self.r2, self.g1, self.g2, self.b1, self.b2, self.a, self.b, self.c, self.d,
            self.oe, self.clk, self.lat,
        ]
    }

    /// The first GPIO number that appears more than once, if any.
    #[must_use]
    pub fn first_duplicate(&self) -> Option<u8> {
        let gpios = self.gpios();
        gpios
            .iter()
            .enumerate()
            .find(|(index, gpio)| gpios[..*index].contains(gpio))
            .map(|(_, gpio)| *gpio)
    }
}

impl Default for PinMapping {
    fn default() -> Self {
        Self::ADAFRUIT_HAT
    }
}

// ============================================================================
// PinBank - claims output pins by GPIO number
// ============================================================================

/// Source of output pins addressed by GPIO number.
///
/// Implemented by the board layer (see `RpPinBank` on target) and by test doubles on the host.
pub trait PinBank {
    /// The output pin type handed out.
    type Pin: OutputPin;

    /// Claim `gpio` as an output.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HardwareUnavailable`] if the pin does not exist or is already claimed.
    fn open(&mut self, gpio: u8) -> Result<Self::Pin>;
}

// ============================================================================
// MatrixPins - the signal set
// ============================================================================

/// The 13 output lines of one HUB75 connector.
///
/// Field names follow the HUB75 signal names; see [`PinMapping`] for what each one carries.
pub struct MatrixPins<P> {
    /// Red, top half.
    pub r1: P,
    /// Red, bottom half.
    pub r2: P,
    /// Green, top half.
    pub g1: P,
    /// Green, bottom half.
    pub g2: P,
    /// Blue, top half.
    pub b1: P,
    /// Blue, bottom half.
    pub b2: P,
    /// Row address bit 0.
    pub a: P,
    /// Row address bit 1.
    pub b: P,
    /// Row address bit 2.
    pub c: P,
    /// Row address bit 3.
    pub d: P,
    /// Output enable.
    pub oe: P,
    /// Column clock.
    pub clk: P,
    /// Row latch.
    pub lat: P,
}

impl<P: OutputPin> MatrixPins<P> {
    /// Claim every pin named by `pin_mapping` from `pin_bank`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HardwareUnavailable`] if the mapping names a GPIO twice or the bank
    /// cannot supply one of the pins. Nothing is claimed when a duplicate is found.
    pub fn from_mapping<B>(pin_mapping: &PinMapping, pin_bank: &mut B) -> Result<Self>
    where
        B: PinBank<Pin = P>,
    {
        if let Some(gpio) = pin_mapping.first_duplicate() {
            return Err(Error::HardwareUnavailable { gpio });
        }
        let pins = Self {
            r1: pin_bank.open(pin_mapping.r1)?,
            r2: pin_bank.open(pin_mapping.r2)?,
            g1: pin_bank.open(pin_mapping.g1)?,
            g2: pin_bank.open(pin_mapping.g2)?,
            b1: pin_bank.open(pin_mapping.b1)?,
            b2: pin_bank.open(pin_mapping.b2)?,
            a: pin_bank.open(pin_mapping.a)?,
            b: pin_bank.open(pin_mapping.b)?,
            c: pin_bank.open(pin_mapping.c)?,
            d: pin_bank.open(pin_mapping.d)?,
            oe: pin_bank.open(pin_mapping.oe)?,
            clk: pin_bank.open(pin_mapping.clk)?,
            lat: pin_bank.open(pin_mapping.lat)?,
        };
        info!(
            "MatrixPins: claimed 13 pins (oe={}, clk={}, lat={})",
            pin_mapping.oe,
            pin_mapping.clk,
            pin_mapping.lat
        );
        Ok(pins)
    }
}

// ============================================================================
// SignalDriver - pin transition sequences
// ============================================================================

/// Level the output-enable line is held at while new column data is shifted in.
const OE_BLANKED: PinState = PinState::Low;
/// Level the output-enable line is held at while a latched row is shown.
const OE_SHOWING: PinState = PinState::High;

/// Drives the signal lines of one panel. Owns the [`MatrixPins`] exclusively.
pub struct SignalDriver<P> {
    pins: MatrixPins<P>,
}

impl<P: OutputPin> SignalDriver<P> {
    /// Take ownership of the signal lines.
    #[must_use]
    pub const fn new(pins: MatrixPins<P>) -> Self {
        Self { pins }
    }

    /// Give the signal lines back.
    #[must_use]
    pub fn into_pins(self) -> MatrixPins<P> {
        self.pins
    }

    /// Drive every line low. Call once before scanning starts and again to release the panel.
    ///
    /// Output mode itself is set when the platform creates the pins. Every line is attempted
    /// even after one fails, so the lines that still work end low.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PinWrite`] if any pin rejects the level change.
    pub fn configure(&mut self) -> Result<()> {
        let pins = &mut self.pins;
        let mut outcome = Ok(());
        for pin in [
            &mut pins.r1,
            &mut pins.r2,
            &mut pins.g1,
            &mut pins.g2,
            &mut pins.b1,
            &mut pins.b2,
            &mut pins.a,
            &mut pins.b,
            &mut pins.c,
            &mut pins.d,
            &mut pins.oe,
            &mut pins.clk,
            &mut pins.lat,
        ] {
            outcome = outcome.and(drive(pin, PinState::Low));
        }
        outcome
    }

    /// Put the low 4 bits of `row` on the address lines (bit 0 → A … bit 3 → D).
    ///
    /// # Errors
    ///
    /// Returns [`Error::PinWrite`] if a pin rejects the level change.
    pub fn set_row_address(&mut self, row: u8) -> Result<()> {
        assert!(row < 16, "row address must be below 16");
        drive(&mut self.pins.a, bit_state(row, 0))?;
        drive(&mut self.pins.b, bit_state(row, 1))?;
        drive(&mut self.pins.c, bit_state(row, 2))?;
        drive(&mut self.pins.d, bit_state(row, 3))
    }

    /// One shift-register tick: clock high then low.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PinWrite`] if a pin rejects the level change.
    pub fn clock_pulse(&mut self) -> Result<()> {
        drive(&mut self.pins.clk, PinState::High)?;
        drive(&mut self.pins.clk, PinState::Low)
    }

    /// Commit the shifted row: latch high then low.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PinWrite`] if a pin rejects the level change.
    pub fn latch_pulse(&mut self) -> Result<()> {
        drive(&mut self.pins.lat, PinState::High)?;
        drive(&mut self.pins.lat, PinState::Low)
    }

    /// Blank the panel before shifting new column data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PinWrite`] if a pin rejects the level change.
    pub fn disable_output(&mut self) -> Result<()> {
        drive(&mut self.pins.oe, OE_BLANKED)
    }

    /// Show the latched row again.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PinWrite`] if a pin rejects the level change.
    pub fn enable_output(&mut self) -> Result<()> {
        drive(&mut self.pins.oe, OE_SHOWING)
    }

    /// Put one column's top and bottom colors on the two color-line triples.
    ///
    /// A line goes high iff its channel is on; an unset cell drives its triple low. Both
    /// triples are written on every call.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PinWrite`] if a pin rejects the level change.
    pub fn set_column_colors(&mut self, top: Cell, bottom: Cell) -> Result<()> {
        let (red, green, blue) = lines_for(top);
        drive(&mut self.pins.r1, red)?;
        drive(&mut self.pins.g1, green)?;
        drive(&mut self.pins.b1, blue)?;

        let (red, green, blue) = lines_for(bottom);
        drive(&mut self.pins.r2, red)?;
        drive(&mut self.pins.g2, green)?;
        drive(&mut self.pins.b2, blue)
    }
}

fn lines_for(cell: Cell) -> (PinState, PinState, PinState) {
    let (red, green, blue) = cell.map_or((false, false, false), Color::channels_on);
    (PinState::from(red), PinState::from(green), PinState::from(blue))
}

fn bit_state(value: u8, bit: u8) -> PinState {
    PinState::from(value & (1 << bit) != 0)
}

#[inline]
fn drive<P: OutputPin>(pin: &mut P, state: PinState) -> Result<()> {
    pin.set_state(state).map_err(|_| Error::PinWrite)
}
