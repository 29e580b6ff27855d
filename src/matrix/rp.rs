//! RP2040 / RP2350 pins and the spawned scan task.

use embassy_rp::gpio::{AnyPin, Level, Output};

use super::{MatrixStatic, PinBank, SignalDriver, scan_loop};
use crate::{Error, Result};

#[cfg(feature = "pico1")]
const GPIO_COUNT: u8 = 30;
#[cfg(not(feature = "pico1"))]
const GPIO_COUNT: u8 = 48;

/// Hands out RP GPIOs as push-pull outputs by number, each at most once.
pub struct RpPinBank {
    claimed: u64,
}

impl RpPinBank {
    /// Create a pin bank that may claim any GPIO.
    ///
    /// # Safety
    ///
    /// Every GPIO this bank opens must not be used anywhere else in the program, including
    /// through the peripherals returned by `embassy_rp::init`.
    #[must_use]
    #[expect(unsafe_code, reason = "callers vouch for exclusive GPIO use")]
    pub const unsafe fn new() -> Self {
        Self { claimed: 0 }
    }
}

impl PinBank for RpPinBank {
    type Pin = Output<'static>;

    fn open(&mut self, gpio: u8) -> Result<Self::Pin> {
        let mask = 1u64 << u32::from(gpio.min(63));
        if gpio >= GPIO_COUNT || self.claimed & mask != 0 {
            return Err(Error::HardwareUnavailable { gpio });
        }
        self.claimed |= mask;
        // SAFETY: `new`'s caller guarantees the GPIO is unused elsewhere, and `claimed` stops
        // this bank from handing it out twice.
        #[expect(unsafe_code, reason = "GPIOs are chosen at runtime from a PinMapping")]
        let pin = unsafe { AnyPin::steal(gpio) };
        Ok(Output::new(pin, Level::Low))
    }
}

#[embassy_executor::task]
pub(super) async fn matrix_scan_task(
    matrix_static: &'static MatrixStatic,
    driver: SignalDriver<Output<'static>>,
) {
    if let Err(err) = scan_loop(matrix_static, driver).await {
        error!("matrix_scan_task: {}", err);
    }
}
