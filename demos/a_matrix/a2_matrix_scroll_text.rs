#![no_std]
#![no_main]
#![cfg(not(feature = "host"))]

use core::{convert::Infallible, panic};

use embassy_executor::Spawner;
use embassy_futures::join::join;
use embassy_time::{Duration, Timer};
use hub75_envoy::{
    Result,
    matrix::{
        Color, Matrix, MatrixFont, MatrixPins, MatrixStatic, PinMapping, RpPinBank, Scroll,
        ScrollStop, Text,
    },
};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

static MATRIX_STATIC: MatrixStatic = MatrixStatic::new_static();
static HEADLINE: StaticCell<Text> = StaticCell::new();
static TICKER: StaticCell<Text> = StaticCell::new();
static TICKER_STOP: ScrollStop = ScrollStop::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) -> ! {
    let err = inner_main(spawner).await.unwrap_err();
    panic!("{err}");
}

async fn inner_main(spawner: Spawner) -> Result<Infallible> {
    let _p = embassy_rp::init(Default::default());

    // SAFETY: the HAT's 13 GPIOs are used for nothing else in this demo.
    #[expect(unsafe_code, reason = "pins are claimed by GPIO number")]
    let mut pin_bank = unsafe { RpPinBank::new() };
    let pins = MatrixPins::from_mapping(&PinMapping::ADAFRUIT_HAT, &mut pin_bank)?;
    let matrix = Matrix::new(&MATRIX_STATIC, pins, spawner)?;

    // Render straight into static memory rather than into the task.
    let headline = Text::new_in(HEADLINE.uninit(), "HUB75", MatrixFont::Font6x10, 1.0, 0, 2)?;
    headline.center(true, false);
    let ticker = Text::new_in(
        TICKER.uninit(),
        "Hello from the Pico",
        MatrixFont::Font5x8,
        1.0,
        64,
        20,
    )?;

    let scroll = Scroll::left(1, Duration::from_millis(40));
    join(ticker.scroll(scroll, &TICKER_STOP), async {
        loop {
            matrix
                .update(|pixels| {
                    pixels.clear();
                    headline.print_into(pixels, Color::YELLOW);
                    ticker.print_into(pixels, Color::CYAN);
                })
                .await;
            Timer::after(Duration::from_millis(20)).await;
        }
    })
    .await;
    unreachable!("the redraw loop never ends")
}
