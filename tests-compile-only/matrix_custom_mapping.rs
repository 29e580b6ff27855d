//! Compile-only verification that a custom pin mapping and the matrix API type-check on target.
//!
//! Built for thumbv6m-none-eabi with the `pico1` feature; never flashed.

#![cfg(not(feature = "host"))]
#![no_std]
#![no_main]
#![allow(dead_code, reason = "Compile-time verification only")]

use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_time::Duration;
use hub75_envoy::{
    Result,
    matrix::{
        Color, Matrix, MatrixFont, MatrixPins, MatrixStatic, Picture, PinMapping, Raster,
        RpPinBank, Scroll, ScrollStop, Text,
    },
};
use panic_probe as _;

static MATRIX_STATIC: MatrixStatic = MatrixStatic::new_static();
static STOP: ScrollStop = ScrollStop::new();

// Wiring that moves every line off the HAT's default pins.
const CUSTOM_MAPPING: PinMapping = PinMapping {
    r1: 0,
    r2: 1,
    g1: 2,
    g2: 3,
    b1: 4,
    b2: 5,
    a: 6,
    b: 7,
    c: 8,
    d: 9,
    oe: 10,
    clk: 11,
    lat: 12,
};

async fn custom_mapping(spawner: Spawner) -> Result<()> {
    // SAFETY: GPIO 0-12 are used for nothing else here.
    #[expect(unsafe_code, reason = "pins are claimed by GPIO number")]
    let mut pin_bank = unsafe { RpPinBank::new() };
    let pins = MatrixPins::from_mapping(&CUSTOM_MAPPING, &mut pin_bank)?;
    let matrix = Matrix::new(&MATRIX_STATIC, pins, spawner)?;

    let text: Text<64, 8> = Text::new("OK", MatrixFont::Font3x4, 2.0, 0, 0)?;
    matrix.print_text(&text, Color::GREEN).await;

    let mut dot: Raster<1, 1> = Raster::new(1, 1)?;
    dot.set(0, 0, Color::WHITE);
    let picture: Picture<4, 4> = Picture::new(&dot, 4.0, 60, 28)?;
    matrix.print_picture(&picture).await;

    text.scroll(Scroll::right(1, Duration::from_millis(50)), &STOP).await;
    matrix.stop().await;
    Ok(())
}

#[embassy_executor::main]
async fn main(spawner: Spawner) -> ! {
    let _p = embassy_rp::init(Default::default());
    if let Err(err) = custom_mapping(spawner).await {
        defmt::panic!("{}", err);
    }
    core::future::pending().await
}
