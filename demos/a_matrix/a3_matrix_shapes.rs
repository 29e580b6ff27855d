#![no_std]
#![no_main]
#![cfg(not(feature = "host"))]

use core::{convert::Infallible, future, panic};

use embassy_executor::Spawner;
use embedded_graphics::{
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{Circle, Line, PrimitiveStyle, Rectangle},
};
use hub75_envoy::{
    Result,
    matrix::{Color, Matrix, MatrixPins, MatrixStatic, PinMapping, PixelBuffer, RpPinBank},
};
use {defmt_rtt as _, panic_probe as _};

static MATRIX_STATIC: MatrixStatic = MatrixStatic::new_static();

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

    // The pixel buffer is an embedded-graphics DrawTarget; the whole scene lands in one frame.
    matrix
        .update(|pixels| {
            let Ok(()) = draw_scene(pixels);
        })
        .await;

    future::pending().await // run forever
}

fn draw_scene(pixels: &mut PixelBuffer) -> core::result::Result<(), Infallible> {
    Rectangle::new(PixelBuffer::TOP_LEFT, PixelBuffer::SIZE)
        .into_styled(PrimitiveStyle::with_stroke(Rgb888::RED, 1))
        .draw(pixels)?;
    Line::new(PixelBuffer::TOP_LEFT, PixelBuffer::BOTTOM_RIGHT)
        .into_styled(PrimitiveStyle::with_stroke(Rgb888::GREEN, 1))
        .draw(pixels)?;
    Circle::new(Point::new(20, 4), 24)
        .into_styled(PrimitiveStyle::with_stroke(Rgb888::BLUE, 1))
        .draw(pixels)?;
    pixels.merge_at(32, 16, Color::WHITE);
    Ok(())
}
