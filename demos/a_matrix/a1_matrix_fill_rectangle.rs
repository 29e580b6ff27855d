#![no_std]
#![no_main]
#![cfg(not(feature = "host"))]

use core::{convert::Infallible, future, panic};

use embassy_executor::Spawner;
use hub75_envoy::{
    Result,
    matrix::{Color, Matrix, MatrixPins, MatrixStatic, PinMapping, RpPinBank},
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

    // Blue background with a red block; the block overwrites because red is opaque.
    matrix.fill(Color::BLUE).await;
    matrix.draw_rectangle(8, 4, 20, 12, Color::RED).await?;

    // A zero-alpha green rectangle ORs into what is there: blue becomes cyan, red becomes yellow.
    matrix
        .draw_rectangle(20, 10, 30, 16, Color::new(0, 1, 0, 0))
        .await?;

    defmt::info!("frames so far: {}", matrix.frame_count());
    future::pending().await // run forever
}
