//! Continuous row-pair refresh of the panel from the pixel buffer.

use embassy_futures::yield_now;
use embedded_hal::digital::OutputPin;
use portable_atomic::Ordering;

use super::{MatrixStatic, PixelBuffer, ROW_PAIRS, SignalDriver, WIDTH};
use crate::Result;

/// Shift one complete frame out to the panel.
///
/// For each row pair `r` in `0..16`, in order: blank the output, shift the 64 columns of rows
/// `r` (top lines) and `r + 16` (bottom lines) left to right, show the output again, select
/// row address `r`, and latch. Every cell is read exactly once.
///
/// # Errors
///
/// Returns [`crate::Error::PinWrite`] if a pin rejects a level change.
pub fn scan_frame<P: OutputPin>(driver: &mut SignalDriver<P>, pixels: &PixelBuffer) -> Result<()> {
    let rows = pixels.rows();
    for (row_address, (top_row, bottom_row)) in
        (0u8..).zip(rows[..ROW_PAIRS].iter().zip(&rows[ROW_PAIRS..]))
    {
        driver.disable_output()?;
        for column in 0..WIDTH {
            driver.set_column_colors(top_row[column], bottom_row[column])?;
            driver.clock_pulse()?;
        }
        driver.enable_output()?;
        driver.set_row_address(row_address)?;
        driver.latch_pulse()?;
    }
    Ok(())
}

/// Scan frames until the matrix is asked to stop.
///
/// The pixel buffer stays locked for each whole frame, so a compositor call is either entirely
/// in a frame or entirely absent from it. Between frames the loop only yields to the executor;
/// there is no other delay. On stop, and on a pin error as far as the failing pin allows, every
/// line is driven low and the stopped signal fires. The driver is returned so the pins can be
/// reused.
///
/// Never call directly on target - spawned by [`Matrix::new`](super::Matrix::new). Host tests
/// drive it with `embassy_futures::block_on`.
///
/// # Errors
///
/// Returns [`crate::Error::PinWrite`] if a pin rejects a level change.
pub async fn scan_loop<P: OutputPin>(
    matrix_static: &MatrixStatic,
    mut driver: SignalDriver<P>,
) -> Result<SignalDriver<P>> {
    let scanned = run_frames(matrix_static, &mut driver).await;
    // Release the panel even after a failure; the first error is the one reported.
    let result = scanned.and(driver.configure());
    matrix_static.has_stopped.store(true, Ordering::Release);
    matrix_static.stopped.signal(());
    match result {
        Ok(()) => {
            info!(
                "scan_loop: stopped after {} frames",
                matrix_static.frame_count.load(Ordering::Relaxed)
            );
            Ok(driver)
        }
        Err(err) => {
            error!("scan_loop: pin failure, scanning halted");
            Err(err)
        }
    }
}

async fn run_frames<P: OutputPin>(
    matrix_static: &MatrixStatic,
    driver: &mut SignalDriver<P>,
) -> Result<()> {
    driver.configure()?;
    info!("scan_loop: started");
    loop {
        {
            let pixels = matrix_static.pixels.lock().await;
            scan_frame(driver, &pixels)?;
        }
        matrix_static.frame_count.fetch_add(1, Ordering::Relaxed);

        if matrix_static.stop.try_take().is_some() {
            return Ok(());
        }
        yield_now().await;
    }
}
