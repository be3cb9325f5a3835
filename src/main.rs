//! Demo launcher: drives the sequencer against an in-memory surface.
//!
//! Walks the flows a host UI would wire to buttons: a one-shot
//! show-and-hide, then a cycled sway chain that gets stopped and reset.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use cadence_motion::SequenceBuilder;
use cadence_surface::{MemorySurface, Surface};
use tokio::time::sleep;

fn main() -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    runtime.block_on(run())
}

async fn run() -> Result<()> {
    let surface: Arc<MemorySurface> = Arc::new(MemorySurface::new());
    surface.add_marker("card");
    println!("initial markers: {:?}", surface.markers());

    println!("\n--- show-and-hide (900ms) ---");
    let handle = SequenceBuilder::new()
        .add_show_and_hide(900.0)
        .play(surface.clone());
    println!("scheduled play {:?}", handle.id());

    sleep(Duration::from_millis(450)).await;
    println!("mid-flight markers: {:?}", surface.markers());

    sleep(Duration::from_millis(550)).await;
    println!(
        "finished markers: {:?} (state: {:?})",
        surface.markers(),
        handle.state()
    );

    println!("\n--- cycled sway (4 x 200ms moves) ---");
    let sway = SequenceBuilder::new()
        .add_move(200.0, (80.0, 0.0).into())
        .add_move(200.0, (0.0, 0.0).into())
        .add_move(200.0, (-80.0, 0.0).into())
        .add_move(200.0, (0.0, 0.0).into());
    let handle = sway.play_cycled(surface.clone());

    sleep(Duration::from_millis(1100)).await;
    println!("mid-cycle transform: {:?}", surface.transform());

    handle.stop();
    println!(
        "after stop, transform stays: {:?} (state: {:?})",
        surface.transform(),
        handle.state()
    );

    handle.reset();
    println!(
        "after reset, markers: {:?}, transform: {:?}",
        surface.markers(),
        surface.transform()
    );

    Ok(())
}
