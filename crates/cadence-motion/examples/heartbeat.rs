//! Example walking the pulse primitive and handler-style triggering.
//!
//! This shows:
//! - Starting a heartbeat and watching the scale toggle every 500ms
//! - Stopping it through the playback handle
//! - Firing a finite sequence through a fire-and-forget trigger handler

use cadence_motion::SequenceBuilder;
use cadence_surface::{MemorySurface, Surface};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let surface: Arc<MemorySurface> = Arc::new(MemorySurface::new());

    println!("--- Heartbeat ---");
    let handle = SequenceBuilder::new().add_heartbeat().play(surface.clone());
    for _ in 0..4 {
        sleep(Duration::from_millis(500)).await;
        println!("transform: {:?}", surface.transform());
    }

    handle.stop();
    println!("stopped; transform stays: {:?}", surface.transform());

    println!("\n--- Trigger handler ---");
    let handler = SequenceBuilder::new()
        .add_show_and_hide(300.0)
        .build_handler();

    handler(surface.clone());
    sleep(Duration::from_millis(400)).await;
    println!("markers after show-and-hide: {:?}", surface.markers());
}
