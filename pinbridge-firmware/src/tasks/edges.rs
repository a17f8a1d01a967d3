//! Edge watch tasks
//!
//! One task per exposed GPIO, all on the high-priority executor. They only
//! latch edges into `PENDING`; the bridge turns them into events.

use defmt::*;

use pinbridge_hal_rp2040::EdgeWatcher;

use crate::channels::PENDING;

#[embassy_executor::task(pool_size = 30)]
pub async fn edge_watch_task(watcher: EdgeWatcher) -> ! {
    debug!("Edge watcher for GPIO{} started", watcher.number());
    watcher.run(&PENDING).await
}
