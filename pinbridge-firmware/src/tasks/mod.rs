//! Embassy tasks

mod bridge;
mod edges;
mod usb;

pub use bridge::{bridge_task, BoardDevice};
pub use edges::edge_watch_task;
pub use usb::{usb_rx_task, usb_task, usb_tx_task};
