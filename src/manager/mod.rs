mod idle;
mod observer;
mod reconciler;
mod targets_manager;

pub use observer::UpdateObserver;
#[cfg(test)]
pub use observer::MockUpdateObserver;
pub use targets_manager::*;

#[cfg(test)]
mod idle_test;
