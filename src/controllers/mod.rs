//! Page controllers.
//!
//! Each controller owns the load lifecycle of one page. A trigger returns a
//! pending future that does not borrow the controller; the caller awaits it
//! (or spawns it) and hands the result back through `apply`, which drops
//! anything a newer trigger has superseded.

pub mod dashboard;
pub mod notice;
pub mod profile;
pub mod sports;
pub mod stock;
pub mod view_state;

#[cfg(test)]
mod testing;

pub use dashboard::{DashboardController, DashboardSettled, PendingDashboard};
pub use notice::Notice;
pub use profile::ProfileController;
pub use sports::SportsListController;
pub use stock::{normalize_symbol, StockLookupController};
pub use view_state::{LoadSlot, LoadTicket, PendingLoad, Settled, ViewState};
