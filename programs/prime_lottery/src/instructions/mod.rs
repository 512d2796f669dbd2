pub mod admin;
pub mod buy_ticket;
pub mod cancel_drawing;
pub mod fulfill_drawing;
pub mod fund;
pub mod referral;
pub mod request_drawing;
pub mod views;
pub mod withdraw_prize;

pub use admin::*;
pub use buy_ticket::*;
pub use cancel_drawing::*;
pub use fulfill_drawing::*;
pub use fund::*;
pub use referral::*;
pub use request_drawing::*;
pub use views::*;
pub use withdraw_prize::*;
