pub mod account;
pub mod reset_ticket;

pub use account::Account;
pub use reset_ticket::PasswordResetTicket;
