mod notify_followers;

pub use notify_followers::notify_followers;
