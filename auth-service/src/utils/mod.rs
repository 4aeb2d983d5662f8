pub mod login_widget;
pub mod password;

pub use login_widget::{verify_widget_signature, LoginWidgetPayload};
pub use password::{generate_salt, hash_password, verify_password};
