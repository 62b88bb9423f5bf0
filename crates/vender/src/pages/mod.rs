//! Page objects.
//!
//! One module per application screen. Every page object borrows the
//! [`crate::session::Session`] and composes the wait engine and shadow
//! resolver from it; locators live as private constants next to the actions
//! that use them. Actions narrate what they did through the session
//! reporter and return `Result`s, verification queries return `bool`s the
//! scenarios assert on.

pub mod accounts;
pub mod common;
pub mod contacts;
pub mod home;
pub mod login;
pub mod logout;
pub mod opportunities;
pub mod products;
pub mod quote;
pub mod search;

pub use accounts::AccountsPage;
pub use common::CommonActions;
pub use contacts::ContactsPage;
pub use home::HomePage;
pub use login::LoginPage;
pub use logout::LogoutPage;
pub use opportunities::OpportunitiesPage;
pub use products::ProductSelection;
pub use quote::QuotePage;
pub use search::SearchPage;
