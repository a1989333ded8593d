//! Sign-in page

pub mod page;

pub use page::page_signin;
