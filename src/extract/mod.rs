// Contact extraction
//
// Turns raw HTML into emails, phone numbers and a candidate contact page.

mod contacts;
mod links;
pub mod patterns;

pub use contacts::{ContactExtractor, Contacts};
pub use links::find_contact_link;
