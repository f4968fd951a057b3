/**
 * remote module
 * HTTP collaborators: the target application's impersonation endpoints and
 * the hosted partner address book
 */

pub mod address_book;
pub mod impersonation;

pub use address_book::{AddressBookClient, FunctionCall, FunctionResponse};
pub use impersonation::{endpoint, ImpersonationClient};
