mod selection;
mod store_contact_repository;
mod traits;

pub use selection::AttributeSelection;
pub use store_contact_repository::StoreContactRepository;
pub use traits::ContactRepository;
