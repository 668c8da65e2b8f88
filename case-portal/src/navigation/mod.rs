pub mod history;
pub mod location;
pub mod modal;

pub use history::{History, MemoryHistory};
pub use location::Location;
pub use modal::{ModalGroup, ModalMode, ModalStateController, DEFAULT_MODAL_PARAM};
