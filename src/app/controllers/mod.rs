pub mod comments_controller;
pub mod document_controller;
pub mod find_controller;
pub mod image_controller;
pub mod io_controller;
pub mod layout_controller;
pub mod versions_controller;
