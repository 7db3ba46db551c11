pub mod color_picker;
pub mod comments_panel;
pub mod document_view;
pub mod find_replace;
pub mod helpers;
pub mod image_drop;
pub mod image_resizer;
pub mod link_prompt;
pub mod notification;
pub mod table_picker;
pub mod toolbar;
pub mod versions_panel;
