//! Document import/export. Everything here is pure bytes-in, bytes-out so it
//! can run on a worker thread.

pub mod docx;
pub mod html_export;
pub mod pdf;
pub mod picture;
